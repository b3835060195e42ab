#![allow(clippy::module_name_repetitions)]
//! Small text helpers shared by the command-line builder and its tests.

/// Minimal shell-like tokenizer supporting single and double quotes.
/// Does not support escapes; quotes preserve spaces and `;`.
pub fn shell_like_split_args(s: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    let mut current = String::new();
    let mut in_single = false;
    let mut in_double = false;
    // A quoted empty string still counts as a word.
    let mut quoted = false;

    for ch in s.chars() {
        match ch {
            '\'' if !in_double => {
                in_single = !in_single;
                quoted = true;
            }
            '"' if !in_single => {
                in_double = !in_double;
                quoted = true;
            }
            c if c.is_whitespace() && !in_single && !in_double => {
                if !current.is_empty() || quoted {
                    out.push(std::mem::take(&mut current));
                }
                quoted = false;
            }
            c => current.push(c),
        }
    }
    if !current.is_empty() || quoted {
        out.push(current);
    }
    out
}
