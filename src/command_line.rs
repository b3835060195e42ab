//! Child command line: interpreter, fixed command token, caller arguments.
//!
//! Caller arguments are forwarded verbatim. When the line is rendered as one string they are
//! appended unquoted, each after a single space; quoting them is the caller's business.

use std::ffi::{OsStr, OsString};
use std::process::Command;

use crate::config::LaunchStrategy;
use crate::platform::{Platform, QuoteStyle, SpawnPrimitive};
use crate::util::shell_like_split_args;

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CommandLine {
    program: OsString,
    command: String,
    args: Vec<OsString>,
}

impl CommandLine {
    pub fn new(program: impl Into<OsString>, command: impl Into<String>, args: Vec<OsString>) -> Self {
        Self {
            program: program.into(),
            command: command.into(),
            args,
        }
    }

    pub fn program(&self) -> &OsStr {
        &self.program
    }

    pub fn command(&self) -> &str {
        &self.command
    }

    pub fn args(&self) -> &[OsString] {
        &self.args
    }

    /// Fixed token and caller arguments as one verbatim tail, without the program.
    pub fn tail(&self) -> OsString {
        let mut out = OsString::from(&self.command);
        for a in &self.args {
            if !out.is_empty() {
                out.push(" ");
            }
            out.push(a);
        }
        out
    }

    /// One-string form of the line under `style`. Only the program is quoted.
    pub fn render(&self, style: QuoteStyle) -> OsString {
        let mut line = OsString::from("\"");
        match style {
            QuoteStyle::Escaped => line.push(escape_in_double_quotes(&self.program)),
            QuoteStyle::Single | QuoteStyle::Nested => line.push(&self.program),
        }
        line.push("\"");
        if !self.command.is_empty() {
            line.push(" ");
            line.push(&self.command);
        }
        for a in &self.args {
            line.push(" ");
            line.push(a);
        }
        match style {
            QuoteStyle::Single | QuoteStyle::Escaped => line,
            QuoteStyle::Nested => {
                let mut wrapped = OsString::from("\"");
                wrapped.push(line);
                wrapped.push("\"");
                wrapped
            }
        }
    }
}

/// Backslash-escape the characters a POSIX shell still interprets inside double quotes.
fn escape_in_double_quotes(s: &OsStr) -> OsString {
    let bytes = s.as_encoded_bytes();
    let mut out = Vec::with_capacity(bytes.len() + 2);
    for &b in bytes {
        if matches!(b, b'$' | b'`' | b'"' | b'\\') {
            out.push(b'\\');
        }
        out.push(b);
    }
    // SAFETY: only ASCII bytes were inserted, each right before another ASCII byte, so every
    // original sequence stays intact.
    unsafe { OsString::from_encoded_bytes_unchecked(out) }
}

/// Concrete process to create for a command line.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Invocation {
    /// Program plus individual argv entries.
    Argv { program: OsString, args: Vec<OsString> },
    /// Program plus a verbatim command-line tail appended after the quoted program (Windows).
    Raw { program: OsString, tail: OsString },
}

impl Invocation {
    pub fn program(&self) -> &OsStr {
        match self {
            Invocation::Argv { program, .. } | Invocation::Raw { program, .. } => program,
        }
    }

    pub fn to_command(&self) -> Command {
        match self {
            Invocation::Argv { program, args } => {
                let mut cmd = Command::new(program);
                cmd.args(args);
                cmd
            }
            Invocation::Raw { program, tail } => raw_command(program, tail),
        }
    }
}

#[cfg(windows)]
fn raw_command(program: &OsStr, tail: &OsStr) -> Command {
    use std::os::windows::process::CommandExt;
    let mut cmd = Command::new(program);
    if !tail.is_empty() {
        cmd.raw_arg(tail);
    }
    cmd
}

#[cfg(not(windows))]
fn raw_command(program: &OsStr, tail: &OsStr) -> Command {
    let mut cmd = Command::new(program);
    cmd.args(shell_like_split_args(&tail.to_string_lossy()));
    cmd
}

/// Command interpreter used by the shell strategy on Windows.
pub fn windows_shell() -> OsString {
    std::env::var_os("ComSpec")
        .filter(|v| !v.is_empty())
        .unwrap_or_else(|| OsString::from("cmd.exe"))
}

/// Choose the process to create for `line` on `platform`.
pub fn invocation_for(
    platform: &Platform,
    strategy: LaunchStrategy,
    line: &CommandLine,
    shell: impl FnOnce() -> OsString,
) -> Invocation {
    match (strategy, platform.spawn) {
        (LaunchStrategy::Direct, SpawnPrimitive::Argv) => {
            let mut args: Vec<OsString> = shell_like_split_args(line.command())
                .into_iter()
                .map(OsString::from)
                .collect();
            args.extend(line.args().iter().cloned());
            Invocation::Argv {
                program: line.program().to_os_string(),
                args,
            }
        }
        (LaunchStrategy::Direct, SpawnPrimitive::RawTail) => Invocation::Raw {
            program: line.program().to_os_string(),
            tail: line.tail(),
        },
        (LaunchStrategy::Shell, SpawnPrimitive::Argv) => Invocation::Argv {
            program: OsString::from("/bin/sh"),
            args: vec![OsString::from("-c"), line.render(platform.shell_quote)],
        },
        (LaunchStrategy::Shell, SpawnPrimitive::RawTail) => {
            let mut tail = OsString::from("/S /C ");
            tail.push(line.render(platform.shell_quote));
            Invocation::Raw {
                program: shell(),
                tail,
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn os(v: &[&str]) -> Vec<OsString> {
        v.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_render_single_quotes_program_only() {
        let line = CommandLine::new("/opt/my app/venv/bin/python", "-m app", os(&["--flag", "value"]));
        assert_eq!(
            line.render(QuoteStyle::Single),
            "\"/opt/my app/venv/bin/python\" -m app --flag value"
        );
    }

    #[test]
    fn test_render_escaped_protects_shell_metacharacters_in_program() {
        let line = CommandLine::new(r#"/srv/a $HOME `x` "q" \n/python"#, "-m app", os(&["v"]));
        assert_eq!(
            line.render(QuoteStyle::Escaped),
            r#""/srv/a \$HOME \`x\` \"q\" \\n/python" -m app v"#
        );
        assert_eq!(
            line.render(QuoteStyle::Single),
            r#""/srv/a $HOME `x` "q" \n/python" -m app v"#
        );
    }

    #[cfg(unix)]
    #[test]
    fn test_render_keeps_non_utf8_program_bytes() {
        use std::os::unix::ffi::{OsStrExt, OsStringExt};
        let line = CommandLine::new(OsStr::from_bytes(b"/srv/app\xff/python"), "", Vec::new());
        assert_eq!(line.render(QuoteStyle::Escaped).into_vec(), b"\"/srv/app\xff/python\"".to_vec());
    }

    #[test]
    fn test_render_nested_wraps_whole_line() {
        let line = CommandLine::new(r"C:\My Apps\venv\Scripts\python.exe", "-m app", os(&["x"]));
        assert_eq!(
            line.render(QuoteStyle::Nested),
            r#"""C:\My Apps\venv\Scripts\python.exe" -m app x""#
        );
    }

    #[test]
    fn test_render_empty_command_has_no_double_space() {
        let line = CommandLine::new("/opt/app/venv/bin/python", "", os(&["a"]));
        assert_eq!(line.render(QuoteStyle::Single), "\"/opt/app/venv/bin/python\" a");
        assert_eq!(line.tail(), OsString::from("a"));
    }

    #[test]
    fn test_args_are_not_reescaped() {
        let line = CommandLine::new("/p", "-m app", os(&["a b", "$HOME"]));
        assert_eq!(line.render(QuoteStyle::Single), "\"/p\" -m app a b $HOME");
        assert_eq!(line.tail(), OsString::from("-m app a b $HOME"));
    }

    #[test]
    fn test_posix_direct_keeps_each_arg_as_argv_entry() {
        let line = CommandLine::new(
            "/opt/app/venv/bin/python",
            r#"-c "from app import main; exit(main())""#,
            os(&["a b", "c"]),
        );
        let inv = invocation_for(&Platform::POSIX, LaunchStrategy::Direct, &line, || {
            unreachable!("no shell for direct launch")
        });
        assert_eq!(
            inv,
            Invocation::Argv {
                program: OsString::from("/opt/app/venv/bin/python"),
                args: os(&["-c", "from app import main; exit(main())", "a b", "c"]),
            }
        );
    }

    #[test]
    fn test_posix_shell_hands_line_to_sh() {
        let line = CommandLine::new("/opt/app/venv/bin/python", "-m app", os(&["--flag"]));
        let inv = invocation_for(&Platform::POSIX, LaunchStrategy::Shell, &line, || {
            unreachable!("posix uses /bin/sh")
        });
        assert_eq!(
            inv,
            Invocation::Argv {
                program: OsString::from("/bin/sh"),
                args: os(&["-c", "\"/opt/app/venv/bin/python\" -m app --flag"]),
            }
        );
    }

    #[test]
    fn test_posix_shell_escapes_dollar_in_install_root() {
        let line = CommandLine::new("/tmp/a$HOME/venv/bin/python", "-m app", Vec::new());
        let inv = invocation_for(&Platform::POSIX, LaunchStrategy::Shell, &line, || {
            unreachable!("posix uses /bin/sh")
        });
        assert_eq!(
            inv,
            Invocation::Argv {
                program: OsString::from("/bin/sh"),
                args: os(&["-c", "\"/tmp/a\\$HOME/venv/bin/python\" -m app"]),
            }
        );
    }

    #[test]
    fn test_windows_direct_appends_verbatim_tail() {
        let line = CommandLine::new(r"C:\App\venv\Scripts\python.exe", "-m app", os(&["x", "y"]));
        let inv = invocation_for(&Platform::WINDOWS, LaunchStrategy::Direct, &line, || {
            unreachable!("no shell for direct launch")
        });
        assert_eq!(
            inv,
            Invocation::Raw {
                program: OsString::from(r"C:\App\venv\Scripts\python.exe"),
                tail: OsString::from("-m app x y"),
            }
        );
    }

    #[test]
    fn test_windows_shell_uses_nested_quotes() {
        let line = CommandLine::new(r"C:\My App\venv\Scripts\python.exe", "-m app", os(&["x"]));
        let inv = invocation_for(&Platform::WINDOWS, LaunchStrategy::Shell, &line, || {
            OsString::from(r"C:\Windows\system32\cmd.exe")
        });
        assert_eq!(
            inv,
            Invocation::Raw {
                program: OsString::from(r"C:\Windows\system32\cmd.exe"),
                tail: OsString::from(r#"/S /C ""C:\My App\venv\Scripts\python.exe" -m app x""#),
            }
        );
        assert_eq!(inv.program(), OsStr::new(r"C:\Windows\system32\cmd.exe"));
    }
}
