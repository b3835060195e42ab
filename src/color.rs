#![allow(clippy::module_name_repetitions)]
//! ANSI painting for the launcher's own stderr lines.
//!
//! Only failure reports are colored; the child's output is never touched.

use once_cell::sync::OnceCell;

static STDERR_COLOR: OnceCell<bool> = OnceCell::new();

fn no_color_env() -> bool {
    // Per https://no-color.org/
    std::env::var_os("NO_COLOR").is_some()
}

fn color_enabled_for(is_tty: bool) -> bool {
    !no_color_env() && is_tty
}

/// Whether stderr lines get color: a terminal and no `NO_COLOR`. Computed once per run.
pub fn color_enabled_stderr() -> bool {
    *STDERR_COLOR.get_or_init(|| color_enabled_for(atty::is(atty::Stream::Stderr)))
}

/// Wrap string with ANSI color code when enabled; otherwise return unchanged.
pub fn paint(enabled: bool, code: &str, s: &str) -> String {
    if enabled {
        format!("{code}{s}\x1b[0m")
    } else {
        s.to_string()
    }
}

pub fn log_error_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[31;1m", msg));
}

pub fn log_hint_stderr(use_color: bool, msg: &str) {
    eprintln!("{}", paint(use_color, "\x1b[90m", msg));
}
