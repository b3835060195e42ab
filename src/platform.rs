//! Platform capabilities for the launch pipeline.
//!
//! Both variants are plain data so the whole pipeline can be exercised for either target
//! from any host; `Platform::current()` picks the one matching the compile target.

use std::ffi::{OsStr, OsString};

/// How the interpreter path is quoted when the command line is rendered as one string.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum QuoteStyle {
    /// `"path" token args`
    Single,
    /// `"path" token args` with `$`, `` ` ``, `"` and `\` in the path backslash-escaped, so a
    /// POSIX shell keeps it as one literal word.
    Escaped,
    /// `""path" token" args`, survives the outer-quote stripping of `cmd /S /C`.
    Nested,
}

/// How the process-creation call receives its arguments.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum SpawnPrimitive {
    /// A program and a vector of argv entries (`execve`).
    Argv,
    /// A program and one command-line string it parses itself (`CreateProcessW`).
    RawTail,
}

/// Where the interpreter lives inside the bundle and which search variables need a bundle entry.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub struct Platform {
    pub name: &'static str,
    /// Separator used when composing paths under the install root.
    pub path_sep: char,
    /// Separator between entries of a search-path variable.
    pub list_sep: char,
    /// Native library search variable, POSIX only.
    pub library_var: Option<&'static str>,
    /// Executable search variable, Windows only.
    pub exec_var: Option<&'static str>,
    /// Interpreter location relative to `<root>/venv`.
    pub interpreter: &'static [&'static str],
    /// Interpreter for the GUI entry point (no console window).
    pub gui_interpreter: &'static [&'static str],
    /// Directory relative to `<root>/venv` that goes on the library/exec search variable.
    pub search_dir: &'static [&'static str],
    /// Whether the site-packages directory sits under a versioned `lib/<tag>` directory.
    pub versioned_site_packages: bool,
    /// Quoting used for native process creation and diagnostics.
    pub native_quote: QuoteStyle,
    /// Quoting used when the line is handed to the command interpreter.
    pub shell_quote: QuoteStyle,
    pub spawn: SpawnPrimitive,
}

impl Platform {
    pub const POSIX: Platform = Platform {
        name: "posix",
        path_sep: '/',
        list_sep: ':',
        library_var: Some(if cfg!(target_os = "macos") {
            "DYLD_LIBRARY_PATH"
        } else {
            "LD_LIBRARY_PATH"
        }),
        exec_var: None,
        interpreter: &["bin", "python"],
        gui_interpreter: &["bin", "python"],
        search_dir: &["bin"],
        versioned_site_packages: true,
        native_quote: QuoteStyle::Escaped,
        shell_quote: QuoteStyle::Escaped,
        spawn: SpawnPrimitive::Argv,
    };

    pub const WINDOWS: Platform = Platform {
        name: "windows",
        path_sep: '\\',
        list_sep: ';',
        library_var: None,
        exec_var: Some("PATH"),
        interpreter: &["Scripts", "python.exe"],
        gui_interpreter: &["Scripts", "pythonw.exe"],
        search_dir: &["Lib"],
        versioned_site_packages: false,
        native_quote: QuoteStyle::Single,
        shell_quote: QuoteStyle::Nested,
        spawn: SpawnPrimitive::RawTail,
    };

    pub fn current() -> Platform {
        if cfg!(windows) {
            Platform::WINDOWS
        } else {
            Platform::POSIX
        }
    }

    /// The search-path variable that receives the bundle directory on this platform.
    pub fn search_var(&self) -> Option<&'static str> {
        self.library_var.or(self.exec_var)
    }

    /// Join `parts` onto `base` with this platform's separator, purely lexically. The bytes of
    /// `base` are kept as they are.
    pub fn join(&self, base: &OsStr, parts: &[&str]) -> OsString {
        let mut sep = [0u8; 4];
        let sep: &str = self.path_sep.encode_utf8(&mut sep);
        let mut out = OsString::with_capacity(base.len() + parts.iter().map(|p| p.len() + 1).sum::<usize>());
        out.push(base);
        for p in parts {
            out.push(sep);
            out.push(p);
        }
        out
    }

    pub fn interpreter_parts(&self, gui: bool) -> &'static [&'static str] {
        if gui {
            self.gui_interpreter
        } else {
            self.interpreter
        }
    }
}
