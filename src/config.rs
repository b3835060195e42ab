//! Build-time launcher configuration.
//!
//! The packaging tool sets `BUNDLE_LAUNCHER_*` when compiling the stub; `build.rs` turns them into
//! `rustc-env` values that are read here. Nothing is looked up at runtime.

use crate::util::shell_like_split_args;

/// How the child is started.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum LaunchStrategy {
    /// Spawn the interpreter directly and wait for its real exit code.
    Direct,
    /// Hand the rendered command line to the platform command interpreter.
    Shell,
}

impl LaunchStrategy {
    pub fn parse(s: &str) -> Option<LaunchStrategy> {
        match s.trim().to_ascii_lowercase().as_str() {
            "direct" => Some(LaunchStrategy::Direct),
            "shell" => Some(LaunchStrategy::Shell),
            _ => None,
        }
    }
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct LauncherConfig {
    /// Fixed argument fragment placed between the interpreter and the caller arguments,
    /// e.g. `-m mypkg.app`. Empty runs the bare interpreter.
    pub command: String,
    /// Interpreter version tag such as `python3.11`; selects `lib/<tag>/site-packages` on POSIX.
    pub version_tag: Option<String>,
    pub strategy: LaunchStrategy,
    /// Use the console-less interpreter and report errors with a dialog.
    pub gui: bool,
}

impl LauncherConfig {
    /// Configuration compiled into this binary.
    pub fn baked() -> LauncherConfig {
        let version = env!("BUNDLE_LAUNCHER_PYTHON").trim();
        LauncherConfig {
            command: env!("BUNDLE_LAUNCHER_COMMAND").to_string(),
            version_tag: (!version.is_empty()).then(|| version.to_string()),
            strategy: LaunchStrategy::parse(env!("BUNDLE_LAUNCHER_STRATEGY"))
                .unwrap_or(LaunchStrategy::Direct),
            gui: cfg!(feature = "gui"),
        }
    }

    pub fn new(command: impl Into<String>) -> LauncherConfig {
        LauncherConfig {
            command: command.into(),
            version_tag: None,
            strategy: LaunchStrategy::Direct,
            gui: false,
        }
    }

    pub fn with_version_tag(mut self, tag: impl Into<String>) -> LauncherConfig {
        self.version_tag = Some(tag.into());
        self
    }

    pub fn with_strategy(mut self, strategy: LaunchStrategy) -> LauncherConfig {
        self.strategy = strategy;
        self
    }

    pub fn with_gui(mut self, gui: bool) -> LauncherConfig {
        self.gui = gui;
        self
    }

    /// The fixed command fragment as separate argv entries, for direct POSIX spawning.
    pub fn command_args(&self) -> Vec<String> {
        shell_like_split_args(&self.command)
    }
}

/// Build metadata, shown in the diagnostic trace header.
pub struct BuildInfo {
    pub version: &'static str,
    pub target: &'static str,
    pub profile: &'static str,
    pub rustc: &'static str,
    pub date: &'static str,
}

pub const BUILD_INFO: BuildInfo = BuildInfo {
    version: env!("CARGO_PKG_VERSION"),
    target: env!("BUNDLE_LAUNCHER_BUILD_TARGET"),
    profile: env!("BUNDLE_LAUNCHER_BUILD_PROFILE"),
    rustc: env!("BUNDLE_LAUNCHER_BUILD_RUSTC"),
    date: env!("BUNDLE_LAUNCHER_BUILD_DATE"),
};

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_strategy_parse() {
        assert_eq!(LaunchStrategy::parse("Direct"), Some(LaunchStrategy::Direct));
        assert_eq!(LaunchStrategy::parse(" shell "), Some(LaunchStrategy::Shell));
        assert_eq!(LaunchStrategy::parse("exec"), None);
    }

    #[test]
    fn test_command_args_module_form() {
        let cfg = LauncherConfig::new("-m mypkg.app");
        assert_eq!(cfg.command_args(), vec!["-m".to_string(), "mypkg.app".to_string()]);
    }

    #[test]
    fn test_command_args_entry_point_form_keeps_quoted_code_whole() {
        let cfg = LauncherConfig::new(r#"-c "from mypkg.gui import main; exit(main())""#);
        assert_eq!(
            cfg.command_args(),
            vec![
                "-c".to_string(),
                "from mypkg.gui import main; exit(main())".to_string()
            ]
        );
    }

    #[test]
    fn test_empty_command_has_no_args() {
        assert!(LauncherConfig::new("").command_args().is_empty());
    }

    #[test]
    fn test_baked_strategy_is_known() {
        let cfg = LauncherConfig::baked();
        assert!(matches!(
            cfg.strategy,
            LaunchStrategy::Direct | LaunchStrategy::Shell
        ));
        assert_eq!(cfg.gui, cfg!(feature = "gui"));
    }
}
