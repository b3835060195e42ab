//! The launch pipeline: resolve the install root, compute the child environment, start the
//! interpreter and hand back its exit code.

use std::ffi::OsString;

use crate::command_line::{invocation_for, windows_shell, CommandLine, Invocation};
use crate::config::LauncherConfig;
use crate::env::{configure_environment, BundleLayout, EnvOverlay, EnvWriter};
use crate::errors::LaunchError;
use crate::platform::Platform;
use crate::resolve::{resolve_install_dir, InstallDir};
use crate::spawn::Spawner;

/// Everything needed to start the child, computed before anything is spawned.
#[derive(Clone, Debug)]
pub struct LaunchPlan {
    pub install_dir: InstallDir,
    pub layout: BundleLayout,
    pub overlay: EnvOverlay,
    pub command_line: CommandLine,
    pub invocation: Invocation,
}

impl LaunchPlan {
    /// The line as the platform sees it, for diagnostics.
    pub fn rendered(&self, platform: &Platform) -> String {
        self.command_line
            .render(platform.native_quote)
            .to_string_lossy()
            .into_owned()
    }
}

#[derive(Clone, Debug)]
pub struct Launcher {
    platform: Platform,
    config: LauncherConfig,
}

impl Launcher {
    pub fn new(platform: Platform, config: LauncherConfig) -> Self {
        Self { platform, config }
    }

    /// Launcher for the compile target with the baked build-time configuration.
    pub fn from_build() -> Self {
        Self::new(Platform::current(), LauncherConfig::baked())
    }

    pub fn platform(&self) -> &Platform {
        &self.platform
    }

    pub fn config(&self) -> &LauncherConfig {
        &self.config
    }

    /// Build the plan for `install_dir`. `base` reads inherited variables, `writer` receives the
    /// computed ones and becomes the child overlay. The first refused write aborts.
    pub fn plan_with<W, F>(
        &self,
        install_dir: InstallDir,
        args: Vec<OsString>,
        base: F,
        mut writer: W,
    ) -> Result<LaunchPlan, LaunchError>
    where
        W: EnvWriter + Into<EnvOverlay>,
        F: Fn(&str) -> Option<OsString>,
    {
        trace_step!("App location: {} ({})", install_dir, self.platform.name);
        let layout = BundleLayout::new(&self.platform, &install_dir, &self.config);
        configure_environment(&self.platform, &layout, base, &mut writer)?;

        let command_line = CommandLine::new(layout.interpreter.clone(), self.config.command.clone(), args);
        let invocation = invocation_for(&self.platform, self.config.strategy, &command_line, windows_shell);
        Ok(LaunchPlan {
            install_dir,
            layout,
            overlay: writer.into(),
            command_line,
            invocation,
        })
    }

    /// Plan against the process: `argv[0]` for the install root, the rest forwarded.
    pub fn plan<I>(&self, argv: I) -> Result<LaunchPlan, LaunchError>
    where
        I: IntoIterator<Item = OsString>,
    {
        let mut argv = argv.into_iter();
        let argv0 = argv.next().unwrap_or_default();
        let install_dir = resolve_install_dir(&argv0);
        self.plan_with(install_dir, argv.collect(), |k| std::env::var_os(k), EnvOverlay::new())
    }

    /// Start the planned child and wait for it.
    pub fn execute<S: Spawner>(&self, plan: &LaunchPlan, spawner: &mut S) -> Result<i32, LaunchError> {
        trace_step!("Executing: {}", plan.rendered(&self.platform));
        let code = spawner.spawn_and_wait(&plan.invocation, &plan.overlay)?;
        trace_step!("Return Code: {}", code);
        Ok(code)
    }

    /// Full pipeline for one process run.
    pub fn run<I, S>(&self, argv: I, spawner: &mut S) -> Result<i32, LaunchError>
    where
        I: IntoIterator<Item = OsString>,
        S: Spawner,
    {
        let plan = self.plan(argv)?;
        self.execute(&plan, spawner)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::ffi::OsStr;
    use std::io;
    use std::path::Path;

    use crate::config::LaunchStrategy;
    use crate::resolve::resolve_install_dir_with_cwd;

    #[derive(Default)]
    struct Recorder {
        calls: Vec<(Invocation, EnvOverlay)>,
        code: i32,
    }

    impl Spawner for Recorder {
        fn spawn_and_wait(
            &mut self,
            invocation: &Invocation,
            overlay: &EnvOverlay,
        ) -> Result<i32, LaunchError> {
            self.calls.push((invocation.clone(), overlay.clone()));
            Ok(self.code)
        }
    }

    fn os(v: &[&str]) -> Vec<OsString> {
        v.iter().map(OsString::from).collect()
    }

    #[test]
    fn test_plan_and_execute_posix_end_to_end() {
        let launcher = Launcher::new(
            Platform::POSIX,
            LauncherConfig::new("-m app.main").with_version_tag("python3.11"),
        );
        let root = resolve_install_dir_with_cwd(OsStr::new("/opt/app/launcher"), Path::new("/cwd"));
        let plan = launcher
            .plan_with(root, os(&["--flag", "value"]), |_| None, EnvOverlay::new())
            .unwrap();
        assert_eq!(plan.install_dir.to_string_lossy(), "/opt/app");
        assert_eq!(
            plan.rendered(launcher.platform()),
            "\"/opt/app/venv/bin/python\" -m app.main --flag value"
        );

        let mut spawner = Recorder {
            code: 3,
            ..Recorder::default()
        };
        assert_eq!(launcher.execute(&plan, &mut spawner).unwrap(), 3);
        let (inv, overlay) = &spawner.calls[0];
        assert_eq!(
            inv,
            &Invocation::Argv {
                program: OsString::from("/opt/app/venv/bin/python"),
                args: os(&["-m", "app.main", "--flag", "value"]),
            }
        );
        assert_eq!(overlay.get("PYTHONHOME"), Some(OsStr::new("/opt/app/venv")));
    }

    struct Refuse;

    impl EnvWriter for Refuse {
        fn write(&mut self, _name: &str, _value: &OsStr) -> io::Result<()> {
            Err(io::Error::new(io::ErrorKind::PermissionDenied, "denied"))
        }
    }

    impl From<Refuse> for EnvOverlay {
        fn from(_: Refuse) -> Self {
            EnvOverlay::new()
        }
    }

    #[test]
    fn test_refused_env_write_never_reaches_spawner() {
        let launcher = Launcher::new(Platform::POSIX, LauncherConfig::new("-m app"));
        let root = resolve_install_dir_with_cwd(OsStr::new("/opt/app/launcher"), Path::new("/"));
        let mut spawner = Recorder::default();
        let result = launcher
            .plan_with(root, Vec::new(), |_| None, Refuse)
            .and_then(|plan| launcher.execute(&plan, &mut spawner));
        assert!(matches!(result, Err(LaunchError::EnvWrite { .. })));
        assert!(spawner.calls.is_empty());
    }

    #[test]
    fn test_windows_shell_plan() {
        let launcher = Launcher::new(
            Platform::WINDOWS,
            LauncherConfig::new("-m app").with_strategy(LaunchStrategy::Shell),
        );
        let root = resolve_install_dir_with_cwd(
            OsStr::new(r"C:\Program Files\App\app.exe"),
            Path::new(r"C:\"),
        );
        let plan = launcher
            .plan_with(root, os(&["a"]), |_| None, EnvOverlay::new())
            .unwrap();
        match &plan.invocation {
            Invocation::Raw { tail, .. } => assert_eq!(
                tail,
                &OsString::from(r#"/S /C ""C:\Program Files\App\venv\Scripts\python.exe" -m app a""#)
            ),
            other => panic!("unexpected invocation {other:?}"),
        }
        assert_eq!(plan.overlay.get("PATH"), Some(OsStr::new(r"C:\Program Files\App\venv\Lib")));
    }
}
