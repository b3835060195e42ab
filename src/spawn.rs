//! Process creation and exit-status passthrough.

use std::path::PathBuf;
use std::process::ExitStatus;

use crate::command_line::Invocation;
use crate::env::EnvOverlay;
use crate::errors::{LaunchError, FAILURE_EXIT_CODE};

/// Process-creation primitive: start `invocation` with `overlay` on top of the inherited
/// environment, block until it exits and return its exit code.
pub trait Spawner {
    fn spawn_and_wait(
        &mut self,
        invocation: &Invocation,
        overlay: &EnvOverlay,
    ) -> Result<i32, LaunchError>;
}

/// Spawner backed by `std::process::Command`. Waits without timeout.
#[derive(Debug, Default, Clone, Copy)]
pub struct SystemSpawner;

impl Spawner for SystemSpawner {
    fn spawn_and_wait(
        &mut self,
        invocation: &Invocation,
        overlay: &EnvOverlay,
    ) -> Result<i32, LaunchError> {
        let program = PathBuf::from(invocation.program());
        let mut cmd = invocation.to_command();
        overlay.apply_to(&mut cmd);

        let mut child = cmd.spawn().map_err(|source| LaunchError::Spawn {
            program: program.clone(),
            source,
        })?;

        // The child shares our foreground process group and gets terminal signals itself.
        #[cfg(unix)]
        let _signals = signals::IgnoreInteractive::install();

        let status = child
            .wait()
            .map_err(|source| LaunchError::Wait { program, source })?;
        Ok(exit_code_from_status(status))
    }
}

/// Exit code to propagate for a finished child. A signal death maps to `128 + signal`, the
/// convention shells use.
pub fn exit_code_from_status(status: ExitStatus) -> i32 {
    if let Some(code) = status.code() {
        return code;
    }
    #[cfg(unix)]
    {
        use std::os::unix::process::ExitStatusExt;
        if let Some(sig) = status.signal() {
            return 128 + sig;
        }
    }
    FAILURE_EXIT_CODE
}

#[cfg(unix)]
mod signals {
    use nix::sys::signal::{self, SaFlags, SigAction, SigHandler, SigSet, Signal};

    /// Ignore SIGINT/SIGQUIT while waiting for the child, restoring the previous actions on
    /// drop, like `system(3)`. Installed after spawn so the child keeps default dispositions.
    pub struct IgnoreInteractive {
        previous: Vec<(Signal, SigAction)>,
    }

    impl IgnoreInteractive {
        pub fn install() -> Self {
            let ignore = SigAction::new(SigHandler::SigIgn, SaFlags::empty(), SigSet::empty());
            let mut previous = Vec::with_capacity(2);
            for sig in [Signal::SIGINT, Signal::SIGQUIT] {
                // SAFETY: SIG_IGN installs no handler code.
                if let Ok(old) = unsafe { signal::sigaction(sig, &ignore) } {
                    previous.push((sig, old));
                }
            }
            Self { previous }
        }
    }

    impl Drop for IgnoreInteractive {
        fn drop(&mut self) {
            for (sig, old) in self.previous.drain(..) {
                // SAFETY: restores the action that was installed before `install`.
                let _ = unsafe { signal::sigaction(sig, &old) };
            }
        }
    }
}
