//! Error mapping guide:
//! - Every launcher failure is terminal and exits with `FAILURE_EXIT_CODE`.
//! - A child that runs and exits non-zero is not an error; its code passes through untouched.
//! - Keep message texts stable, the GUI dialog and the console line share them.
use std::ffi::OsString;
use std::io;
use std::path::PathBuf;

use thiserror::Error;

/// Exit status used when the launcher itself fails (255 on POSIX, 0xFFFFFFFF on Windows).
pub const FAILURE_EXIT_CODE: i32 = -1;

#[derive(Debug, Error)]
pub enum LaunchError {
    #[error("cannot set {name}={}: {source}", .value.to_string_lossy())]
    EnvWrite {
        name: String,
        value: OsString,
        #[source]
        source: io::Error,
    },
    #[error("failed to start {}: {source}", .program.display())]
    Spawn {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to wait for {}: {source}", .program.display())]
    Wait {
        program: PathBuf,
        #[source]
        source: io::Error,
    },
}

impl LaunchError {
    /// Short label of the failing step, used as the dialog/console prefix.
    pub fn stage(&self) -> &'static str {
        match self {
            LaunchError::EnvWrite { .. } => "write_env",
            LaunchError::Spawn { .. } => "create_process",
            LaunchError::Wait { .. } => "wait_process",
        }
    }

    pub fn io_error(&self) -> &io::Error {
        match self {
            LaunchError::EnvWrite { source, .. }
            | LaunchError::Spawn { source, .. }
            | LaunchError::Wait { source, .. } => source,
        }
    }
}

/// Every launcher failure exits with the same sentinel; the message tells them apart.
pub fn exit_code_for_launch_error(_e: &LaunchError) -> i32 {
    FAILURE_EXIT_CODE
}

/// One-line hint appended to failure reports when the cause is actionable.
pub fn hint_for_launch_error(e: &LaunchError) -> Option<&'static str> {
    match (e, e.io_error().kind()) {
        (LaunchError::Spawn { .. }, io::ErrorKind::NotFound) => {
            Some("the bundled interpreter is missing; reinstall the application")
        }
        (LaunchError::Spawn { .. }, io::ErrorKind::PermissionDenied) => {
            Some("the bundled interpreter is not executable; check install permissions")
        }
        _ => None,
    }
}
