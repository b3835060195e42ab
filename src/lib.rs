//! bundle-launcher: native stub that starts the Python interpreter shipped next to it.
//!
//! Architecture
//! - Binary glue (src/main.rs) runs the pipeline once and exits with the child's code.
//! - resolve.rs: install root from `argv[0]`, lexical only, never fails.
//! - env.rs: bundle layout and the child environment overlay (never the global environment).
//! - command_line.rs: rendering/quoting and the process invocation per strategy.
//! - spawn.rs: the `Spawner` seam, exit-code passthrough, POSIX signal dispositions.
//! - launcher.rs: Resolver → Configurator → Launcher, parameterized by `Platform`.
//! - config.rs: tokens baked by build.rs (`BUNDLE_LAUNCHER_*`).
//!
//! Environment invariants
//! - PYTHONHOME: always `<root>/venv`, overwritten.
//! - PYTHONPATH: bundle site-packages; on POSIX only when a version tag is baked in.
//! - LD_LIBRARY_PATH / DYLD_LIBRARY_PATH (POSIX) or PATH (Windows): bundle entry first, previous
//!   value kept after the list separator.
//! - NO_COLOR: disables color on the launcher's own error lines.

#[macro_use]
mod diag;

pub mod color;
pub mod command_line;
pub mod config;
pub mod env;
pub mod errors;
pub mod launcher;
pub mod platform;
pub mod resolve;
pub mod spawn;
pub mod ui;
pub mod util;

pub use color::{color_enabled_stderr, paint};
pub use command_line::{invocation_for, CommandLine, Invocation};
pub use config::{LaunchStrategy, LauncherConfig, BUILD_INFO};
pub use diag::init as init_diagnostics;
pub use env::{
    configure_environment, prepend_search_path, BundleLayout, EnvAssignment, EnvOverlay,
    EnvWriter,
};
pub use errors::{exit_code_for_launch_error, LaunchError, FAILURE_EXIT_CODE};
pub use launcher::{LaunchPlan, Launcher};
pub use platform::{Platform, QuoteStyle, SpawnPrimitive};
pub use resolve::{resolve_install_dir, resolve_install_dir_with_cwd, InstallDir};
pub use spawn::{exit_code_from_status, Spawner, SystemSpawner};
pub use util::shell_like_split_args;
