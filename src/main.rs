#![cfg_attr(all(windows, feature = "gui"), windows_subsystem = "windows")]

use bundle_launcher::{exit_code_for_launch_error, ui, Launcher, SystemSpawner};

fn main() {
    bundle_launcher::init_diagnostics();

    let launcher = Launcher::from_build();
    let code = match launcher.run(std::env::args_os(), &mut SystemSpawner) {
        Ok(code) => code,
        Err(e) => {
            ui::report_failure(&e, launcher.config().gui);
            exit_code_for_launch_error(&e)
        }
    };
    std::process::exit(code);
}
