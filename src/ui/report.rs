use crate::color::{color_enabled_stderr, log_error_stderr, log_hint_stderr};
use crate::errors::{hint_for_launch_error, LaunchError};

/// `Error: <stage>: <message>`, shared by the console line and the dialog.
pub fn format_failure(err: &LaunchError) -> String {
    format!("Error: bundle-launcher:{}(): {}", err.stage(), err)
}

/// Surface a launcher failure before exiting. Without a console (GUI entry point) the same
/// text is also shown in a modal dialog.
pub fn report_failure(err: &LaunchError, gui: bool) {
    let text = format_failure(err);
    let hint = hint_for_launch_error(err);
    let use_err = color_enabled_stderr();
    log_error_stderr(use_err, &text);
    if let Some(h) = hint {
        log_hint_stderr(use_err, &format!("hint: {h}"));
    }
    if gui {
        let body = match hint {
            Some(h) => format!("{text}\n\n{h}"),
            None => text,
        };
        show_dialog("Error", &body);
    }
}

#[cfg(windows)]
fn show_dialog(title: &str, text: &str) {
    use std::ffi::OsStr;
    use std::os::windows::ffi::OsStrExt;
    use windows_sys::Win32::UI::WindowsAndMessaging::{MessageBoxW, MB_ICONERROR, MB_OK};

    fn wide(s: &str) -> Vec<u16> {
        OsStr::new(s).encode_wide().chain(std::iter::once(0)).collect()
    }
    let text = wide(text);
    let title = wide(title);
    // SAFETY: both buffers are NUL-terminated and outlive the call; no owner window.
    unsafe {
        MessageBoxW(
            std::ptr::null_mut(),
            text.as_ptr(),
            title.as_ptr(),
            MB_OK | MB_ICONERROR,
        );
    }
}

#[cfg(not(windows))]
fn show_dialog(_title: &str, _text: &str) {}
