use std::ffi::OsStr;
use std::path::Path;

use bundle_launcher::resolve_install_dir_with_cwd;

fn resolve(argv0: &str, cwd: &str) -> String {
    resolve_install_dir_with_cwd(OsStr::new(argv0), Path::new(cwd)).to_string_lossy()
}

#[test]
fn test_install_dir_is_prefix_before_last_separator_for_either_separator() {
    let dirs = ["/opt/app", "C:\\Apps\\Tool", "rel/dir", "C:/mixed\\dir", "/with space/x"];
    let names = ["launcher", "launcher.exe", "my app"];
    for dir in dirs {
        for sep in ['/', '\\'] {
            for name in names {
                let argv0 = format!("{dir}{sep}{name}");
                assert_eq!(resolve(&argv0, "/cwd"), dir, "argv0={argv0}");
            }
        }
    }
}

#[test]
fn test_bare_names_resolve_to_cwd() {
    for name in ["launcher", "launcher.exe", "app with spaces", ""] {
        assert_eq!(resolve(name, "/home/user/work"), "/home/user/work", "argv0={name:?}");
    }
}

#[test]
fn test_resolution_does_not_touch_filesystem() {
    // Nothing here exists; resolution must still succeed.
    assert_eq!(
        resolve("/no/such/place/at/all/launcher", "/cwd"),
        "/no/such/place/at/all"
    );
}
