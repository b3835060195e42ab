//! Install-root resolution from the invocation path.
//!
//! Purely lexical: the directory of the literal `argv[0]` string is used as-is, without
//! touching the filesystem, following symlinks or canonicalizing relative paths.

use std::ffi::{OsStr, OsString};
use std::fmt;
use std::path::{Path, PathBuf};

/// Directory containing the launcher and the bundled `venv`. Never empty.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct InstallDir(OsString);

impl InstallDir {
    pub fn as_os_str(&self) -> &OsStr {
        &self.0
    }

    pub fn as_path(&self) -> &Path {
        Path::new(&self.0)
    }

    /// Lossy text form for diagnostics and messages. Composition works on the raw bytes.
    pub fn to_string_lossy(&self) -> String {
        self.0.to_string_lossy().into_owned()
    }
}

impl fmt::Display for InstallDir {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0.to_string_lossy())
    }
}

/// Byte index of the last `/` or `\`, whichever the invocation context used.
fn last_separator(bytes: &[u8]) -> Option<usize> {
    bytes.iter().rposition(|b| *b == b'/' || *b == b'\\')
}

/// Directory part of `argv0`, or `None` when it is empty (bare name, or root-level path).
pub fn invocation_dir(argv0: &OsStr) -> Option<OsString> {
    let bytes = argv0.as_encoded_bytes();
    match last_separator(bytes) {
        Some(idx) if idx > 0 => {
            // SAFETY: `idx` is the position of an ASCII separator, so the prefix ends on a
            // boundary of the platform encoding.
            let dir = unsafe { OsStr::from_encoded_bytes_unchecked(&bytes[..idx]) };
            Some(dir.to_os_string())
        }
        _ => None,
    }
}

/// Resolve the install root, falling back to `cwd` when the invocation path has no directory.
pub fn resolve_install_dir_with_cwd(argv0: &OsStr, cwd: &Path) -> InstallDir {
    match invocation_dir(argv0) {
        Some(dir) => InstallDir(dir),
        None => InstallDir(cwd.as_os_str().to_os_string()),
    }
}

/// Resolve the install root against the process working directory. Never fails: an unreadable
/// working directory degrades to `.`.
pub fn resolve_install_dir(argv0: &OsStr) -> InstallDir {
    if let Some(dir) = invocation_dir(argv0) {
        return InstallDir(dir);
    }
    let cwd = std::env::current_dir().unwrap_or_else(|_| PathBuf::from("."));
    resolve_install_dir_with_cwd(argv0, &cwd)
}
