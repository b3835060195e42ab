//! Child-environment overlay for the embedded interpreter.
//!
//! The launcher never mutates its own environment. The configurator computes the bundle
//! variables from the install root and writes them into an `EnvWriter`, normally an
//! `EnvOverlay` that is later applied to the child `Command` on top of the inherited environment.

use std::ffi::{OsStr, OsString};
use std::io;
use std::process::Command;

use crate::config::LauncherConfig;
use crate::errors::LaunchError;
use crate::platform::Platform;
use crate::resolve::InstallDir;

pub const HOME_VAR: &str = "PYTHONHOME";
pub const MODULE_PATH_VAR: &str = "PYTHONPATH";

/// One computed variable for the child.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct EnvAssignment {
    pub name: String,
    pub value: OsString,
}

/// Destination for computed variables. The overlay is the production writer; tests plug in
/// writers that refuse a variable to exercise the abort path.
pub trait EnvWriter {
    fn write(&mut self, name: &str, value: &OsStr) -> io::Result<()>;
}

/// Reject what the platform set-variable call would reject: empty names, `=` or NUL in the
/// name, NUL in the value.
pub fn validate_assignment(name: &str, value: &OsStr) -> io::Result<()> {
    if name.is_empty() {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "empty variable name",
        ));
    }
    if name.contains('=') || name.contains('\0') {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "variable name contains '=' or nul byte",
        ));
    }
    if value.as_encoded_bytes().contains(&0) {
        return Err(io::Error::new(
            io::ErrorKind::InvalidInput,
            "variable value contains nul byte",
        ));
    }
    Ok(())
}

/// Variables added on top of the inherited environment of the child.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct EnvOverlay {
    assignments: Vec<EnvAssignment>,
}

impl EnvOverlay {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &str) -> Option<&OsStr> {
        self.assignments
            .iter()
            .find(|a| a.name == name)
            .map(|a| a.value.as_os_str())
    }

    pub fn iter(&self) -> impl Iterator<Item = &EnvAssignment> {
        self.assignments.iter()
    }

    pub fn len(&self) -> usize {
        self.assignments.len()
    }

    pub fn is_empty(&self) -> bool {
        self.assignments.is_empty()
    }

    /// Add the overlay to `cmd`; inherited variables not named here pass through unchanged.
    pub fn apply_to(&self, cmd: &mut Command) {
        for a in &self.assignments {
            cmd.env(&a.name, &a.value);
        }
    }
}

impl EnvWriter for EnvOverlay {
    fn write(&mut self, name: &str, value: &OsStr) -> io::Result<()> {
        validate_assignment(name, value)?;
        match self.assignments.iter_mut().find(|a| a.name == name) {
            Some(existing) => existing.value = value.to_os_string(),
            None => self.assignments.push(EnvAssignment {
                name: name.to_string(),
                value: value.to_os_string(),
            }),
        }
        Ok(())
    }
}

/// Put `entry` in front of an existing search path. An unset or empty previous value yields
/// just `entry`.
pub fn prepend_search_path(entry: &OsStr, previous: Option<&OsStr>, list_sep: char) -> OsString {
    let mut out = entry.to_os_string();
    if let Some(prev) = previous.filter(|p| !p.is_empty()) {
        let mut sep = [0u8; 4];
        out.push(list_sep.encode_utf8(&mut sep) as &str);
        out.push(prev);
    }
    out
}

/// Bundle directories derived from the install root, byte-for-byte under it.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct BundleLayout {
    pub venv: OsString,
    pub site_packages: Option<OsString>,
    pub search_dir: OsString,
    pub interpreter: OsString,
}

impl BundleLayout {
    pub fn new(platform: &Platform, root: &InstallDir, config: &LauncherConfig) -> Self {
        let venv = platform.join(root.as_os_str(), &["venv"]);
        let site_packages = if platform.versioned_site_packages {
            config
                .version_tag
                .as_deref()
                .map(|tag| platform.join(&venv, &["lib", tag, "site-packages"]))
        } else {
            Some(platform.join(&venv, &["Lib", "site-packages"]))
        };
        BundleLayout {
            search_dir: platform.join(&venv, platform.search_dir),
            interpreter: platform.join(&venv, platform.interpreter_parts(config.gui)),
            site_packages,
            venv,
        }
    }
}

fn write_var<W: EnvWriter>(writer: &mut W, name: &str, value: OsString) -> Result<(), LaunchError> {
    trace_step!("Setting {}={}", name, value.to_string_lossy());
    writer
        .write(name, &value)
        .map_err(|source| LaunchError::EnvWrite {
            name: name.to_string(),
            value,
            source,
        })
}

/// Compute and write the bundle variables, stopping at the first refused write.
///
/// `base` looks up the inherited value of a variable; search-path variables keep that value
/// after the bundle entry.
pub fn configure_environment<W, F>(
    platform: &Platform,
    layout: &BundleLayout,
    base: F,
    writer: &mut W,
) -> Result<(), LaunchError>
where
    W: EnvWriter,
    F: Fn(&str) -> Option<OsString>,
{
    write_var(writer, HOME_VAR, layout.venv.clone())?;

    if let Some(site) = &layout.site_packages {
        write_var(writer, MODULE_PATH_VAR, site.clone())?;
    }

    if let Some(var) = platform.search_var() {
        let previous = base(var);
        let value = prepend_search_path(&layout.search_dir, previous.as_deref(), platform.list_sep);
        write_var(writer, var, value)?;
    }
    Ok(())
}
