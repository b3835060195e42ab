//! User-facing failure surfaces: console line and, for the GUI entry point, a modal dialog.

pub mod report;

pub use report::{format_failure, report_failure};
