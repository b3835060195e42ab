//! Optional diagnostic trace.
//!
//! Built with the `diagnostics` feature, launcher steps are emitted as `tracing` events and
//! printed to stdout by a `tracing-subscriber` fmt layer (`RUST_LOG` overrides the default
//! `info` filter). Without the feature `trace_step!` expands to nothing and the stub stays silent.

/// Emit one diagnostic line for a launcher step.
macro_rules! trace_step {
    ($($arg:tt)*) => {
        #[cfg(feature = "diagnostics")]
        {
            tracing::info!($($arg)*);
        }
    };
}

#[cfg(feature = "diagnostics")]
mod subscriber {
    use once_cell::sync::OnceCell;
    use tracing_subscriber::prelude::*;

    use crate::config::BUILD_INFO;

    static INIT: OnceCell<()> = OnceCell::new();

    pub fn init() {
        if INIT.get().is_some() {
            return;
        }
        let filter = std::env::var("RUST_LOG").unwrap_or_else(|_| "info".to_string());
        let env_filter = tracing_subscriber::EnvFilter::new(filter);
        let fmt_layer = tracing_subscriber::fmt::layer()
            .with_writer(std::io::stdout)
            .with_target(false)
            .without_time();
        if tracing_subscriber::registry()
            .with(env_filter)
            .with(fmt_layer)
            .try_init()
            .is_err()
        {
            eprintln!("bundle-launcher: diagnostics init skipped (global subscriber already set)");
            return;
        }
        let _ = INIT.set(());
        tracing::info!(
            version = BUILD_INFO.version,
            target = BUILD_INFO.target,
            profile = BUILD_INFO.profile,
            rustc = BUILD_INFO.rustc,
            built = BUILD_INFO.date,
            "bundle-launcher diagnostics enabled"
        );
    }
}

/// Install the stdout trace subscriber when diagnostics are compiled in; no-op otherwise.
pub fn init() {
    #[cfg(feature = "diagnostics")]
    subscriber::init();
}
