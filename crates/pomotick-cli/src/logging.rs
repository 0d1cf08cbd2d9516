//! Logging setup for the CLI.
//!
//! Logs go to stderr so stdout carries only the countdown and JSON output.
//! The filter is read from `POMOTICK_LOG` (e.g. `POMOTICK_LOG=debug`) and
//! defaults to `warn`.

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

pub fn init() {
    let filter = EnvFilter::try_from_env("POMOTICK_LOG").unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(fmt::layer().with_writer(std::io::stderr).with_target(false))
        .try_init();
}
