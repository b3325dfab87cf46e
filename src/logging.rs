//! Diagnostics logging for the `tapebf` binary.
//!
//! The library only emits `tracing` events; installing a subscriber is left to
//! the host. Input-command failures are logged at `warn`, so they show up with
//! the default filter.

use std::io::IsTerminal;

use tracing_subscriber::{fmt, layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Install a compact stderr subscriber.
///
/// Reads `RUST_LOG`; defaults to `warn` if unset.
///
/// ```bash
/// RUST_LOG=tapebf=trace tapebf run "+[-]"
/// ```
pub fn init() {
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn"));

    let _ = tracing_subscriber::registry()
        .with(filter)
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_ansi(std::io::stderr().is_terminal())
                .without_time()
                .compact(),
        )
        .try_init();
}
