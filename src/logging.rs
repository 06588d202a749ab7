//! Tracing initialization for the binary.
//!
//! The library only emits events; installing a subscriber is the caller's
//! decision.

use std::sync::Once;

use tracing_subscriber::{fmt, prelude::*, EnvFilter};

static INIT: Once = Once::new();

/// Environment variable holding per-target log directives
pub const LOG_ENV: &str = "PARITY_LOG";

/// Initialize stderr logging.
///
/// Reads `PARITY_LOG` for directives (e.g. `PARITY_LOG=paritycheck=debug`).
/// Falls back to `paritycheck=warn`, or `paritycheck=debug` when `verbose`.
/// Calling it more than once is a no-op.
pub fn init_tracing(verbose: bool) {
    INIT.call_once(|| {
        let fallback = if verbose {
            "paritycheck=debug"
        } else {
            "paritycheck=warn"
        };
        let filter =
            EnvFilter::try_from_env(LOG_ENV).unwrap_or_else(|_| EnvFilter::new(fallback));

        tracing_subscriber::registry()
            .with(
                fmt::layer()
                    .with_writer(std::io::stderr)
                    .with_target(true),
            )
            .with(filter)
            .init();
    });
}
