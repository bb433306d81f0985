use std::env;

use tracing_subscriber::prelude::*;
use tracing_subscriber::{fmt, EnvFilter};

/// Log to stderr so stdout stays clean for previews and JSON.
///
/// The filter comes from `DRAPELINE_LOG` (default `warn`).
pub fn init_logger() {
    let filter = env::var("DRAPELINE_LOG").unwrap_or_else(|_| "warn".to_string());

    tracing_subscriber::registry()
        .with(
            fmt::layer()
                .with_writer(std::io::stderr)
                .with_target(false)
                .without_time()
                .with_ansi(true),
        )
        .with(EnvFilter::new(filter))
        .init();
}
