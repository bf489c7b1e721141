//! Logging setup for the command-line front end

use tracing_subscriber::EnvFilter;
use tracing_subscriber::fmt;
use tracing_subscriber::prelude::*;

/// Install the fmt subscriber on stderr.
///
/// If RUST_LOG is not set, a default is chosen: debug for this workspace in debug builds,
/// info in release builds.
pub fn setup_logging() {
    if std::env::var("RUST_LOG").is_err() {
        // Safety: single-threaded at startup
        unsafe {
            if cfg!(debug_assertions) {
                std::env::set_var("RUST_LOG", "info,frustum_tiles=debug,frustum_tiles_lib=debug");
            } else {
                std::env::set_var("RUST_LOG", "info");
            }
        }
    }

    let fmt_layer = fmt::layer()
        .with_writer(std::io::stderr)
        .with_filter(EnvFilter::from_default_env());
    tracing_subscriber::registry().with(fmt_layer).init();

    tracing::debug!(
        rust_log = std::env::var("RUST_LOG").unwrap_or_default(),
        "Logging initialized"
    );
}
