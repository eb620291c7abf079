// Logging module - Logging infrastructure
mod hexdump;

pub use hexdump::hex_dump;

use crate::domain::error::{McuxeqError, McuxeqResult};
use std::io;
use tracing::Subscriber;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Default filter directive for a debug level
pub fn default_directive(debug_level: u8) -> &'static str {
    match debug_level {
        0 => "mcuxeq=warn,warn",
        1 => "mcuxeq=debug,warn",
        _ => "mcuxeq=trace,warn",
    }
}

/// Build the stderr subscriber for `filter`
pub fn build_subscriber(filter: EnvFilter) -> impl Subscriber + Send + Sync + 'static {
    tracing_subscriber::registry().with(filter).with(
        tracing_subscriber::fmt::layer()
            .with_writer(io::stderr)
            .with_target(false)
            .with_level(true),
    )
}

/// Initialize logging system
///
/// Diagnostics go to stderr so stdout carries only the device response.
/// `RUST_LOG` takes precedence over `debug_level`.
pub fn init_logging(debug_level: u8) -> McuxeqResult<()> {
    let env_filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_directive(debug_level)));

    build_subscriber(env_filter)
        .try_init()
        .map_err(|e| McuxeqError::Config {
            message: format!("Failed to initialize logging: {}", e),
        })?;

    tracing::debug!("mcuxeq logging initialized at debug level {}", debug_level);
    Ok(())
}
