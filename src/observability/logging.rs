//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the logging subsystem for binaries
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - `RUST_LOG` wins over the configured level
//! - The library never installs a subscriber on its own

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

/// Build the filter: environment first, then the configured level.
pub fn env_filter(default_level: &str) -> EnvFilter {
    EnvFilter::try_from_default_env().unwrap_or_else(|_| {
        format!("resilient_executor={default_level},resilient_exec={default_level}").into()
    })
}

/// Install the global subscriber. Fails if one is already set.
pub fn init_logging(default_level: &str) -> Result<(), tracing_subscriber::util::TryInitError> {
    tracing_subscriber::registry()
        .with(env_filter(default_level))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
}
