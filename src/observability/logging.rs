//! Structured logging.
//!
//! # Responsibilities
//! - Initialize the tracing subscriber for binaries embedding the kit
//! - Resolve the log level from `RUST_LOG` or configuration
//!
//! # Design Decisions
//! - Uses tracing crate for structured logging
//! - Library code only emits events; installing a subscriber is the host's call

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::ObservabilityConfig;

/// Build the env filter: `RUST_LOG` wins, otherwise the configured level
/// is applied to this crate.
pub fn env_filter(config: &ObservabilityConfig) -> EnvFilter {
    EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| format!("console_kit={}", config.log_level).into())
}

/// Install a global fmt subscriber. Returns false if one was already set.
pub fn init_logging(config: &ObservabilityConfig) -> bool {
    tracing_subscriber::registry()
        .with(env_filter(config))
        .with(tracing_subscriber::fmt::layer())
        .try_init()
        .is_ok()
}
