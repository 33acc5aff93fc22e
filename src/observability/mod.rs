//! Observability subsystem.
//!
//! # Data Flow
//! ```text
//! All subsystems produce:
//!     → tracing events (structured log lines)
//!     → metrics.rs (counters, gauges)
//!
//! Consumers:
//!     → logging.rs subscriber installed by the CLI or host application
//!     → whatever metrics recorder the host installs
//! ```
//!
//! # Design Decisions
//! - Every caught error is logged where it is caught, then swallowed or returned
//! - Metrics are cheap and optional

pub mod logging;
pub mod metrics;
