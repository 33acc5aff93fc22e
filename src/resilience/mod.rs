//! Resilience subsystem.
//!
//! # Data Flow
//! ```text
//! Long-running backend task:
//!     → polling.rs (fixed-interval status checks, bounded attempts)
//!     → cancel.rs (optional broadcast signal to stop waiting)
//! ```
//!
//! # Design Decisions
//! - Only polling retries; plain API calls fail once and report
//! - Every wait is bounded by an attempt budget or a cancel signal

pub mod cancel;
pub mod polling;

pub use cancel::CancelSignal;
pub use polling::{poll_with_retries, PollError, PollSettings, Poller};
