//! Vendor backend access.
//!
//! # Data Flow
//! ```text
//! wrapper (CoreActions, AutomationContext, PublicDeployer)
//!     → client.rs (x-api-key header, timeout, status mapping)
//!     → routes.rs (path table)
//!     → vendor backend
//! ```
//!
//! # Design Decisions
//! - One `reqwest::Client` per wrapper, cloned from the facade's client
//! - Wrappers decide whether an error is returned or swallowed

pub mod client;
pub mod error;
pub mod payload;
pub mod routes;

pub use client::{DataEnvelope, VendorClient};
pub use error::{recover, ApiError, ApiResult};
pub use payload::{ActionId, CalldataTransaction, GenerateCalldataResponse, GeneratePayload};
