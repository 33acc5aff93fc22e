//! Chain access subsystem.
//!
//! # Data Flow
//! ```text
//! ChainsConfig (RPC overrides, timeout)
//!     → chains.rs (supported chain registry, default RPC URLs)
//!     → client.rs (one provider per chain, Safe state reads)
//!     → AccountStateReader consumers (account filtering)
//! ```
//!
//! # Constraints
//! - Read-only: nothing here signs or submits transactions
//! - Every RPC read has a timeout

pub mod chains;
pub mod client;
pub mod types;

pub use chains::{addresses, chain_by_id, is_supported, SupportedChain, SUPPORTED_CHAINS};
pub use client::{AccountStateReader, RpcAccountStateReader};
pub use types::{ChainError, ChainResult, IMultiSend, ISafe, SafeState};
