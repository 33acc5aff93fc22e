//! Client SDK for the console platform.
//!
//! Wraps the vendor HTTP API (accounts, intent calldata, automations,
//! deployments) and correlates method calls with an embedding parent context.

pub mod api;
pub mod automation;
pub mod blockchain;
pub mod builder;
pub mod config;
pub mod core_actions;
pub mod deployer;
pub mod error;
pub mod kit;
pub mod messaging;
pub mod observability;
pub mod resilience;

pub use config::KitConfig;
pub use error::{KitError, KitResult};
pub use kit::ConsoleKit;
