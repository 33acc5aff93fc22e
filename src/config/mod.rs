//! Configuration management subsystem.
//!
//! # Data Flow
//! ```text
//! config file (TOML)
//!     → loader.rs (parse & deserialize)
//!     → environment overrides (CONSOLE_KIT_*)
//!     → validation.rs (semantic checks)
//!     → KitConfig (validated, immutable)
//!     → handed to ConsoleKit and its callers
//! ```
//!
//! # Design Decisions
//! - Config is immutable once loaded
//! - All fields have defaults to allow minimal configs
//! - Validation separates syntactic (serde) from semantic checks

pub mod loader;
pub mod schema;
pub mod validation;

pub use loader::{load_config, ConfigError};
pub use schema::{
    ApiConfig, ChainsConfig, KitConfig, MessagingConfig, ObservabilityConfig, PollingConfig,
    RpcOverride,
};
pub use validation::{validate_config, ValidationError};
