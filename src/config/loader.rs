//! Configuration loading from disk and environment.

use std::fs;
use std::path::Path;

use crate::config::schema::KitConfig;
use crate::config::validation::{validate_config, ValidationError};

/// Environment variable overriding `api.api_key`.
pub const API_KEY_ENV_VAR: &str = "CONSOLE_KIT_API_KEY";
/// Environment variable overriding `api.base_url`.
pub const BASE_URL_ENV_VAR: &str = "CONSOLE_KIT_BASE_URL";
/// Environment variable overriding `messaging.parent_url`.
pub const PARENT_URL_ENV_VAR: &str = "CONSOLE_KIT_PARENT_URL";

/// Error type for configuration loading.
#[derive(Debug)]
pub enum ConfigError {
    Io(std::io::Error),
    Parse(toml::de::Error),
    Validation(Vec<ValidationError>),
}

impl std::fmt::Display for ConfigError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ConfigError::Io(e) => write!(f, "IO error: {}", e),
            ConfigError::Parse(e) => write!(f, "Parse error: {}", e),
            ConfigError::Validation(errors) => {
                write!(f, "Validation failed: ")?;
                for (i, err) in errors.iter().enumerate() {
                    if i > 0 { write!(f, ", ")?; }
                    write!(f, "{}", err)?;
                }
                Ok(())
            }
        }
    }
}

impl std::error::Error for ConfigError {}

/// Load and validate configuration from a TOML file.
///
/// Environment overrides are applied before validation, so a file may omit
/// the API key and rely on `CONSOLE_KIT_API_KEY`.
pub fn load_config(path: &Path) -> Result<KitConfig, ConfigError> {
    let content = fs::read_to_string(path).map_err(ConfigError::Io)?;
    let mut config: KitConfig = toml::from_str(&content).map_err(ConfigError::Parse)?;

    apply_env_overrides(&mut config);
    validate_config(&config).map_err(ConfigError::Validation)?;

    Ok(config)
}

impl KitConfig {
    /// Build a configuration from defaults plus environment variables.
    pub fn from_env() -> Result<Self, ConfigError> {
        let mut config = KitConfig::default();
        apply_env_overrides(&mut config);
        validate_config(&config).map_err(ConfigError::Validation)?;
        Ok(config)
    }
}

/// Overwrite config fields with any `CONSOLE_KIT_*` variables that are set.
pub fn apply_env_overrides(config: &mut KitConfig) {
    if let Ok(key) = std::env::var(API_KEY_ENV_VAR) {
        config.api.api_key = key;
    }
    if let Ok(url) = std::env::var(BASE_URL_ENV_VAR) {
        config.api.base_url = url;
    }
    if let Ok(url) = std::env::var(PARENT_URL_ENV_VAR) {
        config.messaging.parent_url = Some(url);
    }
}
