//! Configuration validation.
//!
//! # Responsibilities
//! - Semantic validation (serde handles syntactic)
//! - Validate required credentials and URLs
//! - Validate value ranges (attempt budgets > 0)
//!
//! # Design Decisions
//! - Returns all validation errors, not just first
//! - Validation is pure function: KitConfig → Result<(), Vec<ValidationError>>
//! - Runs before config is accepted by the kit

use crate::config::schema::KitConfig;

/// A single semantic problem found in a configuration.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValidationError {
    #[error("API key is required")]
    MissingApiKey,

    #[error("Base url is required")]
    MissingBaseUrl,

    #[error("Invalid base url '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("polling.max_attempts must be greater than zero")]
    ZeroPollAttempts,

    #[error("Invalid RPC override for chain {chain_id}: '{url}'")]
    InvalidRpcUrl { chain_id: u64, url: String },

    #[error("Invalid parent url '{0}'")]
    InvalidParentUrl(String),
}

/// Validate a configuration, collecting every error found.
pub fn validate_config(config: &KitConfig) -> Result<(), Vec<ValidationError>> {
    let mut errors = Vec::new();

    if config.api.api_key.trim().is_empty() {
        errors.push(ValidationError::MissingApiKey);
    }

    if config.api.base_url.trim().is_empty() {
        errors.push(ValidationError::MissingBaseUrl);
    } else {
        match url::Url::parse(&config.api.base_url) {
            Ok(url) if matches!(url.scheme(), "http" | "https") => {}
            Ok(url) => errors.push(ValidationError::InvalidBaseUrl {
                url: config.api.base_url.clone(),
                reason: format!("unsupported scheme '{}'", url.scheme()),
            }),
            Err(e) => errors.push(ValidationError::InvalidBaseUrl {
                url: config.api.base_url.clone(),
                reason: e.to_string(),
            }),
        }
    }

    if config.polling.max_attempts == 0 {
        errors.push(ValidationError::ZeroPollAttempts);
    }

    for rpc in &config.chains.rpc_overrides {
        if url::Url::parse(&rpc.url).is_err() {
            errors.push(ValidationError::InvalidRpcUrl {
                chain_id: rpc.chain_id,
                url: rpc.url.clone(),
            });
        }
    }

    if let Some(parent) = &config.messaging.parent_url {
        match url::Url::parse(parent) {
            Ok(url) if matches!(url.scheme(), "ws" | "wss") => {}
            _ => errors.push(ValidationError::InvalidParentUrl(parent.clone())),
        }
    }

    if errors.is_empty() {
        Ok(())
    } else {
        Err(errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::schema::RpcOverride;

    fn valid_config() -> KitConfig {
        let mut config = KitConfig::default();
        config.api.api_key = "key".to_string();
        config.api.base_url = "https://api.example.com".to_string();
        config
    }

    #[test]
    fn test_valid_config() {
        assert!(validate_config(&valid_config()).is_ok());
    }

    #[test]
    fn test_reports_all_errors() {
        let mut config = KitConfig::default();
        config.polling.max_attempts = 0;
        config.chains.rpc_overrides.push(RpcOverride {
            chain_id: 1,
            url: "not a url".to_string(),
        });

        let errors = validate_config(&config).unwrap_err();
        assert!(errors.contains(&ValidationError::MissingApiKey));
        assert!(errors.contains(&ValidationError::MissingBaseUrl));
        assert!(errors.contains(&ValidationError::ZeroPollAttempts));
        assert!(errors
            .iter()
            .any(|e| matches!(e, ValidationError::InvalidRpcUrl { chain_id: 1, .. })));
        assert_eq!(errors.len(), 4);
    }

    #[test]
    fn test_rejects_non_http_base_url() {
        let mut config = valid_config();
        config.api.base_url = "ftp://api.example.com".to_string();

        let errors = validate_config(&config).unwrap_err();
        assert!(matches!(errors[0], ValidationError::InvalidBaseUrl { .. }));
    }

    #[test]
    fn test_parent_url_must_be_websocket() {
        let mut config = valid_config();
        config.messaging.parent_url = Some("http://localhost:9000".to_string());
        assert_eq!(
            validate_config(&config).unwrap_err(),
            vec![ValidationError::InvalidParentUrl("http://localhost:9000".to_string())]
        );

        config.messaging.parent_url = Some("ws://localhost:9000".to_string());
        assert!(validate_config(&config).is_ok());
    }
}
