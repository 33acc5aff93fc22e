//! Configuration schema definitions.
//!
//! This module defines the complete configuration structure for the SDK.
//! All types derive Serde traits for deserialization from config files.

use std::time::Duration;

use serde::{Deserialize, Serialize};

/// Root configuration for a console kit instance.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct KitConfig {
    /// Vendor API connection settings.
    pub api: ApiConfig,

    /// Settings for polling long-running backend tasks.
    pub polling: PollingConfig,

    /// Parent-context messaging settings.
    pub messaging: MessagingConfig,

    /// Chain RPC settings used for on-chain account filtering.
    pub chains: ChainsConfig,

    /// Observability settings.
    pub observability: ObservabilityConfig,
}

/// Vendor API configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ApiConfig {
    /// Base URL of the vendor backend (e.g., "https://api.example.com/v1").
    pub base_url: String,

    /// Static API key, sent as `x-api-key` on every request.
    pub api_key: String,

    /// Total request timeout in seconds.
    pub request_timeout_secs: u64,
}

impl Default for ApiConfig {
    fn default() -> Self {
        Self {
            base_url: String::new(),
            api_key: String::new(),
            request_timeout_secs: 30,
        }
    }
}

impl ApiConfig {
    pub fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

/// Poller configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct PollingConfig {
    /// Maximum number of status checks before giving up.
    pub max_attempts: u32,

    /// Fixed delay between status checks in milliseconds.
    pub interval_ms: u64,
}

impl Default for PollingConfig {
    fn default() -> Self {
        Self {
            max_attempts: 20,
            interval_ms: 5000,
        }
    }
}

/// Messaging configuration.
#[derive(Debug, Clone, Deserialize, Serialize, Default)]
#[serde(default)]
pub struct MessagingConfig {
    /// WebSocket URL of the parent host. When unset the kit runs detached
    /// and every message-based call fails fast.
    pub parent_url: Option<String>,

    /// Optional per-call response timeout in milliseconds.
    /// Unset means calls wait until a response arrives or the kit is disposed.
    pub response_timeout_ms: Option<u64>,
}

impl MessagingConfig {
    pub fn response_timeout(&self) -> Option<Duration> {
        self.response_timeout_ms.map(Duration::from_millis)
    }
}

/// Chain RPC configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ChainsConfig {
    /// RPC URL overrides. Chains without an override use the registry default.
    pub rpc_overrides: Vec<RpcOverride>,

    /// Timeout for a single RPC read in seconds.
    pub rpc_timeout_secs: u64,
}

impl Default for ChainsConfig {
    fn default() -> Self {
        Self {
            rpc_overrides: Vec::new(),
            rpc_timeout_secs: 10,
        }
    }
}

impl ChainsConfig {
    /// Configured override for a chain, if any.
    pub fn rpc_override(&self, chain_id: u64) -> Option<&str> {
        self.rpc_overrides
            .iter()
            .find(|o| o.chain_id == chain_id)
            .map(|o| o.url.as_str())
    }

    pub fn rpc_timeout(&self) -> Duration {
        Duration::from_secs(self.rpc_timeout_secs)
    }
}

/// RPC endpoint override for a single chain.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct RpcOverride {
    pub chain_id: u64,
    pub url: String,
}

/// Observability configuration.
#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(default)]
pub struct ObservabilityConfig {
    /// Log level (trace, debug, info, warn, error).
    pub log_level: String,
}

impl Default for ObservabilityConfig {
    fn default() -> Self {
        Self {
            log_level: "info".to_string(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = KitConfig::default();
        assert_eq!(config.polling.max_attempts, 20);
        assert_eq!(config.polling.interval_ms, 5000);
        assert_eq!(config.api.request_timeout_secs, 30);
        assert!(config.messaging.parent_url.is_none());
        assert!(config.messaging.response_timeout().is_none());
    }

    #[test]
    fn test_partial_toml() {
        let config: KitConfig = toml::from_str(
            r#"
            [api]
            base_url = "https://api.example.com"
            api_key = "secret"

            [[chains.rpc_overrides]]
            chain_id = 534352
            url = "http://localhost:8545"
            "#,
        )
        .unwrap();

        assert_eq!(config.api.api_key, "secret");
        assert_eq!(config.api.request_timeout_secs, 30);
        assert_eq!(
            config.chains.rpc_override(534352),
            Some("http://localhost:8545")
        );
        assert_eq!(config.chains.rpc_override(1), None);
        assert_eq!(config.polling.max_attempts, 20);
    }
}
