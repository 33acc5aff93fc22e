//! Read-only Safe state access over JSON-RPC.
//!
//! # Responsibilities
//! - Hold one provider per supported chain (default RPC or configured override)
//! - Read a Safe's threshold and owners with a per-read timeout
//!
//! # Design Decisions
//! - Providers are built eagerly; building does not touch the network
//! - Callers depend on [`AccountStateReader`], so tests can swap in fixtures

use std::collections::HashMap;
use std::time::Duration;

use alloy::primitives::Address;
use alloy::providers::{DynProvider, Provider, ProviderBuilder};
use async_trait::async_trait;
use tokio::time::timeout;

use crate::blockchain::chains::SUPPORTED_CHAINS;
use crate::blockchain::types::{ChainError, ChainResult, SafeState, ISafe};
use crate::config::ChainsConfig;

/// Source of on-chain account state.
#[async_trait]
pub trait AccountStateReader: Send + Sync {
    /// Threshold and owners of the Safe at `account` on `chain_id`.
    async fn safe_state(&self, chain_id: u64, account: Address) -> ChainResult<SafeState>;
}

/// [`AccountStateReader`] backed by alloy HTTP providers.
#[derive(Clone)]
pub struct RpcAccountStateReader {
    providers: HashMap<u64, DynProvider>,
    timeout_duration: Duration,
}

impl RpcAccountStateReader {
    pub fn new(config: &ChainsConfig) -> ChainResult<Self> {
        let mut providers = HashMap::with_capacity(SUPPORTED_CHAINS.len());

        for chain in SUPPORTED_CHAINS {
            let rpc_url = config.rpc_override(chain.id).unwrap_or(chain.default_rpc_url);
            let url: url::Url = rpc_url.parse().map_err(|e: url::ParseError| {
                ChainError::InvalidRpcUrl {
                    chain_id: chain.id,
                    url: rpc_url.to_string(),
                    reason: e.to_string(),
                }
            })?;
            providers.insert(chain.id, ProviderBuilder::new().connect_http(url).erased());
        }

        tracing::debug!(chains = providers.len(), "Chain providers initialized");

        Ok(Self {
            providers,
            timeout_duration: config.rpc_timeout(),
        })
    }
}

#[async_trait]
impl AccountStateReader for RpcAccountStateReader {
    async fn safe_state(&self, chain_id: u64, account: Address) -> ChainResult<SafeState> {
        let provider = self
            .providers
            .get(&chain_id)
            .ok_or(ChainError::UnsupportedChain(chain_id))?;
        let safe = ISafe::new(account, provider.clone());

        let threshold = async { safe.getThreshold().call().await };
        let owners = async { safe.getOwners().call().await };

        let (threshold, owners) = timeout(self.timeout_duration, async {
            tokio::try_join!(threshold, owners)
        })
        .await
        .map_err(|_| ChainError::Timeout(self.timeout_duration.as_secs()))?
        .map_err(|e| ChainError::Rpc(e.to_string()))?;

        Ok(SafeState {
            threshold: threshold.saturating_to::<u64>(),
            owners,
        })
    }
}

impl std::fmt::Debug for RpcAccountStateReader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RpcAccountStateReader")
            .field("chains", &self.providers.len())
            .field("timeout", &self.timeout_duration)
            .finish()
    }
}
