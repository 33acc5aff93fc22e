//! Supported chain registry and well-known contract addresses.

use alloy::primitives::{address, Address};

/// A chain the platform operates on.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SupportedChain {
    pub id: u64,
    pub name: &'static str,
    /// Public RPC endpoint used when no override is configured.
    pub default_rpc_url: &'static str,
}

pub const SUPPORTED_CHAINS: &[SupportedChain] = &[
    SupportedChain {
        id: 1,
        name: "mainnet",
        default_rpc_url: "https://eth.merkle.io",
    },
    SupportedChain {
        id: 42161,
        name: "arbitrum",
        default_rpc_url: "https://arb1.arbitrum.io/rpc",
    },
    SupportedChain {
        id: 8453,
        name: "base",
        default_rpc_url: "https://mainnet.base.org",
    },
    SupportedChain {
        id: 80094,
        name: "berachain",
        default_rpc_url: "https://rpc.berachain.com",
    },
    SupportedChain {
        id: 1923,
        name: "swellchain",
        default_rpc_url: "https://swell-mainnet.alt.technology",
    },
    SupportedChain {
        id: 81457,
        name: "blast",
        default_rpc_url: "https://rpc.blast.io",
    },
    SupportedChain {
        id: 34443,
        name: "mode",
        default_rpc_url: "https://mainnet.mode.network",
    },
    SupportedChain {
        id: 1329,
        name: "sei",
        default_rpc_url: "https://evm-rpc.sei-apis.com",
    },
    SupportedChain {
        id: 534352,
        name: "scroll",
        default_rpc_url: "https://rpc.scroll.io",
    },
];

/// Look up a supported chain by id.
pub fn chain_by_id(chain_id: u64) -> Option<&'static SupportedChain> {
    SUPPORTED_CHAINS.iter().find(|c| c.id == chain_id)
}

pub fn is_supported(chain_id: u64) -> bool {
    chain_by_id(chain_id).is_some()
}

/// Well-known contract addresses.
pub mod addresses {
    use super::*;

    pub const EXECUTOR_PLUGIN_PROD: Address = address!("eC4181eE959e47f72e9cC60274fBE53D68949e47");
    pub const EXECUTOR_PLUGIN_DEV: Address = address!("b92929d03768a4F8D69552e15a8071EAf8E684ed");
    /// Safe MultiSend v1.3.0. Accepts inner delegate calls, unlike MultiSendCallOnly.
    pub const MULTISEND: Address = address!("A238CBeb142c10Ef7Ad8442C6D1f9E89e07e7761");
}
