//! Data shapes for accounts, transfers, swaps and bridging.

use alloy::primitives::{Address, Bytes};
use serde::{Deserialize, Serialize};

/// A console account owned by an EOA on one chain.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Account {
    pub console_address: Address,
    pub eoa: Address,
    pub chain_id: u64,
    pub created_at: String,
}

/// Optional narrowing for [`fetch_existing_accounts`](super::CoreActions::fetch_existing_accounts).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AccountFilter {
    pub chain_id: Option<u64>,
    /// Required Safe threshold. Needs an on-chain read.
    pub threshold: Option<u64>,
    /// Required number of Safe owners. Needs an on-chain read.
    pub owners_count: Option<usize>,
}

impl AccountFilter {
    pub fn needs_chain_state(&self) -> bool {
        self.threshold.is_some() || self.owners_count.is_some()
    }
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SendParams {
    pub to: Address,
    pub amount: String,
    pub token_address: Address,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapQuoteRoute {
    pub pid: u64,
    pub dex: String,
    pub to_amount: String,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapParams {
    pub amount_in: String,
    pub token_in: Address,
    pub token_out: Address,
    pub slippage: f64,
    pub chain_id: u64,
    /// A route obtained from `get_swap_routes`.
    pub route: SwapQuoteRoute,
}

/// Query for `get_swap_routes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SwapRoutesQuery {
    pub chain_id: u64,
    pub from_asset_address: Address,
    pub to_asset_address: Address,
    pub owner_address: Address,
    pub from_amount: String,
    pub slippage: String,
}

/// Swap routes, or the reason there are none.
#[derive(Debug, Clone, Default, PartialEq, Serialize)]
pub struct SwapRoutesResult {
    pub data: Vec<SwapQuoteRoute>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TxBuildObject {
    pub from_amount: String,
    pub input_value_in_usd: f64,
    pub output_value_in_usd: f64,
    pub received_value_in_usd: f64,
    pub recipient: String,
    pub route_id: String,
    pub sender: String,
    pub service_time: f64,
    pub to_amount: String,
    pub total_gas_fees_in_usd: f64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum PathAction {
    Bridge,
    Swap,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct Protocol {
    pub icon: String,
    pub name: String,
}

/// One hop of a bridging route.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PathItem {
    pub from_amount: String,
    pub from_chain_id: u64,
    pub from_token_address: String,
    pub path_action: PathAction,
    pub protocol: Protocol,
    pub to_amount: String,
    pub to_chain_id: u64,
    pub to_token_address: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeRoute {
    pub pid: u64,
    pub priority: i64,
    pub tx_build_object: TxBuildObject,
    pub to_amount: String,
    pub duration: f64,
    pub max_duration: f64,
    pub path_items: Vec<PathItem>,
    pub bridge: Option<String>,
}

#[derive(Debug, Clone, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct BridgeParams {
    pub chain_id_in: u64,
    pub chain_id_out: u64,
    pub token_in: Address,
    pub token_out: Address,
    pub amount_in: String,
    pub amount_out: String,
    pub slippage: f64,
    pub recipient: Address,
    pub owner_address: Address,
    /// A route obtained from `fetch_bridging_routes`.
    pub route: BridgeRoute,
}

/// Query for `fetch_bridging_routes`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBridgingRoutesParams {
    pub chain_id_in: u64,
    pub chain_id_out: u64,
    pub token_in: String,
    pub token_out: String,
    pub amount_in: String,
    pub amount_out: String,
    pub slippage: f64,
    pub owner_address: String,
    pub recipient: Address,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum BridgingChainStatus {
    Pending,
    Success,
    Failed,
    Invalid,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GetBridgingStatus {
    pub destination_status: BridgingChainStatus,
    pub destination_transaction_hash: String,
    pub source_status: BridgingChainStatus,
    pub source_transaction_hash: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct BridgingStatusQuery<'a> {
    pub pid: u64,
    pub transaction_hash: &'a str,
    pub from_chain_id: u64,
    pub to_chain_id: u64,
}

/// A ready-to-submit call to a Safe's `execTransaction`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct SafeTransaction {
    pub to: Address,
    pub value: String,
    pub data: Bytes,
}
