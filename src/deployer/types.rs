//! Public deployer request and response shapes.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Spending limits attached to an automation sub-account.
#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationSubscriptionLimits {
    /// Subscription length in seconds.
    pub duration: u64,
    pub token_inputs: BTreeMap<String, String>,
    pub token_limits: BTreeMap<String, String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub whitelisted_addresses: Option<Vec<Address>>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PreComputedAddressData {
    pub precomputed_address: Address,
    pub fee_estimate: String,
    pub fee_estimate_signature: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct PrecomputeRequest {
    pub owner: Address,
    #[serde(rename = "chainID")]
    pub chain_id: u64,
    pub fee_token: Address,
}

/// Inputs for `generate_automation_sub_account`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct GenerateSubAccountParams {
    pub owner: Address,
    /// From the precompute response.
    pub precomputed_console_address: Address,
    pub automation_subscription_limits: AutomationSubscriptionLimits,
    #[serde(rename = "chainID")]
    pub chain_id: u64,
    #[serde(rename = "registryID")]
    pub registry_id: String,
    pub fee_token: Address,
    pub fee_estimate: String,
    pub tokens: Vec<Address>,
    pub amounts: Vec<String>,
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTxDomain {
    pub verifying_contract: Address,
    pub chain_id: String,
    pub name: String,
    pub salt: String,
    pub version: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SafeTxMessage {
    pub to: Address,
    pub base_gas: u64,
    pub data: String,
    pub gas_price: u64,
    pub gas_token: Address,
    pub nonce: u64,
    pub operation: u8,
    pub refund_receiver: Address,
    pub safe_tx_gas: u64,
    pub value: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TypedField {
    pub name: String,
    #[serde(rename = "type")]
    pub kind: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SafeTxTypes {
    #[serde(rename = "SafeTx")]
    pub safe_tx: Vec<TypedField>,
}

/// `SafeTx` typed data the owner signs to fund the sub-account.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SignaturePayload {
    pub domain: SafeTxDomain,
    pub message: SafeTxMessage,
    pub primary_type: String,
    pub types: SafeTxTypes,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TransferCalldataResponse {
    pub signature_payload: SignaturePayload,
    pub sub_account_policy_commit: String,
    #[serde(rename = "subscriptionDraftID")]
    pub subscription_draft_id: String,
}

/// Inputs for `compute_deployment_addresses` and `deploy_account`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeploymentParams {
    pub owner: Address,
    #[serde(rename = "chainID")]
    pub chain_id: u64,
    #[serde(rename = "registryID")]
    pub registry_id: String,
    /// From the signature response.
    #[serde(rename = "subscriptionDraftID")]
    pub subscription_draft_id: String,
    /// From the signature response.
    pub sub_account_policy_commit: String,
    pub fee_token: Address,
    pub tokens: Vec<Address>,
    pub amounts: Vec<String>,
    /// From the signature response.
    pub sub_account_chainer_signature: String,
    /// From the precompute response.
    pub fee_estimate_signature: String,
    pub fee_estimate: String,
    pub metadata: BTreeMap<String, Value>,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct DeployRequest<'a> {
    #[serde(flatten)]
    pub params: &'a DeploymentParams,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub pre_compute_addresses: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct PrecomputeResponse {
    pub sub_account_address: String,
    pub console_address: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DeployResponse {
    pub task_id: String,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum TaskStatus {
    Pending,
    Executing,
    Cancelled,
    Successful,
    Failed,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskResponseMetadata {
    pub is_successful: bool,
    pub error: Option<String>,
    pub transaction_hash: Option<String>,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TaskMetadata<R = Value> {
    pub request: R,
    pub response: TaskResponseMetadata,
}

/// Relayer task status.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskStatusData<R = Value> {
    pub task_id: String,
    pub metadata: TaskMetadata<R>,
    pub output_transaction_hash: Option<String>,
    pub status: TaskStatus,
    pub created_at: String,
}
