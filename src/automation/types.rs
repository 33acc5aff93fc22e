//! Automation, kernel task and executor shapes.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use serde::{Deserialize, Serialize};
use serde_json::Value;

/// Inputs for `subscribe_to_automation`.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeAutomationParams {
    pub chain_id: u64,
    pub data: SubscribeAutomationData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscribeAutomationData {
    pub metadata: BTreeMap<String, Value>,
    pub duration: u64,
    pub token_inputs: BTreeMap<String, String>,
    pub token_limits: BTreeMap<String, String>,
    #[serde(rename = "registryID")]
    pub registry_id: String,
    pub chain_id: u64,
    pub owner_address: Address,
    pub whitelisted_address: Address,
}

/// A call the sub-account executes as part of an update or cancel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubAccountCall {
    pub to: Address,
    pub value: String,
    pub data: String,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAutomationParams {
    pub sub_account_address: Address,
    pub chain_id: u64,
    pub data: UpdateAutomationData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateAutomationData {
    pub sweep_tokens: Vec<String>,
    pub exec_via_sub_acc: Vec<SubAccountCall>,
    pub metadata: BTreeMap<String, Value>,
    pub duration: u64,
    pub token_inputs: BTreeMap<String, String>,
    pub token_limits: BTreeMap<String, String>,
    #[serde(rename = "registryID")]
    pub registry_id: String,
    pub chain_id: u64,
    pub owner_address: Address,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VendorCancelAutomationParams {
    pub sub_account_address: Address,
    pub chain_id: u64,
    pub data: CancelAutomationData,
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelAutomationData {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sweep_tokens: Option<Vec<String>>,
    pub exec_via_sub_acc: Vec<SubAccountCall>,
    pub owner_console: Address,
    pub sweep_token_receiver: Address,
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubscriptionMetadata {
    #[serde(default)]
    pub base_token: String,
    #[serde(default)]
    pub every: String,
}

/// Subscription status the backend uses for a running automation.
pub const SUBSCRIPTION_STATUS_ACTIVE: u8 = 2;

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationSubscription {
    pub chain_id: u64,
    pub commit_hash: String,
    pub created_at: String,
    pub duration: u64,
    pub fee_amount: String,
    pub fee_token: Address,
    pub id: String,
    #[serde(default)]
    pub metadata: SubscriptionMetadata,
    pub registry_id: String,
    pub status: u8,
    pub sub_account_address: Address,
    pub token_inputs: BTreeMap<String, String>,
    pub token_limits: BTreeMap<String, String>,
}

impl AutomationSubscription {
    pub fn is_active(&self) -> bool {
        self.status == SUBSCRIPTION_STATUS_ACTIVE
    }
}

/// The request an automation log entry recorded.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct LogRequest {
    pub to: String,
    pub data: String,
    pub value: String,
    #[serde(rename = "chainID")]
    pub chain_id: u64,
    pub operation: u8,
    pub subaccount: Address,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TransitionState<S = Value> {
    pub prev: Option<S>,
    pub current: S,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct LogMetadata<S = Value> {
    pub req: LogRequest,
    #[serde(rename = "taskID")]
    pub task_id: String,
    pub transition_state: TransitionState<S>,
}

/// One automation log entry. Most fields are snake_case on the wire.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct AutomationLogResponse<S = Value> {
    pub id: String,
    pub subaccount_address: Address,
    pub chain_id: u64,
    pub metadata: LogMetadata<S>,
    pub message: String,
    pub sub_id: String,
    #[serde(rename = "createdAt")]
    pub created_at: String,
    #[serde(rename = "outputTxHash", default)]
    pub output_tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskParams {
    pub executor_address: Address,
    pub sub_account_address: Address,
    #[serde(rename = "executorID")]
    pub executor_id: String,
    #[serde(rename = "chainID")]
    pub chain_id: u64,
    pub subscription: AutomationSubscriptionRecord,
    pub is_hosted_workflow: bool,
}

/// Subscription as embedded in a kernel task, with free-form metadata.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct AutomationSubscriptionRecord {
    pub chain_id: u64,
    pub commit_hash: String,
    pub created_at: String,
    pub duration: u64,
    pub fee_amount: String,
    pub fee_token: Address,
    pub id: String,
    #[serde(default)]
    pub metadata: Value,
    pub registry_id: String,
    pub status: u8,
    pub sub_account_address: Address,
    pub token_inputs: BTreeMap<String, String>,
    pub token_limits: BTreeMap<String, String>,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct TaskSchedule {
    pub every: u64,
    #[serde(rename = "ID")]
    pub id: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskPayload {
    pub execution_count: u64,
    pub prev_execution_at: String,
    #[serde(rename = "prevExecutionID")]
    pub prev_execution_id: String,
    #[serde(rename = "runningExecutionWorkflowIDs", default)]
    pub running_execution_workflow_ids: Vec<String>,
    pub nonce: u64,
    pub params: TaskParams,
    pub schedule: TaskSchedule,
    pub triggered_at: String,
}

/// A scheduled kernel task for an executor registry.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct Task {
    pub id: String,
    pub payload: TaskPayload,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct TaskPage {
    #[serde(default)]
    pub tasks: Option<Vec<Task>>,
    #[serde(default)]
    pub cursor: u64,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Executable {
    pub call_type: u8,
    pub to: String,
    pub value: String,
    pub data: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct TaskExecution {
    pub skip: bool,
    pub skip_reason: String,
    pub executor_signature: String,
    pub executor: String,
    pub subaccount: String,
    pub executable: Executable,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitTaskPayload {
    pub task: TaskExecution,
}

/// An executor's result for a kernel task.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SubmitTaskRequest {
    pub id: String,
    pub registry_id: String,
    pub payload: SubmitTaskPayload,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
pub struct SubmitTaskResponse {
    pub success: bool,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub message: Option<String>,
}

impl SubmitTaskResponse {
    pub fn accepted() -> Self {
        Self {
            success: true,
            message: None,
        }
    }

    pub fn failed(message: impl Into<String>) -> Self {
        Self {
            success: false,
            message: Some(message.into()),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorMetadata {
    #[serde(rename = "type")]
    pub kind: String,
    pub default_every: String,
    #[serde(rename = "executionTTL")]
    pub execution_ttl: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorDetails {
    pub registry_id: String,
    pub metadata: ExecutorMetadata,
    pub signature: String,
    pub enabled: bool,
    #[serde(rename = "created_at")]
    pub created_at: String,
    #[serde(rename = "updated_at")]
    pub updated_at: String,
    #[serde(default)]
    pub relayer_addresses: Vec<Address>,
}

/// Executor scheduling config registered with the kernel.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct KernelExecutorConfig {
    /// Always `"INTERVAL"` today.
    #[serde(rename = "type")]
    pub kind: String,
    pub default_every: String,
    #[serde(rename = "executionTTL")]
    pub execution_ttl: String,
}

impl KernelExecutorConfig {
    pub fn interval(default_every: impl Into<String>, execution_ttl: impl Into<String>) -> Self {
        Self {
            kind: "INTERVAL".to_string(),
            default_every: default_every.into(),
            execution_ttl: execution_ttl.into(),
        }
    }
}

#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub(crate) struct KernelExecutorRegistration<'a> {
    pub registry_id: &'a str,
    pub signature: &'a str,
    pub config: &'a KernelExecutorConfig,
}

/// Executor registration details signed by the executor.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleExecutorConfig {
    pub timestamp: u64,
    pub executor: Address,
    pub input_tokens: Vec<Address>,
    pub hop_addresses: Vec<Address>,
    pub fee_receiver: Address,
    pub limit_per_execution: bool,
    pub client_id: String,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ExecutorFeeConfig {
    pub input_tokens: Vec<Address>,
    pub hop_addresses: Vec<Address>,
    #[serde(rename = "feeInBPS")]
    pub fee_in_bps: u64,
    pub fee_token: Address,
    pub fee_receiver: Address,
    pub limit_per_execution: bool,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct ExecutorListing<M = Value> {
    pub id: String,
    pub name: String,
    pub logo: String,
    pub metadata: M,
}

/// Body of a console executor registration.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ConsoleExecutorPayload<M = Value> {
    pub config: ExecutorFeeConfig,
    pub executor: Address,
    pub signature: String,
    pub chain_id: u64,
    pub timestamp: u64,
    pub executor_metadata: ExecutorListing<M>,
}

impl<M> ConsoleExecutorPayload<M> {
    /// Registration body with no fee.
    pub fn new(
        signature: impl Into<String>,
        chain_id: u64,
        config: &ConsoleExecutorConfig,
        name: impl Into<String>,
        logo: impl Into<String>,
        metadata: M,
    ) -> Self {
        Self {
            config: ExecutorFeeConfig {
                input_tokens: config.input_tokens.clone(),
                hop_addresses: config.hop_addresses.clone(),
                fee_in_bps: 0,
                fee_token: Address::ZERO,
                fee_receiver: config.fee_receiver,
                limit_per_execution: config.limit_per_execution,
            },
            executor: config.executor,
            signature: signature.into(),
            chain_id,
            timestamp: config.timestamp,
            executor_metadata: ExecutorListing {
                id: config.client_id.clone(),
                name: name.into(),
                logo: logo.into(),
                metadata,
            },
        }
    }
}

/// A registered executor as returned by the console.
#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct RegisteredConsoleExecutor<M = Value> {
    #[serde(flatten)]
    pub payload: ConsoleExecutorPayload<M>,
    pub id: String,
    pub status: u8,
}

/// Temporal workflow status codes, sent as numbers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Deserialize, Serialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum WorkflowExecutionStatus {
    Unspecified = 0,
    Running = 1,
    Completed = 2,
    Failed = 3,
    Canceled = 4,
    Terminated = 5,
    ContinuedAsNew = 6,
    TimedOut = 7,
}

impl From<WorkflowExecutionStatus> for u8 {
    fn from(status: WorkflowExecutionStatus) -> Self {
        status as u8
    }
}

impl TryFrom<u8> for WorkflowExecutionStatus {
    type Error = String;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        use WorkflowExecutionStatus::*;
        Ok(match value {
            0 => Unspecified,
            1 => Running,
            2 => Completed,
            3 => Failed,
            4 => Canceled,
            5 => Terminated,
            6 => ContinuedAsNew,
            7 => TimedOut,
            other => return Err(format!("unknown workflow status {}", other)),
        })
    }
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct WorkflowOutput<M = Value> {
    pub metadata: M,
    pub message: String,
    pub created_at: String,
    pub sub_account_address: Address,
    pub chain_id: u64,
    pub sub_id: String,
    pub output_tx_hash: String,
}

#[derive(Debug, Clone, PartialEq, Deserialize, Serialize)]
pub struct WorkflowStateResponse<M = Value> {
    pub status: WorkflowExecutionStatus,
    pub out: Option<WorkflowOutput<M>>,
}
