//! Automation subscriptions, kernel tasks and executor registration.

use alloy::primitives::Address;
use reqwest::StatusCode;
use serde::de::DeserializeOwned;
use serde::Serialize;

use crate::api::client::{expect_status, require_address, require_chain_id, require_id};
use crate::api::{
    recover, routes, ApiError, ApiResult, DataEnvelope, GenerateCalldataResponse,
    GeneratePayload, VendorClient,
};
use crate::automation::typed_data::{
    console_executor_registration, executable_digest, kernel_executor_registration,
    ConsoleExecutorRegistration712Message, ExecutableDigest712Message,
    GenerateExecutableTypedDataParams, KernelExecutorRegistration712Message,
};
use crate::automation::types::{
    AutomationLogResponse, AutomationSubscription, ConsoleExecutorConfig, ConsoleExecutorPayload,
    ExecutorDetails, KernelExecutorConfig, KernelExecutorRegistration, RegisteredConsoleExecutor,
    SubmitTaskRequest, SubmitTaskResponse, SubscribeAutomationParams, Task, TaskPage,
    UpdateAutomationParams, VendorCancelAutomationParams, WorkflowStateResponse,
};

const KERNEL_REGISTRATION_FAILED: &str = "Failed to register executor on kernel";
const CONSOLE_REGISTRATION_FAILED: &str = "Failed to register executor on console";
const SUBMIT_TASK_FAILED: &str = "Failed to submit task";

/// Client for automation lifecycle and executor endpoints.
#[derive(Debug, Clone)]
pub struct AutomationContext {
    client: VendorClient,
}

impl AutomationContext {
    pub fn new(client: VendorClient) -> Self {
        Self { client }
    }

    /// Calldata creating an automation subscription.
    pub async fn subscribe_to_automation(
        &self,
        params: &SubscribeAutomationParams,
    ) -> ApiResult<GenerateCalldataResponse> {
        require_chain_id(params.chain_id, "Chain ID is required")?;
        self.generate(GeneratePayload::subscribe(params), "subscribing to automation")
            .await
    }

    /// Calldata updating an existing automation.
    pub async fn update_automation(
        &self,
        params: &UpdateAutomationParams,
    ) -> ApiResult<GenerateCalldataResponse> {
        require_address(params.sub_account_address, "Sub-account address is required")?;
        require_chain_id(params.chain_id, "Chain ID is required")?;
        self.generate(GeneratePayload::update(params), "updating automation")
            .await
    }

    /// Calldata cancelling an automation and sweeping its sub-account.
    pub async fn cancel_automation(
        &self,
        params: &VendorCancelAutomationParams,
    ) -> ApiResult<GenerateCalldataResponse> {
        require_address(params.sub_account_address, "Sub-account address is required")?;
        require_chain_id(params.chain_id, "Chain ID is required")?;
        self.generate(GeneratePayload::cancel(params), "cancelling automation")
            .await
    }

    async fn generate<P: Serialize>(
        &self,
        payload: GeneratePayload<P>,
        context: &str,
    ) -> ApiResult<GenerateCalldataResponse> {
        self.client
            .post(routes::GENERATE_CALLDATA, routes::GENERATE_CALLDATA, &payload)
            .await
            .inspect_err(|e| tracing::error!(error = %e, "Error {}", context))
    }

    /// Subscriptions of an account on one chain. Empty on failure.
    pub async fn fetch_automation_subscriptions(
        &self,
        account: Address,
        chain_id: u64,
    ) -> ApiResult<Vec<AutomationSubscription>> {
        const REQUIRED: &str = "Account address and chain ID are required";
        require_address(account, REQUIRED)?;
        require_chain_id(chain_id, REQUIRED)?;

        let path = routes::with_segments(routes::AUTOMATION_SUBSCRIPTIONS, &[&account, &chain_id]);
        let result = self
            .fetch_list(
                routes::AUTOMATION_SUBSCRIPTIONS,
                &path,
                "No subscriptions found for the given account address and chain ID",
            )
            .await;

        recover(result, "fetching automation subscriptions", Vec::new)
    }

    /// Execution logs of an automation. Empty on failure.
    pub async fn fetch_automation_logs(&self, automation_id: &str) -> ApiResult<Vec<AutomationLogResponse>> {
        require_id(automation_id, "Automation ID is required")?;

        let path = routes::with_segments(routes::AUTOMATION_LOGS, &[&automation_id]);
        let result = self
            .fetch_list(
                routes::AUTOMATION_LOGS,
                &path,
                "No logs found for the given automation ID",
            )
            .await;

        recover(result, "fetching automation logs", Vec::new)
    }

    async fn fetch_list<T: DeserializeOwned>(
        &self,
        route: &'static str,
        path: &str,
        missing: &str,
    ) -> ApiResult<Vec<T>> {
        self.client
            .get::<DataEnvelope<Vec<T>>>(route, path)
            .await?
            .require(missing)
    }

    /// One page of kernel tasks for an executor registry. Empty on failure.
    pub async fn fetch_tasks(&self, registry_id: &str, cursor: u64, limit: u64) -> ApiResult<Vec<Task>> {
        require_id(registry_id, "Registry ID is required")?;

        let path = routes::with_segments(routes::KERNEL_TASKS, &[&registry_id]);
        let result: ApiResult<Vec<Task>> = async {
            self.client
                .get_with_query::<DataEnvelope<TaskPage>, _>(
                    routes::KERNEL_TASKS,
                    &path,
                    &[("cursor", cursor), ("limit", limit)],
                )
                .await?
                .data
                .and_then(|page| page.tasks)
                .ok_or_else(|| {
                    ApiError::MissingData("No tasks found for the given registry ID".to_string())
                })
        }
        .await;

        recover(result, "fetching tasks", Vec::new)
    }

    /// Submit an executor's task result. Requires a 202 response; a 202
    /// without a JSON body counts as accepted.
    ///
    /// Failures come back as `success: false` rather than `Err`.
    pub async fn submit_task(&self, request: &SubmitTaskRequest) -> ApiResult<SubmitTaskResponse> {
        require_id(&request.registry_id, "Registry ID is required")?;

        let result: ApiResult<SubmitTaskResponse> = async {
            let (status, body) = self
                .client
                .post_raw(routes::KERNEL_TASKS, routes::KERNEL_TASKS, Some(request))
                .await?;
            if status != StatusCode::ACCEPTED {
                return Err(ApiError::Failed(SUBMIT_TASK_FAILED.to_string()));
            }
            if body.trim().is_empty() {
                return Ok(SubmitTaskResponse::accepted());
            }
            Ok(serde_json::from_str::<SubmitTaskResponse>(&body).unwrap_or_else(|e| {
                tracing::debug!(error = %e, "Task accepted with an unrecognised body");
                SubmitTaskResponse::accepted()
            }))
        }
        .await;

        Ok(result.unwrap_or_else(|e| {
            tracing::error!(task_id = %request.id, error = %e, "Error submitting task");
            SubmitTaskResponse::failed(e.to_string())
        }))
    }

    /// Kernel registration of an executor registry.
    pub async fn fetch_executor_details(&self, registry_id: &str) -> ApiResult<ExecutorDetails> {
        require_id(registry_id, "Registry ID is required")?;

        let path = routes::with_segments(routes::KERNEL_EXECUTOR, &[&registry_id]);
        self.client
            .get::<DataEnvelope<ExecutorDetails>>(routes::KERNEL_EXECUTOR, &path)
            .await
            .and_then(|env| env.require("No executor details found for the given registry ID"))
            .inspect_err(|e| tracing::error!(registry_id, error = %e, "Error fetching executor details"))
    }

    pub fn generate_kernel_executor_registration_712_message(
        &self,
        chain_id: u64,
        registry_id: &str,
        config: &KernelExecutorConfig,
    ) -> KernelExecutorRegistration712Message {
        kernel_executor_registration(chain_id, registry_id, config)
    }

    /// Register an executor with the kernel using a signed `ModifyExecutor`
    /// message. Requires a 201 response.
    pub async fn register_executor_on_kernel(
        &self,
        registry_id: &str,
        signature: &str,
        config: &KernelExecutorConfig,
    ) -> ApiResult<()> {
        require_id(registry_id, "Registry ID is required")?;
        require_id(signature, "Signature is required")?;

        let body = KernelExecutorRegistration {
            registry_id,
            signature,
            config,
        };
        let result: ApiResult<()> = async {
            let (status, _) = self
                .client
                .post_raw(routes::KERNEL_EXECUTOR, routes::KERNEL_EXECUTOR, Some(&body))
                .await?;
            expect_status(status, StatusCode::CREATED)
        }
        .await;

        result.map_err(|e| {
            tracing::error!(registry_id, error = %e, "Error registering executor on kernel");
            ApiError::Failed(KERNEL_REGISTRATION_FAILED.to_string())
        })
    }

    pub fn generate_console_executor_registration_712_message(
        &self,
        chain_id: u64,
        config: &ConsoleExecutorConfig,
    ) -> ConsoleExecutorRegistration712Message {
        console_executor_registration(chain_id, config)
    }

    /// List an executor on the console using a signed `RegisterExecutor`
    /// message. Requires a 201 response.
    pub async fn register_executor_on_console<M>(
        &self,
        signature: &str,
        chain_id: u64,
        config: &ConsoleExecutorConfig,
        name: &str,
        logo: &str,
        metadata: M,
    ) -> ApiResult<Option<RegisteredConsoleExecutor<M>>>
    where
        M: Serialize + DeserializeOwned,
    {
        require_id(signature, "Signature is required")?;
        require_chain_id(chain_id, "Chain ID is required")?;

        let payload = ConsoleExecutorPayload::new(signature, chain_id, config, name, logo, metadata);
        let result: ApiResult<Option<RegisteredConsoleExecutor<M>>> = async {
            let (status, body) = self
                .client
                .post_raw(routes::AUTOMATIONS_EXECUTOR, routes::AUTOMATIONS_EXECUTOR, Some(&payload))
                .await?;
            expect_status(status, StatusCode::CREATED)?;
            Ok(serde_json::from_str::<DataEnvelope<RegisteredConsoleExecutor<M>>>(&body)?.data)
        }
        .await;

        result.map_err(|e| {
            tracing::error!(executor = %config.executor, error = %e, "Error registering executor on console");
            ApiError::Failed(CONSOLE_REGISTRATION_FAILED.to_string())
        })
    }

    pub fn generate_executable_digest_712_message(
        &self,
        params: &GenerateExecutableTypedDataParams,
    ) -> ExecutableDigest712Message {
        executable_digest(params)
    }

    /// Next nonce the executor must sign with for `account`.
    pub async fn fetch_executor_nonce(
        &self,
        account: Address,
        executor: Address,
        chain_id: u64,
    ) -> ApiResult<String> {
        const INVALID: &str = "Invalid params to get executor nonce";
        require_address(account, INVALID)?;
        require_address(executor, INVALID)?;
        require_chain_id(chain_id, INVALID)?;

        let path = routes::with_segments(routes::EXECUTOR_NONCE, &[&executor, &chain_id, &account]);
        self.client
            .get::<DataEnvelope<String>>(routes::EXECUTOR_NONCE, &path)
            .await
            .and_then(|env| env.require("Executor nonce not found"))
            .inspect_err(|e| tracing::error!(account = %account, error = %e, "Error fetching executor nonce"))
    }

    /// Workflow status of a kernel task.
    pub async fn fetch_workflow_state(&self, task_id: &str) -> ApiResult<WorkflowStateResponse> {
        require_id(task_id, "TaskID is required to get workflow state")?;

        let path = routes::with_segments(routes::WORKFLOW_STATUS, &[&task_id]);
        self.client
            .get::<DataEnvelope<WorkflowStateResponse>>(routes::WORKFLOW_STATUS, &path)
            .await
            .and_then(|env| env.require("Workflow state not found"))
            .inspect_err(|e| tracing::error!(task_id, error = %e, "Error fetching workflow state"))
    }
}
