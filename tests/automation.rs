//! Automation context against a mock vendor backend.

use std::collections::BTreeMap;

use alloy::primitives::Address;
use console_kit::api::ApiError;
use console_kit::automation::{
    AutomationContext, ConsoleExecutorConfig, Executable, KernelExecutorConfig,
    SubmitTaskPayload, SubmitTaskRequest, SubmitTaskResponse, SubscribeAutomationData,
    SubscribeAutomationParams, TaskExecution, WorkflowExecutionStatus,
};
use serde_json::json;
use wiremock::matchers::{body_partial_json, method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

mod common;

fn context(server: &MockServer) -> AutomationContext {
    AutomationContext::new(common::vendor_client(server))
}

fn task_request() -> SubmitTaskRequest {
    SubmitTaskRequest {
        id: "task-1".to_string(),
        registry_id: "registry-1".to_string(),
        payload: SubmitTaskPayload {
            task: TaskExecution {
                skip: false,
                skip_reason: String::new(),
                executor_signature: "0xsig".to_string(),
                executor: "0x0000000000000000000000000000000000000003".to_string(),
                subaccount: "0x0000000000000000000000000000000000000004".to_string(),
                executable: Executable {
                    call_type: 0,
                    to: "0x0000000000000000000000000000000000000005".to_string(),
                    value: "0".to_string(),
                    data: "0x".to_string(),
                },
            },
        },
    }
}

fn console_config() -> ConsoleExecutorConfig {
    ConsoleExecutorConfig {
        timestamp: 1_700_000_000,
        executor: Address::repeat_byte(3),
        input_tokens: vec![Address::repeat_byte(1)],
        hop_addresses: vec![],
        fee_receiver: Address::repeat_byte(9),
        limit_per_execution: true,
        client_id: "client-1".to_string(),
    }
}

#[tokio::test]
async fn test_submit_task_wrong_status() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/kernel/tasks"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let response = context(&server).submit_task(&task_request()).await.unwrap();
    assert_eq!(
        response,
        SubmitTaskResponse {
            success: false,
            message: Some("Failed to submit task".to_string()),
        }
    );
}

#[tokio::test]
async fn test_submit_task_accepted() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/kernel/tasks"))
        .and(body_partial_json(json!({ "id": "task-1", "registryId": "registry-1" })))
        .respond_with(ResponseTemplate::new(202).set_body_json(json!({ "success": true })))
        .mount(&server)
        .await;

    let response = context(&server).submit_task(&task_request()).await.unwrap();
    assert!(response.success);
    assert!(response.message.is_none());
}

#[tokio::test]
async fn test_submit_task_accepted_without_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/kernel/tasks"))
        .respond_with(ResponseTemplate::new(202))
        .mount(&server)
        .await;

    let response = context(&server).submit_task(&task_request()).await.unwrap();
    assert_eq!(response, SubmitTaskResponse::accepted());
}

#[tokio::test]
async fn test_submit_task_accepted_with_plain_text_body() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/kernel/tasks"))
        .respond_with(ResponseTemplate::new(202).set_body_string("Accepted"))
        .mount(&server)
        .await;

    let response = context(&server).submit_task(&task_request()).await.unwrap();
    assert!(response.success);
}

#[tokio::test]
async fn test_submit_task_server_error_is_reported() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/kernel/tasks"))
        .respond_with(ResponseTemplate::new(500).set_body_string("internal"))
        .mount(&server)
        .await;

    let response = context(&server).submit_task(&task_request()).await.unwrap();
    assert!(!response.success);
    assert!(response.message.unwrap().contains("500"));
}

#[tokio::test]
async fn test_subscribe_posts_automation_payload() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/builder/generate"))
        .and(body_partial_json(json!({
            "id": "AUTOMATION",
            "action": "SUBSCRIBE",
            "params": { "chainId": 8453, "data": { "registryID": "registry-1" } }
        })))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": { "transactions": [], "metadata": { "subscriptionDraftID": "draft" } }
        })))
        .expect(1)
        .mount(&server)
        .await;

    let params = SubscribeAutomationParams {
        chain_id: 8453,
        data: SubscribeAutomationData {
            metadata: BTreeMap::new(),
            duration: 86_400,
            token_inputs: BTreeMap::new(),
            token_limits: BTreeMap::new(),
            registry_id: "registry-1".to_string(),
            chain_id: 8453,
            owner_address: common::eoa(),
            whitelisted_address: Address::repeat_byte(4),
        },
    };
    let response = context(&server).subscribe_to_automation(&params).await.unwrap();
    assert_eq!(response.data.metadata.unwrap()["subscriptionDraftID"], json!("draft"));
}

#[tokio::test]
async fn test_subscriptions_swallow_errors() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .respond_with(ResponseTemplate::new(500))
        .mount(&server)
        .await;

    let subscriptions = context(&server)
        .fetch_automation_subscriptions(common::console_account(), 8453)
        .await
        .unwrap();
    assert!(subscriptions.is_empty());

    let err = context(&server)
        .fetch_automation_subscriptions(common::console_account(), 0)
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Account address and chain ID are required");
}

#[tokio::test]
async fn test_logs_missing_data_is_empty() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kernel/logs/auto-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": null })))
        .mount(&server)
        .await;

    let logs = context(&server).fetch_automation_logs("auto-1").await.unwrap();
    assert!(logs.is_empty());
}

#[tokio::test]
async fn test_fetch_tasks_passes_paging() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kernel/tasks/registry-1"))
        .and(query_param("cursor", "3"))
        .and(query_param("limit", "10"))
        .respond_with(
            ResponseTemplate::new(200).set_body_json(json!({ "data": { "tasks": [], "cursor": 3 } })),
        )
        .expect(1)
        .mount(&server)
        .await;

    let tasks = context(&server).fetch_tasks("registry-1", 3, 10).await.unwrap();
    assert!(tasks.is_empty());
}

#[tokio::test]
async fn test_register_on_kernel_requires_created() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/kernel/executor"))
        .and(body_partial_json(json!({
            "registryId": "registry-1",
            "signature": "0xsig",
            "config": { "type": "INTERVAL" }
        })))
        .respond_with(ResponseTemplate::new(201))
        .mount(&server)
        .await;

    let config = KernelExecutorConfig::interval("3600", "600");
    context(&server)
        .register_executor_on_kernel("registry-1", "0xsig", &config)
        .await
        .unwrap();

    let other = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/kernel/executor"))
        .respond_with(ResponseTemplate::new(200))
        .mount(&other)
        .await;

    let err = context(&other)
        .register_executor_on_kernel("registry-1", "0xsig", &config)
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Failed(_)));
    assert_eq!(err.to_string(), "Failed to register executor on kernel");
}

#[tokio::test]
async fn test_register_on_console_returns_listing() {
    let server = MockServer::start().await;
    let config = console_config();
    let payload = json!({
        "config": {
            "inputTokens": config.input_tokens,
            "hopAddresses": [],
            "feeInBPS": 0,
            "feeToken": Address::ZERO,
            "feeReceiver": config.fee_receiver,
            "limitPerExecution": true
        },
        "executor": config.executor,
        "signature": "0xsig",
        "chainId": 8453,
        "timestamp": 1_700_000_000u64,
        "executorMetadata": { "id": "client-1", "name": "Bot", "logo": "bot.png", "metadata": {} }
    });
    let mut registered = payload.clone();
    registered["id"] = json!("exec-1");
    registered["status"] = json!(1);

    Mock::given(method("POST"))
        .and(path("/automations/executor"))
        .and(body_partial_json(payload))
        .respond_with(ResponseTemplate::new(201).set_body_json(json!({ "data": registered })))
        .mount(&server)
        .await;

    let listing = context(&server)
        .register_executor_on_console("0xsig", 8453, &config, "Bot", "bot.png", json!({}))
        .await
        .unwrap()
        .unwrap();
    assert_eq!(listing.id, "exec-1");
    assert_eq!(listing.payload.executor_metadata.name, "Bot");
}

#[tokio::test]
async fn test_register_on_console_failure_message() {
    let server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/automations/executor"))
        .respond_with(ResponseTemplate::new(409))
        .mount(&server)
        .await;

    let err = context(&server)
        .register_executor_on_console("0xsig", 8453, &console_config(), "Bot", "bot.png", json!({}))
        .await
        .unwrap_err();
    assert_eq!(err.to_string(), "Failed to register executor on console");
}

#[tokio::test]
async fn test_executor_nonce_path() {
    let server = MockServer::start().await;
    let executor = Address::repeat_byte(3);
    Mock::given(method("GET"))
        .and(path(format!(
            "/automations/executor/nonce/{}/8453/{}",
            executor,
            common::console_account()
        )))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({ "data": "7" })))
        .mount(&server)
        .await;

    let nonce = context(&server)
        .fetch_executor_nonce(common::console_account(), executor, 8453)
        .await
        .unwrap();
    assert_eq!(nonce, "7");
}

#[tokio::test]
async fn test_workflow_state_errors_are_returned() {
    let server = MockServer::start().await;
    Mock::given(method("GET"))
        .and(path("/kernel/tasks/status/task-1"))
        .respond_with(ResponseTemplate::new(200).set_body_json(json!({
            "data": {
                "status": 1,
                "out": null
            }
        })))
        .mount(&server)
        .await;

    let state = context(&server).fetch_workflow_state("task-1").await.unwrap();
    assert_eq!(state.status, WorkflowExecutionStatus::Running);
    assert!(state.out.is_none());

    let err = context(&server).fetch_workflow_state("task-2").await.unwrap_err();
    assert!(matches!(err, ApiError::Status { status: 404, .. }));
}
