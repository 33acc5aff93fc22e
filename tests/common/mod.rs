//! Shared helpers for integration tests.

#![allow(dead_code)]

use std::sync::Arc;
use std::time::Duration;

use alloy::primitives::Address;
use console_kit::api::VendorClient;
use console_kit::config::{ApiConfig, KitConfig};
use console_kit::messaging::{ChannelTransport, Communicator, ParentHandle};
use console_kit::ConsoleKit;
use serde_json::{json, Value};
use wiremock::MockServer;

pub const API_KEY: &str = "test-api-key";

pub fn eoa() -> Address {
    "0xD870765964C1F2d5f45D9542881afA2AfDfbD01A".parse().unwrap()
}

pub fn console_account() -> Address {
    Address::repeat_byte(0xc0)
}

/// Config pointing at a mock vendor with a fast poller.
pub fn kit_config(base_url: &str) -> KitConfig {
    let mut config = KitConfig::default();
    config.api.base_url = base_url.to_string();
    config.api.api_key = API_KEY.to_string();
    config.polling.max_attempts = 5;
    config.polling.interval_ms = 10;
    config
}

pub fn vendor_client(server: &MockServer) -> VendorClient {
    VendorClient::new(&ApiConfig {
        base_url: server.uri(),
        api_key: API_KEY.to_string(),
        request_timeout_secs: 5,
    })
    .unwrap()
}

/// A kit wired to a mock vendor and an in-process parent.
pub fn kit_with_parent(server: &MockServer) -> (ConsoleKit, ParentHandle) {
    let (transport, parent, inbound) = ChannelTransport::pair();
    let communicator = Communicator::spawn(Arc::new(transport), inbound);
    let kit = ConsoleKit::new(&kit_config(&server.uri()), communicator).unwrap();
    (kit, parent)
}

/// Answer the next request the parent receives with `data`.
pub async fn answer_next(parent: &mut ParentHandle, data: Value) -> Value {
    let request = tokio::time::timeout(Duration::from_secs(5), parent.requests.recv())
        .await
        .expect("request within timeout")
        .expect("request channel open");
    parent.reply(json!({ "id": request.id, "success": true, "data": data }));
    serde_json::to_value(&request).unwrap()
}

pub fn account_json(console: Address, chain_id: u64) -> Value {
    json!({
        "consoleAddress": console,
        "eoa": eoa(),
        "chainId": chain_id,
        "createdAt": "2025-01-01T00:00:00Z"
    })
}

pub fn task_status_json(status: &str, hash: Option<&str>) -> Value {
    json!({
        "data": {
            "taskId": "task-1",
            "metadata": {
                "request": {},
                "response": { "isSuccessful": status == "successful", "error": null, "transactionHash": hash }
            },
            "outputTransactionHash": hash,
            "status": status,
            "createdAt": "2025-01-01T00:00:00Z"
        }
    })
}
