//! Vendor API route table.
//!
//! Paths are relative to the configured base URL. Path parameters are
//! appended as extra segments by the callers.

pub const GENERATE_CALLDATA: &str = "/builder/generate";
pub const SWAP_ROUTES: &str = "/builder/swap/routes";
pub const BRIDGING_ROUTES: &str = "/builder/bridge/routes";
pub const BRIDGING_STATUS: &str = "/builder/bridge/status";

pub const EXISTING_ACCOUNTS: &str = "/user/consoles";
pub const INDEX_TRANSACTION: &str = "/indexer/process";

pub const AUTOMATION_SUBSCRIPTIONS: &str = "/automations/subscriptions/console";
pub const AUTOMATION_LOGS: &str = "/kernel/logs";
pub const KERNEL_TASKS: &str = "/kernel/tasks";
pub const KERNEL_EXECUTOR: &str = "/kernel/executor";
pub const AUTOMATIONS_EXECUTOR: &str = "/automations/executor";
pub const EXECUTOR_NONCE: &str = "/automations/executor/nonce";
pub const WORKFLOW_STATUS: &str = "/kernel/tasks/status";

pub const PRECOMPUTE_ADDRESS: &str = "/deployer/public-strategy/precompute";
pub const DEPLOYER_SIGNATURE: &str = "/deployer/public-strategy/signature";
pub const DEPLOY_PUBLIC_STRATEGY: &str = "/deployer/public-strategy/deploy";
pub const RELAYER_TASK_STATUS: &str = "/relayer/tasks/status";

/// Join a route and its path parameters with `/`.
pub fn with_segments(route: &str, segments: &[&dyn std::fmt::Display]) -> String {
    let mut path = route.to_string();
    for segment in segments {
        path.push('/');
        path.push_str(&segment.to_string());
    }
    path
}
