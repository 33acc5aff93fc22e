//! Automation lifecycle, kernel tasks and executor onboarding.
//!
//! # Data Flow
//! ```text
//! subscribe / update / cancel → GeneratePayload (AUTOMATION) → /builder/generate
//! executor onboarding:
//!     generate_*_712_message → caller signs
//!         → register_executor_on_kernel / register_executor_on_console
//! executor loop:
//!     fetch_tasks → fetch_executor_nonce → generate_executable_digest_712_message
//!         → caller signs → submit_task → fetch_workflow_state
//! ```
//!
//! # Design Decisions
//! - Lookups (subscriptions, logs, tasks) degrade to empty lists
//! - Registration failures collapse to one fixed message per target

pub mod context;
pub mod typed_data;
pub mod types;

pub use context::AutomationContext;
pub use typed_data::{
    ConsoleExecutorRegistration712Message, ExecutableDigest712Message,
    GenerateExecutableTypedDataParams, KernelExecutorRegistration712Message,
};
pub use types::{
    AutomationLogResponse, AutomationSubscription, CancelAutomationData, ConsoleExecutorConfig,
    ConsoleExecutorPayload, Executable, ExecutorDetails, KernelExecutorConfig,
    RegisteredConsoleExecutor, SubAccountCall, SubmitTaskPayload, SubmitTaskRequest,
    SubmitTaskResponse, SubscribeAutomationData, SubscribeAutomationParams, Task, TaskExecution,
    UpdateAutomationData, UpdateAutomationParams, VendorCancelAutomationParams,
    WorkflowExecutionStatus, WorkflowOutput, WorkflowStateResponse,
};
