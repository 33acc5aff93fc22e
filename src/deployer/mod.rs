//! Public strategy deployment.
//!
//! # Data Flow
//! ```text
//! fetch_precompute_address      → console address + fee estimate
//!     → generate_automation_sub_account → SafeTx payload for the owner to sign
//!     → compute_deployment_addresses    → console + sub-account addresses
//!     → deploy_account                  → relayer task id
//!     → fetch_deployment_status         → relayer task status
//! ```

pub mod client;
pub mod types;

pub use client::PublicDeployer;
pub use types::{
    AutomationSubscriptionLimits, DeployResponse, DeploymentParams, GenerateSubAccountParams,
    PreComputedAddressData, PrecomputeResponse, TaskStatus, TaskStatusData,
    TransferCalldataResponse,
};
