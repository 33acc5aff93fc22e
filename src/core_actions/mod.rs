//! Core actions: accounts, intents, routing and relay tracking.
//!
//! # Data Flow
//! ```text
//! fetch_existing_accounts → vendor API → (optional) AccountStateReader filter
//! send / swap / bridge    → GeneratePayload::Build → /builder/generate
//! get_swap_routes / fetch_bridging_routes / fetch_bridging_status → vendor API
//! new_safe_transaction_with_single_threshold → safe.rs (pure encoding)
//! wait_for_transaction_to_relay → Poller → PublicDeployer::fetch_deployment_status
//! ```
//!
//! # Design Decisions
//! - Intent calldata and indexing errors are returned; lookups degrade to
//!   empty results
//! - Safe encoding needs no RPC access

pub mod actions;
pub mod safe;
pub mod types;

pub use actions::CoreActions;
pub use types::{
    Account, AccountFilter, BridgeParams, BridgeRoute, BridgingChainStatus,
    GetBridgingRoutesParams, GetBridgingStatus, PathAction, PathItem, SafeTransaction, SendParams,
    SwapParams, SwapQuoteRoute, SwapRoutesQuery, SwapRoutesResult, TxBuildObject,
};
