//! Core account, transfer, swap and bridging operations.

use std::collections::BTreeMap;
use std::sync::Arc;

use alloy::primitives::Address;
use futures_util::future::join_all;
use reqwest::StatusCode;
use serde::Serialize;

use crate::api::client::{expect_status, require_address, require_chain_id, require_id};
use crate::api::{
    recover, routes, ActionId, ApiError, ApiResult, CalldataTransaction, DataEnvelope,
    GenerateCalldataResponse, GeneratePayload, VendorClient,
};
use crate::blockchain::{is_supported, AccountStateReader};
use crate::core_actions::safe::encode_exec_transaction;
use crate::core_actions::types::{
    Account, AccountFilter, BridgeParams, BridgeRoute, BridgingStatusQuery, GetBridgingRoutesParams,
    GetBridgingStatus, SafeTransaction, SendParams, SwapParams, SwapQuoteRoute, SwapRoutesQuery,
    SwapRoutesResult,
};
use crate::deployer::{PublicDeployer, TaskStatus, TaskStatusData};
use crate::resilience::{CancelSignal, PollError, PollSettings, Poller};

/// Account discovery, intent calldata, routing and relay tracking.
#[derive(Clone)]
pub struct CoreActions {
    client: VendorClient,
    deployer: PublicDeployer,
    state_reader: Option<Arc<dyn AccountStateReader>>,
    poll_settings: PollSettings,
}

impl CoreActions {
    pub fn new(client: VendorClient, deployer: PublicDeployer, poll_settings: PollSettings) -> Self {
        Self {
            client,
            deployer,
            state_reader: None,
            poll_settings,
        }
    }

    /// Use `reader` for threshold and owner-count filtering.
    pub fn with_state_reader(mut self, reader: Arc<dyn AccountStateReader>) -> Self {
        self.state_reader = Some(reader);
        self
    }

    /// Console accounts owned by `eoa`, optionally filtered.
    ///
    /// Backend failures yield an empty list. A zero `eoa` is an error.
    pub async fn fetch_existing_accounts(
        &self,
        eoa: Address,
        filter: Option<AccountFilter>,
    ) -> ApiResult<Vec<Account>> {
        require_address(eoa, "EOA (Externally Owned Account) is required")?;

        let result = self.try_fetch_existing_accounts(eoa, filter).await;
        recover(result, "fetching existing accounts", Vec::new)
    }

    async fn try_fetch_existing_accounts(
        &self,
        eoa: Address,
        filter: Option<AccountFilter>,
    ) -> ApiResult<Vec<Account>> {
        let path = routes::with_segments(routes::EXISTING_ACCOUNTS, &[&eoa]);
        let mut accounts = self
            .client
            .get::<DataEnvelope<Vec<Account>>>(routes::EXISTING_ACCOUNTS, &path)
            .await?
            .data
            .unwrap_or_default();

        if accounts.is_empty() {
            tracing::warn!(eoa = %eoa, "No accounts found");
            return Ok(accounts);
        }

        let Some(filter) = filter else {
            return Ok(accounts);
        };

        if let Some(chain_id) = filter.chain_id {
            accounts.retain(|account| account.chain_id == chain_id);
        }

        if !filter.needs_chain_state() {
            tracing::debug!(eoa = %eoa, count = accounts.len(), "No on-chain filtering required");
            return Ok(accounts);
        }

        let Some(reader) = self.state_reader.as_ref() else {
            return Err(ApiError::Failed(
                "No chain state reader configured for account filtering".to_string(),
            ));
        };

        let mut by_chain: BTreeMap<u64, Vec<Account>> = BTreeMap::new();
        for account in accounts {
            by_chain.entry(account.chain_id).or_default().push(account);
        }

        let mut filtered = Vec::new();
        for (chain_id, group) in by_chain {
            if !is_supported(chain_id) {
                tracing::warn!(chain_id, "Unsupported chain, skipping accounts");
                continue;
            }

            let states = join_all(
                group
                    .iter()
                    .map(|account| reader.safe_state(chain_id, account.console_address)),
            )
            .await;

            for (account, state) in group.into_iter().zip(states) {
                let state = match state {
                    Ok(state) => state,
                    Err(e) => {
                        tracing::error!(
                            account = %account.console_address,
                            chain_id,
                            error = %e,
                            "Failed to read account state, skipping"
                        );
                        continue;
                    }
                };

                let threshold_ok = filter.threshold.map_or(true, |t| state.threshold == t);
                let owners_ok = filter.owners_count.map_or(true, |n| state.owners.len() == n);
                if threshold_ok && owners_ok {
                    filtered.push(account);
                }
            }
        }

        Ok(filtered)
    }

    /// Calldata for a token transfer from `account`.
    pub async fn send(
        &self,
        chain_id: u64,
        account: Address,
        params: &SendParams,
    ) -> ApiResult<GenerateCalldataResponse> {
        self.generate_calldata(ActionId::Send, chain_id, account, params)
            .await
    }

    /// Calldata for a swap along a route from [`CoreActions::get_swap_routes`].
    pub async fn swap(
        &self,
        chain_id: u64,
        account: Address,
        params: &SwapParams,
    ) -> ApiResult<GenerateCalldataResponse> {
        self.generate_calldata(ActionId::Swap, chain_id, account, params)
            .await
    }

    /// Calldata for a bridge along a route from [`CoreActions::fetch_bridging_routes`].
    pub async fn bridge(
        &self,
        chain_id: u64,
        account: Address,
        params: &BridgeParams,
    ) -> ApiResult<GenerateCalldataResponse> {
        self.generate_calldata(ActionId::Bridging, chain_id, account, params)
            .await
    }

    async fn generate_calldata<P: Serialize>(
        &self,
        action: ActionId,
        chain_id: u64,
        account: Address,
        params: &P,
    ) -> ApiResult<GenerateCalldataResponse> {
        require_chain_id(chain_id, "Chain ID is required")?;
        require_address(account, "Account address is required")?;

        let payload = GeneratePayload::build(action, chain_id, account, params);
        self.client
            .post(routes::GENERATE_CALLDATA, routes::GENERATE_CALLDATA, &payload)
            .await
            .inspect_err(|e| tracing::error!(action = ?action, error = %e, "Error generating calldata"))
    }

    /// Swap quotes for an asset pair.
    ///
    /// Failures are reported in [`SwapRoutesResult::error`], preferring the
    /// backend's own message.
    pub async fn get_swap_routes(&self, query: &SwapRoutesQuery) -> ApiResult<SwapRoutesResult> {
        require_chain_id(query.chain_id, "Chain ID is required")?;
        require_address(query.owner_address, "Owner address is required")?;

        match self
            .client
            .get_with_query::<Vec<SwapQuoteRoute>, _>(routes::SWAP_ROUTES, routes::SWAP_ROUTES, query)
            .await
        {
            Ok(data) => Ok(SwapRoutesResult { data, error: None }),
            Err(e) => {
                tracing::error!(error = %e, "Error fetching swap routes");
                Ok(SwapRoutesResult {
                    data: Vec::new(),
                    error: Some(e.user_message()),
                })
            }
        }
    }

    /// Bridging routes between two chains. Empty on failure.
    pub async fn fetch_bridging_routes(
        &self,
        params: &GetBridgingRoutesParams,
    ) -> ApiResult<Vec<BridgeRoute>> {
        require_chain_id(params.chain_id_in, "Source chain ID is required")?;
        require_chain_id(params.chain_id_out, "Destination chain ID is required")?;

        let result = self
            .client
            .get_with_query::<Option<Vec<BridgeRoute>>, _>(
                routes::BRIDGING_ROUTES,
                routes::BRIDGING_ROUTES,
                params,
            )
            .await
            .map(Option::unwrap_or_default);

        recover(result, "fetching bridging routes", Vec::new)
    }

    /// Source and destination status of a bridging transaction. `None` on failure.
    pub async fn fetch_bridging_status(
        &self,
        tx_hash: &str,
        pid: u64,
        from_chain_id: u64,
        to_chain_id: u64,
    ) -> ApiResult<Option<GetBridgingStatus>> {
        require_id(tx_hash, "Transaction hash is required")?;

        let query = BridgingStatusQuery {
            pid,
            transaction_hash: tx_hash,
            from_chain_id,
            to_chain_id,
        };
        let result = self
            .client
            .get_with_query::<GetBridgingStatus, _>(
                routes::BRIDGING_STATUS,
                routes::BRIDGING_STATUS,
                &query,
            )
            .await
            .map(Some);

        recover(result, "fetching bridging status", || None)
    }

    /// Ask the indexer to process a transaction. Requires a 204 response.
    pub async fn index_transaction(&self, tx_hash: &str, chain_id: u64) -> ApiResult<()> {
        require_id(tx_hash, "Transaction hash is required")?;
        require_chain_id(chain_id, "Chain ID is required")?;

        let path = routes::with_segments(routes::INDEX_TRANSACTION, &[&tx_hash, &chain_id]);
        let result: ApiResult<()> = async {
            let (status, _) = self
                .client
                .post_raw::<()>(routes::INDEX_TRANSACTION, &path, None)
                .await?;
            expect_status(status, StatusCode::NO_CONTENT)
        }
        .await;

        match &result {
            Ok(()) => tracing::info!(tx_hash, chain_id, "Transaction indexed"),
            Err(e) => tracing::error!(tx_hash, chain_id, error = %e, "Error indexing transaction"),
        }
        result
    }

    /// `execTransaction` calldata running `transactions` on a 1-of-N Safe at
    /// `console`, pre-validated by `eoa`.
    pub fn new_safe_transaction_with_single_threshold(
        &self,
        eoa: Address,
        console: Address,
        chain_id: u64,
        transactions: &[CalldataTransaction],
    ) -> ApiResult<SafeTransaction> {
        require_address(eoa, "EOA (Externally Owned Account) is required")?;
        require_address(console, "Console address is required")?;
        if !is_supported(chain_id) {
            return Err(ApiError::Validation(format!(
                "Unsupported chain ID: {}",
                chain_id
            )));
        }
        encode_exec_transaction(eoa, console, transactions)
    }

    /// Poll the relayer until the task succeeds; resolves with the output
    /// transaction hash.
    pub async fn wait_for_transaction_to_relay(&self, task_id: &str) -> ApiResult<String> {
        self.relay_poller(task_id, Poller::new(self.poll_settings))
            .await
    }

    /// Like [`CoreActions::wait_for_transaction_to_relay`], but stops when
    /// `cancel` fires.
    pub async fn wait_for_transaction_to_relay_until(
        &self,
        task_id: &str,
        cancel: &CancelSignal,
    ) -> ApiResult<String> {
        if cancel.is_cancelled() {
            return Err(PollError::Cancelled.into());
        }
        let poller = Poller::new(self.poll_settings).with_cancellation(cancel.subscribe());
        self.relay_poller(task_id, poller).await
    }

    async fn relay_poller(&self, task_id: &str, poller: Poller) -> ApiResult<String> {
        require_id(task_id, "Task ID is required")?;

        let hash = poller
            .run(
                || {
                    let deployer = &self.deployer;
                    async move { deployer.fetch_deployment_status(task_id).await.map(Some) }
                },
                |status: &TaskStatusData| status.status == TaskStatus::Successful,
                |status: &TaskStatusData| {
                    status
                        .output_transaction_hash
                        .clone()
                        .filter(|hash| !hash.is_empty())
                },
            )
            .await?;

        tracing::info!(task_id, hash = %hash, "Transaction relayed");
        Ok(hash)
    }
}

impl std::fmt::Debug for CoreActions {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CoreActions")
            .field("base_url", &self.client.base_url())
            .field("state_reader", &self.state_reader.is_some())
            .field("poll_settings", &self.poll_settings)
            .finish()
    }
}
