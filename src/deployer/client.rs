//! Public strategy deployment endpoints.

use alloy::primitives::Address;

use crate::api::client::{require_address, require_chain_id, require_id};
use crate::api::{recover, routes, ApiResult, DataEnvelope, VendorClient};
use crate::deployer::types::{
    DeployRequest, DeployResponse, DeploymentParams, GenerateSubAccountParams,
    PreComputedAddressData, PrecomputeRequest, PrecomputeResponse, TaskStatusData,
    TransferCalldataResponse,
};

/// Client for the deployer and relayer endpoints.
///
/// Every call except [`PublicDeployer::fetch_deployment_status`] returns
/// `Ok(None)` on backend failure.
#[derive(Debug, Clone)]
pub struct PublicDeployer {
    client: VendorClient,
}

impl PublicDeployer {
    pub fn new(client: VendorClient) -> Self {
        Self { client }
    }

    /// Precomputed console address and deployment fee estimate for an owner.
    pub async fn fetch_precompute_address(
        &self,
        owner: Address,
        chain_id: u64,
        fee_token: Address,
    ) -> ApiResult<Option<PreComputedAddressData>> {
        require_address(owner, "Owner address is required")?;
        require_chain_id(chain_id, "Chain ID is required")?;

        let request = PrecomputeRequest {
            owner,
            chain_id,
            fee_token,
        };
        let result = self
            .client
            .post::<_, DataEnvelope<PreComputedAddressData>>(
                routes::PRECOMPUTE_ADDRESS,
                routes::PRECOMPUTE_ADDRESS,
                &request,
            )
            .await
            .map(|env| env.data);

        recover(result, "fetching precompute address", || None)
    }

    /// Funding calldata and policy commit for a new automation sub-account.
    pub async fn generate_automation_sub_account(
        &self,
        params: &GenerateSubAccountParams,
    ) -> ApiResult<Option<TransferCalldataResponse>> {
        require_address(params.owner, "Owner address is required")?;
        require_chain_id(params.chain_id, "Chain ID is required")?;
        require_id(&params.registry_id, "Registry ID is required")?;

        let result = self
            .client
            .post::<_, DataEnvelope<TransferCalldataResponse>>(
                routes::DEPLOYER_SIGNATURE,
                routes::DEPLOYER_SIGNATURE,
                params,
            )
            .await
            .map(|env| env.data);

        recover(result, "generating automation sub-account", || None)
    }

    /// Console and sub-account addresses a deployment would produce.
    pub async fn compute_deployment_addresses(
        &self,
        params: &DeploymentParams,
    ) -> ApiResult<Option<PrecomputeResponse>> {
        self.deploy(params, Some(true), "computing deployment addresses")
            .await
    }

    /// Submit the account and sub-account deployment to the relayer.
    pub async fn deploy_account(&self, params: &DeploymentParams) -> ApiResult<Option<DeployResponse>> {
        self.deploy(params, None, "deploying account and sub-account")
            .await
    }

    async fn deploy<T: serde::de::DeserializeOwned>(
        &self,
        params: &DeploymentParams,
        pre_compute_addresses: Option<bool>,
        context: &str,
    ) -> ApiResult<Option<T>> {
        require_address(params.owner, "Owner address is required")?;
        require_chain_id(params.chain_id, "Chain ID is required")?;
        require_id(&params.registry_id, "Registry ID is required")?;

        let request = DeployRequest {
            params,
            pre_compute_addresses,
        };
        let result = self
            .client
            .post::<_, DataEnvelope<T>>(
                routes::DEPLOY_PUBLIC_STRATEGY,
                routes::DEPLOY_PUBLIC_STRATEGY,
                &request,
            )
            .await
            .map(|env| env.data);

        recover(result, context, || None)
    }

    /// Relayer status of a deployment task.
    pub async fn fetch_deployment_status(&self, task_id: &str) -> ApiResult<TaskStatusData> {
        require_id(task_id, "Task ID is required")?;

        let path = routes::with_segments(routes::RELAYER_TASK_STATUS, &[&task_id]);
        let result: ApiResult<TaskStatusData> = async {
            self.client
                .get::<DataEnvelope<TaskStatusData>>(routes::RELAYER_TASK_STATUS, &path)
                .await?
                .require("Task status not found")
        }
        .await;

        if let Err(e) = &result {
            tracing::error!(task_id, error = %e, "Error fetching task status");
        }
        result
    }
}
