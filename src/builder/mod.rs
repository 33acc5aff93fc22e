//! Calls answered by the parent context rather than the vendor API.

pub mod types;

use serde::de::IgnoredAny;

use crate::messaging::{Communicator, MessagingError, MessagingResult, Method};

pub use types::{
    AddAutomationParams, Asset, BuilderParams, BuilderTransaction, CancelAutomationParams,
    UserClientFactory,
};
use types::AddToTxnBuilderParams;

/// Asks the parent to queue transactions or manage automations.
#[derive(Debug, Clone)]
pub struct BuilderCaller {
    communicator: Communicator,
}

impl BuilderCaller {
    pub fn new(communicator: Communicator) -> Self {
        Self { communicator }
    }

    /// Queue `params.transactions` in the parent's transaction builder.
    pub async fn add_to_txn_builder(
        &self,
        params: &BuilderParams,
        automation_name: &str,
    ) -> MessagingResult<()> {
        if params.transactions.is_empty() {
            return Err(MessagingError::Validation(
                "No transactions were passed".to_string(),
            ));
        }

        let payload = AddToTxnBuilderParams {
            params,
            automation_name,
        };
        self.call(Method::AddToTxnBuilder, payload).await
    }

    pub async fn add_automation(&self, params: &AddAutomationParams) -> MessagingResult<()> {
        self.call(Method::AddAutomation, params).await
    }

    pub async fn cancel_automation(&self, params: &CancelAutomationParams) -> MessagingResult<()> {
        self.call(Method::CancelAutomation, params).await
    }

    async fn call<P: serde::Serialize>(&self, method: Method, params: P) -> MessagingResult<()> {
        let pending = self.communicator.send::<_, IgnoredAny>(method, params)?;
        let request_id = pending.id().to_string();
        pending.await.map(|_| ()).inspect_err(|e| {
            tracing::error!(method = ?method, request_id = %request_id, error = %e, "Parent call failed")
        })
    }
}
