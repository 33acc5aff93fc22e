//! Kit facade.
//!
//! # Responsibilities
//! - Validate configuration once, up front
//! - Build one vendor client and share it across the API wrappers
//! - Own the communicator and its lifetime
//!
//! # Data Flow
//! ```text
//! KitConfig ──validate──→ VendorClient ──┬──→ CoreActions (+ RpcAccountStateReader)
//!                                        ├──→ AutomationContext
//!                                        └──→ PublicDeployer
//! parent_url ──→ WebSocketTransport | DetachedTransport ──→ Communicator ──→ BuilderCaller
//! ```

use std::sync::Arc;

use crate::api::VendorClient;
use crate::automation::AutomationContext;
use crate::blockchain::RpcAccountStateReader;
use crate::builder::{BuilderCaller, UserClientFactory};
use crate::config::{validate_config, ConfigError, KitConfig};
use crate::core_actions::CoreActions;
use crate::deployer::PublicDeployer;
use crate::error::KitResult;
use crate::messaging::{Communicator, DetachedTransport, MessagingResult, Method, WebSocketTransport};
use crate::resilience::PollSettings;

/// Entry point bundling every client the kit offers.
#[derive(Debug)]
pub struct ConsoleKit {
    communicator: Communicator,
    pub automation_context: AutomationContext,
    pub builder_caller: BuilderCaller,
    pub public_deployer: PublicDeployer,
    pub core_actions: CoreActions,
}

impl ConsoleKit {
    /// Build a kit over an existing communicator.
    pub fn new(config: &KitConfig, communicator: Communicator) -> KitResult<Self> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let client = VendorClient::new(&config.api)?;
        let state_reader = RpcAccountStateReader::new(&config.chains)?;
        let communicator = communicator.with_response_timeout(config.messaging.response_timeout());

        let public_deployer = PublicDeployer::new(client.clone());
        let core_actions = CoreActions::new(
            client.clone(),
            public_deployer.clone(),
            PollSettings::from(&config.polling),
        )
        .with_state_reader(Arc::new(state_reader));

        tracing::info!(
            base_url = %client.base_url(),
            parent = config.messaging.parent_url.as_deref().unwrap_or("detached"),
            "Console kit ready"
        );

        Ok(Self {
            automation_context: AutomationContext::new(client),
            builder_caller: BuilderCaller::new(communicator.clone()),
            public_deployer,
            core_actions,
            communicator,
        })
    }

    /// Build a kit, connecting to `messaging.parent_url` when one is set.
    ///
    /// Without a parent URL the kit is detached: HTTP wrappers work and
    /// message-based calls fail with `TransportUnavailable`.
    pub async fn from_config(config: &KitConfig) -> KitResult<Self> {
        validate_config(config).map_err(ConfigError::Validation)?;

        let communicator = match &config.messaging.parent_url {
            Some(url) => {
                let (transport, inbound) = WebSocketTransport::connect(url).await?;
                Communicator::spawn(Arc::new(transport), inbound)
            }
            None => Communicator::new(Arc::new(DetachedTransport)),
        };

        Self::new(config, communicator)
    }

    /// The user's account, chain and assets as known to the parent.
    pub async fn get_client_factory(&self) -> MessagingResult<UserClientFactory> {
        self.communicator
            .send::<_, UserClientFactory>(Method::GetClientFactory, ())?
            .await
    }

    pub fn communicator(&self) -> &Communicator {
        &self.communicator
    }

    /// Reject in-flight parent calls and stop listening.
    pub fn dispose(&self) {
        self.communicator.dispose();
    }
}
