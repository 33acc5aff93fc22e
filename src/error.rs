//! Top-level error for the kit facade.

use thiserror::Error;

use crate::api::ApiError;
use crate::blockchain::ChainError;
use crate::config::ConfigError;
use crate::messaging::MessagingError;
use crate::resilience::PollError;

#[derive(Debug, Error)]
pub enum KitError {
    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Api(#[from] ApiError),

    #[error(transparent)]
    Messaging(#[from] MessagingError),

    #[error("chain error: {0}")]
    Chain(#[from] ChainError),

    #[error(transparent)]
    Poll(#[from] PollError),
}

pub type KitResult<T> = Result<T, KitError>;
