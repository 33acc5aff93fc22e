//! Vendor API error taxonomy.

use thiserror::Error;

use crate::resilience::PollError;

#[derive(Debug, Error)]
pub enum ApiError {
    /// A required argument was missing or empty. Raised before any I/O.
    #[error("{0}")]
    Validation(String),

    #[error("HTTP request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// Non-2xx response.
    #[error("Request failed with status {status}: {}", message.as_deref().unwrap_or(body.as_str()))]
    Status {
        status: u16,
        /// `message` field of the error body, when present.
        message: Option<String>,
        body: String,
    },

    /// A 2xx response other than the one the endpoint contract requires.
    #[error("Expected status {expected}, got {actual}")]
    UnexpectedStatus { expected: u16, actual: u16 },

    #[error("{0}")]
    MissingData(String),

    #[error("Failed to decode response: {0}")]
    Decode(#[from] serde_json::Error),

    /// Operation failed; the message is fixed per operation.
    #[error("{0}")]
    Failed(String),

    #[error(transparent)]
    Poll(#[from] PollError),
}

impl ApiError {
    /// Message suitable for surfacing to a caller: the backend's own
    /// `message` when it sent one, otherwise this error's display text.
    pub fn user_message(&self) -> String {
        match self {
            ApiError::Status {
                message: Some(message),
                ..
            } => message.clone(),
            other => other.to_string(),
        }
    }

    pub fn is_validation(&self) -> bool {
        matches!(self, ApiError::Validation(_))
    }
}

pub type ApiResult<T> = Result<T, ApiError>;

/// Recover from every failure except invalid input, logging the error where
/// it is caught.
pub fn recover<T>(result: ApiResult<T>, context: &str, fallback: impl FnOnce() -> T) -> ApiResult<T> {
    match result {
        Ok(value) => Ok(value),
        Err(e) if e.is_validation() => Err(e),
        Err(e) => {
            tracing::error!(error = %e, "Error {}", context);
            Ok(fallback())
        }
    }
}
