//! Messaging types and error definitions.

use std::sync::atomic::{AtomicU64, Ordering};

use serde_json::Value;
use thiserror::Error;

/// Identity of a messaging context (the parent host, or any other peer that
/// can deliver messages to the same inbound queue).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ContextId(pub u64);

static NEXT_CONTEXT_ID: AtomicU64 = AtomicU64::new(1);

impl ContextId {
    /// Allocate a process-unique context id.
    pub fn next() -> Self {
        Self(NEXT_CONTEXT_ID.fetch_add(1, Ordering::Relaxed))
    }
}

impl std::fmt::Display for ContextId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "ctx-{}", self.0)
    }
}

/// A message delivered by a transport, before any validation.
#[derive(Debug, Clone)]
pub struct InboundMessage {
    /// Context that sent the message.
    pub source: ContextId,
    /// Human-readable origin of the sender, used for diagnostics only.
    pub origin: String,
    /// Message payload. `None` for empty deliveries.
    pub data: Option<Value>,
}

impl InboundMessage {
    pub fn new(source: ContextId, origin: impl Into<String>, data: Option<Value>) -> Self {
        Self {
            source,
            origin: origin.into(),
            data,
        }
    }

    /// True when the payload is absent or JSON null.
    pub fn is_empty(&self) -> bool {
        matches!(self.data, None | Some(Value::Null))
    }
}

/// Errors that can occur during message-based calls.
#[derive(Debug, Error)]
pub enum MessagingError {
    /// No counterpart context exists to send to.
    #[error("Transport unavailable: {0}")]
    TransportUnavailable(String),

    /// The counterpart answered with `success: false`.
    #[error("{0}")]
    Remote(String),

    /// Request params could not be serialized.
    #[error("Failed to serialize request: {0}")]
    Serialize(#[source] serde_json::Error),

    /// Response data did not match the expected type.
    #[error("Failed to decode response data: {0}")]
    Decode(#[source] serde_json::Error),

    /// The communicator was disposed before a response arrived.
    #[error("Communicator disposed before a response arrived")]
    Disposed,

    /// No response arrived within the configured timeout.
    #[error("No response for request {id} within {timeout_ms} ms")]
    Timeout { id: String, timeout_ms: u64 },

    /// Input rejected before anything was sent.
    #[error("{0}")]
    Validation(String),
}

/// Result type for message-based calls.
pub type MessagingResult<T> = Result<T, MessagingError>;

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_context_ids_are_unique() {
        let a = ContextId::next();
        let b = ContextId::next();
        assert_ne!(a, b);
    }

    #[test]
    fn test_empty_message() {
        let ctx = ContextId::next();
        assert!(InboundMessage::new(ctx, "test", None).is_empty());
        assert!(InboundMessage::new(ctx, "test", Some(Value::Null)).is_empty());
        assert!(!InboundMessage::new(ctx, "test", Some(json!({"id": "x"}))).is_empty());
    }

    #[test]
    fn test_remote_error_is_verbatim() {
        let err = MessagingError::Remote("User rejected".to_string());
        assert_eq!(err.to_string(), "User rejected");
    }
}
