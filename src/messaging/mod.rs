//! Correlated request/response messaging with a parent context.
//!
//! # Responsibilities
//! - Wrap method calls in versioned request envelopes
//! - Match responses to calls by correlation id
//! - Carry envelopes over a pluggable [`Transport`]
//!
//! # Data Flow
//! ```text
//! caller ──send()──→ Communicator ──RequestEnvelope──→ Transport ──→ parent
//!   ↑                     │
//!   └── PendingResponse ←─┴── handle_message() ←── InboundMessage ←── parent
//! ```

pub mod correlator;
pub mod envelope;
pub mod request_id;
pub mod transport;
pub mod types;
pub mod websocket;

pub use correlator::{Communicator, PendingResponse};
pub use envelope::{Method, RequestEnvelope, Response, SDK_VERSION};
pub use request_id::generate_request_id;
pub use transport::{ChannelTransport, DetachedTransport, ParentHandle, Transport};
pub use types::{ContextId, InboundMessage, MessagingError, MessagingResult};
pub use websocket::WebSocketTransport;
