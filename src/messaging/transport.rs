//! Transports carrying request envelopes to the parent context.
//!
//! A transport only sends. Inbound messages arrive separately, on an
//! `mpsc` channel of [`InboundMessage`] that the communicator drains.

use serde_json::Value;
use tokio::sync::mpsc;

use crate::messaging::envelope::RequestEnvelope;
use crate::messaging::types::{ContextId, InboundMessage, MessagingError, MessagingResult};

/// Outbound half of a messaging channel.
pub trait Transport: Send + Sync {
    /// The single context this transport talks to, or `None` when there is
    /// no counterpart (e.g. the kit runs outside any embedding host).
    fn counterpart(&self) -> Option<ContextId>;

    /// Deliver a request to the counterpart. Must not block.
    fn post(&self, request: &RequestEnvelope<Value>) -> MessagingResult<()>;
}

/// Transport for a kit that has no parent context. Every send fails fast.
#[derive(Debug, Default, Clone, Copy)]
pub struct DetachedTransport;

impl Transport for DetachedTransport {
    fn counterpart(&self) -> Option<ContextId> {
        None
    }

    fn post(&self, _request: &RequestEnvelope<Value>) -> MessagingResult<()> {
        Err(MessagingError::TransportUnavailable(
            "no parent context to send to".to_string(),
        ))
    }
}

/// In-process transport backed by tokio channels.
///
/// Requests are pushed to the parent's receiver; the parent answers through
/// the [`ParentHandle`] returned alongside the transport.
#[derive(Debug, Clone)]
pub struct ChannelTransport {
    parent: ContextId,
    outbound: mpsc::UnboundedSender<RequestEnvelope<Value>>,
}

/// The parent side of a [`ChannelTransport`].
#[derive(Debug)]
pub struct ParentHandle {
    /// Identity the communicator accepts messages from.
    pub id: ContextId,
    /// Requests sent by the communicator.
    pub requests: mpsc::UnboundedReceiver<RequestEnvelope<Value>>,
    /// Sender for messages into the communicator's inbound queue.
    pub inbound: mpsc::UnboundedSender<InboundMessage>,
}

impl ParentHandle {
    /// Send a payload as the parent context.
    pub fn reply(&self, data: Value) -> bool {
        self.inbound
            .send(InboundMessage::new(self.id, "parent", Some(data)))
            .is_ok()
    }
}

impl ChannelTransport {
    /// Create a transport, the parent handle, and the communicator's inbound
    /// receiver.
    pub fn pair() -> (Self, ParentHandle, mpsc::UnboundedReceiver<InboundMessage>) {
        let parent = ContextId::next();
        let (req_tx, req_rx) = mpsc::unbounded_channel();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        let transport = Self {
            parent,
            outbound: req_tx,
        };
        let handle = ParentHandle {
            id: parent,
            requests: req_rx,
            inbound: in_tx,
        };
        (transport, handle, in_rx)
    }
}

impl Transport for ChannelTransport {
    fn counterpart(&self) -> Option<ContextId> {
        if self.outbound.is_closed() {
            None
        } else {
            Some(self.parent)
        }
    }

    fn post(&self, request: &RequestEnvelope<Value>) -> MessagingResult<()> {
        self.outbound.send(request.clone()).map_err(|_| {
            MessagingError::TransportUnavailable("parent context has gone away".to_string())
        })
    }
}
