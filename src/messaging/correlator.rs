//! Request/response correlation over an untyped message transport.
//!
//! # Responsibilities
//! - Assign each outbound call a correlation id and register it before sending
//! - Accept inbound messages only from the transport's counterpart
//! - Resolve or reject each pending call exactly once
//!
//! # Design Decisions
//! - The id → responder table is a `DashMap`, so one communicator can be
//!   shared across worker threads
//! - A pending entry is removed before its responder fires; a second message
//!   with the same id finds nothing
//! - No timeout unless the caller asks for one
//! - When the inbound channel closes, pending calls are rejected with
//!   [`MessagingError::TransportUnavailable`]

use std::future::{Future, IntoFuture};
use std::marker::PhantomData;
use std::pin::Pin;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, PoisonError, Weak};
use std::time::Duration;

use dashmap::mapref::entry::Entry;
use dashmap::DashMap;
use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::Value;
use tokio::sync::{mpsc, oneshot};
use tokio::task::JoinHandle;

use crate::messaging::envelope::{Method, RequestEnvelope, Response};
use crate::messaging::request_id::generate_request_id;
use crate::messaging::transport::Transport;
use crate::messaging::types::{InboundMessage, MessagingError, MessagingResult};
use crate::observability::metrics;

struct Inner {
    transport: Arc<dyn Transport>,
    pending: DashMap<String, oneshot::Sender<Response>>,
    listener: Mutex<Option<JoinHandle<()>>>,
    disposed: AtomicBool,
    inbound_closed: AtomicBool,
}

impl Inner {
    /// Stop accepting calls and reject everything still pending.
    fn close_inbound(&self) {
        self.inbound_closed.store(true, Ordering::SeqCst);
        let rejected = self.pending.len();
        self.pending.clear();
        metrics::record_pending_requests(0);
        if rejected > 0 {
            tracing::warn!(rejected, "Parent connection closed with requests in flight");
        }
    }

    /// Error for a call whose responder was dropped without an answer.
    fn abandoned(&self) -> MessagingError {
        if self.disposed.load(Ordering::SeqCst) {
            MessagingError::Disposed
        } else {
            MessagingError::TransportUnavailable(
                "parent connection closed before responding".to_string(),
            )
        }
    }

    fn closed(&self) -> Option<MessagingError> {
        if self.disposed.load(Ordering::SeqCst) {
            Some(MessagingError::Disposed)
        } else if self.inbound_closed.load(Ordering::SeqCst) {
            Some(MessagingError::TransportUnavailable(
                "parent connection closed".to_string(),
            ))
        } else {
            None
        }
    }

    fn handle(&self, msg: InboundMessage) -> bool {
        if msg.is_empty() || self.transport.counterpart() != Some(msg.source) {
            tracing::info!(
                origin = %msg.origin,
                source = %msg.source,
                "A message was received from an unknown origin"
            );
            metrics::record_inbound_message("rejected");
            return false;
        }

        tracing::info!(origin = %msg.origin, data = ?msg.data, "A message was received");

        let data = msg.data.unwrap_or_default();
        let Some(id) = data.get("id").and_then(Value::as_str).map(str::to_owned) else {
            tracing::debug!("Inbound message has no correlation id");
            metrics::record_inbound_message("malformed");
            return false;
        };

        let Some((_, responder)) = self.pending.remove(&id) else {
            tracing::debug!(id = %id, "No pending request for inbound message");
            metrics::record_inbound_message("unmatched");
            return false;
        };
        metrics::record_pending_requests(self.pending.len());

        let response = serde_json::from_value::<Response>(data).unwrap_or_else(|e| {
            tracing::warn!(id = %id, error = %e, "Malformed response envelope");
            Response::Error {
                id: id.clone(),
                error: format!("Malformed response: {}", e),
                version: None,
            }
        });

        if responder.send(response).is_err() {
            tracing::debug!(id = %id, "Caller stopped waiting for response");
        }
        metrics::record_inbound_message("matched");
        true
    }
}

impl Drop for Inner {
    fn drop(&mut self) {
        if let Some(handle) = self
            .listener
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }
    }
}

/// Client side of the parent-context messaging protocol.
///
/// Cheap to clone; clones share one correlation table.
#[derive(Clone)]
pub struct Communicator {
    inner: Arc<Inner>,
    response_timeout: Option<Duration>,
}

impl Communicator {
    /// Create a communicator over a transport. Inbound messages must be fed
    /// through [`Communicator::handle_message`] or [`Communicator::listen`].
    pub fn new(transport: Arc<dyn Transport>) -> Self {
        Self {
            inner: Arc::new(Inner {
                transport,
                pending: DashMap::new(),
                listener: Mutex::new(None),
                disposed: AtomicBool::new(false),
                inbound_closed: AtomicBool::new(false),
            }),
            response_timeout: None,
        }
    }

    /// Create a communicator and start draining `inbound` on a tokio task.
    pub fn spawn(
        transport: Arc<dyn Transport>,
        inbound: mpsc::UnboundedReceiver<InboundMessage>,
    ) -> Self {
        let communicator = Self::new(transport);
        communicator.listen(inbound);
        communicator
    }

    /// Apply a default timeout to every call made through this handle.
    pub fn with_response_timeout(mut self, timeout: Option<Duration>) -> Self {
        self.response_timeout = timeout;
        self
    }

    /// Start the listener task, replacing any previous one.
    ///
    /// Once `inbound` closes, pending and later calls fail with
    /// [`MessagingError::TransportUnavailable`].
    pub fn listen(&self, mut inbound: mpsc::UnboundedReceiver<InboundMessage>) {
        let weak: Weak<Inner> = Arc::downgrade(&self.inner);
        let handle = tokio::spawn(async move {
            while let Some(msg) = inbound.recv().await {
                let Some(inner) = weak.upgrade() else { break };
                inner.handle(msg);
            }
            tracing::debug!("Inbound message channel closed");
            if let Some(inner) = weak.upgrade() {
                inner.close_inbound();
            }
        });

        let previous = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .replace(handle);
        if let Some(previous) = previous {
            previous.abort();
        }
    }

    /// Send a method call to the counterpart.
    ///
    /// The response slot is registered before the request is posted, so a
    /// reply delivered immediately afterwards is never missed.
    pub fn send<P, R>(&self, method: Method, params: P) -> MessagingResult<PendingResponse<R>>
    where
        P: Serialize,
        R: DeserializeOwned,
    {
        if let Some(err) = self.inner.closed() {
            return Err(err);
        }
        if self.inner.transport.counterpart().is_none() {
            return Err(MessagingError::TransportUnavailable(
                "no parent context to send to".to_string(),
            ));
        }

        let params = serde_json::to_value(params).map_err(MessagingError::Serialize)?;

        let (id, receiver) = loop {
            let id = generate_request_id();
            if let Entry::Vacant(slot) = self.inner.pending.entry(id.clone()) {
                let (responder, receiver) = oneshot::channel();
                slot.insert(responder);
                break (id, receiver);
            }
        };

        // dispose() or a closed connection may have drained the table
        // between the check above and the insert
        if let Some(err) = self.inner.closed() {
            self.inner.pending.remove(&id);
            return Err(err);
        }

        let request = RequestEnvelope::with_id(id.clone(), method, params);
        if let Err(e) = self.inner.transport.post(&request) {
            self.inner.pending.remove(&id);
            tracing::error!(id = %id, method = ?method, error = %e, "Failed to post request");
            return Err(e);
        }

        metrics::record_pending_requests(self.inner.pending.len());
        tracing::debug!(id = %id, method = ?method, "Request sent to parent context");

        Ok(PendingResponse {
            id,
            receiver,
            inner: self.inner.clone(),
            timeout: self.response_timeout,
            _marker: PhantomData,
        })
    }

    /// Process one inbound message. Returns true if it completed a pending call.
    pub fn handle_message(&self, msg: InboundMessage) -> bool {
        self.inner.handle(msg)
    }

    /// Number of calls still awaiting a response.
    pub fn pending_count(&self) -> usize {
        self.inner.pending.len()
    }

    pub fn is_disposed(&self) -> bool {
        self.inner.disposed.load(Ordering::SeqCst)
    }

    /// Stop listening and reject every pending call with
    /// [`MessagingError::Disposed`]. Later sends fail with the same error.
    pub fn dispose(&self) {
        if self.inner.disposed.swap(true, Ordering::SeqCst) {
            return;
        }

        if let Some(handle) = self
            .inner
            .listener
            .lock()
            .unwrap_or_else(PoisonError::into_inner)
            .take()
        {
            handle.abort();
        }

        let rejected = self.inner.pending.len();
        self.inner.pending.clear();
        metrics::record_pending_requests(0);
        tracing::info!(rejected, "Communicator disposed");
    }
}

impl std::fmt::Debug for Communicator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Communicator")
            .field("pending", &self.inner.pending.len())
            .field("disposed", &self.is_disposed())
            .field("response_timeout", &self.response_timeout)
            .finish()
    }
}

/// A call awaiting its response. Await it directly or via [`PendingResponse::wait`].
pub struct PendingResponse<R> {
    id: String,
    receiver: oneshot::Receiver<Response>,
    inner: Arc<Inner>,
    timeout: Option<Duration>,
    _marker: PhantomData<fn() -> R>,
}

impl<R: DeserializeOwned> PendingResponse<R> {
    /// Correlation id of the request.
    pub fn id(&self) -> &str {
        &self.id
    }

    /// Give up after `timeout`, removing the pending entry.
    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = Some(timeout);
        self
    }

    /// Wait for the response and decode its data.
    pub async fn wait(self) -> MessagingResult<R> {
        let Self {
            id,
            receiver,
            inner,
            timeout,
            ..
        } = self;

        let response = match timeout {
            None => receiver.await.map_err(|_| inner.abandoned())?,
            Some(limit) => match tokio::time::timeout(limit, receiver).await {
                Ok(result) => result.map_err(|_| inner.abandoned())?,
                Err(_) => {
                    inner.pending.remove(&id);
                    metrics::record_pending_requests(inner.pending.len());
                    tracing::warn!(id = %id, "Timed out waiting for response");
                    return Err(MessagingError::Timeout {
                        id,
                        timeout_ms: limit.as_millis() as u64,
                    });
                }
            },
        };

        match response {
            Response::Error { error, .. } => Err(MessagingError::Remote(error)),
            Response::Success { data, .. } => {
                serde_json::from_value(data).map_err(MessagingError::Decode)
            }
        }
    }
}

impl<R> IntoFuture for PendingResponse<R>
where
    R: DeserializeOwned + Send + 'static,
{
    type Output = MessagingResult<R>;
    type IntoFuture = Pin<Box<dyn Future<Output = Self::Output> + Send>>;

    fn into_future(self) -> Self::IntoFuture {
        Box::pin(self.wait())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::messaging::transport::{ChannelTransport, DetachedTransport, ParentHandle};
    use crate::messaging::types::ContextId;
    use serde_json::json;

    fn setup() -> (Communicator, ParentHandle) {
        let (transport, parent, _inbound) = ChannelTransport::pair();
        (Communicator::new(Arc::new(transport)), parent)
    }

    fn from(parent: &ParentHandle, data: Value) -> InboundMessage {
        InboundMessage::new(parent.id, "https://parent.example", Some(data))
    }

    #[tokio::test]
    async fn test_same_tick_response_resolves() {
        let (comm, parent) = setup();

        let pending = comm
            .send::<_, Value>(Method::GetClientFactory, ())
            .unwrap();
        let id = pending.id().to_string();
        assert!(comm.handle_message(from(&parent, json!({"id": id, "success": true, "data": {"foo": 1}}))));

        assert_eq!(pending.await.unwrap(), json!({"foo": 1}));
        assert_eq!(comm.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_error_response_rejects_verbatim() {
        let (comm, parent) = setup();

        let pending = comm.send::<_, ()>(Method::AddAutomation, json!({})).unwrap();
        let id = pending.id().to_string();
        comm.handle_message(from(
            &parent,
            json!({"id": id, "success": false, "error": "User rejected the request"}),
        ));

        let err = pending.await.unwrap_err();
        assert!(matches!(err, MessagingError::Remote(ref m) if m == "User rejected the request"));
    }

    #[tokio::test]
    async fn test_not_resolved_before_delivery() {
        let (comm, parent) = setup();

        let pending = comm.send::<_, Value>(Method::GetClientFactory, ()).unwrap();
        let id = pending.id().to_string();
        let task = tokio::spawn(pending.into_future());

        tokio::task::yield_now().await;
        assert!(!task.is_finished());

        comm.handle_message(from(&parent, json!({"id": id, "success": true, "data": 7})));
        assert_eq!(task.await.unwrap().unwrap(), json!(7));
    }

    #[tokio::test]
    async fn test_unknown_source_is_ignored() {
        let (comm, parent) = setup();

        let pending = comm.send::<_, Value>(Method::GetClientFactory, ()).unwrap();
        let id = pending.id().to_string();

        let stranger = InboundMessage::new(
            ContextId::next(),
            "https://evil.example",
            Some(json!({"id": id, "success": true, "data": "spoofed"})),
        );
        assert!(!comm.handle_message(stranger));
        assert_eq!(comm.pending_count(), 1);

        comm.handle_message(from(&parent, json!({"id": id, "success": true, "data": "real"})));
        assert_eq!(pending.await.unwrap(), json!("real"));
    }

    #[tokio::test]
    async fn test_empty_message_is_ignored() {
        let (comm, parent) = setup();
        let _pending = comm.send::<_, Value>(Method::GetClientFactory, ()).unwrap();

        assert!(!comm.handle_message(InboundMessage::new(parent.id, "parent", None)));
        assert!(!comm.handle_message(InboundMessage::new(parent.id, "parent", Some(Value::Null))));
        assert_eq!(comm.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_duplicate_response_is_noop() {
        let (comm, parent) = setup();

        let pending = comm.send::<_, Value>(Method::GetClientFactory, ()).unwrap();
        let id = pending.id().to_string();

        assert!(comm.handle_message(from(&parent, json!({"id": id, "success": true, "data": 1}))));
        assert!(!comm.handle_message(from(&parent, json!({"id": id, "success": false, "error": "late"}))));

        assert_eq!(pending.await.unwrap(), json!(1));
    }

    #[tokio::test]
    async fn test_unknown_id_is_dropped() {
        let (comm, parent) = setup();
        let _pending = comm.send::<_, Value>(Method::GetClientFactory, ()).unwrap();

        assert!(!comm.handle_message(from(&parent, json!({"id": "ffffffffff", "success": true, "data": 1}))));
        assert_eq!(comm.pending_count(), 1);
    }

    #[tokio::test]
    async fn test_out_of_order_responses() {
        let (comm, parent) = setup();

        let first = comm.send::<_, u32>(Method::AddToTxnBuilder, json!({"n": 1})).unwrap();
        let second = comm.send::<_, u32>(Method::AddToTxnBuilder, json!({"n": 2})).unwrap();
        assert_ne!(first.id(), second.id());
        assert_eq!(comm.pending_count(), 2);

        comm.handle_message(from(&parent, json!({"id": second.id(), "success": true, "data": 2})));
        comm.handle_message(from(&parent, json!({"id": first.id(), "success": true, "data": 1})));

        assert_eq!(first.await.unwrap(), 1);
        assert_eq!(second.await.unwrap(), 2);
    }

    #[test]
    fn test_detached_fails_fast_without_registering() {
        let comm = Communicator::new(Arc::new(DetachedTransport));
        let result = comm.send::<_, Value>(Method::GetClientFactory, ());
        assert!(matches!(result, Err(MessagingError::TransportUnavailable(_))));
        assert_eq!(comm.pending_count(), 0);
    }

    #[tokio::test]
    async fn test_decode_error() {
        let (comm, parent) = setup();

        let pending = comm.send::<_, u64>(Method::GetClientFactory, ()).unwrap();
        let id = pending.id().to_string();
        comm.handle_message(from(&parent, json!({"id": id, "success": true, "data": "not a number"})));

        assert!(matches!(pending.await, Err(MessagingError::Decode(_))));
    }

    #[tokio::test]
    async fn test_dispose_rejects_pending() {
        let (comm, _parent) = setup();

        let a = comm.send::<_, Value>(Method::GetClientFactory, ()).unwrap();
        let b = comm.send::<_, Value>(Method::AddAutomation, ()).unwrap();

        comm.dispose();
        assert_eq!(comm.pending_count(), 0);
        assert!(matches!(a.await, Err(MessagingError::Disposed)));
        assert!(matches!(b.await, Err(MessagingError::Disposed)));

        let after = comm.send::<_, Value>(Method::GetClientFactory, ());
        assert!(matches!(after, Err(MessagingError::Disposed)));
    }

    #[tokio::test(start_paused = true)]
    async fn test_timeout_removes_entry() {
        let (comm, parent) = setup();

        let pending = comm
            .send::<_, Value>(Method::GetClientFactory, ())
            .unwrap()
            .with_timeout(Duration::from_millis(500));
        let id = pending.id().to_string();

        let err = pending.await.unwrap_err();
        assert!(matches!(err, MessagingError::Timeout { timeout_ms: 500, .. }));
        assert_eq!(comm.pending_count(), 0);

        // A late response is now unmatched.
        assert!(!comm.handle_message(from(&parent, json!({"id": id, "success": true, "data": 1}))));
    }

    #[tokio::test]
    async fn test_listener_round_trip() {
        let (transport, mut parent, inbound) = ChannelTransport::pair();
        let comm = Communicator::spawn(Arc::new(transport), inbound);

        tokio::spawn(async move {
            while let Some(request) = parent.requests.recv().await {
                let reply = json!({"id": request.id, "success": true, "data": request.params});
                parent.reply(reply);
            }
        });

        let echoed: Value = comm
            .send(Method::AddToTxnBuilder, json!({"echo": true}))
            .unwrap()
            .await
            .unwrap();
        assert_eq!(echoed, json!({"echo": true}));
    }

    #[tokio::test]
    async fn test_closed_inbound_rejects_pending() {
        let (transport, parent, inbound) = ChannelTransport::pair();
        let comm = Communicator::spawn(Arc::new(transport), inbound);

        let pending = comm.send::<_, Value>(Method::GetClientFactory, ()).unwrap();
        drop(parent.inbound);

        let err = pending.await.unwrap_err();
        assert!(matches!(err, MessagingError::TransportUnavailable(_)));
        assert_eq!(comm.pending_count(), 0);
        assert!(!comm.is_disposed());
    }

    #[tokio::test]
    async fn test_posting_failure_unregisters() {
        let (transport, parent, _inbound) = ChannelTransport::pair();
        let comm = Communicator::new(Arc::new(transport));
        drop(parent);

        assert!(comm.send::<_, Value>(Method::GetClientFactory, ()).is_err());
        assert_eq!(comm.pending_count(), 0);
    }
}
