//! WebSocket transport to a parent host.
//!
//! # Data Flow
//! ```text
//! Communicator ──post()──→ mpsc ──→ writer task ──→ ws sink ──→ Parent host
//! Communicator ←── mpsc ←── reader task ←── ws stream ←──────── Parent host
//! ```
//!
//! # Design Decisions
//! - One connection is one counterpart; every frame read from it carries
//!   the same [`ContextId`]
//! - `post` never awaits; frames are queued to the writer task
//! - No reconnection. A dropped socket leaves the transport without a
//!   counterpart and sends fail fast. The reader drops the inbound sender
//!   on exit, which rejects calls still awaiting a response

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use futures_util::{SinkExt, StreamExt};
use serde_json::Value;
use tokio::sync::mpsc;
use tokio_tungstenite::{connect_async, tungstenite::Message};

use crate::messaging::envelope::RequestEnvelope;
use crate::messaging::transport::Transport;
use crate::messaging::types::{ContextId, InboundMessage, MessagingError, MessagingResult};

#[derive(Debug)]
pub struct WebSocketTransport {
    parent: ContextId,
    url: String,
    outbound: mpsc::UnboundedSender<String>,
    connected: Arc<AtomicBool>,
}

impl WebSocketTransport {
    /// Connect to the parent host and start the reader and writer tasks.
    ///
    /// Returns the transport and the receiver of inbound messages to hand to
    /// a [`Communicator`](crate::messaging::Communicator).
    pub async fn connect(
        url: &str,
    ) -> MessagingResult<(Self, mpsc::UnboundedReceiver<InboundMessage>)> {
        let (ws_stream, _) = connect_async(url).await.map_err(|e| {
            MessagingError::TransportUnavailable(format!("failed to connect to {}: {}", url, e))
        })?;
        let (mut write, mut read) = ws_stream.split();

        let parent = ContextId::next();
        let connected = Arc::new(AtomicBool::new(true));
        let (out_tx, mut out_rx) = mpsc::unbounded_channel::<String>();
        let (in_tx, in_rx) = mpsc::unbounded_channel();

        tracing::info!(url = %url, parent = %parent, "Connected to parent host");

        tokio::spawn(async move {
            while let Some(text) = out_rx.recv().await {
                if let Err(e) = write.send(Message::text(text)).await {
                    tracing::error!(error = %e, "Failed to write to parent host");
                    break;
                }
            }
            let _ = write.close().await;
        });

        let origin = url.to_string();
        let reader_connected = connected.clone();
        tokio::spawn(async move {
            while let Some(frame) = read.next().await {
                match frame {
                    Ok(Message::Text(text)) => {
                        let data = match serde_json::from_str::<Value>(text.as_str()) {
                            Ok(data) => data,
                            Err(e) => {
                                tracing::warn!(error = %e, "Ignoring non-JSON frame from parent host");
                                continue;
                            }
                        };
                        if in_tx
                            .send(InboundMessage::new(parent, origin.clone(), Some(data)))
                            .is_err()
                        {
                            break;
                        }
                    }
                    Ok(Message::Close(_)) => break,
                    Ok(_) => {}
                    Err(e) => {
                        tracing::warn!(error = %e, "Parent host connection error");
                        break;
                    }
                }
            }
            reader_connected.store(false, Ordering::SeqCst);
            tracing::info!(origin = %origin, "Parent host connection closed");
        });

        Ok((
            Self {
                parent,
                url: url.to_string(),
                outbound: out_tx,
                connected,
            },
            in_rx,
        ))
    }

    pub fn url(&self) -> &str {
        &self.url
    }
}

impl Transport for WebSocketTransport {
    fn counterpart(&self) -> Option<ContextId> {
        if self.connected.load(Ordering::SeqCst) && !self.outbound.is_closed() {
            Some(self.parent)
        } else {
            None
        }
    }

    fn post(&self, request: &RequestEnvelope<Value>) -> MessagingResult<()> {
        let text = serde_json::to_string(request).map_err(MessagingError::Serialize)?;
        self.outbound.send(text).map_err(|_| {
            MessagingError::TransportUnavailable("parent host connection closed".to_string())
        })
    }
}
