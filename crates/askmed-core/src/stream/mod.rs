//! The incremental answer channel.
//!
//! A `StreamChannel` owns at most one open connection. Opening a new one
//! closes the previous one first, so events from a superseded connection
//! never reach the owner.

mod message;
mod sse;

pub use message::{parse_message, WireMessage};
pub use sse::SseDecoder;

use crate::error::Result;
use futures::stream::BoxStream;
use futures::StreamExt;
use std::sync::Arc;
use tokio::sync::mpsc;
use tokio::task::JoinHandle;

/// Raw event payloads as delivered by the transport, in arrival order.
pub type PayloadStream = BoxStream<'static, Result<String>>;

/// Establishes the push connection for one question.
#[async_trait::async_trait]
pub trait StreamTransport: Send + Sync {
    async fn connect(&self, question: &str) -> Result<PayloadStream>;
}

/// Events delivered to the channel's single subscriber.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ChannelEvent {
    Chunk(String),
    Complete,
    Error(String),
}

/// Identifies one `open` call.
pub type ChannelId = u64;

struct OpenChannel {
    id: ChannelId,
    events: mpsc::UnboundedReceiver<ChannelEvent>,
    reader: JoinHandle<()>,
}

pub struct StreamChannel {
    transport: Arc<dyn StreamTransport>,
    active: Option<OpenChannel>,
    opened: u64,
}

impl StreamChannel {
    pub fn new(transport: Arc<dyn StreamTransport>) -> Self {
        Self {
            transport,
            active: None,
            opened: 0,
        }
    }

    /// Open a channel for `question`, superseding any open one.
    ///
    /// Must be called from within a tokio runtime; the connection is read on
    /// its own task.
    pub fn open(&mut self, question: &str) -> ChannelId {
        self.close();

        self.opened += 1;
        let id = self.opened;
        let (tx, rx) = mpsc::unbounded_channel();
        let reader = tokio::spawn(read_channel(
            self.transport.clone(),
            question.to_string(),
            id,
            tx,
        ));

        tracing::debug!(channel = id, "Opened answer stream");
        self.active = Some(OpenChannel {
            id,
            events: rx,
            reader,
        });
        id
    }

    /// Close the open channel, if any. Safe to call repeatedly.
    pub fn close(&mut self) {
        if let Some(channel) = self.active.take() {
            channel.reader.abort();
            tracing::debug!(channel = channel.id, "Closed answer stream");
        }
    }

    pub fn is_open(&self) -> bool {
        self.active.is_some()
    }

    pub fn current(&self) -> Option<ChannelId> {
        self.active.as_ref().map(|c| c.id)
    }

    /// Next event from the open channel; `None` when nothing is open.
    ///
    /// Cancel-safe, so it can sit in a `tokio::select!` arm.
    pub async fn next_event(&mut self) -> Option<ChannelEvent> {
        let channel = self.active.as_mut()?;
        match channel.events.recv().await {
            Some(event) => Some(event),
            None => {
                self.active = None;
                None
            }
        }
    }
}

impl Drop for StreamChannel {
    fn drop(&mut self) {
        self.close();
    }
}

async fn read_channel(
    transport: Arc<dyn StreamTransport>,
    question: String,
    id: ChannelId,
    tx: mpsc::UnboundedSender<ChannelEvent>,
) {
    let mut payloads = match transport.connect(&question).await {
        Ok(payloads) => payloads,
        Err(e) => {
            tracing::warn!(channel = id, "Answer stream failed to connect: {}", e);
            let _ = tx.send(ChannelEvent::Error(e.to_string()));
            return;
        }
    };

    while let Some(item) = payloads.next().await {
        let payload = match item {
            Ok(payload) => payload,
            Err(e) => {
                tracing::warn!(channel = id, "Answer stream dropped: {}", e);
                let _ = tx.send(ChannelEvent::Error(e.to_string()));
                return;
            }
        };

        match parse_message(&payload) {
            Ok(Some(WireMessage::Chunk(text))) => {
                if tx.send(ChannelEvent::Chunk(text)).is_err() {
                    return;
                }
            }
            Ok(Some(WireMessage::Done)) => {
                let _ = tx.send(ChannelEvent::Complete);
                return;
            }
            Ok(None) => {}
            Err(e) => tracing::warn!(channel = id, "Dropping stream message: {}", e),
        }
    }

    tracing::warn!(channel = id, "Answer stream ended before completion");
    let _ = tx.send(ChannelEvent::Error(
        "stream ended before completion".to_string(),
    ));
}
