// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Socket transport abstraction.
//!
//! The session driver talks to the log stream through [`Transport`]. The
//! production implementation is [`crate::ws::WsTransport`]; [`ChannelTransport`]
//! is an in-memory stand-in driven by a [`ChannelPeer`], used by `replay` and
//! by tests.

use std::future::Future;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use parking_lot::Mutex;
use tokio::sync::mpsc;

/// Lifecycle and data events surfaced by a transport.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum TransportEvent {
    /// The connection is established and writable.
    Open,
    /// One inbound text payload.
    Message(String),
    /// A transport-level error. Not necessarily fatal; a fatal error is
    /// followed by [`TransportEvent::Closed`].
    Error(String),
    /// The connection is gone.
    Closed(String),
}

/// Errors that can occur during transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The socket is not open for writing.
    #[error("socket is not open")]
    NotOpen,

    /// WebSocket protocol or I/O failure.
    #[error("websocket error: {0}")]
    WebSocket(#[from] tokio_tungstenite::tungstenite::Error),

    /// The peer of an in-memory transport went away.
    #[error("peer disconnected")]
    PeerGone,
}

/// A bidirectional text socket.
pub trait Transport: Send {
    /// Wait for the next event. `None` once the transport is exhausted.
    ///
    /// Must be cancel-safe: the driver polls it inside `select!`.
    fn next_event(&mut self) -> impl Future<Output = Option<TransportEvent>> + Send;

    /// Send one text payload.
    fn send_text(&mut self, text: &str) -> impl Future<Output = Result<(), TransportError>> + Send;

    /// Whether [`Transport::send_text`] can currently succeed.
    fn is_writable(&self) -> bool;

    /// Close the socket. Closing an already closed socket is `Ok`.
    fn close(&mut self) -> impl Future<Output = Result<(), TransportError>> + Send;
}

#[derive(Debug, Default)]
struct ChannelShared {
    sent: Mutex<Vec<String>>,
    close_calls: AtomicUsize,
}

/// In-memory transport fed by a [`ChannelPeer`].
#[derive(Debug)]
pub struct ChannelTransport {
    inbound: mpsc::UnboundedReceiver<TransportEvent>,
    shared: Arc<ChannelShared>,
    open: bool,
    closed: bool,
}

/// The "server" side of a [`ChannelTransport`].
#[derive(Clone, Debug)]
pub struct ChannelPeer {
    tx: mpsc::UnboundedSender<TransportEvent>,
    shared: Arc<ChannelShared>,
}

impl ChannelTransport {
    /// Create a connected transport/peer pair.
    pub fn pair() -> (Self, ChannelPeer) {
        let (tx, inbound) = mpsc::unbounded_channel();
        let shared = Arc::new(ChannelShared::default());
        (
            Self {
                inbound,
                shared: Arc::clone(&shared),
                open: false,
                closed: false,
            },
            ChannelPeer { tx, shared },
        )
    }
}

impl Transport for ChannelTransport {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        if self.closed {
            return None;
        }
        let event = self.inbound.recv().await;
        match &event {
            Some(TransportEvent::Open) => self.open = true,
            Some(TransportEvent::Closed(_)) | None => {
                self.open = false;
                self.closed = true;
            }
            _ => {}
        }
        event
    }

    async fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        if !self.is_writable() {
            return Err(TransportError::NotOpen);
        }
        self.shared.sent.lock().push(text.to_string());
        Ok(())
    }

    fn is_writable(&self) -> bool {
        self.open && !self.closed
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        if !self.closed {
            self.shared.close_calls.fetch_add(1, Ordering::SeqCst);
        }
        self.open = false;
        self.closed = true;
        Ok(())
    }
}

impl ChannelPeer {
    fn push(&self, event: TransportEvent) -> Result<(), TransportError> {
        self.tx.send(event).map_err(|_| TransportError::PeerGone)
    }

    /// Signal that the socket opened.
    pub fn open(&self) -> Result<(), TransportError> {
        self.push(TransportEvent::Open)
    }

    /// Deliver one inbound payload.
    pub fn send(&self, payload: impl Into<String>) -> Result<(), TransportError> {
        self.push(TransportEvent::Message(payload.into()))
    }

    /// Raise a transport error.
    pub fn error(&self, detail: impl Into<String>) -> Result<(), TransportError> {
        self.push(TransportEvent::Error(detail.into()))
    }

    /// Close the socket from the server side.
    pub fn close(&self, reason: impl Into<String>) -> Result<(), TransportError> {
        self.push(TransportEvent::Closed(reason.into()))
    }

    /// Payloads the client sent, in order.
    pub fn sent(&self) -> Vec<String> {
        self.shared.sent.lock().clone()
    }

    /// Number of effective client-side closes (repeat closes are not counted).
    pub fn close_calls(&self) -> usize {
        self.shared.close_calls.load(Ordering::SeqCst)
    }
}

#[cfg(test)]
#[path = "transport_tests.rs"]
mod tests;
