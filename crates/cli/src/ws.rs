// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! WebSocket transport over `tokio-tungstenite`.
//!
//! The connection is opened lazily by the first [`Transport::next_event`]
//! call. The pending connect future is stored on the transport so a
//! cancelled poll (the driver's `select!` picking another branch) resumes the
//! same attempt instead of starting over.

use std::collections::VecDeque;
use std::future::Future;
use std::pin::Pin;

use futures_util::{SinkExt, StreamExt};
use tokio::net::TcpStream;
use tokio_tungstenite::tungstenite::{self, protocol::CloseFrame, Message};
use tokio_tungstenite::{connect_async, MaybeTlsStream, WebSocketStream};
use url::Url;

use crate::transport::{Transport, TransportError, TransportEvent};

type WsStream = WebSocketStream<MaybeTlsStream<TcpStream>>;
type ConnectFuture = Pin<Box<dyn Future<Output = Result<WsStream, tungstenite::Error>> + Send>>;

enum WsState {
    Connecting(ConnectFuture),
    Open(WsStream),
    Closed,
}

/// Client side of the agent log stream.
pub struct WsTransport {
    endpoint: Url,
    state: WsState,
    pending: VecDeque<TransportEvent>,
}

impl WsTransport {
    /// Prepare a connection to `endpoint`. Nothing is dialed until the first
    /// call to [`Transport::next_event`].
    pub fn new(endpoint: Url) -> Self {
        let target = endpoint.to_string();
        let connect: ConnectFuture = Box::pin(async move {
            let (stream, _response) = connect_async(target).await?;
            Ok(stream)
        });
        Self {
            endpoint,
            state: WsState::Connecting(connect),
            pending: VecDeque::new(),
        }
    }

    pub fn endpoint(&self) -> &Url {
        &self.endpoint
    }

    /// Transition to `Closed` after a failure, queueing the close event that
    /// must follow the error.
    fn fail(&mut self, err: tungstenite::Error) -> TransportEvent {
        self.state = WsState::Closed;
        self.pending
            .push_back(TransportEvent::Closed(format!("connection lost: {}", err)));
        TransportEvent::Error(err.to_string())
    }
}

fn close_reason(frame: Option<CloseFrame<'_>>) -> String {
    match frame {
        Some(frame) if frame.reason.is_empty() => format!("closed by server ({})", frame.code),
        Some(frame) => format!("closed by server ({}: {})", frame.code, frame.reason),
        None => "closed by server".to_string(),
    }
}

impl Transport for WsTransport {
    async fn next_event(&mut self) -> Option<TransportEvent> {
        if let Some(event) = self.pending.pop_front() {
            return Some(event);
        }
        match &mut self.state {
            WsState::Connecting(connect) => match connect.as_mut().await {
                Ok(stream) => {
                    self.state = WsState::Open(stream);
                    Some(TransportEvent::Open)
                }
                Err(e) => Some(self.fail(e)),
            },
            WsState::Open(stream) => loop {
                match stream.next().await {
                    Some(Ok(Message::Text(text))) => return Some(TransportEvent::Message(text)),
                    // Invalid UTF-8 ends up as a malformed frame.
                    Some(Ok(Message::Binary(bytes))) => {
                        let text = String::from_utf8_lossy(&bytes).into_owned();
                        return Some(TransportEvent::Message(text));
                    }
                    Some(Ok(Message::Close(frame))) => {
                        let reason = close_reason(frame);
                        self.state = WsState::Closed;
                        return Some(TransportEvent::Closed(reason));
                    }
                    // Ping/pong control frames are handled by tungstenite.
                    Some(Ok(_)) => continue,
                    Some(Err(e)) => return Some(self.fail(e)),
                    None => {
                        self.state = WsState::Closed;
                        return Some(TransportEvent::Closed("stream ended".to_string()));
                    }
                }
            },
            WsState::Closed => None,
        }
    }

    async fn send_text(&mut self, text: &str) -> Result<(), TransportError> {
        match &mut self.state {
            WsState::Open(stream) => {
                stream.send(Message::Text(text.to_string())).await?;
                Ok(())
            }
            _ => Err(TransportError::NotOpen),
        }
    }

    fn is_writable(&self) -> bool {
        matches!(self.state, WsState::Open(_))
    }

    async fn close(&mut self) -> Result<(), TransportError> {
        let state = std::mem::replace(&mut self.state, WsState::Closed);
        match state {
            WsState::Open(mut stream) => match stream.close(None).await {
                Ok(()) => Ok(()),
                Err(tungstenite::Error::ConnectionClosed | tungstenite::Error::AlreadyClosed) => {
                    Ok(())
                }
                Err(e) => Err(e.into()),
            },
            // Dropping the connect future abandons the attempt.
            WsState::Connecting(_) | WsState::Closed => Ok(()),
        }
    }
}

impl std::fmt::Debug for WsTransport {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let state = match self.state {
            WsState::Connecting(_) => "connecting",
            WsState::Open(_) => "open",
            WsState::Closed => "closed",
        };
        f.debug_struct("WsTransport")
            .field("endpoint", &self.endpoint.as_str())
            .field("state", &state)
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "ws_tests.rs"]
mod tests;
