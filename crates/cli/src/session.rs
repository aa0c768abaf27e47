// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Connection session state machine.
//!
//! A [`ConnectionSession`] owns the log buffer and the connected flag for one
//! console instance and applies socket lifecycle events to them. It performs
//! no I/O itself; [`crate::driver`] feeds it events from a transport.
//!
//! ```text
//! Connecting ──open──▶ Connected
//!     │                    │
//!     └──────close─────────┴──▶ Disconnected (terminal)
//! ```
//!
//! Every operation is infallible. Failures are reported to the
//! [`DiagnosticSink`] and otherwise absorbed.

use std::sync::Arc;

use agent_console_frames::{EventFrame, FrameRecorder, Inbound, LogBuffer, HEARTBEAT_REPLY};

use crate::config::ConsoleConfig;
use crate::diagnostic::{excerpt, Diagnostic, DiagnosticSink};
use crate::time::{Clock, ClockHandle};

/// Lifecycle state of a session.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq)]
pub enum SessionState {
    #[default]
    Connecting,
    Connected,
    Disconnected,
}

/// What happened to an inbound payload.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MessageOutcome {
    /// Heartbeat reply, discarded.
    Heartbeat,
    /// Appended; `evicted` older frames were dropped to make room.
    Appended { evicted: usize },
    /// Not an event frame; reported and dropped.
    Malformed,
    /// Arrived after the session disconnected; ignored.
    Ignored,
}

/// Everything the presentation layer needs to draw one frame of the view.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct ConsoleSnapshot {
    pub frames: Vec<EventFrame>,
    pub connected: bool,
    pub state: SessionState,
    /// Bumped on every buffer change (append, evict, clear).
    pub revision: u64,
    /// Frames appended over the session's lifetime, including evicted ones.
    pub appended_total: u64,
}

/// State for one live connection to the agent log stream.
pub struct ConnectionSession {
    state: SessionState,
    connected: bool,
    buffer: LogBuffer,
    heartbeat_reply: String,
    revision: u64,
    appended_total: u64,
    clock: ClockHandle,
    sink: Arc<dyn DiagnosticSink>,
    recorder: Option<FrameRecorder>,
}

impl ConnectionSession {
    /// Create a session in the `Connecting` state.
    pub fn new(capacity: usize, clock: ClockHandle, sink: Arc<dyn DiagnosticSink>) -> Self {
        Self {
            state: SessionState::Connecting,
            connected: false,
            buffer: LogBuffer::new(capacity),
            heartbeat_reply: HEARTBEAT_REPLY.to_string(),
            revision: 0,
            appended_total: 0,
            clock,
            sink,
            recorder: None,
        }
    }

    /// Create a session using the capacity and heartbeat reply from `config`.
    pub fn from_config(
        config: &ConsoleConfig,
        clock: ClockHandle,
        sink: Arc<dyn DiagnosticSink>,
    ) -> Self {
        Self::new(config.capacity, clock, sink).with_heartbeat_reply(&config.heartbeat_reply)
    }

    /// Override the payload treated as a heartbeat reply.
    pub fn with_heartbeat_reply(mut self, reply: &str) -> Self {
        self.heartbeat_reply = reply.to_string();
        self
    }

    /// Record every appended frame.
    pub fn with_recorder(mut self, recorder: FrameRecorder) -> Self {
        self.recorder = Some(recorder);
        self
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn is_connected(&self) -> bool {
        self.connected
    }

    pub fn buffer(&self) -> &LogBuffer {
        &self.buffer
    }

    /// Whether heartbeats should still be sent.
    pub fn heartbeat_active(&self) -> bool {
        matches!(
            self.state,
            SessionState::Connecting | SessionState::Connected
        )
    }

    /// Report a diagnostic through this session's sink.
    pub fn report(&self, diagnostic: Diagnostic) {
        self.sink.report(diagnostic);
    }

    /// The socket opened.
    pub fn on_open(&mut self) {
        if self.state == SessionState::Disconnected {
            return;
        }
        self.state = SessionState::Connected;
        self.connected = true;
        self.sink.report(Diagnostic::Connected);
    }

    /// An inbound payload arrived.
    pub fn on_message(&mut self, payload: &str) -> MessageOutcome {
        if self.state == SessionState::Disconnected {
            return MessageOutcome::Ignored;
        }
        match Inbound::classify_with(payload, &self.heartbeat_reply) {
            Inbound::Heartbeat => MessageOutcome::Heartbeat,
            Inbound::Frame(frame) => MessageOutcome::Appended {
                evicted: self.append(frame),
            },
            Inbound::Malformed(e) => {
                self.sink.report(Diagnostic::MalformedFrame {
                    error: e.to_string(),
                    payload: excerpt(payload),
                });
                MessageOutcome::Malformed
            }
        }
    }

    /// The transport reported an error. The state is left alone; a close
    /// event follows if the error was fatal.
    pub fn on_error(&mut self, detail: &str) {
        self.connected = false;
        self.sink.report(Diagnostic::Transport {
            detail: detail.to_string(),
        });
    }

    /// The socket closed. Appends the disconnect frame the first time only.
    pub fn on_close(&mut self, reason: &str) {
        if self.state == SessionState::Disconnected {
            return;
        }
        self.state = SessionState::Disconnected;
        self.connected = false;
        let frame = EventFrame::system_disconnected(self.clock.now_rfc3339());
        self.append(frame);
        self.sink.report(Diagnostic::Disconnected {
            reason: reason.to_string(),
        });
    }

    /// Empty the buffer. Connection state is untouched.
    pub fn clear(&mut self) {
        self.buffer.clear();
        self.revision += 1;
    }

    pub fn snapshot(&self) -> ConsoleSnapshot {
        ConsoleSnapshot {
            frames: self.buffer.snapshot(),
            connected: self.connected,
            state: self.state,
            revision: self.revision,
            appended_total: self.appended_total,
        }
    }

    fn append(&mut self, frame: EventFrame) -> usize {
        if let Some(recorder) = &self.recorder {
            if let Err(e) = recorder.record(&frame) {
                self.sink.report(Diagnostic::RecordFailed {
                    detail: format!("{}: {}", recorder.path().display(), e),
                });
            }
        }
        let evicted = self.buffer.push(frame);
        self.revision += 1;
        self.appended_total += 1;
        evicted
    }
}

impl std::fmt::Debug for ConnectionSession {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ConnectionSession")
            .field("state", &self.state)
            .field("connected", &self.connected)
            .field("buffered", &self.buffer.len())
            .field("capacity", &self.buffer.capacity())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "session_tests.rs"]
mod tests;
