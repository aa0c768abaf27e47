// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Diagnostic reporting.
//!
//! The session never returns errors to its caller. Everything that goes wrong
//! inside it is turned into a [`Diagnostic`] and handed to a
//! [`DiagnosticSink`]. The binary uses [`TracingSink`]; tests use
//! [`MemorySink`].
//!
//! This module also holds the stderr helpers the binary uses for its own
//! startup errors, with ANSI color when stderr is a terminal.

use parking_lot::Mutex;
use std::fmt;
use std::io::{self, IsTerminal, Write};
use std::sync::Arc;

/// Something worth telling the operator about.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Diagnostic {
    /// The socket opened.
    Connected,
    /// An inbound payload was dropped because it is not an event frame.
    MalformedFrame { error: String, payload: String },
    /// The transport reported an error.
    Transport { detail: String },
    /// The heartbeat could not be sent.
    HeartbeatFailed { detail: String },
    /// The session reached its terminal state.
    Disconnected { reason: String },
    /// A frame could not be written to the recording file.
    RecordFailed { detail: String },
}

impl Diagnostic {
    /// Whether this diagnostic reports a failure (as opposed to a lifecycle step).
    pub fn is_failure(&self) -> bool {
        !matches!(self, Self::Connected | Self::Disconnected { .. })
    }
}

/// Longest payload excerpt carried in a diagnostic.
const PAYLOAD_EXCERPT_CHARS: usize = 120;

/// Shorten a payload for inclusion in a diagnostic.
pub fn excerpt(payload: &str) -> String {
    let mut chars = payload.chars();
    let head: String = chars.by_ref().take(PAYLOAD_EXCERPT_CHARS).collect();
    if chars.next().is_some() {
        format!("{}…", head)
    } else {
        head
    }
}

impl fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Connected => write!(f, "connected"),
            Self::MalformedFrame { error, payload } => {
                write!(f, "dropped inbound payload ({}): {}", error, payload)
            }
            Self::Transport { detail } => write!(f, "transport error: {}", detail),
            Self::HeartbeatFailed { detail } => write!(f, "heartbeat failed: {}", detail),
            Self::Disconnected { reason } => write!(f, "disconnected: {}", reason),
            Self::RecordFailed { detail } => write!(f, "recording failed: {}", detail),
        }
    }
}

/// Destination for session diagnostics.
pub trait DiagnosticSink: Send + Sync {
    fn report(&self, diagnostic: Diagnostic);
}

/// Emits diagnostics as `tracing` events tagged with the session id.
#[derive(Clone, Debug)]
pub struct TracingSink {
    session_id: String,
}

impl TracingSink {
    pub fn new(session_id: impl Into<String>) -> Self {
        Self {
            session_id: session_id.into(),
        }
    }
}

impl DiagnosticSink for TracingSink {
    fn report(&self, diagnostic: Diagnostic) {
        let session = self.session_id.as_str();
        match &diagnostic {
            Diagnostic::Connected => tracing::info!(session, "agent console connected"),
            Diagnostic::Disconnected { reason } => {
                tracing::info!(session, reason = %reason, "agent console disconnected")
            }
            Diagnostic::MalformedFrame { error, payload } => {
                tracing::warn!(session, error = %error, payload = %payload, "dropped malformed frame")
            }
            Diagnostic::Transport { detail } => {
                tracing::warn!(session, detail = %detail, "websocket error")
            }
            Diagnostic::HeartbeatFailed { detail } => {
                tracing::warn!(session, detail = %detail, "heartbeat send failed")
            }
            Diagnostic::RecordFailed { detail } => {
                tracing::error!(session, detail = %detail, "frame recording failed")
            }
        }
    }
}

/// Collects diagnostics in memory. Clones share storage.
#[derive(Clone, Debug, Default)]
pub struct MemorySink {
    entries: Arc<Mutex<Vec<Diagnostic>>>,
}

impl MemorySink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn entries(&self) -> Vec<Diagnostic> {
        self.entries.lock().clone()
    }

    /// Count entries matching a predicate
    pub fn count<F: Fn(&Diagnostic) -> bool>(&self, pred: F) -> usize {
        self.entries.lock().iter().filter(|d| pred(d)).count()
    }
}

impl DiagnosticSink for MemorySink {
    fn report(&self, diagnostic: Diagnostic) {
        self.entries.lock().push(diagnostic);
    }
}

/// Print an error message to stderr.
///
/// Displays in red when stderr is a terminal, plain text otherwise.
pub fn print_error(msg: impl fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_error(&mut io::stderr(), msg, is_tty);
}

fn write_error<W: Write>(writer: &mut W, msg: impl fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[31mError: {}\x1b[0m", msg);
    } else {
        let _ = writeln!(writer, "Error: {}", msg);
    }
}

/// Print a warning message to stderr.
///
/// Displays in yellow when stderr is a terminal, plain text otherwise.
pub fn print_warning(msg: impl fmt::Display) {
    let is_tty = io::stderr().is_terminal();
    write_warning(&mut io::stderr(), msg, is_tty);
}

fn write_warning<W: Write>(writer: &mut W, msg: impl fmt::Display, is_terminal: bool) {
    if is_terminal {
        let _ = writeln!(writer, "\x1b[33mWarning: {}\x1b[0m", msg);
    } else {
        let _ = writeln!(writer, "Warning: {}", msg);
    }
}

#[cfg(test)]
#[path = "diagnostic_tests.rs"]
mod tests;
