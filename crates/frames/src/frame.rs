// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Event frame model and inbound payload classification.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Payload the server sends in reply to a heartbeat. Never buffered.
pub const HEARTBEAT_REPLY: &str = "pong";

/// Frame type used for frames the console manufactures itself.
pub const SYSTEM_FRAME_TYPE: &str = "system";

/// Message of the frame appended when the connection closes.
pub const DISCONNECTED_MESSAGE: &str = "Agent Console disconnected";

/// Status of an event frame.
///
/// Statuses outside the four known categories are kept verbatim in
/// [`FrameStatus::Unknown`] so that a new server-side status renders with the
/// default glyph instead of dropping the whole frame.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum FrameStatus {
    Running,
    Success,
    Error,
    Info,
    Unknown(String),
}

impl FrameStatus {
    /// Wire name of the status.
    pub fn as_str(&self) -> &str {
        match self {
            Self::Running => "running",
            Self::Success => "success",
            Self::Error => "error",
            Self::Info => "info",
            Self::Unknown(other) => other,
        }
    }
}

impl From<String> for FrameStatus {
    fn from(value: String) -> Self {
        match value.as_str() {
            "running" => Self::Running,
            "success" => Self::Success,
            "error" => Self::Error,
            "info" => Self::Info,
            _ => Self::Unknown(value),
        }
    }
}

impl From<FrameStatus> for String {
    fn from(status: FrameStatus) -> Self {
        match status {
            FrameStatus::Unknown(other) => other,
            known => known.as_str().to_string(),
        }
    }
}

impl fmt::Display for FrameStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One unit of the agent log stream.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct EventFrame {
    #[serde(rename = "type")]
    pub frame_type: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub agent: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<FrameStatus>,
    pub message: String,
    /// ISO-8601 timestamp as sent by the server; kept as text so a malformed
    /// value still renders.
    pub timestamp: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub metadata: Option<serde_json::Map<String, serde_json::Value>>,
}

impl EventFrame {
    /// Create a frame with the required fields only.
    pub fn new(
        frame_type: impl Into<String>,
        message: impl Into<String>,
        timestamp: impl Into<String>,
    ) -> Self {
        Self {
            frame_type: frame_type.into(),
            agent: None,
            status: None,
            message: message.into(),
            timestamp: timestamp.into(),
            metadata: None,
        }
    }

    /// Set the originating agent.
    pub fn with_agent(mut self, agent: impl Into<String>) -> Self {
        self.agent = Some(agent.into());
        self
    }

    /// Set the status.
    pub fn with_status(mut self, status: FrameStatus) -> Self {
        self.status = Some(status);
        self
    }

    /// The frame appended when the socket closes.
    pub fn system_disconnected(timestamp: impl Into<String>) -> Self {
        Self::new(SYSTEM_FRAME_TYPE, DISCONNECTED_MESSAGE, timestamp).with_status(FrameStatus::Error)
    }

    /// Whether this frame was manufactured by the console.
    pub fn is_system(&self) -> bool {
        self.frame_type == SYSTEM_FRAME_TYPE
    }

    /// Decode a frame from its JSON text.
    pub fn parse(payload: &str) -> Result<Self, FrameError> {
        Ok(serde_json::from_str(payload)?)
    }
}

/// Inbound payload that could not be decoded as an event frame.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    #[error("malformed event frame: {0}")]
    Malformed(#[from] serde_json::Error),
}

/// Classification of one inbound socket payload.
#[derive(Debug)]
pub enum Inbound {
    /// Reply to our heartbeat.
    Heartbeat,
    /// A decoded event frame.
    Frame(EventFrame),
    /// Anything else.
    Malformed(FrameError),
}

impl Inbound {
    /// Classify a payload using the default heartbeat reply token.
    pub fn classify(payload: &str) -> Self {
        Self::classify_with(payload, HEARTBEAT_REPLY)
    }

    /// Classify a payload against an explicit heartbeat reply token.
    ///
    /// The token must match exactly; surrounding whitespace makes it an
    /// ordinary (and most likely malformed) payload.
    pub fn classify_with(payload: &str, heartbeat_reply: &str) -> Self {
        if payload == heartbeat_reply {
            return Self::Heartbeat;
        }
        match EventFrame::parse(payload) {
            Ok(frame) => Self::Frame(frame),
            Err(e) => Self::Malformed(e),
        }
    }
}

#[cfg(test)]
#[path = "frame_tests.rs"]
mod tests;
