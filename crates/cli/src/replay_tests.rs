// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::diagnostic::{Diagnostic, MemorySink};
use crate::session::SessionState;
use crate::time::ClockHandle;
use std::io::{Cursor, Write};
use std::sync::Arc;
use std::time::Duration;

fn heartbeat() -> HeartbeatConfig {
    HeartbeatConfig {
        interval: Duration::from_secs(30),
        token: "ping".into(),
    }
}

fn frame(message: &str) -> String {
    format!(
        r#"{{"type":"agent_log","agent":"news","status":"info","message":"{}","timestamp":"2026-03-01T14:00:00Z"}}"#,
        message
    )
}

#[test]
fn blank_lines_are_skipped() {
    let input = "pong\n\n   \r\n{\"a\":1}\r\nlast";
    let payloads = read_payloads(Cursor::new(input)).unwrap();
    assert_eq!(payloads, vec!["pong", "{\"a\":1}", "last"]);
}

#[test]
fn load_payloads_from_file() {
    let mut file = tempfile::NamedTempFile::new().unwrap();
    writeln!(file, "{}", frame("A")).unwrap();
    writeln!(file, "pong").unwrap();
    let payloads = load_payloads(file.path()).unwrap();
    assert_eq!(payloads.len(), 2);
}

#[test]
fn load_payloads_missing_file() {
    let dir = tempfile::tempdir().unwrap();
    let err = load_payloads(&dir.path().join("missing.jsonl")).unwrap_err();
    assert!(matches!(err, ReplayError::Read { .. }));
    assert!(err.to_string().contains("missing.jsonl"));
}

#[tokio::test]
async fn replay_keeps_newest_frames_then_disconnect() {
    let sink = MemorySink::new();
    let session = ConnectionSession::new(3, ClockHandle::fake_at(0), Arc::new(sink.clone()));
    let payloads = vec![
        frame("A"),
        frame("B"),
        "pong".to_string(),
        "not json".to_string(),
        frame("C"),
        frame("D"),
    ];

    let snapshot = replay(payloads, session, heartbeat()).await.unwrap();

    let messages: Vec<&str> = snapshot.frames.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(messages, vec!["C", "D", "Agent Console disconnected"]);
    assert_eq!(snapshot.state, SessionState::Disconnected);
    assert!(!snapshot.connected);
    assert_eq!(snapshot.appended_total, 5);
    assert_eq!(
        sink.count(|d| matches!(d, Diagnostic::MalformedFrame { .. })),
        1
    );
    assert!(sink
        .entries()
        .contains(&Diagnostic::Disconnected {
            reason: REPLAY_CLOSE_REASON.to_string()
        }));
}

#[tokio::test]
async fn replay_of_empty_input_is_just_the_disconnect() {
    let session = ConnectionSession::new(200, ClockHandle::fake_at(0), Arc::new(MemorySink::new()));
    let snapshot = replay(Vec::new(), session, heartbeat()).await.unwrap();
    assert_eq!(snapshot.frames.len(), 1);
    assert!(snapshot.frames[0].is_system());
}
