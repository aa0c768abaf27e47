// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used)]

use super::*;
use yare::parameterized;

#[test]
fn error_plain_text_when_not_terminal() {
    let mut buf = Vec::new();
    write_error(&mut buf, "invalid endpoint", false);
    assert_eq!(String::from_utf8(buf).unwrap(), "Error: invalid endpoint\n");
}

#[test]
fn error_with_ansi_when_terminal() {
    let mut buf = Vec::new();
    write_error(&mut buf, "invalid endpoint", true);
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "\x1b[31mError: invalid endpoint\x1b[0m\n"
    );
}

#[test]
fn warning_plain_text_when_not_terminal() {
    let mut buf = Vec::new();
    write_warning(&mut buf, format_args!("{} lines skipped", 2), false);
    assert_eq!(String::from_utf8(buf).unwrap(), "Warning: 2 lines skipped\n");
}

#[test]
fn warning_with_ansi_when_terminal() {
    let mut buf = Vec::new();
    write_warning(&mut buf, "careful", true);
    assert_eq!(
        String::from_utf8(buf).unwrap(),
        "\x1b[33mWarning: careful\x1b[0m\n"
    );
}

#[test]
fn excerpt_keeps_short_payloads() {
    assert_eq!(excerpt("pong!"), "pong!");
}

#[test]
fn excerpt_truncates_long_payloads() {
    let long = "x".repeat(500);
    let short = excerpt(&long);
    assert_eq!(short.chars().count(), PAYLOAD_EXCERPT_CHARS + 1);
    assert!(short.ends_with('…'));
}

#[test]
fn excerpt_respects_char_boundaries() {
    let long = "é".repeat(200);
    let short = excerpt(&long);
    assert!(short.starts_with("éé"));
}

#[parameterized(
    connected = { Diagnostic::Connected, false },
    disconnected = { Diagnostic::Disconnected { reason: "bye".into() }, false },
    malformed = { Diagnostic::MalformedFrame { error: "e".into(), payload: "p".into() }, true },
    transport = { Diagnostic::Transport { detail: "reset".into() }, true },
    heartbeat = { Diagnostic::HeartbeatFailed { detail: "closed".into() }, true },
    record = { Diagnostic::RecordFailed { detail: "disk full".into() }, true },
)]
fn failure_classification(diagnostic: Diagnostic, expected: bool) {
    assert_eq!(diagnostic.is_failure(), expected);
}

#[test]
fn display_includes_detail() {
    let d = Diagnostic::MalformedFrame {
        error: "missing field `message`".into(),
        payload: "{}".into(),
    };
    assert_eq!(
        d.to_string(),
        "dropped inbound payload (missing field `message`): {}"
    );
}

#[test]
fn memory_sink_clones_share_entries() {
    let sink = MemorySink::new();
    let other = sink.clone();
    other.report(Diagnostic::Connected);
    other.report(Diagnostic::Transport {
        detail: "x".into(),
    });
    assert_eq!(sink.entries().len(), 2);
    assert_eq!(sink.count(Diagnostic::is_failure), 1);
}

#[test]
fn tracing_sink_accepts_every_variant() {
    let sink = TracingSink::new("test-session");
    sink.report(Diagnostic::Connected);
    sink.report(Diagnostic::MalformedFrame {
        error: "e".into(),
        payload: "p".into(),
    });
    sink.report(Diagnostic::Disconnected {
        reason: "done".into(),
    });
}
