// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use proptest::prelude::*;
use rstest::rstest;

fn frame(message: &str) -> EventFrame {
    EventFrame::new("agent_log", message, "2026-03-01T12:00:00Z")
}

fn messages(buffer: &LogBuffer) -> Vec<String> {
    buffer.iter().map(|f| f.message.clone()).collect()
}

#[test]
fn test_default_capacity() {
    let buffer = LogBuffer::default();
    assert_eq!(buffer.capacity(), 200);
    assert!(buffer.is_empty());
}

#[test]
fn test_zero_capacity_clamps_to_one() {
    let mut buffer = LogBuffer::new(0);
    assert_eq!(buffer.capacity(), 1);
    buffer.push(frame("a"));
    buffer.push(frame("b"));
    assert_eq!(messages(&buffer), vec!["b"]);
}

#[test]
fn test_keeps_newest_frames() {
    let mut buffer = LogBuffer::new(3);
    for m in ["A", "B", "C", "D"] {
        buffer.push(frame(m));
    }
    assert_eq!(messages(&buffer), vec!["B", "C", "D"]);
}

#[test]
fn test_push_reports_evictions() {
    let mut buffer = LogBuffer::new(2);
    assert_eq!(buffer.push(frame("a")), 0);
    assert_eq!(buffer.push(frame("b")), 0);
    assert_eq!(buffer.push(frame("c")), 1);
    assert_eq!(buffer.len(), 2);
}

#[test]
fn test_last_is_newest() {
    let mut buffer = LogBuffer::new(5);
    assert!(buffer.last().is_none());
    buffer.push(frame("first"));
    buffer.push(frame("second"));
    assert_eq!(buffer.last().unwrap().message, "second");
}

#[test]
fn test_clear_empties_buffer() {
    let mut buffer = LogBuffer::new(3);
    buffer.push(frame("a"));
    buffer.push(frame("b"));
    buffer.clear();
    assert!(buffer.is_empty());
    assert_eq!(buffer.capacity(), 3);

    buffer.push(frame("c"));
    assert_eq!(messages(&buffer), vec!["c"]);
}

#[test]
fn test_snapshot_is_detached() {
    let mut buffer = LogBuffer::new(3);
    buffer.push(frame("a"));
    let snapshot = buffer.snapshot();
    buffer.push(frame("b"));
    assert_eq!(snapshot.len(), 1);
    assert_eq!(buffer.len(), 2);
}

#[rstest]
#[case(1, 0)]
#[case(1, 5)]
#[case(3, 2)]
#[case(3, 3)]
#[case(200, 250)]
fn test_length_is_min_of_input_and_capacity(#[case] capacity: usize, #[case] total: usize) {
    let mut buffer = LogBuffer::new(capacity);
    for i in 0..total {
        buffer.push(frame(&i.to_string()));
    }
    assert_eq!(buffer.len(), total.min(capacity));
}

proptest! {
    #[test]
    fn prop_buffer_holds_last_n_in_order(
        capacity in 1usize..50,
        inputs in proptest::collection::vec("[a-z]{1,8}", 0..120),
    ) {
        let mut buffer = LogBuffer::new(capacity);
        for m in &inputs {
            buffer.push(frame(m));
            prop_assert!(buffer.len() <= capacity);
        }

        let start = inputs.len().saturating_sub(capacity);
        prop_assert_eq!(messages(&buffer), inputs[start..].to_vec());
    }
}
