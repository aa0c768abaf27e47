// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]
use super::*;
use crate::frame::FrameStatus;
use std::thread;
use tempfile::TempDir;

#[test]
fn test_record_writes_one_line_per_frame() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.jsonl");
    let recorder = FrameRecorder::create(&path).unwrap();

    recorder
        .record(&EventFrame::new("agent_log", "one", "2026-03-01T00:00:00Z").with_agent("news"))
        .unwrap();
    recorder
        .record(&EventFrame::system_disconnected("2026-03-01T00:00:01Z"))
        .unwrap();

    let content = std::fs::read_to_string(&path).unwrap();
    assert_eq!(content.lines().count(), 2);
    assert_eq!(recorder.written(), 2);

    let frames = FrameRecorder::read_frames(&path).unwrap();
    assert_eq!(frames[0].agent.as_deref(), Some("news"));
    assert_eq!(frames[1].status, Some(FrameStatus::Error));
}

#[test]
fn test_create_truncates_and_append_keeps() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.jsonl");
    std::fs::write(&path, "stale\n").unwrap();

    let recorder = FrameRecorder::create(&path).unwrap();
    recorder.record(&EventFrame::new("info", "a", "t")).unwrap();
    drop(recorder);

    let recorder = FrameRecorder::append(&path).unwrap();
    recorder.record(&EventFrame::new("info", "b", "t")).unwrap();

    let frames = FrameRecorder::read_frames(&path).unwrap();
    let messages: Vec<_> = frames.iter().map(|f| f.message.as_str()).collect();
    assert_eq!(messages, vec!["a", "b"]);
}

#[test]
fn test_read_skips_garbage_lines() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("mixed.jsonl");
    std::fs::write(
        &path,
        "pong\n{\"type\":\"info\",\"message\":\"kept\",\"timestamp\":\"t\"}\nnot json\n",
    )
    .unwrap();

    let frames = FrameRecorder::read_frames(&path).unwrap();
    assert_eq!(frames.len(), 1);
    assert_eq!(frames[0].message, "kept");
}

#[test]
fn test_create_in_missing_directory_fails() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("missing").join("frames.jsonl");
    assert!(FrameRecorder::create(&path).is_err());
}

#[test]
fn test_clones_share_writer() {
    let dir = TempDir::new().unwrap();
    let path = dir.path().join("frames.jsonl");
    let recorder = FrameRecorder::create(&path).unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let recorder = recorder.clone();
            thread::spawn(move || {
                for j in 0..10 {
                    recorder
                        .record(&EventFrame::new("info", format!("{}-{}", i, j), "t"))
                        .unwrap();
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(recorder.written(), 40);
    assert_eq!(FrameRecorder::read_frames(&path).unwrap().len(), 40);
}
