// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

#![allow(clippy::unwrap_used, clippy::expect_used, clippy::panic)]

use super::*;
use crate::diagnostic::MemorySink;
use crate::time::ClockHandle;
use crate::transport::{ChannelPeer, ChannelTransport};
use agent_console_frames::FrameStatus;
use std::sync::Arc;

fn heartbeat() -> HeartbeatConfig {
    HeartbeatConfig {
        interval: Duration::from_secs(30),
        token: "ping".to_string(),
    }
}

fn start(capacity: usize) -> (SessionHandle, ChannelPeer, MemorySink) {
    let sink = MemorySink::new();
    let session = ConnectionSession::new(capacity, ClockHandle::fake_at(0), Arc::new(sink.clone()));
    let (transport, peer) = ChannelTransport::pair();
    let handle = spawn_session(transport, session, heartbeat());
    (handle, peer, sink)
}

fn frame(message: &str) -> String {
    format!(
        r#"{{"type":"agent_log","agent":"news","status":"success","message":"{}","timestamp":"2026-03-01T14:00:00Z"}}"#,
        message
    )
}

async fn wait_until<F>(handle: &SessionHandle, pred: F) -> ConsoleSnapshot
where
    F: Fn(&ConsoleSnapshot) -> bool,
{
    let mut rx = handle.subscribe();
    let snapshot = rx.wait_for(|s| pred(s)).await.unwrap();
    snapshot.clone()
}

fn messages(snapshot: &ConsoleSnapshot) -> Vec<&str> {
    snapshot.frames.iter().map(|f| f.message.as_str()).collect()
}

#[tokio::test]
async fn test_initial_snapshot_is_connecting() {
    let (handle, _peer, _) = start(200);
    let snapshot = handle.snapshot();
    assert_eq!(snapshot.state, SessionState::Connecting);
    assert!(!snapshot.connected);
    assert!(snapshot.frames.is_empty());
}

#[tokio::test]
async fn test_frames_flow_to_snapshot() {
    let (handle, peer, _) = start(3);
    peer.open().unwrap();
    for m in ["A", "B", "C", "D"] {
        peer.send(frame(m)).unwrap();
    }
    peer.send("pong").unwrap();

    let snapshot = wait_until(&handle, |s| s.appended_total == 4).await;
    assert!(snapshot.connected);
    assert_eq!(messages(&snapshot), vec!["B", "C", "D"]);

    handle.clear();
    let snapshot = wait_until(&handle, |s| s.frames.is_empty()).await;
    assert!(snapshot.connected);
    assert_eq!(snapshot.state, SessionState::Connected);
}

#[tokio::test]
async fn test_malformed_frames_do_not_stop_the_session() {
    let (handle, peer, sink) = start(200);
    peer.open().unwrap();
    peer.send("{broken").unwrap();
    peer.send(frame("after")).unwrap();

    let snapshot = wait_until(&handle, |s| s.appended_total == 1).await;
    assert_eq!(messages(&snapshot), vec!["after"]);
    assert_eq!(
        sink.count(|d| matches!(d, Diagnostic::MalformedFrame { .. })),
        1
    );
}

#[tokio::test]
async fn test_server_close_appends_system_frame_and_ends_driver() {
    let (handle, peer, _) = start(200);
    peer.close("server restart").unwrap();

    let report = handle.join().await.unwrap();
    assert_eq!(report.final_state, SessionState::Disconnected);
    assert!(!report.closed_by_client);

    let snapshot = handle.snapshot();
    assert!(!snapshot.connected);
    assert_eq!(snapshot.frames.len(), 1);
    let last = snapshot.frames.last().unwrap();
    assert_eq!(last.frame_type, "system");
    assert_eq!(last.status, Some(FrameStatus::Error));
    assert_eq!(last.timestamp, "1970-01-01T00:00:00.000Z");
}

#[tokio::test]
async fn test_error_flips_flag_without_closing() {
    let (handle, peer, _) = start(200);
    peer.open().unwrap();
    peer.error("reset by peer").unwrap();
    peer.send(frame("still here")).unwrap();

    let snapshot = wait_until(&handle, |s| s.appended_total == 1).await;
    assert!(!snapshot.connected);
    assert_eq!(snapshot.state, SessionState::Connected);
}

#[tokio::test]
async fn test_peer_dropped_counts_as_close() {
    let (handle, peer, _) = start(200);
    drop(peer);
    let report = handle.join().await.unwrap();
    assert_eq!(report.final_state, SessionState::Disconnected);
    assert!(handle.snapshot().frames[0].is_system());
}

#[tokio::test(start_paused = true)]
async fn test_heartbeat_every_interval_while_open() {
    let (handle, peer, _) = start(200);
    peer.open().unwrap();
    wait_until(&handle, |s| s.connected).await;

    tokio::time::sleep(Duration::from_secs(95)).await;
    assert_eq!(peer.sent(), vec!["ping", "ping", "ping"]);

    handle.teardown();
    let report = handle.join().await.unwrap();
    assert_eq!(report.heartbeats_sent, 3);
}

#[tokio::test(start_paused = true)]
async fn test_no_heartbeat_before_open() {
    let (handle, peer, _) = start(200);
    tokio::time::sleep(Duration::from_secs(95)).await;
    assert!(peer.sent().is_empty());

    handle.teardown();
    assert_eq!(handle.join().await.unwrap().heartbeats_sent, 0);
}

#[tokio::test(start_paused = true)]
async fn test_no_heartbeat_after_teardown() {
    let (handle, peer, _) = start(200);
    peer.open().unwrap();
    wait_until(&handle, |s| s.connected).await;

    tokio::time::sleep(Duration::from_secs(31)).await;
    assert_eq!(peer.sent().len(), 1);

    assert!(handle.teardown());
    handle.join().await.unwrap();
    tokio::time::sleep(Duration::from_secs(300)).await;
    assert_eq!(peer.sent().len(), 1);
}

#[tokio::test]
async fn test_teardown_is_idempotent() {
    let (handle, peer, _) = start(200);
    peer.open().unwrap();
    wait_until(&handle, |s| s.connected).await;

    assert!(!handle.is_torn_down());
    assert!(handle.teardown());
    assert!(handle.is_torn_down());
    assert!(!handle.teardown());

    let report = handle.join().await.unwrap();
    assert!(report.closed_by_client);
    assert_eq!(report.final_state, SessionState::Disconnected);
    assert_eq!(peer.close_calls(), 1);

    // Late calls after the driver finished are still harmless.
    assert!(!handle.teardown());
    assert!(handle.join().await.is_none());
    handle.clear();

    let snapshot = handle.snapshot();
    assert_eq!(snapshot.frames.len(), 1);
    assert_eq!(snapshot.frames[0].message, "Agent Console disconnected");
}

#[tokio::test]
async fn test_teardown_from_two_owners() {
    let (handle, peer, _) = start(200);
    let handle = Arc::new(handle);
    peer.open().unwrap();

    let signal_side = Arc::clone(&handle);
    let signal = tokio::spawn(async move { signal_side.teardown() });
    let view_side = handle.teardown();
    let signal_side = signal.await.unwrap();

    assert!(view_side ^ signal_side, "exactly one teardown must win");
    handle.join().await.unwrap();
    assert_eq!(peer.close_calls(), 1);
}

#[tokio::test]
async fn test_teardown_after_server_close_is_harmless() {
    let (handle, peer, _) = start(200);
    peer.close("gone").unwrap();
    let report = handle.join().await.unwrap();
    assert!(!report.closed_by_client);

    assert!(handle.teardown());
    assert!(!handle.teardown());
    assert_eq!(peer.close_calls(), 0);
    assert_eq!(handle.snapshot().frames.len(), 1);
}

#[tokio::test]
async fn test_torn_down_wakes_waiter_after_server_close() {
    let (handle, peer, _) = start(200);
    let handle = Arc::new(handle);
    peer.close("gone").unwrap();
    handle.join().await.unwrap();

    let waiter_side = Arc::clone(&handle);
    let waiter = tokio::spawn(async move { waiter_side.torn_down().await });
    tokio::task::yield_now().await;
    assert!(!waiter.is_finished());

    handle.teardown();
    tokio::time::timeout(Duration::from_secs(5), waiter)
        .await
        .expect("waiter was not woken by teardown")
        .unwrap();

    // Already torn down: resolves at once.
    handle.torn_down().await;
}

#[tokio::test]
async fn test_dropping_handle_closes_socket() {
    let (handle, peer, _) = start(200);
    peer.open().unwrap();
    wait_until(&handle, |s| s.connected).await;
    drop(handle);

    // The driver closes the transport once it notices the shutdown.
    for _ in 0..100 {
        if peer.close_calls() == 1 {
            return;
        }
        tokio::task::yield_now().await;
    }
    panic!("transport was not closed after the handle was dropped");
}
