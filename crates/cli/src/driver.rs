// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Session driver.
//!
//! One tokio task owns the transport and the [`ConnectionSession`]. It is the
//! only place session state changes, so socket events, heartbeat ticks and
//! view commands are applied strictly one at a time in arrival order. After
//! every change the task publishes a [`ConsoleSnapshot`] on a watch channel.
//!
//! [`SessionHandle::teardown`] may be called from several places (the view
//! exiting, a termination signal). Only the first call has an effect.

use std::time::Duration;

use parking_lot::Mutex;
use tokio::sync::{mpsc, oneshot, watch};
use tokio::task::JoinHandle;
use tokio::time::{interval_at, Instant, MissedTickBehavior};

use crate::config::ConsoleConfig;
use crate::diagnostic::Diagnostic;
use crate::session::{ConnectionSession, ConsoleSnapshot, SessionState};
use crate::transport::{Transport, TransportEvent};

/// Heartbeat settings.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct HeartbeatConfig {
    pub interval: Duration,
    pub token: String,
}

impl HeartbeatConfig {
    pub fn from_config(config: &ConsoleConfig) -> Self {
        Self {
            interval: config.heartbeat_interval,
            token: config.heartbeat_token.clone(),
        }
    }
}

/// Requests from the view to the driver.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum ConsoleCommand {
    /// Empty the log buffer.
    Clear,
}

/// Summary of a finished driver task.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DriverReport {
    pub heartbeats_sent: u64,
    /// The session ended because of teardown rather than a server close.
    pub closed_by_client: bool,
    pub final_state: SessionState,
}

/// Handle to a running session.
pub struct SessionHandle {
    commands: mpsc::UnboundedSender<ConsoleCommand>,
    snapshots: watch::Receiver<ConsoleSnapshot>,
    shutdown: Mutex<Option<oneshot::Sender<()>>>,
    torn_down: watch::Sender<bool>,
    task: Mutex<Option<JoinHandle<DriverReport>>>,
}

/// Start driving `session` over `transport` on the current tokio runtime.
pub fn spawn_session<T>(
    transport: T,
    session: ConnectionSession,
    heartbeat: HeartbeatConfig,
) -> SessionHandle
where
    T: Transport + 'static,
{
    let (commands_tx, commands_rx) = mpsc::unbounded_channel();
    let (shutdown_tx, shutdown_rx) = oneshot::channel();
    let (snapshot_tx, snapshot_rx) = watch::channel(session.snapshot());

    let task = tokio::spawn(drive(
        transport,
        session,
        heartbeat,
        commands_rx,
        shutdown_rx,
        snapshot_tx,
    ));

    SessionHandle {
        commands: commands_tx,
        snapshots: snapshot_rx,
        shutdown: Mutex::new(Some(shutdown_tx)),
        torn_down: watch::Sender::new(false),
        task: Mutex::new(Some(task)),
    }
}

impl SessionHandle {
    /// Latest published snapshot.
    pub fn snapshot(&self) -> ConsoleSnapshot {
        self.snapshots.borrow().clone()
    }

    /// A receiver that is notified on every published snapshot.
    pub fn subscribe(&self) -> watch::Receiver<ConsoleSnapshot> {
        self.snapshots.clone()
    }

    /// Ask the driver to empty the buffer. A no-op once the driver has ended.
    pub fn clear(&self) {
        let _ = self.commands.send(ConsoleCommand::Clear);
    }

    /// Stop heartbeats and close the socket.
    ///
    /// Returns `true` for the call that performed the teardown and `false`
    /// for every later call.
    pub fn teardown(&self) -> bool {
        match self.shutdown.lock().take() {
            Some(tx) => {
                // The driver may already have finished after a server close.
                let _ = tx.send(());
                self.torn_down.send_replace(true);
                true
            }
            None => false,
        }
    }

    /// Whether [`SessionHandle::teardown`] has been called.
    pub fn is_torn_down(&self) -> bool {
        self.shutdown.lock().is_none()
    }

    /// Resolve once [`SessionHandle::teardown`] has been called, including
    /// calls made after the driver task has already ended.
    pub async fn torn_down(&self) {
        let mut rx = self.torn_down.subscribe();
        // The sender lives as long as `self`.
        let _ = rx.wait_for(|down| *down).await;
    }

    /// Wait for the driver task. `None` if it was already joined or panicked.
    pub async fn join(&self) -> Option<DriverReport> {
        let task = self.task.lock().take()?;
        task.await.ok()
    }
}

impl Drop for SessionHandle {
    fn drop(&mut self) {
        self.teardown();
    }
}

impl std::fmt::Debug for SessionHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("SessionHandle")
            .field("torn_down", &self.is_torn_down())
            .finish_non_exhaustive()
    }
}

async fn drive<T: Transport>(
    mut transport: T,
    mut session: ConnectionSession,
    heartbeat: HeartbeatConfig,
    mut commands: mpsc::UnboundedReceiver<ConsoleCommand>,
    mut shutdown: oneshot::Receiver<()>,
    snapshots: watch::Sender<ConsoleSnapshot>,
) -> DriverReport {
    // First beat one interval after start.
    let mut ticker = interval_at(Instant::now() + heartbeat.interval, heartbeat.interval);
    ticker.set_missed_tick_behavior(MissedTickBehavior::Delay);

    let mut report = DriverReport {
        heartbeats_sent: 0,
        closed_by_client: false,
        final_state: session.state(),
    };

    loop {
        tokio::select! {
            // Resolves on teardown, or with an error if the handle was dropped.
            _ = &mut shutdown => {
                if let Err(e) = transport.close().await {
                    session.report(Diagnostic::Transport { detail: e.to_string() });
                }
                session.on_close("closed by client");
                report.closed_by_client = true;
                snapshots.send_replace(session.snapshot());
                break;
            }
            event = transport.next_event() => {
                match event {
                    Some(TransportEvent::Open) => session.on_open(),
                    Some(TransportEvent::Message(payload)) => {
                        session.on_message(&payload);
                    }
                    Some(TransportEvent::Error(detail)) => session.on_error(&detail),
                    Some(TransportEvent::Closed(reason)) => session.on_close(&reason),
                    None => session.on_close("transport ended"),
                }
                snapshots.send_replace(session.snapshot());
                if session.state() == SessionState::Disconnected {
                    break;
                }
            }
            _ = ticker.tick(), if session.heartbeat_active() => {
                if transport.is_writable() {
                    match transport.send_text(&heartbeat.token).await {
                        Ok(()) => report.heartbeats_sent += 1,
                        Err(e) => session.report(Diagnostic::HeartbeatFailed { detail: e.to_string() }),
                    }
                }
            }
            Some(command) = commands.recv() => {
                match command {
                    ConsoleCommand::Clear => session.clear(),
                }
                snapshots.send_replace(session.snapshot());
            }
        }
    }

    report.final_state = session.state();
    report
}

#[cfg(test)]
#[path = "driver_tests.rs"]
mod tests;
