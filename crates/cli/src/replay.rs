// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Offline replay of recorded payloads.
//!
//! Each non-blank input line is one inbound payload in wire format (a frame
//! as JSON, or the heartbeat reply). The payloads run through a real session
//! over an in-memory transport: open, every payload in order, then close.

use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::{Path, PathBuf};

use thiserror::Error;

use crate::driver::{spawn_session, HeartbeatConfig};
use crate::session::{ConnectionSession, ConsoleSnapshot};
use crate::transport::{ChannelTransport, TransportError};

/// Close reason reported when the input is exhausted.
pub const REPLAY_CLOSE_REASON: &str = "replay finished";

#[derive(Debug, Error)]
pub enum ReplayError {
    #[error("Failed to read {}: {source}", path.display())]
    Read { path: PathBuf, source: io::Error },

    #[error("Replay transport failed: {0}")]
    Transport(#[from] TransportError),

    #[error("Replay session ended abnormally")]
    Aborted,
}

/// Split input into payloads, skipping blank lines.
pub fn read_payloads<R: BufRead>(reader: R) -> io::Result<Vec<String>> {
    let mut payloads = Vec::new();
    for line in reader.lines() {
        let line = line?;
        let line = line.trim_end_matches('\r');
        if line.trim().is_empty() {
            continue;
        }
        payloads.push(line.to_string());
    }
    Ok(payloads)
}

/// Read payloads from `path`, or from stdin when `path` is `-`.
pub fn load_payloads(path: &Path) -> Result<Vec<String>, ReplayError> {
    let read_err = |source| ReplayError::Read {
        path: path.to_path_buf(),
        source,
    };
    if path == Path::new("-") {
        return read_payloads(io::stdin().lock()).map_err(read_err);
    }
    let file = File::open(path).map_err(read_err)?;
    read_payloads(BufReader::new(file)).map_err(read_err)
}

/// Feed `payloads` through `session` and return its final snapshot.
pub async fn replay(
    payloads: Vec<String>,
    session: ConnectionSession,
    heartbeat: HeartbeatConfig,
) -> Result<ConsoleSnapshot, ReplayError> {
    let (transport, peer) = ChannelTransport::pair();
    let handle = spawn_session(transport, session, heartbeat);

    peer.open()?;
    for payload in payloads {
        peer.send(payload)?;
    }
    peer.close(REPLAY_CLOSE_REASON)?;

    let report = handle.join().await.ok_or(ReplayError::Aborted)?;
    tracing::debug!(
        heartbeats = report.heartbeats_sent,
        state = ?report.final_state,
        "replay finished"
    );
    Ok(handle.snapshot())
}

#[cfg(test)]
#[path = "replay_tests.rs"]
mod tests;
