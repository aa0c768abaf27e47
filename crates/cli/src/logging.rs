// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! `tracing` subscriber setup.
//!
//! The interactive console owns the terminal, so log output must never reach
//! it: events go to `--log-file` when given and are discarded otherwise. In
//! plain and replay modes stderr is free and used as the default target.

use std::fs::{File, OpenOptions};
use std::io;
use std::path::{Path, PathBuf};
use std::sync::Mutex;
use tracing_subscriber::EnvFilter;

use crate::env;

/// Default filter when `AGENT_CONSOLE_LOG` is unset.
pub const DEFAULT_FILTER: &str = "info";

/// Where log events go.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum LogTarget {
    File(PathBuf),
    Stderr,
    Discard,
}

impl LogTarget {
    /// Pick the target for a run.
    pub fn select(log_file: Option<&Path>, terminal_owned: bool) -> Self {
        match log_file {
            Some(path) => Self::File(path.to_path_buf()),
            None if terminal_owned => Self::Discard,
            None => Self::Stderr,
        }
    }
}

fn filter() -> EnvFilter {
    env::log_filter()
        .and_then(|directive| EnvFilter::try_new(directive).ok())
        .unwrap_or_else(|| EnvFilter::new(DEFAULT_FILTER))
}

fn open_log_file(path: &Path) -> io::Result<File> {
    OpenOptions::new().create(true).append(true).open(path)
}

/// Install the global subscriber. Safe to call more than once; later calls
/// leave the first subscriber in place.
pub fn init_logging(target: &LogTarget) -> io::Result<()> {
    let builder = tracing_subscriber::fmt().with_env_filter(filter());
    match target {
        LogTarget::File(path) => {
            let file = open_log_file(path)?;
            let _ = builder
                .with_ansi(false)
                .with_writer(Mutex::new(file))
                .try_init();
        }
        LogTarget::Stderr => {
            let _ = builder.with_writer(io::stderr).try_init();
        }
        LogTarget::Discard => {
            let _ = builder.with_writer(io::sink).try_init();
        }
    }
    Ok(())
}

#[cfg(test)]
#[path = "logging_tests.rs"]
mod tests;
