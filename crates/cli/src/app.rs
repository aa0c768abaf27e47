// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Top-level commands.

use std::io::{self, IsTerminal};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use agent_console_frames::FrameRecorder;
use thiserror::Error;
use uuid::Uuid;

use crate::cli::{Cli, Command, ConsoleArgs};
use crate::config::{ConfigError, ConsoleConfig};
use crate::diagnostic::{print_warning, TracingSink};
use crate::driver::{spawn_session, HeartbeatConfig};
use crate::logging::{init_logging, LogTarget};
use crate::replay::{self, ReplayError};
use crate::session::ConnectionSession;
use crate::time::ClockHandle;
use crate::view;
use crate::ws::WsTransport;

#[derive(Debug, Error)]
pub enum AppError {
    #[error(transparent)]
    Config(#[from] ConfigError),

    #[error(transparent)]
    Replay(#[from] ReplayError),

    #[error("Failed to open recording file {}: {source}", path.display())]
    Record { path: PathBuf, source: io::Error },

    #[error("Failed to open log file {}: {source}", path.display())]
    LogFile { path: PathBuf, source: io::Error },

    #[error("Terminal error: {0}")]
    Terminal(#[from] io::Error),
}

/// Run the command selected on the command line.
pub async fn run(cli: Cli) -> Result<(), AppError> {
    let config = ConsoleConfig::load(&cli.console)?;
    match cli.command() {
        Command::Watch => run_watch(&cli.console, &config).await,
        Command::Replay { file } => run_replay(&cli.console, &config, &file).await,
    }
}

fn start_logging(args: &ConsoleArgs, terminal_owned: bool) -> Result<(), AppError> {
    let target = LogTarget::select(args.log_file.as_deref(), terminal_owned);
    init_logging(&target).map_err(|source| AppError::LogFile {
        path: args.log_file.clone().unwrap_or_default(),
        source,
    })
}

fn build_session(config: &ConsoleConfig, session_id: &str) -> Result<ConnectionSession, AppError> {
    let sink = Arc::new(TracingSink::new(session_id));
    let session = ConnectionSession::from_config(config, ClockHandle::system(), sink);
    match &config.record {
        Some(path) => {
            let recorder = FrameRecorder::append(path).map_err(|source| AppError::Record {
                path: path.clone(),
                source,
            })?;
            Ok(session.with_recorder(recorder))
        }
        None => Ok(session),
    }
}

/// Connect to the log stream and show it until the user quits, the server
/// closes (plain mode) or a termination signal arrives.
pub async fn run_watch(args: &ConsoleArgs, config: &ConsoleConfig) -> Result<(), AppError> {
    let interactive = !args.plain && io::stdout().is_terminal();
    start_logging(args, interactive)?;

    let session_id = Uuid::new_v4().to_string();
    tracing::info!(
        session = %session_id,
        endpoint = %config.endpoint,
        capacity = config.capacity,
        "starting agent console"
    );
    if config.endpoint.scheme() == "wss" {
        print_warning(format_args!(
            "this build has no TLS support; connecting to {} will fail",
            config.endpoint
        ));
    }
    let session = build_session(config, &session_id)?;
    let transport = WsTransport::new(config.endpoint.clone());
    let handle = Arc::new(spawn_session(
        transport,
        session,
        HeartbeatConfig::from_config(config),
    ));

    let signal_handle = Arc::clone(&handle);
    let signals = tokio::spawn(async move {
        let signal = wait_for_signal().await;
        tracing::info!(signal, "received termination signal");
        signal_handle.teardown();
    });

    let result = if interactive {
        view::run_interactive(&handle, config.auto_scroll).await
    } else {
        view::run_plain(&handle, &mut io::stdout(), false).await
    };

    signals.abort();
    handle.teardown();
    if let Some(report) = handle.join().await {
        tracing::info!(
            session = %session_id,
            heartbeats = report.heartbeats_sent,
            closed_by_client = report.closed_by_client,
            "agent console stopped"
        );
    }
    result.map_err(AppError::from)
}

/// Replay recorded payloads and print the resulting buffer.
pub async fn run_replay(
    args: &ConsoleArgs,
    config: &ConsoleConfig,
    file: &Path,
) -> Result<(), AppError> {
    start_logging(args, false)?;

    let payloads = replay::load_payloads(file)?;
    let session = build_session(config, &Uuid::new_v4().to_string())?;
    let snapshot = replay::replay(payloads, session, HeartbeatConfig::from_config(config)).await?;

    let stdout = io::stdout();
    let ansi = !args.plain && stdout.is_terminal();
    view::print_snapshot(&snapshot, &mut stdout.lock(), ansi)?;
    Ok(())
}

/// Resolve with the name of the first termination signal received.
#[cfg(unix)]
async fn wait_for_signal() -> &'static str {
    use tokio::signal::unix::{signal, SignalKind};

    let (Ok(mut term), Ok(mut hup)) = (
        signal(SignalKind::terminate()),
        signal(SignalKind::hangup()),
    ) else {
        return ctrl_c().await;
    };
    tokio::select! {
        name = ctrl_c() => name,
        _ = term.recv() => "SIGTERM",
        _ = hup.recv() => "SIGHUP",
    }
}

#[cfg(not(unix))]
async fn wait_for_signal() -> &'static str {
    ctrl_c().await
}

async fn ctrl_c() -> &'static str {
    match tokio::signal::ctrl_c().await {
        Ok(()) => "SIGINT",
        // No handler could be installed; never fire.
        Err(_) => std::future::pending().await,
    }
}
