// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Command-line arguments.

use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

/// Live console for the agent log stream
#[derive(Parser, Debug, Clone)]
#[command(name = "agent-console", version, about = "Live console for the agent log stream")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Option<Command>,

    #[command(flatten)]
    pub console: ConsoleArgs,
}

impl Cli {
    /// The subcommand to run; `watch` when none is given.
    pub fn command(&self) -> Command {
        self.command.clone().unwrap_or(Command::Watch)
    }
}

#[derive(Subcommand, Debug, Clone, PartialEq, Eq)]
pub enum Command {
    /// Connect to the log stream and show frames as they arrive (default)
    Watch,

    /// Feed recorded payloads (one per line) through a session and print the result
    Replay {
        /// Payload file, or `-` for stdin
        #[arg(value_name = "FILE")]
        file: PathBuf,
    },
}

/// Flags shared by every subcommand. Unset flags fall back to the config
/// file, then to built-in defaults.
#[derive(Args, Debug, Clone, Default)]
pub struct ConsoleArgs {
    /// TOML config file
    #[arg(long, global = true, value_name = "PATH", env = "AGENT_CONSOLE_CONFIG")]
    pub config: Option<PathBuf>,

    /// WebSocket endpoint of the agent log stream
    #[arg(long, global = true, value_name = "URL", env = "AGENT_CONSOLE_URL")]
    pub url: Option<String>,

    /// Maximum number of frames kept on screen
    #[arg(long, global = true, value_name = "N", env = "AGENT_CONSOLE_CAPACITY")]
    pub capacity: Option<usize>,

    /// Seconds between heartbeats
    #[arg(long, global = true, value_name = "SECS")]
    pub heartbeat_secs: Option<u64>,

    /// Follow the newest frame
    #[arg(long, global = true, conflicts_with = "no_auto_scroll")]
    pub auto_scroll: bool,

    /// Keep the view where it is when frames arrive
    #[arg(long, global = true)]
    pub no_auto_scroll: bool,

    /// Append every buffered frame to this JSONL file
    #[arg(long, global = true, value_name = "PATH")]
    pub record: Option<PathBuf>,

    /// Print rows line by line instead of drawing a full-screen view
    #[arg(long, global = true)]
    pub plain: bool,

    /// Write diagnostics to this file
    #[arg(long, global = true, value_name = "PATH")]
    pub log_file: Option<PathBuf>,
}

impl ConsoleArgs {
    /// Auto-scroll override, if either flag was given.
    pub fn auto_scroll_override(&self) -> Option<bool> {
        match (self.auto_scroll, self.no_auto_scroll) {
            (true, _) => Some(true),
            (_, true) => Some(false),
            _ => None,
        }
    }
}

#[cfg(test)]
#[path = "cli_tests.rs"]
mod tests;
