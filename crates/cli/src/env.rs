// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Centralized environment variable access.
//!
//! `AGENT_CONSOLE_CONFIG`, `AGENT_CONSOLE_URL` and `AGENT_CONSOLE_CAPACITY`
//! are read by clap directly; the names are still defined here so tests and
//! docs refer to one spelling.

/// Generated env var name constants.
mod names {
    include!(concat!(env!("OUT_DIR"), "/env_names.rs"));
}

pub use names::*;

use std::path::PathBuf;

/// `AGENT_CONSOLE_LOG` — tracing filter directive (e.g. `debug`, `agent_console=trace`).
pub fn log_filter() -> Option<String> {
    std::env::var(names::AGENT_CONSOLE_LOG)
        .ok()
        .filter(|v| !v.trim().is_empty())
}

/// Default location of the TOML config file, if a base directory is known.
///
/// `$XDG_CONFIG_HOME/agent-console/config.toml`, falling back to
/// `$HOME/.config/agent-console/config.toml`.
pub fn default_config_path() -> Option<PathBuf> {
    config_path_from(
        std::env::var(names::XDG_CONFIG_HOME).ok(),
        std::env::var(names::HOME).ok(),
    )
}

fn config_path_from(xdg_config_home: Option<String>, home: Option<String>) -> Option<PathBuf> {
    let base = match xdg_config_home.filter(|v| !v.is_empty()) {
        Some(xdg) => PathBuf::from(xdg),
        None => PathBuf::from(home.filter(|v| !v.is_empty())?).join(".config"),
    };
    Some(base.join("agent-console").join("config.toml"))
}

#[cfg(test)]
#[path = "env_tests.rs"]
mod tests;
