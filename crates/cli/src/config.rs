// SPDX-License-Identifier: MIT
// Copyright (c) 2026 Alfred Jean LLC

//! Console configuration.
//!
//! Values are layered: built-in defaults, then the TOML config file, then
//! command-line flags (which clap also fills from `AGENT_CONSOLE_*` env vars).

use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use std::time::Duration;
use thiserror::Error;
use url::Url;

use agent_console_frames::{DEFAULT_CAPACITY, HEARTBEAT_REPLY};

use crate::cli::ConsoleArgs;
use crate::env;

/// Default agent log stream endpoint
pub const DEFAULT_ENDPOINT: &str = "ws://localhost:8000/ws/agent-console";
/// Default seconds between heartbeats
pub const DEFAULT_HEARTBEAT_SECS: u64 = 30;
/// Default heartbeat payload
pub const DEFAULT_HEARTBEAT_TOKEN: &str = "ping";

/// Errors that can occur while building the configuration
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file '{path}': {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Failed to parse TOML: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("Invalid endpoint '{url}': {source}")]
    InvalidUrl {
        url: String,
        #[source]
        source: url::ParseError,
    },

    #[error("Unsupported endpoint scheme '{0}' (expected ws or wss)")]
    UnsupportedScheme(String),

    #[error("Capacity must be at least 1")]
    InvalidCapacity,

    #[error("Heartbeat interval must be at least 1 second")]
    InvalidHeartbeat,

    #[error("Heartbeat {0} must not be empty")]
    EmptyToken(&'static str),
}

/// Contents of the TOML config file. Every key is optional.
#[derive(Clone, Debug, Default, Deserialize, Serialize, PartialEq, Eq)]
#[serde(deny_unknown_fields)]
pub struct FileConfig {
    /// WebSocket endpoint of the agent log stream
    #[serde(default)]
    pub url: Option<String>,

    /// Maximum number of frames kept (default: 200)
    #[serde(default)]
    pub capacity: Option<usize>,

    /// Follow the newest frame (default: true)
    #[serde(default)]
    pub auto_scroll: Option<bool>,

    /// Seconds between heartbeats (default: 30)
    #[serde(default)]
    pub heartbeat_secs: Option<u64>,

    /// Payload sent as heartbeat (default: "ping")
    #[serde(default)]
    pub heartbeat_token: Option<String>,

    /// Payload the server sends back, never shown (default: "pong")
    #[serde(default)]
    pub heartbeat_reply: Option<String>,

    /// JSONL file to record frames into
    #[serde(default)]
    pub record: Option<PathBuf>,
}

impl FileConfig {
    /// Load a config file.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::parse(&content)
    }

    pub fn parse(content: &str) -> Result<Self, ConfigError> {
        Ok(toml::from_str(content)?)
    }
}

/// Resolved console configuration
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ConsoleConfig {
    pub endpoint: Url,
    pub capacity: usize,
    pub auto_scroll: bool,
    pub heartbeat_interval: Duration,
    pub heartbeat_token: String,
    pub heartbeat_reply: String,
    pub record: Option<PathBuf>,
}

impl Default for ConsoleConfig {
    fn default() -> Self {
        Self {
            endpoint: default_endpoint(),
            capacity: DEFAULT_CAPACITY,
            auto_scroll: true,
            heartbeat_interval: Duration::from_secs(DEFAULT_HEARTBEAT_SECS),
            heartbeat_token: DEFAULT_HEARTBEAT_TOKEN.to_string(),
            heartbeat_reply: HEARTBEAT_REPLY.to_string(),
            record: None,
        }
    }
}

#[allow(clippy::expect_used)]
fn default_endpoint() -> Url {
    Url::parse(DEFAULT_ENDPOINT).expect("DEFAULT_ENDPOINT is a valid URL")
}

impl ConsoleConfig {
    /// Build the configuration for a run.
    ///
    /// The config file is `--config` when given, otherwise the default path
    /// if it exists. A missing default file is not an error.
    pub fn load(args: &ConsoleArgs) -> Result<Self, ConfigError> {
        let file = match &args.config {
            Some(path) => FileConfig::load(path)?,
            None => match env::default_config_path().filter(|p| p.is_file()) {
                Some(path) => FileConfig::load(&path)?,
                None => FileConfig::default(),
            },
        };
        Self::resolve(&file, args)
    }

    /// Layer `file` and `args` over the defaults and validate the result.
    pub fn resolve(file: &FileConfig, args: &ConsoleArgs) -> Result<Self, ConfigError> {
        let defaults = Self::default();

        let url = args.url.as_ref().or(file.url.as_ref());
        let endpoint = match url {
            Some(url) => parse_endpoint(url)?,
            None => defaults.endpoint,
        };

        let capacity = args.capacity.or(file.capacity).unwrap_or(defaults.capacity);
        if capacity == 0 {
            return Err(ConfigError::InvalidCapacity);
        }

        let heartbeat_secs = args
            .heartbeat_secs
            .or(file.heartbeat_secs)
            .unwrap_or(DEFAULT_HEARTBEAT_SECS);
        if heartbeat_secs == 0 {
            return Err(ConfigError::InvalidHeartbeat);
        }

        let heartbeat_token = file
            .heartbeat_token
            .clone()
            .unwrap_or(defaults.heartbeat_token);
        if heartbeat_token.is_empty() {
            return Err(ConfigError::EmptyToken("token"));
        }
        let heartbeat_reply = file
            .heartbeat_reply
            .clone()
            .unwrap_or(defaults.heartbeat_reply);
        if heartbeat_reply.is_empty() {
            return Err(ConfigError::EmptyToken("reply"));
        }

        Ok(Self {
            endpoint,
            capacity,
            auto_scroll: args
                .auto_scroll_override()
                .or(file.auto_scroll)
                .unwrap_or(defaults.auto_scroll),
            heartbeat_interval: Duration::from_secs(heartbeat_secs),
            heartbeat_token,
            heartbeat_reply,
            record: args.record.clone().or_else(|| file.record.clone()),
        })
    }
}

/// Parse and check a WebSocket endpoint.
pub fn parse_endpoint(url: &str) -> Result<Url, ConfigError> {
    let parsed = Url::parse(url).map_err(|source| ConfigError::InvalidUrl {
        url: url.to_string(),
        source,
    })?;
    match parsed.scheme() {
        "ws" | "wss" => Ok(parsed),
        other => Err(ConfigError::UnsupportedScheme(other.to_string())),
    }
}

#[cfg(test)]
#[path = "config_tests.rs"]
mod tests;
