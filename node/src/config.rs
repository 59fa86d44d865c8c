//! Node configuration with TOML file support.

use ivs_types::PolicyParams;
use ivs_utils::LogFormat;
use serde::{Deserialize, Serialize};
use std::path::Path;

use crate::NodeError;

/// Configuration for a validator node.
///
/// Can be loaded from a TOML file via [`NodeConfig::from_toml_file`] or
/// built programmatically (e.g. for tests).
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct NodeConfig {
    /// Human-readable validator label used in logs.
    #[serde(default = "default_label")]
    pub label: String,

    /// How long to wait for a peer's vote before counting it as a "no"
    /// (milliseconds).
    #[serde(default = "default_vote_timeout_ms")]
    pub vote_timeout_ms: u64,

    /// Inbox capacity for submissions, vote requests, and gossip.
    #[serde(default = "default_inbox_capacity")]
    pub inbox_capacity: usize,

    /// Maximum out-of-order submissions parked while waiting for a
    /// sequence gap to fill.
    #[serde(default = "default_max_parked")]
    pub max_parked: usize,

    /// Log format: "human" or "json".
    #[serde(default = "default_log_format")]
    pub log_format: String,

    /// Log level filter: "trace", "debug", "info", "warn", "error".
    #[serde(default = "default_log_level")]
    pub log_level: String,

    /// Policy parameters (distributed with the deployment, not per-node).
    #[serde(default)]
    pub params: PolicyParams,
}

fn default_label() -> String {
    "validator".to_string()
}

fn default_vote_timeout_ms() -> u64 {
    500
}

fn default_inbox_capacity() -> usize {
    1024
}

fn default_max_parked() -> usize {
    1024
}

fn default_log_format() -> String {
    "human".to_string()
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for NodeConfig {
    fn default() -> Self {
        Self {
            label: default_label(),
            vote_timeout_ms: default_vote_timeout_ms(),
            inbox_capacity: default_inbox_capacity(),
            max_parked: default_max_parked(),
            log_format: default_log_format(),
            log_level: default_log_level(),
            params: PolicyParams::default(),
        }
    }
}

impl NodeConfig {
    /// Load configuration from a TOML file.
    pub fn from_toml_file(path: impl AsRef<Path>) -> Result<Self, NodeError> {
        let raw = std::fs::read_to_string(path.as_ref())
            .map_err(|e| NodeError::Config(format!("read {}: {e}", path.as_ref().display())))?;
        toml::from_str(&raw).map_err(|e| NodeError::Config(e.to_string()))
    }

    /// A config with a specific label and everything else defaulted.
    pub fn with_label(label: impl Into<String>) -> Self {
        Self {
            label: label.into(),
            ..Self::default()
        }
    }

    /// The parsed log format, rejecting unknown names at startup rather
    /// than at first log line.
    pub fn parse_log_format(&self) -> Result<LogFormat, NodeError> {
        self.log_format.parse().map_err(NodeError::Config)
    }
}
