//! Store configuration
//!
//! Loaded from a JSON file or built in code. Every field has a default, so an
//! empty object `{}` is a valid configuration.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::{log_event, Event, Severity};
use crate::ranking::{TieBreak, DEFAULT_TREND_MARKER};

/// How non-identity orderings are produced
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SecondaryIndexPolicy {
    /// Build a temporary tree per query; nothing extra kept between queries
    #[default]
    RebuildPerQuery,
    /// Keep a date-ordered tree updated on every accepted write
    Maintained,
}

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("invalid config: {0}")]
    Invalid(String),
}

impl ConfigError {
    pub fn code(&self) -> &'static str {
        match self {
            ConfigError::Read { .. } => "CHIRP_CONFIG_READ",
            ConfigError::Parse(_) => "CHIRP_CONFIG_PARSE",
            ConfigError::Invalid(_) => "CHIRP_CONFIG_INVALID",
        }
    }
}

/// Result type for configuration
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration shared by all three stores
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, deny_unknown_fields)]
pub struct StoreConfig {
    /// Rebuild-per-query (default) or maintained secondary date indexes
    pub secondary_index_policy: SecondaryIndexPolicy,

    /// Prefix that marks a post token as a trend
    pub trend_marker: char,

    /// Tie-break among users with equal follower counts
    pub leaderboard_tie_break: TieBreak,

    /// Tie-break among trends with equal occurrence counts
    pub trend_tie_break: TieBreak,

    /// Minimum severity written by the logger
    pub log_level: Severity,
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self {
            secondary_index_policy: SecondaryIndexPolicy::RebuildPerQuery,
            trend_marker: DEFAULT_TREND_MARKER,
            leaderboard_tie_break: TieBreak::EarliestWins,
            trend_tie_break: TieBreak::LatestWins,
            log_level: Severity::Info,
        }
    }
}

impl StoreConfig {
    /// Load configuration from a JSON file
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;

        let config = Self::from_json(&content)?;

        let shown = path.display().to_string();
        log_event(
            Event::ConfigLoaded,
            &[
                ("path", shown.as_str()),
                ("secondary_index_policy", config.policy_name()),
            ],
        );

        Ok(config)
    }

    /// Parse and validate configuration from a JSON string
    pub fn from_json(json: &str) -> ConfigResult<Self> {
        let config: StoreConfig = serde_json::from_str(json)?;
        config.validate()?;
        Ok(config)
    }

    /// Validate field values serde cannot check
    pub fn validate(&self) -> ConfigResult<()> {
        if self.trend_marker.is_whitespace() {
            return Err(ConfigError::Invalid(
                "trend_marker must not be whitespace".to_string(),
            ));
        }
        Ok(())
    }

    /// Convenience for the maintained-index variant of the default config
    pub fn maintained() -> Self {
        Self {
            secondary_index_policy: SecondaryIndexPolicy::Maintained,
            ..Self::default()
        }
    }

    fn policy_name(&self) -> &'static str {
        match self.secondary_index_policy {
            SecondaryIndexPolicy::RebuildPerQuery => "rebuild_per_query",
            SecondaryIndexPolicy::Maintained => "maintained",
        }
    }
}
