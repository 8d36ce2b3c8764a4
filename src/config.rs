//! Settings loaded from a TOML file.
//!
//! ```toml
//! [source]
//! board_id = "5f1c0ffee"
//! api_key = "..."
//! token = "..."
//!
//! [target]
//! project_id = "2400000"
//! token = "..."
//!
//! [columns]
//! "To Do" = "unstarted"
//! "Doing" = "started"
//! "Done" = "finished"
//!
//! [estimate]
//! policy = "elapsed_days"
//!
//! [store]
//! database_url = "postgres://cardbridge@localhost/cardbridge"
//! ```

use crate::sync::{
    domain::{EstimatePolicy, ItemState},
    services::{ColumnMap, FieldTranslator},
};
use serde::Deserialize;
use std::{
    collections::BTreeMap,
    path::{Path, PathBuf},
    time::Duration,
};
use thiserror::Error;

/// Root configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct SyncConfig {
    /// Board API settings.
    pub source: SourceConfig,
    /// Tracker API settings.
    pub target: TargetConfig,
    /// List-name to story-state overrides.
    #[serde(default)]
    pub columns: BTreeMap<String, String>,
    /// Estimate heuristic settings.
    #[serde(default)]
    pub estimate: EstimateConfig,
    /// Identity store settings.
    pub store: StoreConfig,
    /// Webhook listener and client settings.
    #[serde(default)]
    pub http: HttpConfig,
}

/// Board API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct SourceConfig {
    /// Board whose cards are mirrored.
    pub board_id: String,
    /// API key.
    pub api_key: String,
    /// API token.
    pub token: String,
    /// REST base URL.
    #[serde(default = "default_source_base_url")]
    pub base_url: String,
}

/// Tracker API settings.
#[derive(Debug, Clone, Deserialize)]
pub struct TargetConfig {
    /// Project receiving the stories.
    pub project_id: String,
    /// API token.
    pub token: String,
    /// REST base URL.
    #[serde(default = "default_target_base_url")]
    pub base_url: String,
}

/// Estimate heuristic settings.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct EstimateConfig {
    /// How the day gap to the due date is measured.
    #[serde(default)]
    pub policy: EstimatePolicy,
}

/// Identity store settings.
#[derive(Debug, Clone, Deserialize)]
pub struct StoreConfig {
    /// `PostgreSQL` connection URL.
    pub database_url: String,
    /// Maximum pooled connections (default: 4).
    #[serde(default = "default_pool_size")]
    pub pool_size: u32,
}

/// Webhook listener and client settings.
#[derive(Debug, Clone, Deserialize)]
pub struct HttpConfig {
    /// Listener address (default: 0.0.0.0:8080).
    #[serde(default = "default_bind_address")]
    pub bind_address: String,
    /// Timeout for outbound API calls, in seconds (default: 30).
    #[serde(default = "default_request_timeout_secs")]
    pub request_timeout_secs: u64,
    /// Notifications buffered ahead of the dispatcher (default: 256).
    #[serde(default = "default_queue_capacity")]
    pub queue_capacity: usize,
}

impl Default for HttpConfig {
    fn default() -> Self {
        Self {
            bind_address: default_bind_address(),
            request_timeout_secs: default_request_timeout_secs(),
            queue_capacity: default_queue_capacity(),
        }
    }
}

impl HttpConfig {
    /// Returns the outbound request timeout.
    #[must_use]
    pub const fn request_timeout(&self) -> Duration {
        Duration::from_secs(self.request_timeout_secs)
    }
}

fn default_source_base_url() -> String {
    "https://api.trello.com/1".to_owned()
}

fn default_target_base_url() -> String {
    "https://www.pivotaltracker.com/services/v5".to_owned()
}

const fn default_pool_size() -> u32 {
    4
}

fn default_bind_address() -> String {
    "0.0.0.0:8080".to_owned()
}

const fn default_request_timeout_secs() -> u64 {
    30
}

const fn default_queue_capacity() -> usize {
    256
}

impl SyncConfig {
    /// Loads configuration from a TOML file.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] when the file cannot be read or parsed.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content).map_err(|err| match err {
            ConfigError::Parse { source, .. } => ConfigError::Parse {
                path: Some(path.to_path_buf()),
                source,
            },
            other => other,
        })
    }

    /// Parses configuration from TOML text.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::Parse`] for invalid TOML or missing fields.
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        toml::from_str(content).map_err(|source| ConfigError::Parse { path: None, source })
    }

    /// Builds the column map from the `[columns]` table.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidState`] when an entry names an unknown
    /// story state.
    pub fn column_map(&self) -> Result<ColumnMap, ConfigError> {
        self.columns
            .iter()
            .try_fold(ColumnMap::new(), |map, (column, state)| {
                let parsed =
                    ItemState::try_from(state.as_str()).map_err(|_| ConfigError::InvalidState {
                        column: column.clone(),
                        state: state.clone(),
                    })?;
                Ok(map.with_column(column, parsed))
            })
    }

    /// Builds the field translator from the column and estimate settings.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidState`] as for [`Self::column_map`].
    pub fn translator(&self) -> Result<FieldTranslator, ConfigError> {
        Ok(FieldTranslator::new(self.column_map()?, self.estimate.policy))
    }
}

/// Configuration errors.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// The file could not be read.
    #[error("failed to read config file {path}: {source}")]
    Read {
        /// Configuration file path.
        path: PathBuf,
        /// Underlying I/O error.
        source: std::io::Error,
    },
    /// The TOML was invalid or incomplete.
    #[error("failed to parse config: {source}")]
    Parse {
        /// Configuration file path, when loaded from disk.
        path: Option<PathBuf>,
        /// Underlying TOML error.
        source: toml::de::Error,
    },
    /// A `[columns]` entry names an unknown story state.
    #[error("column {column:?} maps to unknown story state {state:?}")]
    InvalidState {
        /// Board list name.
        column: String,
        /// Configured state.
        state: String,
    },
}
