//! Board configuration loaded with figment.
//!
//! Sources, later overriding earlier:
//! 1. Built-in defaults
//! 2. `taskboard.toml` in the data directory
//! 3. `TASKBOARD_*` environment variables
//! 4. An explicit data directory passed by the caller

use crate::error::Result;
use crate::store::CompletionPolicy;
use figment::{
    providers::{Env, Format, Serialized, Toml},
    Figment,
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Name of the optional config file inside the data directory
pub const CONFIG_FILE_NAME: &str = "taskboard.toml";

/// Environment variable prefix
pub const ENV_PREFIX: &str = "TASKBOARD_";

const DATA_DIR_NAME: &str = "taskboard";

/// Longest notification display time honoured; larger values are clamped
pub const MAX_NOTIFICATION_TIMEOUT_SECS: u64 = 24 * 60 * 60;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct BoardConfig {
    /// Directory holding the board's slot files
    pub data_dir: PathBuf,
    /// What toggling a task to completed does to its column
    pub completion_policy: CompletionPolicy,
    /// Seconds a notification stays visible
    pub notification_timeout_secs: u64,
}

impl Default for BoardConfig {
    fn default() -> Self {
        Self {
            data_dir: default_data_dir(),
            completion_policy: CompletionPolicy::default(),
            notification_timeout_secs: crate::notification::DEFAULT_DISPLAY_SECS as u64,
        }
    }
}

/// Platform data directory for the board, e.g. `~/.local/share/taskboard`
pub fn default_data_dir() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DATA_DIR_NAME)
}

impl BoardConfig {
    /// Load configuration from all sources.
    ///
    /// `data_dir` both locates `taskboard.toml` and wins over any data
    /// directory named in the file or environment.
    pub fn load(data_dir: Option<&Path>) -> Result<Self> {
        let figment = Self::figment(data_dir);
        let config: BoardConfig = figment.extract()?;
        if config.notification_timeout_secs > MAX_NOTIFICATION_TIMEOUT_SECS {
            warn!(
                requested = config.notification_timeout_secs,
                max = MAX_NOTIFICATION_TIMEOUT_SECS,
                "notification timeout too large, clamping"
            );
        }
        debug!(data_dir = %config.data_dir.display(), policy = ?config.completion_policy, "loaded configuration");
        Ok(config)
    }

    fn figment(data_dir: Option<&Path>) -> Figment {
        let lookup_dir = data_dir
            .map(Path::to_path_buf)
            .or_else(|| std::env::var_os(format!("{ENV_PREFIX}DATA_DIR")).map(PathBuf::from))
            .unwrap_or_else(default_data_dir);

        let mut figment = Figment::new()
            .merge(Serialized::defaults(BoardConfig::default()))
            .merge(Toml::file(lookup_dir.join(CONFIG_FILE_NAME)))
            .merge(Env::prefixed(ENV_PREFIX));

        if let Some(dir) = data_dir {
            figment = figment.merge(Serialized::default("data_dir", dir));
        }

        figment
    }

    /// Notification display time, clamped to [`MAX_NOTIFICATION_TIMEOUT_SECS`]
    pub fn notification_timeout(&self) -> chrono::Duration {
        let secs = self
            .notification_timeout_secs
            .min(MAX_NOTIFICATION_TIMEOUT_SECS);
        chrono::Duration::seconds(secs as i64)
    }
}
