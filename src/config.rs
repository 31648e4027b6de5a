//! Persistent configuration model and defaults.

use crate::queue::DEFAULT_MAX_SIZE;

/// Root configuration persisted to `config.toml`.
#[derive(Debug, Clone, Default, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct Config {
    #[serde(default)]
    /// Queue capacity preferences.
    pub queue: QueueConfig,
    #[serde(default)]
    /// Remote reconciliation preferences.
    pub sync: SyncConfig,
}

/// Queue capacity preferences.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct QueueConfig {
    /// Sliding-window capacity. Oldest entries are dropped first once the
    /// queue exceeds it.
    #[serde(default = "default_max_size")]
    pub max_size: usize,
}

impl Default for QueueConfig {
    fn default() -> Self {
        Self {
            max_size: default_max_size(),
        }
    }
}

/// Remote reconciliation preferences.
#[derive(Debug, Clone, PartialEq, serde::Deserialize, serde::Serialize)]
pub struct SyncConfig {
    /// Push the changed-items set on the bus right after a new-session
    /// checkpoint, without waiting for the reconciler to ask.
    #[serde(default = "default_true")]
    pub push_changed_on_session_start: bool,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            push_changed_on_session_start: default_true(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_max_size() -> usize {
    DEFAULT_MAX_SIZE
}
