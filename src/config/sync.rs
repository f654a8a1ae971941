use serde::{Deserialize, Serialize};
use std::time::Duration;

/// Observer delivery settings.
#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct SyncConfig {
    /// Pending updates buffered per observer before further ones are dropped for it.
    /// TOML: `sync.observer_queue_capacity`. Default: `64`. Values below 1 are raised to 1.
    #[serde(default = "default_queue_capacity")]
    pub observer_queue_capacity: usize,

    /// Interval of SSE keep-alive comments on observer streams, in seconds.
    /// TOML: `sync.keep_alive_secs`. Default: `15`.
    #[serde(default = "default_keep_alive_secs")]
    pub keep_alive_secs: u64,
}

impl SyncConfig {
    pub fn keep_alive(&self) -> Duration {
        Duration::from_secs(self.keep_alive_secs.max(1))
    }
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            observer_queue_capacity: default_queue_capacity(),
            keep_alive_secs: default_keep_alive_secs(),
        }
    }
}

fn default_queue_capacity() -> usize {
    64
}

fn default_keep_alive_secs() -> u64 {
    15
}
