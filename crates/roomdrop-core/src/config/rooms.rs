//! Room lifecycle configuration.

use serde::{Deserialize, Serialize};

/// Room lifecycle configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RoomConfig {
    /// TTL values at or above this many seconds mean "never expires".
    #[serde(default = "default_never_expire_threshold")]
    pub never_expire_threshold_seconds: u64,
}

impl Default for RoomConfig {
    fn default() -> Self {
        Self {
            never_expire_threshold_seconds: default_never_expire_threshold(),
        }
    }
}

fn default_never_expire_threshold() -> u64 {
    20_000
}
