//! Background worker configuration.

use serde::{Deserialize, Serialize};

/// Background maintenance worker configuration.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct WorkerConfig {
    /// Whether the maintenance scheduler is enabled.
    #[serde(default = "default_true")]
    pub enabled: bool,
    /// Cron expression for the orphan-staging sweep (default hourly).
    #[serde(default = "default_staging_sweep_schedule")]
    pub staging_sweep_schedule: String,
    /// Age in seconds after which an untouched staging directory is swept.
    #[serde(default = "default_staging_max_age")]
    pub staging_max_age_seconds: u64,
}

impl Default for WorkerConfig {
    fn default() -> Self {
        Self {
            enabled: default_true(),
            staging_sweep_schedule: default_staging_sweep_schedule(),
            staging_max_age_seconds: default_staging_max_age(),
        }
    }
}

fn default_true() -> bool {
    true
}

fn default_staging_sweep_schedule() -> String {
    "0 0 * * * *".to_string()
}

fn default_staging_max_age() -> u64 {
    86_400 // 24 hours
}
