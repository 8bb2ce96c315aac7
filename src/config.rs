use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{HeraldError, Result};

pub const CONFIG_ENV: &str = "HERALD_CONFIG";

/// Engine tuning. Every field has a default so a partial JSON file is valid.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// Period between inference rounds.
    pub inference_period_ms: u64,
    /// Quiet gap enforced between two notifications.
    pub cooldown_ms: u64,
    /// Maximum number of notifications waiting behind the displayed one.
    pub queue_capacity: usize,
    /// Surface a generic error toast when a collaborator call fails.
    pub notify_on_collaborator_failure: bool,
    /// Base URL of the job/connection API. Offline when absent.
    pub jobs_api_url: Option<String>,
    /// Directory for durable key/value storage. In-memory when absent.
    pub storage_dir: Option<PathBuf>,
    /// Telemetry events kept before the oldest are dropped.
    pub telemetry_capacity: usize,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            inference_period_ms: 5_000,
            cooldown_ms: 30_000,
            queue_capacity: 50,
            notify_on_collaborator_failure: false,
            jobs_api_url: None,
            storage_dir: None,
            telemetry_capacity: 10_000,
        }
    }
}

impl EngineConfig {
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let raw = fs::read_to_string(path).map_err(|e| {
            HeraldError::config(format!("failed to read {}: {e}", path.display()))
        })?;
        let config: Self = serde_json::from_str(&raw)?;
        config.validate()?;
        Ok(config)
    }

    /// Loads from the file named by `HERALD_CONFIG`, falling back to defaults.
    pub fn from_env() -> Result<Self> {
        match std::env::var_os(CONFIG_ENV) {
            Some(path) => Self::load(PathBuf::from(path)),
            None => Ok(Self::default()),
        }
    }

    pub fn validate(&self) -> Result<()> {
        if self.inference_period_ms == 0 {
            return Err(HeraldError::config("inference_period_ms must be positive"));
        }
        if self.queue_capacity == 0 {
            return Err(HeraldError::config("queue_capacity must be positive"));
        }
        if self.telemetry_capacity == 0 {
            return Err(HeraldError::config("telemetry_capacity must be positive"));
        }
        Ok(())
    }

    pub fn inference_period(&self) -> Duration {
        Duration::from_millis(self.inference_period_ms)
    }

    pub fn cooldown(&self) -> Duration {
        Duration::from_millis(self.cooldown_ms)
    }
}
