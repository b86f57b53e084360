//! Configuration handling for the form

use anyhow::Result;
use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::PathBuf;
use std::time::Duration;

/// User configuration, read from `config.json` in the platform config dir
#[derive(Debug, Clone, Serialize, Deserialize, Default)]
pub struct FormConfig {
    /// Simulated backend latency in milliseconds
    pub submit_delay_ms: Option<u64>,
    /// Make the simulated backend reject every submission
    pub simulate_failure: Option<bool>,
    /// tracing filter directive, e.g. "microform=debug"
    pub log_filter: Option<String>,
    /// Event poll interval in milliseconds
    pub tick_rate_ms: Option<u64>,
}

impl FormConfig {
    const DEFAULT_SUBMIT_DELAY_MS: u64 = 1000;
    const DEFAULT_TICK_RATE_MS: u64 = 100;
    pub const DEFAULT_LOG_FILTER: &'static str = "microform=info";

    fn project_dirs() -> Option<ProjectDirs> {
        ProjectDirs::from("io", "microform", "microform-tui")
    }

    /// Get the config file path
    fn config_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.config_dir().join("config.json"))
    }

    /// Where the log file goes
    pub fn log_path() -> Option<PathBuf> {
        Self::project_dirs().map(|dirs| dirs.data_dir().join("microform.log"))
    }

    /// Load configuration from file
    pub fn load() -> Result<Self> {
        let path = Self::config_path();

        if let Some(path) = path {
            if path.exists() {
                let content = fs::read_to_string(&path)?;
                let config: FormConfig = serde_json::from_str(&content)?;
                return Ok(config);
            }
        }

        Ok(Self::default())
    }

    pub fn submit_delay(&self) -> Duration {
        Duration::from_millis(
            self.submit_delay_ms
                .unwrap_or(Self::DEFAULT_SUBMIT_DELAY_MS),
        )
    }

    pub fn simulate_failure(&self) -> bool {
        self.simulate_failure.unwrap_or(false)
    }

    pub fn log_filter(&self) -> &str {
        self.log_filter
            .as_deref()
            .unwrap_or(Self::DEFAULT_LOG_FILTER)
    }

    pub fn tick_rate(&self) -> Duration {
        Duration::from_millis(self.tick_rate_ms.unwrap_or(Self::DEFAULT_TICK_RATE_MS).max(1))
    }
}
