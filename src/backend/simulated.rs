//! Fixed-delay stand-in for a real submission endpoint

use super::traits::SubmitBackend;
use crate::config::FormConfig;
use crate::state::{FormData, SubmitReceipt};
use anyhow::{bail, Result};
use async_trait::async_trait;
use chrono::Utc;
use std::time::Duration;
use uuid::Uuid;

/// Waits `delay`, then accepts the form (or rejects it when `fail` is set)
#[derive(Debug, Clone)]
pub struct SimulatedBackend {
    delay: Duration,
    fail: bool,
}

impl SimulatedBackend {
    pub const DEFAULT_DELAY: Duration = Duration::from_millis(1000);

    pub fn new(delay: Duration, fail: bool) -> Self {
        Self { delay, fail }
    }

    pub fn from_config(config: &FormConfig) -> Self {
        Self::new(config.submit_delay(), config.simulate_failure())
    }

    pub fn delay(&self) -> Duration {
        self.delay
    }
}

impl Default for SimulatedBackend {
    fn default() -> Self {
        Self::new(Self::DEFAULT_DELAY, false)
    }
}

#[async_trait]
impl SubmitBackend for SimulatedBackend {
    async fn submit(&self, data: FormData) -> Result<SubmitReceipt> {
        tracing::info!(
            email = %data.email,
            delay_ms = self.delay.as_millis() as u64,
            "submitting form"
        );
        tokio::time::sleep(self.delay).await;

        if self.fail {
            tracing::warn!("simulated backend rejected submission");
            bail!("Submission failed: backend unavailable");
        }

        let receipt = SubmitReceipt {
            id: Uuid::new_v4(),
            submitted_at: Utc::now(),
        };
        tracing::info!(id = %receipt.id, "form accepted");
        Ok(receipt)
    }
}
