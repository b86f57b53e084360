//! Trait abstraction for the submission backend to enable mocking in tests

use crate::state::{FormData, SubmitReceipt};
use anyhow::Result;
use async_trait::async_trait;

/// Receives a completed form
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmitBackend: Send + Sync {
    /// Deliver the form; resolves once the backend has accepted or rejected it
    async fn submit(&self, data: FormData) -> Result<SubmitReceipt>;
}
