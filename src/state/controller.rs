//! Submit and reset orchestration
//!
//! ```text
//! Idle --submit (valid)--> Submitting --ok--> Submitted --reset--> Idle
//!                               \--err--> Failed --submit (valid)--> Submitting
//! ```
//!
//! `reset` is accepted from any state. `Submitted` ignores submit requests.

use super::form_data::{FormData, SubmissionState, SubmitReceipt, SubmittedForm};
use super::store::Store;
use crate::backend::SubmitBackend;
use anyhow::Result;
use std::cell::Cell;

/// Proof that a submission was started; carries the data being sent
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SubmitTicket {
    pub data: FormData,
    generation: u64,
}

/// Drives the submission cycle against the shared store
#[derive(Debug)]
pub struct FormController {
    store: Store,
    /// Bumped by every reset so completions that started earlier are dropped
    generation: Cell<u64>,
}

impl FormController {
    pub fn new(store: Store) -> Self {
        Self {
            store,
            generation: Cell::new(0),
        }
    }

    /// Whether a submit request would currently be accepted
    pub fn can_submit(&self) -> bool {
        let submission = self.store.submission();
        self.store.is_valid() && !submission.is_submitting() && !submission.is_submitted()
    }

    /// Start a submission.
    ///
    /// Returns `None` and leaves the store untouched when the form is
    /// invalid, a submission is already in flight, or the form was already
    /// submitted and has not been reset.
    pub fn begin_submit(&self) -> Option<SubmitTicket> {
        if !self.store.is_valid() {
            tracing::debug!("submit ignored: form invalid");
            return None;
        }
        let submission = self.store.submission();
        if submission.is_submitting() {
            tracing::debug!("submit ignored: already submitting");
            return None;
        }
        if submission.is_submitted() {
            tracing::debug!("submit ignored: already submitted");
            return None;
        }

        let ticket = SubmitTicket {
            data: self.store.form_data(),
            generation: self.generation.get(),
        };
        tracing::info!("submission started");
        self.store.set_submission(SubmissionState::Submitting);
        Some(ticket)
    }

    /// Apply the backend's answer for `ticket`.
    ///
    /// Both flags flip in one store notification. Returns false when the
    /// ticket predates a reset and was ignored.
    pub fn complete_submit(&self, ticket: SubmitTicket, result: Result<SubmitReceipt>) -> bool {
        if ticket.generation != self.generation.get() || !self.store.submission().is_submitting() {
            tracing::warn!("discarding completion of a submission that was reset");
            return false;
        }

        let next = match result {
            Ok(receipt) => {
                tracing::info!(id = %receipt.id, "submission complete");
                SubmissionState::Submitted(SubmittedForm {
                    receipt,
                    data: ticket.data,
                })
            }
            Err(err) => {
                tracing::warn!(error = %err, "submission failed");
                SubmissionState::Failed(err.to_string())
            }
        };
        self.store.set_submission(next);
        true
    }

    /// Run a whole submission against `backend`. Returns true if one started.
    ///
    /// The UI loop splits this into `begin_submit` and `complete_submit` so
    /// it keeps handling input while the backend call runs.
    #[allow(dead_code)]
    pub async fn submit(&self, backend: &dyn SubmitBackend) -> bool {
        let Some(ticket) = self.begin_submit() else {
            return false;
        };
        let result = backend.submit(ticket.data.clone()).await;
        self.complete_submit(ticket, result);
        true
    }

    /// Clear every field, error and flag in one notification
    pub fn reset(&self) {
        self.generation.set(self.generation.get() + 1);
        tracing::info!("form reset");
        self.store.reset();
    }
}
