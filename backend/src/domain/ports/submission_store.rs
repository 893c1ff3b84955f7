//! Driven port for the external form-submission store.

use async_trait::async_trait;

use crate::domain::{EntryId, SubmissionLookup};

use super::define_port_error;

define_port_error! {
    /// Failures raised by submission store adapters.
    ///
    /// Callers enriching export rows treat every variant like
    /// [`SubmissionLookup::NotFound`].
    pub enum SubmissionStoreError {
        Unavailable { message: String } => "submission store unavailable: {message}",
        Malformed { entry_id: String, message: String } => "entry {entry_id} is malformed: {message}",
    }
}

/// Lookup interface of the submission store.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait SubmissionStore: Send + Sync {
    /// Resolve an entry; an unknown id is `Ok(SubmissionLookup::NotFound)`.
    async fn get_entry(&self, id: &EntryId) -> Result<SubmissionLookup, SubmissionStoreError>;
}
