//! Failures that abort an export.

use thiserror::Error as ThisError;
use tracing::error;

use crate::domain::Error;
use crate::domain::ports::{ExportArtifactError, UserStoreError};

/// Fatal export failures. Unresolved submission links are not errors.
#[derive(Debug, ThisError)]
pub enum ExportError {
    #[error(transparent)]
    Users(#[from] UserStoreError),
    #[error(transparent)]
    Artifact(#[from] ExportArtifactError),
    #[error("failed to write csv to {name}: {source}")]
    Csv {
        name: String,
        #[source]
        source: csv::Error,
    },
    #[error("no free export file name after {attempts} attempts")]
    NamesExhausted { attempts: u32 },
}

impl From<ExportError> for Error {
    fn from(err: ExportError) -> Self {
        error!(error = %err, "users export failed");
        Self::internal(err.to_string())
    }
}
