//! Domain ports for the hexagonal boundary.

mod macros;
pub(crate) use macros::define_port_error;

mod export_artifacts;
mod login_service;
mod submission_store;
mod user_store;

#[cfg(test)]
pub use export_artifacts::MockExportArtifactStore;
pub use export_artifacts::{ArtifactWriter, ExportArtifactError, ExportArtifactStore};
#[cfg(test)]
pub use login_service::MockLoginService;
pub use login_service::{LoginService, StaticLoginService};
#[cfg(test)]
pub use submission_store::MockSubmissionStore;
pub use submission_store::{SubmissionStore, SubmissionStoreError};
#[cfg(test)]
pub use user_store::MockUserStore;
pub use user_store::{UserPage, UserStore, UserStoreError};
