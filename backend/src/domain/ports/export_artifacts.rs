//! Driven port for the transient storage holding export files.
//!
//! Names are plain file names relative to the store's root. The store does
//! not reserve names: `exists` followed by `create` is racy, and callers
//! accept that.

use std::io::Write;

use super::define_port_error;

define_port_error! {
    /// Failures raised by export artifact stores.
    pub enum ExportArtifactError {
        Io { name: String, message: String } => "export artifact {name}: {message}",
    }
}

/// Writable handle returned by [`ExportArtifactStore::create`].
pub type ArtifactWriter = Box<dyn Write + Send>;

/// Transient file storage for export artifacts.
#[cfg_attr(test, mockall::automock)]
pub trait ExportArtifactStore: Send + Sync {
    /// Whether an artifact named `name` already exists.
    fn exists(&self, name: &str) -> Result<bool, ExportArtifactError>;

    /// Create (or truncate) `name` for writing.
    fn create(&self, name: &str) -> Result<ArtifactWriter, ExportArtifactError>;

    /// Read the whole artifact back.
    fn read(&self, name: &str) -> Result<Vec<u8>, ExportArtifactError>;

    /// Delete the artifact.
    fn remove(&self, name: &str) -> Result<(), ExportArtifactError>;
}
