//! Outbound adapters (driven side): the file-backed directory and the export
//! artifact store.

pub mod directory;
pub mod export_artifacts;
