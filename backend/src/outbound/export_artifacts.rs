//! Export artifact store over a `cap_std` directory.

use std::io::{self, BufWriter};
use std::path::{Path, PathBuf};

use cap_std::{ambient_authority, fs::Dir};

use crate::domain::ports::{ArtifactWriter, ExportArtifactError, ExportArtifactStore};

/// Stores export files as plain files in one directory.
///
/// Names are resolved relative to the directory; `cap_std` rejects names
/// that would escape it.
#[derive(Debug)]
pub struct CapStdExportArtifactStore {
    dir: Dir,
    root: PathBuf,
}

impl CapStdExportArtifactStore {
    /// Open `root`, creating it first if needed.
    ///
    /// # Errors
    /// Fails when the directory cannot be created or opened.
    pub fn open(root: &Path) -> io::Result<Self> {
        Dir::create_ambient_dir_all(root, ambient_authority())?;
        let dir = Dir::open_ambient_dir(root, ambient_authority())?;
        Ok(Self {
            dir,
            root: root.to_path_buf(),
        })
    }

    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn io_error(name: &str, error: &io::Error) -> ExportArtifactError {
    ExportArtifactError::io(name, error.to_string())
}

impl ExportArtifactStore for CapStdExportArtifactStore {
    fn exists(&self, name: &str) -> Result<bool, ExportArtifactError> {
        self.dir.try_exists(name).map_err(|e| io_error(name, &e))
    }

    fn create(&self, name: &str) -> Result<ArtifactWriter, ExportArtifactError> {
        let file = self.dir.create(name).map_err(|e| io_error(name, &e))?;
        Ok(Box::new(BufWriter::new(file)))
    }

    fn read(&self, name: &str) -> Result<Vec<u8>, ExportArtifactError> {
        self.dir.read(name).map_err(|e| io_error(name, &e))
    }

    fn remove(&self, name: &str) -> Result<(), ExportArtifactError> {
        self.dir.remove_file(name).map_err(|e| io_error(name, &e))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::TempDir;

    #[test]
    fn create_read_remove_cycle() {
        let tmp = TempDir::new().expect("temp dir");
        let store = CapStdExportArtifactStore::open(tmp.path()).expect("open");
        let name = "users_export_2019-12-11_09-30-00.csv";

        assert!(!store.exists(name).expect("probe"));
        let mut writer = store.create(name).expect("create");
        writer.write_all(b"User ID\n").expect("write");
        writer.flush().expect("flush");
        drop(writer);

        assert!(store.exists(name).expect("probe"));
        assert_eq!(store.read(name).expect("read"), b"User ID\n");
        store.remove(name).expect("remove");
        assert!(!tmp.path().join(name).exists());
    }

    #[test]
    fn open_creates_missing_directories() {
        let tmp = TempDir::new().expect("temp dir");
        let root = tmp.path().join("nested/exports");
        let store = CapStdExportArtifactStore::open(&root).expect("open");
        assert_eq!(store.root(), root.as_path());
        assert!(root.is_dir());
    }

    #[test]
    fn names_escaping_the_root_are_rejected() {
        let tmp = TempDir::new().expect("temp dir");
        let store = CapStdExportArtifactStore::open(tmp.path()).expect("open");
        let err = store.create("../outside.csv").err().expect("escape rejected");
        assert!(err.to_string().contains("../outside.csv"));
    }

    #[test]
    fn reading_a_missing_artifact_fails() {
        let tmp = TempDir::new().expect("temp dir");
        let store = CapStdExportArtifactStore::open(tmp.path()).expect("open");
        assert!(matches!(
            store.read("nope.csv"),
            Err(ExportArtifactError::Io { .. })
        ));
    }
}
