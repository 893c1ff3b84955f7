//! File-backed user and submission stores.
//!
//! `users.json` holds an array of user records; `entries.json` maps entry
//! ids to flat field maps. Both are read once through `cap_std` and then
//! served from memory.
//!
//! ```json
//! [{"id": 1, "login": "ada", "email": "ada@example.com", "roles": ["subscriber"],
//!   "meta": {"entry_id": "17"}}]
//! ```
//! ```json
//! {"17": {"10.1": "12 Analytical Row", "10.4": "London"}}
//! ```

mod query;

use std::collections::BTreeMap;
use std::io;
use std::path::{Path, PathBuf};

use async_trait::async_trait;
use cap_std::{ambient_authority, fs::Dir};
use serde::de::DeserializeOwned;
use tracing::info;

use crate::domain::ports::{
    SubmissionStore, SubmissionStoreError, UserPage, UserStore, UserStoreError,
};
use crate::domain::{EntryId, SubmissionLookup, SubmissionRecord, UserQueryArgs, UserRecord};

pub const USERS_FILE: &str = "users.json";
pub const ENTRIES_FILE: &str = "entries.json";

/// Failures while loading the data directory.
#[derive(Debug, thiserror::Error)]
pub enum DirectoryLoadError {
    #[error("failed to open data directory {path}: {source}")]
    OpenDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
    #[error("failed to read {file}: {source}")]
    Read {
        file: &'static str,
        #[source]
        source: io::Error,
    },
    #[error("failed to parse {file}: {source}")]
    Parse {
        file: &'static str,
        #[source]
        source: serde_json::Error,
    },
}

/// In-memory directory of users and submission entries.
#[derive(Debug, Clone, Default)]
pub struct JsonDirectory {
    users: Vec<UserRecord>,
    entries: BTreeMap<String, SubmissionRecord>,
}

impl JsonDirectory {
    pub fn new(users: Vec<UserRecord>, entries: BTreeMap<String, SubmissionRecord>) -> Self {
        Self { users, entries }
    }

    /// Load both files from `data_dir`. A missing `entries.json` means no
    /// entries; a missing `users.json` is an error.
    ///
    /// # Errors
    /// Fails when the directory cannot be opened or a file cannot be read
    /// or parsed.
    pub fn load(data_dir: &Path) -> Result<Self, DirectoryLoadError> {
        let dir = Dir::open_ambient_dir(data_dir, ambient_authority()).map_err(|source| {
            DirectoryLoadError::OpenDir {
                path: data_dir.to_path_buf(),
                source,
            }
        })?;
        let users: Vec<UserRecord> = read_json(&dir, USERS_FILE)?;
        let entries: BTreeMap<String, SubmissionRecord> =
            match dir.try_exists(ENTRIES_FILE) {
                Ok(true) => read_json(&dir, ENTRIES_FILE)?,
                Ok(false) => BTreeMap::new(),
                Err(source) => {
                    return Err(DirectoryLoadError::Read {
                        file: ENTRIES_FILE,
                        source,
                    });
                }
            };
        info!(
            data_dir = %data_dir.display(),
            users = users.len(),
            entries = entries.len(),
            "directory loaded"
        );
        Ok(Self::new(users, entries))
    }

    pub fn user_count(&self) -> usize {
        self.users.len()
    }
}

fn read_json<T: DeserializeOwned>(dir: &Dir, file: &'static str) -> Result<T, DirectoryLoadError> {
    let raw = dir
        .read_to_string(file)
        .map_err(|source| DirectoryLoadError::Read { file, source })?;
    serde_json::from_str(&raw).map_err(|source| DirectoryLoadError::Parse { file, source })
}

#[async_trait]
impl UserStore for JsonDirectory {
    async fn query_users(&self, args: &UserQueryArgs) -> Result<UserPage, UserStoreError> {
        Ok(query::run(&self.users, args))
    }
}

#[async_trait]
impl SubmissionStore for JsonDirectory {
    async fn get_entry(&self, id: &EntryId) -> Result<SubmissionLookup, SubmissionStoreError> {
        Ok(self
            .entries
            .get(id.as_ref())
            .cloned()
            .map_or(SubmissionLookup::NotFound, SubmissionLookup::Found))
    }
}
