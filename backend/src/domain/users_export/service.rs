//! Export pipeline: refetch without paging, enrich, write, read back.

use std::sync::Arc;

use tracing::{info, warn};

use crate::domain::ports::{ExportArtifactStore, SubmissionStore, UserStore};
use crate::domain::{
    AddressFields, Attachment, ENTRY_ID_META_KEY, EntryId, SubmissionLookup, UserQueryArgs,
    UserRecord,
};

use super::{ExportError, ExportFileNamer, ExportRow, write_export_csv};

/// Content type of the export download.
pub const CSV_CONTENT_TYPE: &str = "text/csv";

/// Ports the export reads from and writes to.
#[derive(Clone)]
pub struct ExportPorts {
    pub users: Arc<dyn UserStore>,
    pub submissions: Arc<dyn SubmissionStore>,
    pub artifacts: Arc<dyn ExportArtifactStore>,
}

/// Builds the CSV export of a user listing.
#[derive(Clone)]
pub struct UsersExportService {
    ports: ExportPorts,
    namer: ExportFileNamer,
    keep_files: bool,
}

impl UsersExportService {
    /// `keep_files` leaves the transient file in place after it was read back.
    pub fn new(ports: ExportPorts, namer: ExportFileNamer, keep_files: bool) -> Self {
        Self {
            ports,
            namer,
            keep_files,
        }
    }

    /// Export every user matching `args`, ignoring its paging.
    ///
    /// # Errors
    /// Fails when the user query, the file naming, the CSV write or the read
    /// back fails. Unresolvable submission links never fail the export.
    pub async fn export(&self, args: &UserQueryArgs) -> Result<Attachment, ExportError> {
        let unlimited = args.without_paging();
        let page = self.ports.users.query_users(&unlimited).await?;

        let mut rows = Vec::with_capacity(page.users.len());
        for user in &page.users {
            rows.push(self.export_row(user).await);
        }

        let name = self.namer.free_name(self.ports.artifacts.as_ref()).await?;
        let sink = self.ports.artifacts.create(&name)?;
        write_export_csv(sink, &rows).map_err(|source| ExportError::Csv {
            name: name.clone(),
            source,
        })?;
        let content = self.ports.artifacts.read(&name)?;

        if !self.keep_files {
            if let Err(error) = self.ports.artifacts.remove(&name) {
                warn!(file = %name, %error, "failed to remove export file");
            }
        }

        info!(
            file = %name,
            rows = rows.len(),
            bytes = content.len(),
            "users export ready"
        );
        Ok(Attachment::new(name, CSV_CONTENT_TYPE, content))
    }

    /// Build the row for one user, resolving its submission link.
    pub async fn export_row(&self, user: &UserRecord) -> ExportRow {
        let lookup = self.resolve_submission(user).await;
        ExportRow::new(user, AddressFields::from_lookup(&lookup))
    }

    async fn resolve_submission(&self, user: &UserRecord) -> SubmissionLookup {
        let Some(entry_id) = user.get(ENTRY_ID_META_KEY).and_then(EntryId::parse) else {
            return SubmissionLookup::NotFound;
        };
        match self.ports.submissions.get_entry(&entry_id).await {
            Ok(lookup) => lookup,
            Err(error) => {
                warn!(
                    user_id = %user.id(),
                    entry_id = %entry_id,
                    %error,
                    "submission lookup failed; exporting empty address"
                );
                SubmissionLookup::NotFound
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        ArtifactWriter, ExportArtifactError, MockExportArtifactStore, MockSubmissionStore, MockUserStore,
        SubmissionStoreError, UserPage, UserStoreError,
    };
    use crate::domain::users_export::NamingPolicy;
    use crate::domain::{SubmissionRecord, UserId};
    use chrono::{DateTime, Local, TimeZone, Utc};
    use mockable::Clock;
    use std::sync::Mutex;

    struct FixedClock;

    impl Clock for FixedClock {
        fn local(&self) -> DateTime<Local> {
            self.utc().with_timezone(&Local)
        }

        fn utc(&self) -> DateTime<Utc> {
            Utc.with_ymd_and_hms(2024, 2, 29, 23, 59, 58)
                .single()
                .expect("valid instant")
        }
    }

    const FILE_NAME: &str = "users_export_2024-02-29_23-59-58.csv";

    /// Artifact store double that records writes in memory.
    #[derive(Default)]
    struct MemoryArtifacts {
        written: Arc<Mutex<Vec<u8>>>,
        removed: Mutex<Vec<String>>,
    }

    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl std::io::Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().expect("sink lock").extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    impl ExportArtifactStore for MemoryArtifacts {
        fn exists(&self, _name: &str) -> Result<bool, ExportArtifactError> {
            Ok(false)
        }

        fn create(&self, _name: &str) -> Result<ArtifactWriter, ExportArtifactError> {
            Ok(Box::new(SharedSink(Arc::clone(&self.written))))
        }

        fn read(&self, _name: &str) -> Result<Vec<u8>, ExportArtifactError> {
            Ok(self.written.lock().expect("sink lock").clone())
        }

        fn remove(&self, name: &str) -> Result<(), ExportArtifactError> {
            self.removed.lock().expect("removed lock").push(name.to_owned());
            Ok(())
        }
    }

    fn namer() -> ExportFileNamer {
        ExportFileNamer::new(
            Arc::new(FixedClock),
            NamingPolicy {
                attempts: 1,
                retry_delay: std::time::Duration::ZERO,
            },
        )
    }

    fn service(
        users: MockUserStore,
        submissions: MockSubmissionStore,
        artifacts: Arc<dyn ExportArtifactStore>,
        keep_files: bool,
    ) -> UsersExportService {
        UsersExportService::new(
            ExportPorts {
                users: Arc::new(users),
                submissions: Arc::new(submissions),
                artifacts,
            },
            namer(),
            keep_files,
        )
    }

    fn linked_user(id: u64, entry: &str) -> UserRecord {
        UserRecord::new(UserId::new(id), format!("user{id}"), format!("user{id}@example.com"))
            .with_meta(ENTRY_ID_META_KEY, entry)
    }

    #[tokio::test]
    async fn export_refetches_without_paging_and_deletes_the_file() {
        let mut users = MockUserStore::new();
        users
            .expect_query_users()
            .withf(|args| args.number == 0 && args.offset == 0 && args.role.as_deref() == Some("subscriber"))
            .times(1)
            .returning(|_| {
                Ok(UserPage {
                    users: vec![UserRecord::new(UserId::new(1), "ada", "ada@example.com")],
                    total: 1,
                })
            });
        let artifacts = Arc::new(MemoryArtifacts::default());
        let svc = service(users, MockSubmissionStore::new(), artifacts.clone(), false);

        let attachment = svc
            .export(&UserQueryArgs::paged(20, 40).with_role("subscriber"))
            .await
            .expect("export succeeds");

        assert_eq!(attachment.file_name(), FILE_NAME);
        assert_eq!(attachment.content_type(), CSV_CONTENT_TYPE);
        let body = String::from_utf8(attachment.content().to_vec()).expect("utf8");
        assert_eq!(body.lines().count(), 2);
        assert!(body.ends_with("1,ada,ada@example.com, ,,,,,,\n"));
        assert_eq!(*artifacts.removed.lock().expect("removed lock"), vec![FILE_NAME.to_owned()]);
    }

    #[tokio::test]
    async fn keep_files_leaves_the_artifact_in_place() {
        let mut users = MockUserStore::new();
        users
            .expect_query_users()
            .returning(|_| Ok(UserPage::default()));
        let artifacts = Arc::new(MemoryArtifacts::default());
        let svc = service(users, MockSubmissionStore::new(), artifacts.clone(), true);

        svc.export(&UserQueryArgs::default()).await.expect("export succeeds");
        assert!(artifacts.removed.lock().expect("removed lock").is_empty());
    }

    #[tokio::test]
    async fn user_store_failure_aborts_before_touching_storage() {
        let mut users = MockUserStore::new();
        users
            .expect_query_users()
            .returning(|_| Err(UserStoreError::query("boom")));
        let mut artifacts = MockExportArtifactStore::new();
        artifacts.expect_exists().never();
        artifacts.expect_create().never();
        let svc = service(users, MockSubmissionStore::new(), Arc::new(artifacts), false);

        let err = svc.export(&UserQueryArgs::default()).await.expect_err("fatal");
        assert!(matches!(err, ExportError::Users(_)));
    }

    #[tokio::test]
    async fn submission_errors_degrade_to_empty_address() {
        let mut submissions = MockSubmissionStore::new();
        submissions
            .expect_get_entry()
            .returning(|_| Err(SubmissionStoreError::unavailable("timeout")));
        let svc = service(
            MockUserStore::new(),
            submissions,
            Arc::new(MemoryArtifacts::default()),
            false,
        );

        let row = svc.export_row(&linked_user(5, "99")).await;
        assert_eq!(row.cells().len(), 10);
        assert!(row.cells()[5..].iter().all(String::is_empty));
    }

    #[tokio::test]
    async fn blank_links_skip_the_submission_store() {
        let mut submissions = MockSubmissionStore::new();
        submissions.expect_get_entry().never();
        let svc = service(
            MockUserStore::new(),
            submissions,
            Arc::new(MemoryArtifacts::default()),
            false,
        );

        let row = svc.export_row(&linked_user(6, "  ")).await;
        assert!(row.cells()[5..].iter().all(String::is_empty));
    }

    #[tokio::test]
    async fn resolved_links_fill_address_cells() {
        let mut submissions = MockSubmissionStore::new();
        submissions
            .expect_get_entry()
            .withf(|id| id.as_ref() == "7")
            .returning(|_| {
                let record: SubmissionRecord = [("10.1", "1 Loop"), ("10.4", "Cupertino")]
                    .into_iter()
                    .collect();
                Ok(SubmissionLookup::Found(record))
            });
        let svc = service(
            MockUserStore::new(),
            submissions,
            Arc::new(MemoryArtifacts::default()),
            false,
        );

        let row = svc.export_row(&linked_user(8, "7")).await;
        assert_eq!(
            row.cells()[5..],
            ["1 Loop", "", "Cupertino", "", ""].map(String::from)
        );
    }
}
