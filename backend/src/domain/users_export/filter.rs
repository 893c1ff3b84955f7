//! Query-args filter that turns a marked listing request into the export.

use std::sync::Arc;

use async_trait::async_trait;
use tracing::info;

use crate::domain::{Error, FilterOutcome, QueryArgsFilter, RequestParams, UserQueryArgs};

use super::UsersExportService;

/// Takes over the listing response when the request carries the marker key.
///
/// Without the marker the arguments are returned untouched and no port is
/// called.
#[derive(Clone)]
pub struct ExportQueryFilter {
    service: Arc<UsersExportService>,
    marker: String,
}

impl ExportQueryFilter {
    pub fn new(service: Arc<UsersExportService>, marker: impl Into<String>) -> Self {
        Self {
            service,
            marker: marker.into(),
        }
    }
}

#[async_trait]
impl QueryArgsFilter for ExportQueryFilter {
    async fn filter(
        &self,
        args: UserQueryArgs,
        request: &RequestParams,
    ) -> Result<FilterOutcome, Error> {
        if !request.contains(&self.marker) {
            return Ok(FilterOutcome::Continue(args));
        }
        info!(
            marker = %self.marker,
            role = args.role.as_deref().unwrap_or_default(),
            "users export requested"
        );
        let attachment = self.service.export(&args).await?;
        Ok(FilterOutcome::Respond(attachment))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::ports::{
        ArtifactWriter, MockExportArtifactStore, MockSubmissionStore, MockUserStore, UserPage,
    };
    use crate::domain::users_export::{ExportFileNamer, ExportPorts, NamingPolicy};
    use mockable::DefaultClock;
    use rstest::rstest;

    const MARKER: &str = "export_all_data";

    fn filter_with(users: MockUserStore, artifacts: MockExportArtifactStore) -> ExportQueryFilter {
        let service = UsersExportService::new(
            ExportPorts {
                users: Arc::new(users),
                submissions: Arc::new(MockSubmissionStore::new()),
                artifacts: Arc::new(artifacts),
            },
            ExportFileNamer::new(Arc::new(DefaultClock), NamingPolicy::default()),
            false,
        );
        ExportQueryFilter::new(Arc::new(service), MARKER)
    }

    #[rstest]
    #[case(&[])]
    #[case(&[("role", "subscriber"), ("export", "1")])]
    #[tokio::test]
    async fn passes_arguments_through_without_side_effects(#[case] pairs: &[(&str, &str)]) {
        let mut users = MockUserStore::new();
        users.expect_query_users().never();
        let mut artifacts = MockExportArtifactStore::new();
        artifacts.expect_exists().never();
        artifacts.expect_create().never();
        let filter = filter_with(users, artifacts);
        let args = UserQueryArgs::paged(20, 0).with_role("subscriber");
        let request: RequestParams = pairs.iter().copied().collect();

        let outcome = filter.filter(args.clone(), &request).await.expect("pass-through");
        assert_eq!(outcome, FilterOutcome::Continue(args));
    }

    #[rstest]
    #[case("")]
    #[case("0")]
    #[case("false")]
    #[tokio::test]
    async fn any_marker_value_takes_over(#[case] value: &str) {
        let mut users = MockUserStore::new();
        users
            .expect_query_users()
            .times(1)
            .returning(|_| Ok(UserPage::default()));
        let mut artifacts = MockExportArtifactStore::new();
        artifacts.expect_exists().returning(|_| Ok(false));
        artifacts
            .expect_create()
            .returning(|_| Ok(Box::new(std::io::sink()) as ArtifactWriter));
        artifacts
            .expect_read()
            .returning(|_| Ok(b"header\n".to_vec()));
        artifacts.expect_remove().returning(|_| Ok(()));
        let filter = filter_with(users, artifacts);
        let request: RequestParams = [(MARKER, value)].into_iter().collect();

        let outcome = filter
            .filter(UserQueryArgs::paged(20, 0), &request)
            .await
            .expect("export");
        assert!(matches!(outcome, FilterOutcome::Respond(ref file) if file.content() == b"header\n"));
    }
}
