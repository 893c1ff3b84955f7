//! Wiring of adapters, the export feature and the HTTP state.

use std::io;
use std::path::PathBuf;
use std::sync::Arc;

use mockable::Clock;
use tracing::info;

use crate::config::AppSettings;
use crate::domain::HookRegistry;
use crate::domain::ports::StaticLoginService;
use crate::domain::users_export::{self, ExportFileNamer, ExportPorts, UsersExportService};
use crate::inbound::http::state::{HttpState, HttpStatePorts};
use crate::outbound::directory::{DirectoryLoadError, JsonDirectory};
use crate::outbound::export_artifacts::CapStdExportArtifactStore;

/// Failures while assembling the application.
#[derive(Debug, thiserror::Error)]
pub enum StartupError {
    #[error(transparent)]
    Directory(#[from] DirectoryLoadError),
    #[error("failed to open export directory {path}: {source}")]
    ExportDir {
        path: PathBuf,
        #[source]
        source: io::Error,
    },
}

/// Load the stores named in `settings`, register the export hooks and build
/// the handler state.
///
/// # Errors
/// Fails when the data directory cannot be loaded or the export directory
/// cannot be opened.
pub fn build_http_state(
    settings: &AppSettings,
    clock: Arc<dyn Clock>,
) -> Result<HttpState, StartupError> {
    let directory = Arc::new(JsonDirectory::load(&settings.data_dir())?);

    let export_dir = settings.export_dir();
    let artifacts = CapStdExportArtifactStore::open(&export_dir).map_err(|source| {
        StartupError::ExportDir {
            path: export_dir.clone(),
            source,
        }
    })?;

    let service = UsersExportService::new(
        ExportPorts {
            users: directory.clone(),
            submissions: directory.clone(),
            artifacts: Arc::new(artifacts),
        },
        ExportFileNamer::new(clock, settings.naming_policy()),
        settings.keep_export_files,
    );

    let mut hooks = HookRegistry::default();
    users_export::register(&mut hooks, Arc::new(service), settings.export_marker());
    info!(
        export_dir = %export_dir.display(),
        marker = settings.export_marker(),
        keep_files = settings.keep_export_files,
        "users export registered"
    );

    Ok(HttpState::new(HttpStatePorts {
        login: Arc::new(StaticLoginService::new(
            settings.admin_user(),
            settings.admin_password.clone(),
        )),
        users: directory,
        hooks: Arc::new(hooks),
        default_page_size: settings.default_page_size(),
    }))
}
