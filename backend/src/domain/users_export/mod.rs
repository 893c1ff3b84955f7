//! "Export table data" for the user listing.
//!
//! The feature plugs into the listing through its two extension points: an
//! [`ExportButton`] on the toolbar and an [`ExportQueryFilter`] that, when
//! the request carries the marker key, exports every user matching the
//! current filters as CSV and replaces the listing response with the file.

mod error;
mod filter;
mod naming;
mod row;
mod service;
mod trigger;
mod writer;

use std::sync::Arc;

pub use error::ExportError;
pub use filter::ExportQueryFilter;
pub use naming::{EXPORT_FILE_PREFIX, ExportFileNamer, NamingPolicy};
pub use row::{EXPORT_COLUMNS, EXPORT_HEADER, ExportRow};
pub use service::{CSV_CONTENT_TYPE, ExportPorts, UsersExportService};
pub use trigger::{EXPORT_BUTTON_ID, EXPORT_BUTTON_LABEL, ExportButton};
pub use writer::write_export_csv;

use super::{DEFAULT_PRIORITY, HookRegistry};

/// Request key that triggers the export unless configured otherwise.
pub const DEFAULT_EXPORT_MARKER: &str = "export_all_data";

/// Register the export button and the export filter on `hooks`.
pub fn register(hooks: &mut HookRegistry, service: Arc<UsersExportService>, marker: &str) {
    hooks.add_toolbar_action(DEFAULT_PRIORITY, Arc::new(ExportButton::new(marker)));
    hooks.add_query_args_filter(
        DEFAULT_PRIORITY,
        Arc::new(ExportQueryFilter::new(service, marker)),
    );
}
