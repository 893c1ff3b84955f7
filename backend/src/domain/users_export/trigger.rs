//! The "Export table data" toolbar button.

use crate::domain::{ToolbarAction, ToolbarPosition, escape_html};

/// Element id of the export button.
pub const EXPORT_BUTTON_ID: &str = "ahs_export_all_data";

/// Visible label of the export button.
pub const EXPORT_BUTTON_LABEL: &str = "Export table data";

/// Submit control whose `name` is the export marker, so pressing it adds the
/// marker to the listing request.
#[derive(Debug, Clone)]
pub struct ExportButton {
    marker: String,
}

impl ExportButton {
    pub fn new(marker: impl Into<String>) -> Self {
        Self {
            marker: marker.into(),
        }
    }
}

impl ToolbarAction for ExportButton {
    fn render(&self, _which: ToolbarPosition) -> String {
        format!(
            r#"<input type="submit" name="{}" id="{EXPORT_BUTTON_ID}" class="button" value="{EXPORT_BUTTON_LABEL}">"#,
            escape_html(&self.marker)
        )
    }
}
