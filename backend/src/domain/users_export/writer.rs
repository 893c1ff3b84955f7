//! CSV serialisation of export rows.

use std::io::Write;

use super::{EXPORT_HEADER, ExportRow};

/// Write the header and `rows` to `sink`, then flush it.
///
/// Fields are quoted only when they contain the delimiter, a quote or a line
/// break; embedded quotes are doubled. Records end with `\n`.
///
/// # Errors
/// Returns the first write or flush failure.
pub fn write_export_csv<W: Write>(sink: W, rows: &[ExportRow]) -> Result<(), csv::Error> {
    let mut writer = csv::Writer::from_writer(sink);
    writer.write_record(EXPORT_HEADER)?;
    for row in rows {
        writer.write_record(row.cells())?;
    }
    writer.flush()?;
    Ok(())
}
