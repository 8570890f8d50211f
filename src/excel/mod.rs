//! Excel import/export for question sheets
//!
//! - Import: first worksheet of an .xlsx → Table
//! - Export: Table → .xlsx bytes (header row, no index column)

mod exporter;
mod importer;

pub use exporter::{export, ExcelExporter, EXPORT_CONTENT_TYPE, EXPORT_FILENAME, MAX_CELL_CHARS};
pub use importer::{load, ExcelImporter};
