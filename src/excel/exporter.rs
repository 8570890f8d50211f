//! Excel exporter implementation - Table → Excel (.xlsx)

use crate::error::{QnoteError, QnoteResult};
use crate::types::{CellValue, Table, DEFAULT_SHEET_NAME};
use rust_xlsxwriter::{Format, FormatBorder, Workbook, Worksheet};
use std::borrow::Cow;
use std::path::Path;
use tracing::{debug, warn};

/// File name offered for the updated workbook
pub const EXPORT_FILENAME: &str = "updated_file.xlsx";

/// MIME type of the updated workbook
pub const EXPORT_CONTENT_TYPE: &str =
    "application/vnd.openxmlformats-officedocument.spreadsheetml.sheet";

/// Most characters a single Excel cell can hold
pub const MAX_CELL_CHARS: usize = 32_767;

/// Serialize a table to .xlsx bytes
pub fn export(table: &Table) -> QnoteResult<Vec<u8>> {
    ExcelExporter::new(table).to_bytes()
}

/// Excel exporter writing one table to a single worksheet
pub struct ExcelExporter<'a> {
    table: &'a Table,
}

impl<'a> ExcelExporter<'a> {
    /// Create a new Excel exporter
    pub fn new(table: &'a Table) -> Self {
        Self { table }
    }

    /// Build the workbook in memory
    pub fn to_bytes(&self) -> QnoteResult<Vec<u8>> {
        let mut workbook = self.build_workbook()?;
        let buffer = workbook
            .save_to_buffer()
            .map_err(|e| QnoteError::Export(format!("Failed to serialize workbook: {}", e)))?;

        debug!(
            bytes = buffer.len(),
            rows = self.table.row_count(),
            "exported workbook"
        );
        Ok(buffer)
    }

    /// Export the table to an Excel .xlsx file
    pub fn export(&self, output_path: &Path) -> QnoteResult<()> {
        let mut workbook = self.build_workbook()?;
        workbook
            .save(output_path)
            .map_err(|e| QnoteError::Export(format!("Failed to save Excel file: {}", e)))?;
        Ok(())
    }

    fn build_workbook(&self) -> QnoteResult<Workbook> {
        let mut workbook = Workbook::new();
        let worksheet = workbook.add_worksheet();
        self.write_sheet(worksheet)?;
        Ok(workbook)
    }

    /// Header row first, then data rows; no index column
    fn write_sheet(&self, worksheet: &mut Worksheet) -> QnoteResult<()> {
        let sheet_name = if self.table.sheet_name.is_empty() {
            DEFAULT_SHEET_NAME
        } else {
            self.table.sheet_name.as_str()
        };
        worksheet
            .set_name(sheet_name)
            .map_err(|e| QnoteError::Export(format!("Failed to set worksheet name: {}", e)))?;

        let header_format = Format::new().set_bold().set_border(FormatBorder::Thin);

        for (col_idx, name) in self.table.columns().iter().enumerate() {
            let col = to_col(col_idx)?;
            worksheet
                .write_string_with_format(0, col, fit_cell_text(name, 0, col), &header_format)
                .map_err(|e| {
                    QnoteError::Export(format!("Failed to write header '{}': {}", name, e))
                })?;
        }

        for (row_idx, row) in self.table.rows().iter().enumerate() {
            let excel_row = u32::try_from(row_idx + 1)
                .map_err(|_| QnoteError::Export("Too many rows for a worksheet".to_string()))?;
            for (col_idx, value) in row.values.iter().enumerate() {
                write_cell(worksheet, excel_row, to_col(col_idx)?, value)?;
            }
        }

        Ok(())
    }
}

fn to_col(idx: usize) -> QnoteResult<u16> {
    u16::try_from(idx).map_err(|_| QnoteError::Export("Too many columns for a worksheet".to_string()))
}

/// Write a single cell; empty cells are left blank
fn write_cell(worksheet: &mut Worksheet, row: u32, col: u16, value: &CellValue) -> QnoteResult<()> {
    let result = match value {
        CellValue::Empty => return Ok(()),
        CellValue::Number(n) => worksheet.write_number(row, col, *n),
        CellValue::Boolean(b) => worksheet.write_boolean(row, col, *b),
        CellValue::Text(s) => worksheet.write_string(row, col, fit_cell_text(s, row, col)),
    };
    result.map(|_| ()).map_err(|e| {
        QnoteError::Export(format!(
            "Failed to write cell at row {}, col {}: {}",
            row + 1,
            col + 1,
            e
        ))
    })
}

/// Cut text to what a cell can hold; longer strings are truncated with a warning
fn fit_cell_text(text: &str, row: u32, col: u16) -> Cow<'_, str> {
    match text.char_indices().nth(MAX_CELL_CHARS) {
        Some((end, _)) => {
            warn!(
                row = row + 1,
                col = col + 1,
                chars = text.chars().count(),
                limit = MAX_CELL_CHARS,
                "cell text truncated to Excel limit"
            );
            Cow::Borrowed(&text[..end])
        }
        None => Cow::Borrowed(text),
    }
}
