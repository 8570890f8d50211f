//! Excel importer implementation - Excel (.xlsx) → Table

use crate::error::{QnoteError, QnoteResult};
use crate::types::{CellValue, Table, Upload, DEFAULT_SHEET_NAME};
use calamine::{Data, Range, Reader, Xlsx, XlsxError};
use std::collections::HashMap;
use std::io::{Cursor, Read, Seek};
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

/// Load an optional upload.
///
/// No upload is not an error: the caller gets `Ok(None)` and decides how to
/// prompt the user.
pub fn load(upload: Option<&Upload>) -> QnoteResult<Option<Table>> {
    let Some(upload) = upload else {
        return Ok(None);
    };

    if !upload.has_xlsx_extension() {
        return Err(QnoteError::Format(format!(
            "expected an .xlsx file, got '{}'",
            upload.filename.as_deref().unwrap_or_default()
        )));
    }

    ExcelImporter::from_bytes(&upload.bytes).map(Some)
}

/// Excel importer reading the first worksheet of a workbook on disk
pub struct ExcelImporter {
    path: PathBuf,
}

impl ExcelImporter {
    /// Create a new Excel importer
    pub fn new<P: AsRef<Path>>(path: P) -> Self {
        Self {
            path: path.as_ref().to_path_buf(),
        }
    }

    /// Import the first sheet of the file as a Table
    pub fn import(&self) -> QnoteResult<Table> {
        let file = std::fs::File::open(&self.path).map_err(|e| {
            if e.kind() == std::io::ErrorKind::NotFound {
                QnoteError::NotFound(self.path.display().to_string())
            } else {
                QnoteError::Unknown(format!("Failed to open Excel file: {}", e))
            }
        })?;

        read_first_sheet(std::io::BufReader::new(file))
    }

    /// Import an in-memory workbook (an upload)
    pub fn from_bytes(bytes: &[u8]) -> QnoteResult<Table> {
        read_first_sheet(Cursor::new(bytes))
    }
}

fn read_first_sheet<RS: Read + Seek>(reader: RS) -> QnoteResult<Table> {
    let mut workbook: Xlsx<RS> = Xlsx::new(reader).map_err(classify)?;

    let sheet_name = workbook
        .sheet_names()
        .first()
        .cloned()
        .unwrap_or_else(|| DEFAULT_SHEET_NAME.to_string());

    let range = workbook
        .worksheet_range_at(0)
        .ok_or_else(|| QnoteError::Format("workbook contains no worksheets".to_string()))?
        .map_err(classify)?;

    let table = range_to_table(&sheet_name, &range);
    debug!(
        sheet = %table.sheet_name,
        columns = table.columns().len(),
        rows = table.row_count(),
        "parsed worksheet"
    );
    Ok(table)
}

/// Map calamine failures onto the loader error taxonomy
fn classify(err: XlsxError) -> QnoteError {
    warn!(error = %err, "failed to read workbook");
    let message = err.to_string();
    match &err {
        XlsxError::Io(e) if e.kind() == std::io::ErrorKind::NotFound => {
            QnoteError::NotFound(message)
        }
        XlsxError::Zip(_)
        | XlsxError::Xml(_)
        | XlsxError::XmlAttr(_)
        | XlsxError::XmlEof(_)
        | XlsxError::UnexpectedNode(_)
        | XlsxError::ParseFloat(_)
        | XlsxError::ParseInt(_) => QnoteError::Format(message),
        _ => QnoteError::Unknown(message),
    }
}

/// Convert a worksheet range into a Table, first row as header
fn range_to_table(sheet_name: &str, range: &Range<Data>) -> Table {
    let mut rows = range.rows();

    let Some(header) = rows.next() else {
        return Table::new(sheet_name, Vec::new());
    };

    let mut table = Table::new(sheet_name, header_names(header));
    for row in rows {
        table.push_row(row.iter().map(convert_cell).collect());
    }
    table
}

/// Build column names from the header row.
///
/// Blank headers become `Unnamed: <index>`; repeated names get `.1`, `.2`, ...
fn header_names(header: &[Data]) -> Vec<String> {
    let mut seen: HashMap<String, usize> = HashMap::new();
    let mut names = Vec::with_capacity(header.len());

    for (idx, cell) in header.iter().enumerate() {
        let base = match convert_cell(cell) {
            CellValue::Empty => format!("Unnamed: {}", idx),
            value => value.to_string(),
        };

        let mut name = base.clone();
        while let Some(count) = seen.get_mut(&name) {
            *count += 1;
            name = format!("{}.{}", base, count);
        }
        seen.insert(name.clone(), 0);
        names.push(name);
    }

    names
}

fn convert_cell(cell: &Data) -> CellValue {
    match cell {
        Data::Empty => CellValue::Empty,
        Data::String(s) => CellValue::Text(s.clone()),
        Data::Float(f) => CellValue::Number(*f),
        Data::Int(i) => CellValue::Number(*i as f64),
        Data::Bool(b) => CellValue::Boolean(*b),
        Data::DateTime(dt) => CellValue::Number(dt.as_f64()),
        Data::DateTimeIso(s) | Data::DurationIso(s) => CellValue::Text(s.clone()),
        Data::Error(e) => CellValue::Text(e.to_string()),
    }
}
