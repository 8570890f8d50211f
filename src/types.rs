use serde::{Deserialize, Serialize};
use std::fmt;

/// Column every question sheet must carry
pub const QUESTION_COLUMN: &str = "Question";

/// Column created on demand when a note is saved
pub const NOTE_COLUMN: &str = "Note";

/// Worksheet name used when the source sheet name is unknown
pub const DEFAULT_SHEET_NAME: &str = "Sheet1";

//==============================================================================
// Cells
//==============================================================================

/// A single spreadsheet cell
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum CellValue {
    #[default]
    Empty,
    Boolean(bool),
    /// Integers and date serials are read as numbers
    Number(f64),
    Text(String),
}

impl CellValue {
    pub fn text(value: impl Into<String>) -> Self {
        CellValue::Text(value.into())
    }

    pub fn is_empty(&self) -> bool {
        matches!(self, CellValue::Empty)
    }

    /// Get the type name as a string
    pub fn type_name(&self) -> &'static str {
        match self {
            CellValue::Empty => "Empty",
            CellValue::Boolean(_) => "Boolean",
            CellValue::Number(_) => "Number",
            CellValue::Text(_) => "Text",
        }
    }
}

impl From<&str> for CellValue {
    fn from(value: &str) -> Self {
        CellValue::Text(value.to_string())
    }
}

impl From<String> for CellValue {
    fn from(value: String) -> Self {
        CellValue::Text(value)
    }
}

impl From<f64> for CellValue {
    fn from(value: f64) -> Self {
        CellValue::Number(value)
    }
}

impl From<bool> for CellValue {
    fn from(value: bool) -> Self {
        CellValue::Boolean(value)
    }
}

impl fmt::Display for CellValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CellValue::Empty => Ok(()),
            CellValue::Boolean(b) => write!(f, "{}", if *b { "TRUE" } else { "FALSE" }),
            // Whole numbers print without a trailing ".0"
            CellValue::Number(n) if n.fract() == 0.0 && n.abs() < 1e15 => {
                write!(f, "{}", *n as i64)
            }
            CellValue::Number(n) => write!(f, "{}", n),
            CellValue::Text(s) => f.write_str(s),
        }
    }
}

//==============================================================================
// Rows and Tables
//==============================================================================

/// One record; holds a value per table column, in column order
#[derive(Debug, Clone, PartialEq, Default)]
pub struct Row {
    pub values: Vec<CellValue>,
}

impl Row {
    pub fn new(values: Vec<CellValue>) -> Self {
        Self { values }
    }

    pub fn get(&self, index: usize) -> Option<&CellValue> {
        self.values.get(index)
    }
}

/// Tabular data read from the first worksheet of an upload.
///
/// Columns are whatever the header row declared, in file order. Every row
/// holds exactly one value per column.
#[derive(Debug, Clone, PartialEq)]
pub struct Table {
    pub sheet_name: String,
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl Table {
    pub fn new(sheet_name: impl Into<String>, columns: Vec<String>) -> Self {
        Self {
            sheet_name: sheet_name.into(),
            columns,
            rows: Vec::new(),
        }
    }

    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    pub fn has_column(&self, name: &str) -> bool {
        self.column_index(name).is_some()
    }

    /// Cell at `row` under column `name`
    pub fn get(&self, row: usize, name: &str) -> Option<&CellValue> {
        let col = self.column_index(name)?;
        self.rows.get(row).and_then(|r| r.get(col))
    }

    /// All values of one column, top to bottom
    pub fn column_values(&self, name: &str) -> Option<Vec<&CellValue>> {
        let col = self.column_index(name)?;
        Some(self.rows.iter().filter_map(|r| r.get(col)).collect())
    }

    /// Append a row, padding with `Empty` or truncating to the column count
    pub fn push_row(&mut self, mut values: Vec<CellValue>) {
        values.resize(self.columns.len(), CellValue::Empty);
        self.rows.push(Row::new(values));
    }

    /// Append a row given as `(column, value)` pairs; unknown columns are ignored
    pub fn push_record<'a, I>(&mut self, record: I)
    where
        I: IntoIterator<Item = (&'a str, CellValue)>,
    {
        let mut values = vec![CellValue::Empty; self.columns.len()];
        for (name, value) in record {
            if let Some(idx) = self.column_index(name) {
                values[idx] = value;
            }
        }
        self.rows.push(Row::new(values));
    }

    /// Ensure a column exists, returning its index.
    ///
    /// A new column goes last and existing rows get `Empty` in it.
    pub fn ensure_column(&mut self, name: &str) -> usize {
        if let Some(idx) = self.column_index(name) {
            return idx;
        }
        self.columns.push(name.to_string());
        for row in &mut self.rows {
            row.values.push(CellValue::Empty);
        }
        self.columns.len() - 1
    }
}

//==============================================================================
// Uploads
//==============================================================================

/// An uploaded file as received from a front end
#[derive(Debug, Clone)]
pub struct Upload {
    pub filename: Option<String>,
    pub bytes: Vec<u8>,
}

impl Upload {
    pub fn new(filename: Option<String>, bytes: Vec<u8>) -> Self {
        Self { filename, bytes }
    }

    /// Only `.xlsx` files are accepted; a missing filename is not rejected
    pub fn has_xlsx_extension(&self) -> bool {
        match &self.filename {
            Some(name) => name.to_lowercase().ends_with(".xlsx"),
            None => true,
        }
    }
}
