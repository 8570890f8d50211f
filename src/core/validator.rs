//! Question sheet validation
//!
//! A loaded table is usable only when it has a `Question` column and at
//! least one data row. The column check runs first, so a header-only sheet
//! with a `Question` header reports empty, never missing-column.

use crate::error::{QnoteError, QnoteResult};
use crate::types::{Table, QUESTION_COLUMN};

/// Check a loaded table before any question can be drawn
pub fn validate(table: &Table) -> QnoteResult<()> {
    if !table.has_column(QUESTION_COLUMN) {
        return Err(QnoteError::MissingColumn(QUESTION_COLUMN.to_string()));
    }
    if table.is_empty() {
        return Err(QnoteError::EmptyTable);
    }
    Ok(())
}

/// Validate the result of a load, where `None` means nothing was uploaded
pub fn validate_loaded(table: Option<Table>) -> QnoteResult<Table> {
    let table = table.ok_or(QnoteError::NoUpload)?;
    validate(&table)?;
    Ok(table)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table(columns: &[&str]) -> Table {
        Table::new("Sheet1", columns.iter().map(|c| c.to_string()).collect())
    }

    #[test]
    fn test_valid_table_passes() {
        let mut t = table(&["Question"]);
        t.push_row(vec!["What is 2+2?".into()]);
        assert!(validate(&t).is_ok());
    }

    #[test]
    fn test_missing_question_column() {
        let mut t = table(&["Prompt"]);
        t.push_row(vec!["What is 2+2?".into()]);
        assert!(matches!(validate(&t), Err(QnoteError::MissingColumn(c)) if c == "Question"));
    }

    #[test]
    fn test_header_only_sheet_is_empty_not_missing() {
        let t = table(&["Question", "Note"]);
        assert!(matches!(validate(&t), Err(QnoteError::EmptyTable)));
    }

    #[test]
    fn test_sheet_without_columns_is_missing_column() {
        let t = table(&[]);
        assert!(matches!(validate(&t), Err(QnoteError::MissingColumn(_))));
    }

    #[test]
    fn test_column_name_is_case_sensitive() {
        let mut t = table(&["question"]);
        t.push_row(vec!["lowercase header".into()]);
        assert!(matches!(validate(&t), Err(QnoteError::MissingColumn(_))));
    }

    #[test]
    fn test_validate_loaded_none_prompts_upload() {
        assert!(matches!(validate_loaded(None), Err(QnoteError::NoUpload)));
    }
}
