//! Note appending
//!
//! Saving a note never edits existing rows: it yields a new table with one
//! `{Question, Note}` row appended at the end.

use crate::error::{QnoteError, QnoteResult};
use crate::types::{CellValue, Table, NOTE_COLUMN, QUESTION_COLUMN};

pub const EMPTY_NOTE_MESSAGE: &str = "Please enter a note before saving.";

/// A note is accepted when it has at least one non-whitespace character
pub fn is_blank_note(note: &str) -> bool {
    note.trim().is_empty()
}

/// Return a copy of `table` with `{Question: question, Note: note}` appended.
///
/// The note is stored verbatim. `Note` is created as the last column when
/// absent; other columns of the new row are left empty.
pub fn append_note(table: &Table, question: &CellValue, note: &str) -> QnoteResult<Table> {
    if is_blank_note(note) {
        return Err(QnoteError::Validation(EMPTY_NOTE_MESSAGE.to_string()));
    }

    let mut updated = table.clone();
    updated.ensure_column(QUESTION_COLUMN);
    updated.ensure_column(NOTE_COLUMN);
    updated.push_record([
        (QUESTION_COLUMN, question.clone()),
        (NOTE_COLUMN, CellValue::text(note)),
    ]);
    Ok(updated)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn base() -> Table {
        let mut table = Table::new("Sheet1", vec!["Question".to_string()]);
        table.push_row(vec!["What is 2+2?".into()]);
        table.push_row(vec!["Capital of France?".into()]);
        table
    }

    #[test]
    fn test_append_adds_single_row_last() {
        let table = base();
        let q = CellValue::text("What is 2+2?");
        let updated = append_note(&table, &q, "Easy").unwrap();

        assert_eq!(updated.row_count(), table.row_count() + 1);
        assert_eq!(updated.columns(), &["Question".to_string(), "Note".to_string()]);
        assert_eq!(updated.get(2, "Question"), Some(&q));
        assert_eq!(updated.get(2, "Note"), Some(&CellValue::text("Easy")));
    }

    #[test]
    fn test_append_preserves_original_rows() {
        let table = base();
        let updated = append_note(&table, &CellValue::text("Capital of France?"), "Paris").unwrap();
        for (i, row) in table.rows().iter().enumerate() {
            assert_eq!(updated.get(i, "Question"), row.get(0));
            assert_eq!(updated.get(i, "Note"), Some(&CellValue::Empty));
        }
    }

    #[test]
    fn test_append_does_not_mutate_input() {
        let table = base();
        let before = table.clone();
        let _ = append_note(&table, &CellValue::text("What is 2+2?"), "Easy").unwrap();
        assert_eq!(table, before);
    }

    #[test]
    fn test_empty_note_rejected_without_change() {
        let table = base();
        let before = table.clone();
        let err = append_note(&table, &CellValue::text("What is 2+2?"), "").unwrap_err();
        assert!(matches!(err, QnoteError::Validation(ref m) if m == EMPTY_NOTE_MESSAGE));
        assert_eq!(table, before);
    }

    #[test]
    fn test_whitespace_note_rejected() {
        let table = base();
        assert!(append_note(&table, &CellValue::text("q"), "  \t\n").is_err());
    }

    #[test]
    fn test_note_stored_verbatim() {
        let table = base();
        let updated = append_note(&table, &CellValue::text("q"), "  padded ").unwrap();
        assert_eq!(updated.get(2, "Note"), Some(&CellValue::text("  padded ")));
    }

    #[test]
    fn test_existing_note_column_reused() {
        let mut table = Table::new(
            "Sheet1",
            vec!["Note".to_string(), "Question".to_string(), "Topic".to_string()],
        );
        table.push_row(vec!["old".into(), "Q1".into(), "t".into()]);

        let updated = append_note(&table, &CellValue::text("Q1"), "new").unwrap();
        assert_eq!(updated.columns().len(), 3);
        assert_eq!(updated.rows()[1].values, vec![
            CellValue::text("new"),
            CellValue::text("Q1"),
            CellValue::Empty,
        ]);
    }

    #[test]
    fn test_numeric_question_kept_as_number() {
        let table = base();
        let updated = append_note(&table, &CellValue::Number(42.0), "answer").unwrap();
        assert_eq!(updated.get(2, "Question"), Some(&CellValue::Number(42.0)));
    }
}
