//! Random question selection

use crate::core::validator::validate;
use crate::error::{QnoteError, QnoteResult};
use crate::types::{CellValue, Table, QUESTION_COLUMN};
use rand::Rng;

/// Draw one question uniformly at random from the `Question` column
pub fn pick_random_question(table: &Table) -> QnoteResult<CellValue> {
    pick_random_question_with(table, &mut rand::thread_rng())
}

/// Same as [`pick_random_question`] with a caller-supplied RNG.
///
/// Each call is an independent draw; earlier picks are not excluded.
pub fn pick_random_question_with<R: Rng>(
    table: &Table,
    rng: &mut R,
) -> QnoteResult<CellValue> {
    validate(table)?;
    let index = rng.gen_range(0..table.row_count());
    table
        .get(index, QUESTION_COLUMN)
        .cloned()
        .ok_or_else(|| QnoteError::MissingColumn(QUESTION_COLUMN.to_string()))
}
