//! Per-user interactive session
//!
//! Holds the uploaded table, the question currently shown and the note being
//! typed. Every front end drives the same state machine:
//!
//! ```text
//! Empty → Loaded → Validated → QuestionShown → NoteEntered → Exported
//!            ↘ Invalid
//! ```
//!
//! Drawing again from `QuestionShown`, `NoteEntered` or `Exported` shows a
//! fresh question and clears the pending note. Uploading again resets the
//! session from any phase.

use crate::core::notes::{is_blank_note, EMPTY_NOTE_MESSAGE};
use crate::core::{append_note, pick_random_question_with, validator};
use crate::error::{QnoteError, QnoteResult};
use crate::excel::{self, EXPORT_CONTENT_TYPE, EXPORT_FILENAME};
use crate::types::{CellValue, Table, Upload};
use rand::Rng;
use serde::Serialize;
use tracing::{info, warn};

/// Where a session is in the upload → draw → note → export flow
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum Phase {
    #[default]
    Empty,
    Loaded,
    Invalid,
    Validated,
    QuestionShown,
    NoteEntered,
    Exported,
}

impl Phase {
    /// Drawing is enabled only once a valid table is loaded
    pub fn can_draw(self) -> bool {
        matches!(
            self,
            Phase::Validated | Phase::QuestionShown | Phase::NoteEntered | Phase::Exported
        )
    }

    pub fn has_question(self) -> bool {
        matches!(
            self,
            Phase::QuestionShown | Phase::NoteEntered | Phase::Exported
        )
    }
}

/// Updated workbook ready to hand to the user
#[derive(Debug, Clone)]
pub struct Download {
    pub filename: &'static str,
    pub content_type: &'static str,
    pub bytes: Vec<u8>,
}

#[derive(Debug)]
pub struct Session {
    table: Option<Table>,
    current_question: Option<CellValue>,
    pending_note: String,
    phase: Phase,
    download: Option<Download>,
}

impl Default for Session {
    fn default() -> Self {
        Self::new()
    }
}

impl Session {
    #[must_use]
    pub fn new() -> Self {
        Self {
            table: None,
            current_question: None,
            pending_note: String::new(),
            phase: Phase::Empty,
            download: None,
        }
    }

    /// Start a session from an already loaded table (CLI entry point)
    pub fn with_table(table: Table) -> QnoteResult<Self> {
        validator::validate(&table)?;
        let mut session = Self::new();
        session.table = Some(table);
        session.phase = Phase::Validated;
        Ok(session)
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    pub fn table(&self) -> Option<&Table> {
        self.table.as_ref()
    }

    pub fn current_question(&self) -> Option<&CellValue> {
        self.current_question.as_ref()
    }

    pub fn pending_note(&self) -> &str {
        &self.pending_note
    }

    /// Present only after a successful save
    pub fn download(&self) -> Option<&Download> {
        self.download.as_ref()
    }

    /// Load and validate an upload, returning the number of question rows.
    ///
    /// Any failure leaves the session without a table.
    pub fn upload(&mut self, upload: Option<Upload>) -> QnoteResult<usize> {
        self.accept_load(excel::load(upload.as_ref()))
    }

    /// Take the outcome of [`excel::load`] run elsewhere and validate it.
    ///
    /// Same transitions as [`Session::upload`], without parsing here.
    pub fn accept_load(&mut self, loaded: QnoteResult<Option<Table>>) -> QnoteResult<usize> {
        *self = Self::new();

        let loaded = match loaded {
            Ok(Some(table)) => table,
            Ok(None) => return Err(QnoteError::NoUpload),
            Err(e) => {
                warn!(kind = e.kind(), error = %e, "upload rejected");
                return Err(e);
            }
        };
        self.phase = Phase::Loaded;

        if let Err(e) = validator::validate(&loaded) {
            warn!(kind = e.kind(), "uploaded table failed validation");
            self.phase = Phase::Invalid;
            return Err(e);
        }

        let rows = loaded.row_count();
        info!(rows, columns = loaded.columns().len(), "questions loaded");
        self.table = Some(loaded);
        self.phase = Phase::Validated;
        Ok(rows)
    }

    /// Draw a fresh random question
    pub fn draw_question(&mut self) -> QnoteResult<&CellValue> {
        self.draw_question_with(&mut rand::thread_rng())
    }

    pub fn draw_question_with<R: Rng>(&mut self, rng: &mut R) -> QnoteResult<&CellValue> {
        let table = match (&self.table, self.phase.can_draw()) {
            (Some(table), true) => table,
            _ => {
                return Err(QnoteError::InvalidState(
                    "Upload a valid question sheet before drawing a question.".to_string(),
                ))
            }
        };

        let question = pick_random_question_with(table, rng)?;
        self.pending_note.clear();
        self.download = None;
        self.phase = Phase::QuestionShown;
        Ok(self.current_question.insert(question))
    }

    /// Record the note being typed for the shown question
    pub fn enter_note(&mut self, note: impl Into<String>) -> QnoteResult<()> {
        if !self.phase.has_question() {
            return Err(QnoteError::InvalidState(
                "Draw a question before adding a note.".to_string(),
            ));
        }
        self.pending_note = note.into();
        self.phase = Phase::NoteEntered;
        Ok(())
    }

    /// Append the pending note and export the updated workbook.
    ///
    /// An empty note fails with a validation error and changes nothing.
    pub fn save_note(&mut self) -> QnoteResult<&Download> {
        let (table, question) = match (&self.table, &self.current_question) {
            (Some(table), Some(question)) if self.phase.has_question() => (table, question),
            _ => {
                return Err(QnoteError::InvalidState(
                    "Draw a question before saving a note.".to_string(),
                ))
            }
        };

        let updated = append_note(table, question, &self.pending_note)?;
        let bytes = excel::export(&updated)?;
        info!(rows = updated.row_count(), bytes = bytes.len(), "note saved");

        self.table = Some(updated);
        self.phase = Phase::Exported;
        Ok(self.download.insert(Download {
            filename: EXPORT_FILENAME,
            content_type: EXPORT_CONTENT_TYPE,
            bytes,
        }))
    }

    /// Enter and save a note in one step.
    ///
    /// A rejected note leaves the phase, the pending note and any previous
    /// download as they were.
    pub fn submit_note(&mut self, note: impl Into<String>) -> QnoteResult<&Download> {
        if !self.phase.has_question() {
            return Err(QnoteError::InvalidState(
                "Draw a question before saving a note.".to_string(),
            ));
        }

        let note = note.into();
        if is_blank_note(&note) {
            return Err(QnoteError::Validation(EMPTY_NOTE_MESSAGE.to_string()));
        }

        let previous_phase = self.phase;
        let previous_note = std::mem::replace(&mut self.pending_note, note);
        self.phase = Phase::NoteEntered;

        if let Err(e) = self.save_note().map(|_| ()) {
            self.pending_note = previous_note;
            self.phase = previous_phase;
            return Err(e);
        }

        self.download
            .as_ref()
            .ok_or_else(|| QnoteError::Unknown("download missing after save".to_string()))
    }
}
