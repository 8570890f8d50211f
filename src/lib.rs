//! QuizNote - random questions and notes over Excel question sheets
//!
//! Upload an .xlsx whose first sheet has a `Question` column, draw a random
//! question, attach a note, and export an updated workbook with the note
//! appended as a new row.
//!
//! # Example
//!
//! ```no_run
//! use royalbit_quiznote::core::{append_note, pick_random_question};
//! use royalbit_quiznote::excel::{export, ExcelImporter};
//!
//! let table = ExcelImporter::new("questions.xlsx").import()?;
//! royalbit_quiznote::core::validate(&table)?;
//!
//! let question = pick_random_question(&table)?;
//! let updated = append_note(&table, &question, "Easy")?;
//! let bytes = export(&updated)?;
//! std::fs::write("updated_file.xlsx", bytes)?;
//! # Ok::<(), royalbit_quiznote::error::QnoteError>(())
//! ```

pub mod api;
pub mod cli;
pub mod core;
pub mod error;
pub mod excel;
pub mod session;
pub mod types;

// Re-export commonly used types
pub use error::{QnoteError, QnoteResult};
pub use session::{Download, Phase, Session};
pub use types::{CellValue, Row, Table, Upload};
