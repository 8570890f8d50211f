use serde::Serialize;
use thiserror::Error;

pub type QnoteResult<T> = Result<T, QnoteError>;

#[derive(Error, Debug)]
pub enum QnoteError {
    #[error("Please upload an Excel file to get started.")]
    NoUpload,

    #[error("File not found: {0}")]
    NotFound(String),

    #[error("The file format is incorrect. Please upload a valid Excel file. ({0})")]
    Format(String),

    #[error("An unexpected error occurred: {0}")]
    Unknown(String),

    #[error("The Excel file must contain a '{0}' column.")]
    MissingColumn(String),

    #[error("Your uploaded spreadsheet is empty. Please add questions and notes.")]
    EmptyTable,

    #[error("{0}")]
    Validation(String),

    #[error("{0}")]
    InvalidState(String),

    #[error("Session not found: {0}")]
    SessionNotFound(String),

    #[error("Export error: {0}")]
    Export(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// How loudly a front end should present an error.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
    Info,
    Warning,
    Error,
}

impl QnoteError {
    /// Stable error kind name, surfaced in API responses.
    pub fn kind(&self) -> &'static str {
        match self {
            QnoteError::NoUpload => "NoUploadError",
            QnoteError::NotFound(_) => "NotFoundError",
            QnoteError::Format(_) => "FormatError",
            QnoteError::Unknown(_) => "UnknownError",
            QnoteError::MissingColumn(_) => "MissingColumnError",
            QnoteError::EmptyTable => "EmptyTableError",
            QnoteError::Validation(_) => "ValidationError",
            QnoteError::InvalidState(_) => "InvalidStateError",
            QnoteError::SessionNotFound(_) => "SessionNotFoundError",
            QnoteError::Export(_) => "ExportError",
            QnoteError::Io(_) => "IoError",
        }
    }

    pub fn severity(&self) -> Severity {
        match self {
            QnoteError::NoUpload => Severity::Info,
            QnoteError::MissingColumn(_)
            | QnoteError::EmptyTable
            | QnoteError::Validation(_)
            | QnoteError::InvalidState(_) => Severity::Warning,
            _ => Severity::Error,
        }
    }

    /// Validation errors halt the flow after a successful load.
    pub fn is_validation_failure(&self) -> bool {
        matches!(self, QnoteError::MissingColumn(_) | QnoteError::EmptyTable)
    }
}
