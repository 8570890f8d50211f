//! API request handlers
//!
//! Handlers for all REST API endpoints. Every JSON reply uses the
//! [`ApiResponse`] envelope; the download endpoint returns the workbook.

use std::sync::Arc;

use axum::{
    extract::{rejection::JsonRejection, Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use super::server::AppState;
use crate::error::{QnoteError, QnoteResult};
use crate::excel;
use crate::session::Phase;
use crate::types::{CellValue, Upload};

/// Multipart field carrying the spreadsheet
pub const UPLOAD_FIELD: &str = "file";

/// Standard API response wrapper
#[derive(Serialize)]
pub struct ApiResponse<T: Serialize> {
    pub success: bool,
    pub request_id: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error_kind: Option<String>,
}

impl<T: Serialize> ApiResponse<T> {
    pub fn ok(data: T) -> Self {
        Self {
            success: true,
            request_id: Uuid::new_v4().to_string(),
            data: Some(data),
            error: None,
            error_kind: None,
        }
    }

    pub fn err(message: impl Into<String>) -> Self
    where
        T: Default,
    {
        Self {
            success: false,
            request_id: Uuid::new_v4().to_string(),
            data: None,
            error: Some(message.into()),
            error_kind: None,
        }
    }

    pub fn from_error(error: &QnoteError) -> Self
    where
        T: Default,
    {
        Self {
            error_kind: Some(error.kind().to_string()),
            ..Self::err(error.to_string())
        }
    }
}

/// HTTP status for each error kind
pub fn status_for(error: &QnoteError) -> StatusCode {
    match error {
        QnoteError::NoUpload | QnoteError::Validation(_) => StatusCode::BAD_REQUEST,
        QnoteError::NotFound(_) | QnoteError::SessionNotFound(_) => StatusCode::NOT_FOUND,
        QnoteError::InvalidState(_) => StatusCode::CONFLICT,
        QnoteError::Format(_) | QnoteError::MissingColumn(_) | QnoteError::EmptyTable => {
            StatusCode::UNPROCESSABLE_ENTITY
        }
        QnoteError::Unknown(_) | QnoteError::Export(_) | QnoteError::Io(_) => {
            StatusCode::INTERNAL_SERVER_ERROR
        }
    }
}

/// Turn a handler result into a JSON reply
fn respond<T: Serialize + Default>(result: QnoteResult<T>) -> Response {
    match result {
        Ok(data) => Json(ApiResponse::ok(data)).into_response(),
        Err(e) => {
            info!(kind = e.kind(), error = %e, "request failed");
            (status_for(&e), Json(ApiResponse::<T>::from_error(&e))).into_response()
        }
    }
}

/// Root endpoint response
#[derive(Serialize)]
pub struct RootResponse {
    pub name: String,
    pub version: String,
    pub description: String,
    pub endpoints: Vec<EndpointInfo>,
}

#[derive(Serialize)]
pub struct EndpointInfo {
    pub path: String,
    pub method: String,
    pub description: String,
}

impl EndpointInfo {
    fn new(method: &str, path: &str, description: &str) -> Self {
        Self {
            path: path.to_string(),
            method: method.to_string(),
            description: description.to_string(),
        }
    }
}

/// GET / - Root info
pub async fn root(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    let response = RootResponse {
        name: "QuizNote API Server".to_string(),
        version: state.version.clone(),
        description: "Draw random questions from a spreadsheet and save notes on them"
            .to_string(),
        endpoints: vec![
            EndpointInfo::new("GET", "/health", "Health check endpoint"),
            EndpointInfo::new("GET", "/version", "Get server version"),
            EndpointInfo::new("POST", "/api/v1/sessions", "Start a session"),
            EndpointInfo::new("GET", "/api/v1/sessions/:id", "Session status"),
            EndpointInfo::new("DELETE", "/api/v1/sessions/:id", "End a session"),
            EndpointInfo::new(
                "POST",
                "/api/v1/sessions/:id/upload",
                "Upload an .xlsx question sheet (multipart field 'file')",
            ),
            EndpointInfo::new("POST", "/api/v1/sessions/:id/draw", "Draw a random question"),
            EndpointInfo::new(
                "POST",
                "/api/v1/sessions/:id/note",
                "Save a note for the shown question",
            ),
            EndpointInfo::new(
                "GET",
                "/api/v1/sessions/:id/download",
                "Download the updated workbook",
            ),
        ],
    };
    Json(ApiResponse::ok(response))
}

/// Health check response
#[derive(Serialize)]
pub struct HealthResponse {
    pub status: String,
    pub active_sessions: usize,
}

/// GET /health - Health check
pub async fn health(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(HealthResponse {
        status: "healthy".to_string(),
        active_sessions: state.session_count(),
    }))
}

/// Version response
#[derive(Serialize)]
pub struct VersionResponse {
    pub version: String,
    pub features: Vec<String>,
}

/// GET /version - Server version
pub async fn version(State(state): State<Arc<AppState>>) -> impl IntoResponse {
    Json(ApiResponse::ok(VersionResponse {
        version: state.version.clone(),
        features: vec![
            "upload".to_string(),
            "draw".to_string(),
            "note".to_string(),
            "download".to_string(),
        ],
    }))
}

/// Session creation response
#[derive(Serialize, Default)]
pub struct CreateSessionResponse {
    pub session_id: String,
    pub created_at: String,
    pub message: String,
}

/// POST /api/v1/sessions - Start a session
pub async fn create_session(State(state): State<Arc<AppState>>) -> Response {
    let (session_id, created_at) = state.create_session();
    info!(%session_id, "session created");
    (
        StatusCode::CREATED,
        Json(ApiResponse::ok(CreateSessionResponse {
            session_id,
            created_at: created_at.to_rfc3339(),
            message: QnoteError::NoUpload.to_string(),
        })),
    )
        .into_response()
}

/// Session status
#[derive(Serialize, Default)]
pub struct SessionInfoResponse {
    pub session_id: String,
    pub phase: Phase,
    pub created_at: String,
    pub columns: Vec<String>,
    pub rows: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub current_question: Option<CellValue>,
    pub download_ready: bool,
}

/// GET /api/v1/sessions/:id - Session status
pub async fn session_info(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    respond(state.with_session(&id, |entry| {
        let session = &entry.session;
        Ok(SessionInfoResponse {
            session_id: id.clone(),
            phase: session.phase(),
            created_at: entry.created_at.to_rfc3339(),
            columns: session
                .table()
                .map(|t| t.columns().to_vec())
                .unwrap_or_default(),
            rows: session.table().map_or(0, |t| t.row_count()),
            current_question: session.current_question().cloned(),
            download_ready: session.download().is_some(),
        })
    }))
}

/// End session response
#[derive(Serialize, Default)]
pub struct EndSessionResponse {
    pub ended: bool,
    pub session_id: String,
}

/// DELETE /api/v1/sessions/:id - End a session
pub async fn end_session(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    respond(state.end_session(&id).map(|()| {
        info!(session_id = %id, "session ended");
        EndSessionResponse {
            ended: true,
            session_id: id.clone(),
        }
    }))
}

/// Upload response
#[derive(Serialize, Default)]
pub struct UploadResponse {
    pub loaded: bool,
    pub sheet_name: String,
    pub columns: Vec<String>,
    pub rows: usize,
    pub message: String,
}

/// POST /api/v1/sessions/:id/upload - Load a question sheet
pub async fn upload(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    mut multipart: Multipart,
) -> Response {
    // Read and parse the body before taking the session lock
    let upload = match read_upload(&mut multipart).await {
        Ok(upload) => upload,
        Err(e) => return respond::<UploadResponse>(Err(e)),
    };
    let loaded = tokio::task::spawn_blocking(move || excel::load(upload.as_ref()))
        .await
        .unwrap_or_else(|e| Err(QnoteError::Unknown(format!("upload parser failed: {}", e))));

    respond(state.with_session(&id, |entry| {
        let rows = entry.session.accept_load(loaded)?;
        let table = entry
            .session
            .table()
            .ok_or_else(|| QnoteError::Unknown("table missing after upload".to_string()))?;
        Ok(UploadResponse {
            loaded: true,
            sheet_name: table.sheet_name.clone(),
            columns: table.columns().to_vec(),
            rows,
            message: format!("Loaded {} questions", rows),
        })
    }))
}

/// Pull the `file` field out of a multipart body.
///
/// A missing field, or an empty part without a filename (a form submitted
/// with no file chosen), counts as no upload.
async fn read_upload(multipart: &mut Multipart) -> QnoteResult<Option<Upload>> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| QnoteError::Format(format!("invalid multipart body: {}", e)))?
    {
        if field.name() != Some(UPLOAD_FIELD) {
            continue;
        }

        let filename = field
            .file_name()
            .filter(|name| !name.is_empty())
            .map(str::to_string);
        let bytes = field
            .bytes()
            .await
            .map_err(|e| QnoteError::Format(format!("failed to read upload: {}", e)))?;

        if bytes.is_empty() && filename.is_none() {
            return Ok(None);
        }
        return Ok(Some(Upload::new(filename, bytes.to_vec())));
    }
    Ok(None)
}

/// Draw response
#[derive(Serialize, Default)]
pub struct DrawResponse {
    pub question: CellValue,
}

/// POST /api/v1/sessions/:id/draw - Draw a random question
pub async fn draw(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    respond(state.with_session(&id, |entry| {
        let question = entry.session.draw_question()?.clone();
        Ok(DrawResponse { question })
    }))
}

/// Note request
#[derive(Deserialize)]
pub struct NoteRequest {
    #[serde(default)]
    pub note: String,
}

/// Note response
#[derive(Serialize, Default)]
pub struct NoteResponse {
    pub saved: bool,
    pub question: CellValue,
    pub note: String,
    pub rows: usize,
    pub download_url: String,
    pub message: String,
}

/// POST /api/v1/sessions/:id/note - Save a note for the shown question
pub async fn save_note(
    State(state): State<Arc<AppState>>,
    Path(id): Path<String>,
    payload: Result<Json<NoteRequest>, JsonRejection>,
) -> Response {
    let req = match payload {
        Ok(Json(req)) => req,
        Err(rejection) => {
            return respond::<NoteResponse>(Err(QnoteError::Validation(format!(
                "Invalid note request: {}",
                rejection.body_text()
            ))))
        }
    };

    respond(state.with_session(&id, |entry| {
        let session = &mut entry.session;
        session.submit_note(req.note.clone())?;

        Ok(NoteResponse {
            saved: true,
            question: session.current_question().cloned().unwrap_or_default(),
            note: req.note.clone(),
            rows: session.table().map_or(0, |t| t.row_count()),
            download_url: format!("/api/v1/sessions/{}/download", id),
            message: "Note saved successfully!".to_string(),
        })
    }))
}

/// GET /api/v1/sessions/:id/download - Updated workbook
pub async fn download(State(state): State<Arc<AppState>>, Path(id): Path<String>) -> Response {
    let result = state.with_session(&id, |entry| {
        entry.session.download().cloned().ok_or_else(|| {
            QnoteError::InvalidState("Save a note before downloading.".to_string())
        })
    });

    match result {
        Ok(file) => (
            [
                (header::CONTENT_TYPE, file.content_type.to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", file.filename),
                ),
            ],
            file.bytes,
        )
            .into_response(),
        Err(e) => respond::<NoteResponse>(Err(e)),
    }
}
