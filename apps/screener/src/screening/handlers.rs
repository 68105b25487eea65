use axum::{
    extract::{Multipart, Path, State},
    http::{header, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::models::candidate::ResultTable;
use crate::screening::batch::{analyze_batch, TableView};
use crate::screening::export::resolve_export;
use crate::screening::extractor::UploadedDocument;
use crate::screening::validation::{duties_char_status, DutiesCharStatus, JobCriteria};
use crate::sessions::SessionTable;
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Response types
// ────────────────────────────────────────────────────────────────────────────

/// A table as the UI renders it: headings plus display rows.
#[derive(Debug, Serialize)]
pub struct TableResponse {
    pub columns: Vec<&'static str>,
    pub rows: Vec<Vec<String>>,
}

impl From<&TableView> for TableResponse {
    fn from(view: &TableView) -> Self {
        Self {
            columns: view.columns(),
            rows: view.rows(),
        }
    }
}

impl From<&ResultTable> for TableResponse {
    fn from(table: &ResultTable) -> Self {
        Self::from(&TableView::Results(table.clone()))
    }
}

#[derive(Debug, Serialize)]
pub struct StatusResponse {
    pub api_key_configured: bool,
    pub status: &'static str,
}

#[derive(Debug, Serialize)]
pub struct SessionResponse {
    pub session_id: Uuid,
    pub table: TableResponse,
}

#[derive(Debug, Serialize)]
pub struct AnalyzeResponse {
    #[serde(flatten)]
    pub table: TableResponse,
    /// Name of the CSV written for this call, downloadable from `/api/v1/exports`.
    pub csv_file: Option<String>,
    pub show_analyze_more: bool,
}

#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct CharCountRequest {
    pub important_duties: String,
    pub considerable_duties: String,
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/status
pub async fn handle_status(State(state): State<AppState>) -> Json<StatusResponse> {
    let configured = state.llm.is_some();
    Json(StatusResponse {
        api_key_configured: configured,
        status: if configured {
            "🟢 API Key Configured"
        } else {
            "🔴 API Key Not Configured"
        },
    })
}

/// POST /api/v1/criteria/char-count
pub async fn handle_char_count(Json(req): Json<CharCountRequest>) -> Json<DutiesCharStatus> {
    Json(duties_char_status(
        &req.important_duties,
        &req.considerable_duties,
    ))
}

/// POST /api/v1/sessions
pub async fn handle_create_session(
    State(state): State<AppState>,
) -> (StatusCode, Json<SessionResponse>) {
    let session_id = state.sessions.create();
    info!(
        "Opened session {session_id} ({} active)",
        state.sessions.len()
    );
    (
        StatusCode::CREATED,
        Json(SessionResponse {
            session_id,
            table: TableResponse::from(&ResultTable::new()),
        }),
    )
}

/// GET /api/v1/sessions/:id
pub async fn handle_get_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id)?;
    let table = session.lock().await;
    Ok(Json(SessionResponse {
        session_id: id,
        table: TableResponse::from(&*table),
    }))
}

/// DELETE /api/v1/sessions/:id
/// Clear-all: the session keeps its id but its table starts over.
pub async fn handle_clear_session(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<SessionResponse>, AppError> {
    let session = find_session(&state, id)?;
    *session.lock().await = ResultTable::new();
    info!("Cleared session {id}");
    Ok(Json(SessionResponse {
        session_id: id,
        table: TableResponse::from(&ResultTable::new()),
    }))
}

/// POST /api/v1/sessions/:id/analyze
/// Multipart form: `resumes` (repeatable file field), `job_title`,
/// `important_duties`, `considerable_duties`.
pub async fn handle_analyze(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    multipart: Multipart,
) -> Result<Json<AnalyzeResponse>, AppError> {
    let session = find_session(&state, id)?;
    let form = parse_analyze_form(multipart).await?;

    // Held until the merged table is stored.
    let mut table = session.lock().await;

    let outcome = analyze_batch(
        state.llm.as_deref(),
        &state.config.export_dir,
        &form.files,
        &form.criteria,
        &table,
    )
    .await;

    if let Some(merged) = outcome.table.results() {
        *table = merged.clone();
    }

    let csv_file = outcome
        .csv_path
        .as_deref()
        .and_then(|p| p.file_name())
        .map(|n| n.to_string_lossy().into_owned());

    Ok(Json(AnalyzeResponse {
        table: TableResponse::from(&outcome.table),
        csv_file,
        show_analyze_more: outcome.show_analyze_more,
    }))
}

/// GET /api/v1/exports/:file_name
pub async fn handle_download_export(
    State(state): State<AppState>,
    Path(file_name): Path<String>,
) -> Result<Response, AppError> {
    let not_found = || AppError::NotFound(format!("Export {file_name} not found"));

    let path = resolve_export(&state.config.export_dir, &file_name).ok_or_else(not_found)?;
    let data = match tokio::fs::read(&path).await {
        Ok(data) => data,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Err(not_found()),
        Err(e) => return Err(AppError::Internal(e.into())),
    };

    Ok((
        [
            (header::CONTENT_TYPE, "text/csv; charset=utf-8".to_string()),
            (
                header::CONTENT_DISPOSITION,
                format!("attachment; filename=\"{file_name}\""),
            ),
        ],
        data,
    )
        .into_response())
}

// ────────────────────────────────────────────────────────────────────────────
// Helpers
// ────────────────────────────────────────────────────────────────────────────

fn find_session(state: &AppState, id: Uuid) -> Result<SessionTable, AppError> {
    state
        .sessions
        .get(id)
        .ok_or_else(|| AppError::NotFound(format!("Session {id} not found")))
}

struct AnalyzeForm {
    files: Vec<UploadedDocument>,
    criteria: JobCriteria,
}

async fn parse_analyze_form(mut multipart: Multipart) -> Result<AnalyzeForm, AppError> {
    let mut files = Vec::new();
    let mut criteria = JobCriteria::default();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::Validation(format!("Failed to read form field: {e}")))?
    {
        let name = field.name().unwrap_or("").to_string();

        match name.as_str() {
            "resumes" => {
                let file_name = field.file_name().unwrap_or("").to_string();
                let data = field
                    .bytes()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {file_name}: {e}")))?;
                // browsers send an empty part when no file is picked
                if file_name.is_empty() && data.is_empty() {
                    continue;
                }
                files.push(UploadedDocument::new(file_name, data));
            }
            "job_title" | "important_duties" | "considerable_duties" => {
                let value = field
                    .text()
                    .await
                    .map_err(|e| AppError::Validation(format!("Failed to read {name}: {e}")))?;
                match name.as_str() {
                    "job_title" => criteria.job_title = value,
                    "important_duties" => criteria.important_duties = value,
                    _ => criteria.considerable_duties = value,
                }
            }
            _ => {}
        }
    }

    Ok(AnalyzeForm { files, criteria })
}
