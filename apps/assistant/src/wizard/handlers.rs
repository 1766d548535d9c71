//! Axum route handlers for the resume-tailoring wizard.

use axum::{
    extract::{Path, State},
    http::{header, HeaderName, HeaderValue, StatusCode},
    response::{IntoResponse, Response},
    Json,
};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::errors::AppError;
use crate::export::{content_disposition, export_to_pdf, ExportError};
use crate::layout::renderer::{render, RenderedDocument};
use crate::models::job::{JobPosting, JobRequirement};
use crate::state::AppState;
use crate::wizard::state::{ScoreBand, UserInput, WizardState};

const PAGE_COUNT_HEADER: HeaderName = HeaderName::from_static("x-page-count");

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

/// Either an inline job requirement or the id of a posting to fetch upstream.
#[derive(Debug, Deserialize)]
pub struct CreateWizardRequest {
    pub job: Option<JobRequirement>,
    pub job_id: Option<String>,
}

#[derive(Debug, Serialize)]
pub struct WizardResponse {
    pub session_id: Uuid,
    pub score_band: ScoreBand,
    #[serde(flatten)]
    pub state: WizardState,
}

impl WizardResponse {
    fn new(session_id: Uuid, state: WizardState) -> Self {
        WizardResponse {
            session_id,
            score_band: state.score_band(),
            state,
        }
    }
}

// ────────────────────────────────────────────────────────────────────────────
// Handlers
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/wizard
///
/// Opens a wizard session on step 1 with the seed resume.
pub async fn handle_create_wizard(
    State(state): State<AppState>,
    Json(request): Json<CreateWizardRequest>,
) -> Result<(StatusCode, Json<WizardResponse>), AppError> {
    let job = match (request.job, request.job_id) {
        (Some(job), _) => job,
        (None, Some(job_id)) if !job_id.trim().is_empty() => {
            let posting: JobPosting = state.api.get_job_by_id(job_id.trim()).await?;
            posting.requirement()
        }
        _ => {
            return Err(AppError::Validation(
                "either job or job_id is required".to_string(),
            ))
        }
    };

    let (id, wizard) = state.sessions.create(job).await;
    Ok((StatusCode::CREATED, Json(WizardResponse::new(id, wizard))))
}

/// GET /api/v1/wizard/:id
pub async fn handle_get_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<WizardResponse>, AppError> {
    let wizard = state.sessions.get(id).await?;
    Ok(Json(WizardResponse::new(id, wizard)))
}

/// POST /api/v1/wizard/:id/actions
///
/// Applies one user input. Returns 409 while an enhancement is running and 400 for
/// malformed input such as an out-of-range step.
pub async fn handle_wizard_action(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(body): Json<Value>,
) -> Result<Json<WizardResponse>, AppError> {
    let input: UserInput = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("invalid wizard action: {e}")))?;
    let wizard = state.sessions.dispatch(id, input).await?;
    Ok(Json(WizardResponse::new(id, wizard)))
}

/// GET /api/v1/wizard/:id/preview
///
/// The laid-out document exactly as the export pipeline will rasterize it.
pub async fn handle_preview(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Json<RenderedDocument>, AppError> {
    let wizard = state.sessions.get(id).await?;
    Ok(Json(render(&wizard.document, &wizard.style)))
}

/// GET /api/v1/wizard/:id/export
///
/// Downloads the current resume as `<Name>_Resume.pdf`. The page count is reported in
/// `X-Page-Count`.
pub async fn handle_export(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<Response, AppError> {
    let wizard = state.sessions.get(id).await?;
    let rendered = render(&wizard.document, &wizard.style);
    let file = export_to_pdf(&wizard.document, &rendered, state.rasterizer.as_ref()).await?;

    let disposition = HeaderValue::from_str(&content_disposition(&file.file_name))
        .map_err(|e| ExportError::Encode(format!("Content-Disposition: {e}")))?;
    Ok((
        [
            (header::CONTENT_TYPE, HeaderValue::from_static("application/pdf")),
            (header::CONTENT_DISPOSITION, disposition),
            (PAGE_COUNT_HEADER, HeaderValue::from(file.page_count)),
        ],
        file.bytes,
    )
        .into_response())
}

/// DELETE /api/v1/wizard/:id
///
/// Closes the session, cancelling any enhancement still running.
pub async fn handle_close_wizard(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
) -> Result<StatusCode, AppError> {
    state.sessions.close(id).await?;
    Ok(StatusCode::NO_CONTENT)
}
