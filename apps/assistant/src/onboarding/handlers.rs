//! Axum route handlers for the onboarding intake.

use axum::Json;
use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::errors::AppError;
use crate::onboarding::{IntakeForm, IntakeInput, JobCategory, JOB_CATEGORIES, JOB_TYPES};

#[derive(Debug, Deserialize)]
pub struct IntakeRequest {
    #[serde(default)]
    pub form: IntakeForm,
    /// Defaults to "Next" when omitted.
    pub input: Option<IntakeInput>,
}

#[derive(Debug, Serialize)]
pub struct IntakeResponse {
    pub form: IntakeForm,
    pub step_title: &'static str,
    pub next_label: &'static str,
    pub can_advance: bool,
}

impl From<IntakeForm> for IntakeResponse {
    fn from(form: IntakeForm) -> Self {
        IntakeResponse {
            step_title: form.step.title(),
            next_label: form.step.next_label(),
            can_advance: form.can_advance(),
            form,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct CatalogResponse {
    pub categories: &'static [JobCategory],
    pub job_types: [&'static str; 4],
}

/// POST /api/v1/onboarding/next
///
/// Applies one intake input (by default "Next") to the submitted form. A disabled
/// "Next" and a malformed form (e.g. step 5) are both 400s.
pub async fn handle_onboarding_next(Json(body): Json<Value>) -> Result<Json<IntakeResponse>, AppError> {
    let request: IntakeRequest = serde_json::from_value(body)
        .map_err(|e| AppError::Validation(format!("invalid onboarding request: {e}")))?;
    let input = request.input.unwrap_or(IntakeInput::Next);
    let form = request
        .form
        .apply(input)
        .map_err(|e| AppError::Validation(e.to_string()))?;
    Ok(Json(form.into()))
}

/// GET /api/v1/onboarding/catalog
pub async fn handle_catalog() -> Json<CatalogResponse> {
    Json(CatalogResponse {
        categories: JOB_CATEGORIES,
        job_types: JOB_TYPES,
    })
}
