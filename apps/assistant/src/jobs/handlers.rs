//! Axum route handlers for the job feed, liked jobs, auth and profile proxies, and the
//! applied-jobs tracker.

use axum::{
    extract::{Path, Query, State},
    http::{header, HeaderMap, StatusCode},
    Json,
};
use std::collections::HashSet;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use uuid::Uuid;

use crate::api_client::{JobQuery, LoginRequest, RegisterRequest};
use crate::errors::AppError;
use crate::jobs::feed::{filter_jobs, toggle_filter};
use crate::models::application::{ApplicationStatus, AppliedJob, StatusCounts};
use crate::models::job::{JobPosting, MatchLevel};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Default, Deserialize)]
pub struct FeedParams {
    pub skip: Option<u32>,
    pub limit: Option<u32>,
    pub search: Option<String>,
    pub location: Option<String>,
    pub job_type: Option<String>,
    /// Comma-separated active filters, e.g. `Remote,H1B Only`.
    pub filters: Option<String>,
    /// A filter chip the user just clicked; toggled against `filters`.
    pub toggle: Option<String>,
    /// Only jobs the user has liked (the "Liked" tab).
    #[serde(default)]
    pub liked_only: bool,
}

impl FeedParams {
    fn upstream_query(&self) -> JobQuery {
        JobQuery {
            skip: self.skip,
            limit: self.limit,
            search: self.search.clone(),
            location: self.location.clone(),
            job_type: self.job_type.clone(),
        }
    }

    fn active_filters(&self) -> Vec<String> {
        let mut active: Vec<String> = self
            .filters
            .as_deref()
            .unwrap_or_default()
            .split(',')
            .map(str::trim)
            .filter(|f| !f.is_empty())
            .map(str::to_string)
            .collect();
        if let Some(filter) = self.toggle.as_deref().map(str::trim).filter(|f| !f.is_empty()) {
            toggle_filter(&mut active, filter);
        }
        active
    }
}

#[derive(Debug, Serialize)]
pub struct FeedJob {
    #[serde(flatten)]
    pub job: JobPosting,
    pub match_level: MatchLevel,
    pub match_label: &'static str,
    pub liked: bool,
}

impl FeedJob {
    fn new(job: JobPosting, liked: bool) -> Self {
        let match_level = job.match_level();
        FeedJob {
            match_level,
            match_label: match_level.label(),
            liked,
            job,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct FeedResponse {
    pub jobs: Vec<FeedJob>,
    pub total: usize,
    pub active_filters: Vec<String>,
}

#[derive(Debug, Serialize)]
pub struct LikeResponse {
    pub job_id: String,
    pub liked: bool,
}

#[derive(Debug, Serialize)]
pub struct LikedJobsResponse {
    pub job_ids: Vec<String>,
    pub total: usize,
}

#[derive(Debug, Deserialize)]
pub struct ApplicationsParams {
    #[serde(default)]
    pub status: ApplicationStatus,
    #[serde(default)]
    pub search: String,
}

#[derive(Debug, Serialize)]
pub struct ApplicationsResponse {
    pub applications: Vec<AppliedJob>,
    pub counts: StatusCounts,
}

#[derive(Debug, Deserialize)]
pub struct RecordApplicationRequest {
    pub job: Option<JobPosting>,
    pub job_id: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct UpdateStatusRequest {
    pub status: ApplicationStatus,
}

// ────────────────────────────────────────────────────────────────────────────
// Job feed
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/jobs
///
/// Fetches the feed upstream, then applies the search, tag and liked filters locally.
pub async fn handle_list_jobs(
    State(state): State<AppState>,
    Query(params): Query<FeedParams>,
) -> Result<Json<FeedResponse>, AppError> {
    let jobs: Vec<JobPosting> = state.api.get_jobs(&params.upstream_query()).await?;
    let active_filters = params.active_filters();
    let search = params.search.as_deref().unwrap_or_default();
    let liked = state.liked.snapshot().await;

    let jobs = annotate_liked(filter_jobs(jobs, search, &active_filters), &liked, params.liked_only);

    Ok(Json(FeedResponse {
        total: jobs.len(),
        jobs,
        active_filters,
    }))
}

/// GET /api/v1/jobs/:id
pub async fn handle_get_job(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<FeedJob>, AppError> {
    let job: JobPosting = state.api.get_job_by_id(&id).await?;
    let liked = state.liked.snapshot().await.contains(&job.id);
    Ok(Json(FeedJob::new(job, liked)))
}

fn annotate_liked(jobs: Vec<JobPosting>, liked: &HashSet<String>, liked_only: bool) -> Vec<FeedJob> {
    jobs.into_iter()
        .map(|job| {
            let is_liked = liked.contains(&job.id);
            FeedJob::new(job, is_liked)
        })
        .filter(|job| !liked_only || job.liked)
        .collect()
}

// ────────────────────────────────────────────────────────────────────────────
// Liked jobs
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/jobs/:id/like
///
/// Likes the job, or unlikes it when already liked.
pub async fn handle_toggle_like(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<LikeResponse>, AppError> {
    let job_id = id.trim();
    if job_id.is_empty() {
        return Err(AppError::Validation("job id cannot be empty".to_string()));
    }
    let liked = state.liked.toggle(job_id).await;
    Ok(Json(LikeResponse {
        job_id: job_id.to_string(),
        liked,
    }))
}

/// GET /api/v1/liked-jobs
pub async fn handle_list_liked(State(state): State<AppState>) -> Json<LikedJobsResponse> {
    let job_ids = state.liked.list().await;
    Json(LikedJobsResponse {
        total: job_ids.len(),
        job_ids,
    })
}

// ────────────────────────────────────────────────────────────────────────────
// Auth & profile proxies
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/auth/login
pub async fn handle_login(
    State(state): State<AppState>,
    Json(credentials): Json<LoginRequest>,
) -> Result<Json<Value>, AppError> {
    Ok(Json(state.api.login(&credentials).await?))
}

/// POST /api/v1/auth/register
pub async fn handle_register(
    State(state): State<AppState>,
    Json(user): Json<RegisterRequest>,
) -> Result<Json<Value>, AppError> {
    if user.email.trim().is_empty() || user.password.is_empty() {
        return Err(AppError::Validation(
            "email and password are required".to_string(),
        ));
    }
    Ok(Json(state.api.register(&user).await?))
}

/// GET /api/v1/profile
pub async fn handle_get_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.api.get_user_profile(token).await?))
}

/// PUT /api/v1/profile
pub async fn handle_update_profile(
    State(state): State<AppState>,
    headers: HeaderMap,
    Json(profile): Json<Value>,
) -> Result<Json<Value>, AppError> {
    let token = bearer_token(&headers)?;
    Ok(Json(state.api.update_user_profile(&profile, token).await?))
}

fn bearer_token(headers: &HeaderMap) -> Result<&str, AppError> {
    headers
        .get(header::AUTHORIZATION)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.strip_prefix("Bearer "))
        .map(str::trim)
        .filter(|t| !t.is_empty())
        .ok_or(AppError::Unauthorized)
}

// ────────────────────────────────────────────────────────────────────────────
// Applied jobs
// ────────────────────────────────────────────────────────────────────────────

/// GET /api/v1/applications?status=applied&search=
pub async fn handle_list_applications(
    State(state): State<AppState>,
    Query(params): Query<ApplicationsParams>,
) -> Json<ApplicationsResponse> {
    let applications = state
        .applications
        .list(params.status, &params.search)
        .await;
    let counts = state.applications.counts().await;
    Json(ApplicationsResponse {
        applications,
        counts,
    })
}

/// POST /api/v1/applications
///
/// Records an application for an inline posting or one fetched by id.
pub async fn handle_record_application(
    State(state): State<AppState>,
    Json(request): Json<RecordApplicationRequest>,
) -> Result<(StatusCode, Json<AppliedJob>), AppError> {
    let job = match (request.job, request.job_id) {
        (Some(job), _) => job,
        (None, Some(job_id)) if !job_id.trim().is_empty() => {
            state.api.get_job_by_id(job_id.trim()).await?
        }
        _ => {
            return Err(AppError::Validation(
                "either job or job_id is required".to_string(),
            ))
        }
    };
    let application = state.applications.record(job).await;
    Ok((StatusCode::CREATED, Json(application)))
}

/// PATCH /api/v1/applications/:id/status
pub async fn handle_update_application_status(
    State(state): State<AppState>,
    Path(id): Path<Uuid>,
    Json(request): Json<UpdateStatusRequest>,
) -> Result<Json<AppliedJob>, AppError> {
    let application = state.applications.set_status(id, request.status).await?;
    Ok(Json(application))
}
