pub mod health;

use axum::{
    routing::{get, patch, post},
    Router,
};

use crate::jobs::handlers as jobs;
use crate::onboarding::handlers as onboarding;
use crate::state::AppState;
use crate::wizard::handlers as wizard;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health::health_handler))
        // Job feed & upstream proxies
        .route("/api/v1/jobs", get(jobs::handle_list_jobs))
        .route("/api/v1/jobs/:id", get(jobs::handle_get_job))
        .route("/api/v1/jobs/:id/like", post(jobs::handle_toggle_like))
        .route("/api/v1/liked-jobs", get(jobs::handle_list_liked))
        .route("/api/v1/auth/login", post(jobs::handle_login))
        .route("/api/v1/auth/register", post(jobs::handle_register))
        .route(
            "/api/v1/profile",
            get(jobs::handle_get_profile).put(jobs::handle_update_profile),
        )
        // Resume wizard
        .route("/api/v1/wizard", post(wizard::handle_create_wizard))
        .route(
            "/api/v1/wizard/:id",
            get(wizard::handle_get_wizard).delete(wizard::handle_close_wizard),
        )
        .route(
            "/api/v1/wizard/:id/actions",
            post(wizard::handle_wizard_action),
        )
        .route("/api/v1/wizard/:id/preview", get(wizard::handle_preview))
        .route("/api/v1/wizard/:id/export", get(wizard::handle_export))
        // Onboarding
        .route(
            "/api/v1/onboarding/next",
            post(onboarding::handle_onboarding_next),
        )
        .route("/api/v1/onboarding/catalog", get(onboarding::handle_catalog))
        // Applied jobs
        .route(
            "/api/v1/applications",
            get(jobs::handle_list_applications).post(jobs::handle_record_application),
        )
        .route(
            "/api/v1/applications/:id/status",
            patch(jobs::handle_update_application_status),
        )
        .with_state(state)
}
