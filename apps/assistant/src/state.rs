use std::sync::Arc;
use std::time::Duration;

use crate::api_client::{ApiError, ApiService};
use crate::config::Config;
use crate::export::rasterizer::{BlockRasterizer, Rasterizer};
use crate::jobs::applied::ApplicationTracker;
use crate::jobs::liked::LikedJobs;
use crate::wizard::enhancer::{Enhancer, TemplateEnhancer};
use crate::wizard::session::SessionStore;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub api: ApiService,
    pub config: Config,
    /// Open resume wizards, keyed by session id.
    pub sessions: SessionStore,
    pub applications: ApplicationTracker,
    pub liked: LikedJobs,
    /// Pluggable capture backend for PDF export. Default: BlockRasterizer.
    pub rasterizer: Arc<dyn Rasterizer>,
}

impl AppState {
    /// Default wiring: template enhancer with the configured delay, block rasterizer.
    pub fn from_config(config: Config) -> Result<Self, ApiError> {
        let enhancer: Arc<dyn Enhancer> = Arc::new(TemplateEnhancer::new(Duration::from_millis(
            config.enhancement_delay_ms,
        )));
        Ok(AppState {
            api: ApiService::new(config.api_base_url.clone())?,
            sessions: SessionStore::new(enhancer),
            applications: ApplicationTracker::new(),
            liked: LikedJobs::new(),
            rasterizer: Arc::new(BlockRasterizer),
            config,
        })
    }
}
