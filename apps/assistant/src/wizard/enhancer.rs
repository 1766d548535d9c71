//! Enhancer: the async seam between the wizard and whatever rewrites the resume.
//!
//! Default: `TemplateEnhancer`, which waits a fixed delay and then applies the pure
//! `enhance` transform. A remote enhancement service would implement the same trait;
//! its errors surface on the wizard as `last_error` and never tear the session down.
//!
//! `SessionStore` holds an `Arc<dyn Enhancer>`.

use std::time::Duration;

use async_trait::async_trait;
use thiserror::Error;
use tracing::{debug, warn};

use crate::models::job::JobRequirement;
use crate::models::resume::ResumeDocument;
use crate::wizard::enhancement::enhance;
use crate::wizard::state::{EditScope, SectionSelection};

/// Snapshot of everything the enhancement needs, taken when step 3 is requested.
#[derive(Debug, Clone, PartialEq)]
pub struct EnhancementRequest {
    pub document: ResumeDocument,
    pub job: JobRequirement,
    pub sections: SectionSelection,
    pub selected_skills: Vec<String>,
    pub edit_scope: EditScope,
}

#[derive(Debug, Error)]
pub enum EnhancementError {
    #[error("enhancement service unavailable: {0}")]
    Unavailable(String),
}

#[async_trait]
pub trait Enhancer: Send + Sync {
    async fn enhance(&self, request: EnhancementRequest) -> Result<ResumeDocument, EnhancementError>;
}

pub struct TemplateEnhancer {
    delay: Duration,
}

impl TemplateEnhancer {
    pub fn new(delay: Duration) -> Self {
        TemplateEnhancer { delay }
    }
}

#[async_trait]
impl Enhancer for TemplateEnhancer {
    async fn enhance(&self, request: EnhancementRequest) -> Result<ResumeDocument, EnhancementError> {
        debug!(delay_ms = self.delay.as_millis() as u64, "Enhancing resume");
        tokio::time::sleep(self.delay).await;

        if request.edit_scope == EditScope::Full {
            // Full edit has no defined behaviour yet; rewrite the latest entry only.
            warn!("Full edit requested; applying quick edit to the most recent entry");
        }

        Ok(enhance(
            &request.document,
            &request.job,
            request.sections,
            &request.selected_skills,
        ))
    }
}
