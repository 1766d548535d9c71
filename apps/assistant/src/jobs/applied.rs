//! In-memory tracker for jobs the user has applied to.

use std::sync::Arc;

use chrono::{NaiveDate, Utc};
use tokio::sync::RwLock;
use tracing::info;
use uuid::Uuid;

use crate::errors::AppError;
use crate::jobs::feed::matches_search;
use crate::models::application::{ApplicationStatus, AppliedJob, StatusCounts};
use crate::models::job::JobPosting;

#[derive(Clone, Default)]
pub struct ApplicationTracker {
    applications: Arc<RwLock<Vec<AppliedJob>>>,
}

impl ApplicationTracker {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records an application dated today, or returns the existing record when the
    /// posting was already applied to.
    pub async fn record(&self, job: JobPosting) -> AppliedJob {
        self.record_on(job, Utc::now().date_naive()).await
    }

    pub async fn record_on(&self, job: JobPosting, applied_date: NaiveDate) -> AppliedJob {
        let mut applications = self.applications.write().await;
        if let Some(existing) = applications.iter().find(|a| a.job.id == job.id) {
            return existing.clone();
        }
        let application = AppliedJob {
            id: Uuid::new_v4(),
            job,
            applied_date,
            status: ApplicationStatus::Applied,
        };
        info!(
            application_id = %application.id,
            job_id = %application.job.id,
            "Recorded application"
        );
        applications.push(application.clone());
        application
    }

    pub async fn set_status(
        &self,
        id: Uuid,
        status: ApplicationStatus,
    ) -> Result<AppliedJob, AppError> {
        let mut applications = self.applications.write().await;
        let application = applications
            .iter_mut()
            .find(|a| a.id == id)
            .ok_or_else(|| AppError::NotFound(format!("Application {id} not found")))?;
        application.status = status;
        Ok(application.clone())
    }

    /// Applications with `status` whose title or company matches `search`, newest first.
    pub async fn list(&self, status: ApplicationStatus, search: &str) -> Vec<AppliedJob> {
        let applications = self.applications.read().await;
        let mut matching: Vec<AppliedJob> = applications
            .iter()
            .filter(|a| a.status == status)
            .filter(|a| matches_search(search, &[a.job.title.as_str(), a.job.company.as_str()]))
            .cloned()
            .collect();
        matching.sort_by(|a, b| b.applied_date.cmp(&a.applied_date));
        matching
    }

    pub async fn counts(&self) -> StatusCounts {
        let mut counts = StatusCounts::default();
        for application in self.applications.read().await.iter() {
            counts.increment(application.status);
        }
        counts
    }
}
