use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::models::job::JobPosting;

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ApplicationStatus {
    #[default]
    Applied,
    Interviewing,
    Offer,
    Rejected,
    Archived,
}

/// A posting the user has applied to, with its tracking status.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AppliedJob {
    pub id: Uuid,
    pub job: JobPosting,
    pub applied_date: NaiveDate,
    pub status: ApplicationStatus,
}

/// Number of applications per status. Every status is present, zero or not.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusCounts {
    pub applied: usize,
    pub interviewing: usize,
    pub offer: usize,
    pub rejected: usize,
    pub archived: usize,
}

impl StatusCounts {
    pub fn increment(&mut self, status: ApplicationStatus) {
        match status {
            ApplicationStatus::Applied => self.applied += 1,
            ApplicationStatus::Interviewing => self.interviewing += 1,
            ApplicationStatus::Offer => self.offer += 1,
            ApplicationStatus::Rejected => self.rejected += 1,
            ApplicationStatus::Archived => self.archived += 1,
        }
    }
}
