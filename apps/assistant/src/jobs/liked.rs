//! In-memory set of liked job ids, kept in the order they were liked.

use std::collections::HashSet;
use std::sync::Arc;

use tokio::sync::RwLock;
use tracing::debug;

#[derive(Clone, Default)]
pub struct LikedJobs {
    ids: Arc<RwLock<Vec<String>>>,
}

impl LikedJobs {
    pub fn new() -> Self {
        Self::default()
    }

    /// Likes the job, or unlikes it when already liked. Returns whether it is now liked.
    pub async fn toggle(&self, job_id: &str) -> bool {
        let mut ids = self.ids.write().await;
        let liked = match ids.iter().position(|id| id == job_id) {
            Some(index) => {
                ids.remove(index);
                false
            }
            None => {
                ids.push(job_id.to_string());
                true
            }
        };
        debug!(job_id, liked, "Toggled liked job");
        liked
    }

    pub async fn list(&self) -> Vec<String> {
        self.ids.read().await.clone()
    }

    pub async fn snapshot(&self) -> HashSet<String> {
        self.ids.read().await.iter().cloned().collect()
    }
}
