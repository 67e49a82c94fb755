use std::collections::HashMap;

use async_trait::async_trait;
use chrono::Utc;
use tokio::sync::RwLock;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus, StoragePath};

/// Process-local job store. Every mutation holds the write lock, so updates to
/// one job are linearizable and readers always see a whole `Job`.
#[derive(Default)]
pub struct InMemoryJobRepository {
    jobs: RwLock<HashMap<JobId, Job>>,
}

impl InMemoryJobRepository {
    pub fn new() -> Self {
        Self::default()
    }
}

#[async_trait]
impl JobRepository for InMemoryJobRepository {
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        if jobs.contains_key(&job.id) {
            return Err(RepositoryError::ConstraintViolation(format!(
                "job {} already exists",
                job.id
            )));
        }
        jobs.insert(job.id, job.clone());
        Ok(())
    }

    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        Ok(self.jobs.read().await.get(&id).cloned())
    }

    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        output_location: Option<&StoragePath>,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let mut jobs = self.jobs.write().await;
        let job = jobs
            .get_mut(&id)
            .ok_or_else(|| RepositoryError::NotFound(id.to_string()))?;

        if !job.status.can_transition_to(status) {
            return Err(RepositoryError::InvalidTransition {
                from: job.status,
                to: status,
            });
        }

        job.status = status;
        job.output_location = match status {
            JobStatus::Succeeded => output_location.cloned(),
            _ => None,
        };
        job.error_message = error_message.map(str::to_string);
        job.updated_at = Utc::now();

        tracing::debug!(job_id = %id, status = %status, "Job updated");
        Ok(())
    }

    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        let jobs = self.jobs.read().await;
        let mut matching: Vec<Job> = jobs
            .values()
            .filter(|job| job.status == status)
            .cloned()
            .collect();
        matching.sort_by_key(|job| job.created_at);
        Ok(matching)
    }
}
