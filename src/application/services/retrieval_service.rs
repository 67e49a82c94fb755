use std::sync::Arc;

use crate::application::ports::{JobRepository, RepositoryError, StagingStore, StagingStoreError};
use crate::domain::{Job, JobId, StoragePath};

/// Read side of the pipeline: artifact download and job status lookup.
pub struct RetrievalService {
    artifact_store: Arc<dyn StagingStore>,
    job_repository: Arc<dyn JobRepository>,
}

impl RetrievalService {
    pub fn new(artifact_store: Arc<dyn StagingStore>, job_repository: Arc<dyn JobRepository>) -> Self {
        Self {
            artifact_store,
            job_repository,
        }
    }

    /// Returns the artifact bytes. Job state is not consulted: an artifact that
    /// does not exist yet is simply `NotFound`.
    pub async fn fetch_artifact(&self, artifact_name: &str) -> Result<Vec<u8>, RetrievalError> {
        if !is_plain_name(artifact_name) {
            return Err(RetrievalError::NotFound(artifact_name.to_string()));
        }

        let path = StoragePath::from_raw(artifact_name);
        match self.artifact_store.fetch(&path).await {
            Ok(data) => Ok(data),
            Err(StagingStoreError::NotFound(_)) => {
                Err(RetrievalError::NotFound(artifact_name.to_string()))
            }
            Err(e) => Err(RetrievalError::Storage(e)),
        }
    }

    pub async fn job_status(&self, job_id: JobId) -> Result<Job, RetrievalError> {
        self.job_repository
            .get_by_id(job_id)
            .await
            .map_err(RetrievalError::Repository)?
            .ok_or_else(|| RetrievalError::NotFound(job_id.to_string()))
    }
}

fn is_plain_name(name: &str) -> bool {
    !name.is_empty() && !name.contains(['/', '\\']) && !name.contains("..")
}

#[derive(Debug, thiserror::Error)]
pub enum RetrievalError {
    #[error("not found: {0}")]
    NotFound(String),
    #[error("storage: {0}")]
    Storage(StagingStoreError),
    #[error("repository: {0}")]
    Repository(RepositoryError),
}
