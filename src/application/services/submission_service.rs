use std::sync::Arc;

use bytes::Bytes;
use tokio::sync::mpsc;

use crate::application::ports::{JobRepository, RepositoryError, StagingStore, StagingStoreError};
use crate::domain::{Job, JobId, JobStatus, Language, StoragePath};

use super::OcrMessage;

/// One `file` part of an upload request.
pub struct UploadedFile {
    pub filename: String,
    pub data: Bytes,
}

pub struct SubmissionRequest {
    pub file: Option<UploadedFile>,
    pub language: Option<String>,
}

pub struct SubmissionService {
    upload_store: Arc<dyn StagingStore>,
    job_repository: Arc<dyn JobRepository>,
    sender: mpsc::Sender<OcrMessage>,
    default_language: Language,
}

impl SubmissionService {
    pub fn new(
        upload_store: Arc<dyn StagingStore>,
        job_repository: Arc<dyn JobRepository>,
        sender: mpsc::Sender<OcrMessage>,
        default_language: Language,
    ) -> Self {
        Self {
            upload_store,
            job_repository,
            sender,
            default_language,
        }
    }

    /// Persists the upload, records a `Queued` job and hands it to the worker pool.
    /// Returns as soon as the job is enqueued.
    pub async fn submit(&self, request: SubmissionRequest) -> Result<JobId, SubmissionError> {
        let file = request
            .file
            .ok_or_else(|| SubmissionError::InvalidInput("No file part".to_string()))?;
        if file.filename.is_empty() {
            return Err(SubmissionError::InvalidInput("No selected file".to_string()));
        }

        let language = match request.language.as_deref().map(str::trim) {
            None | Some("") => self.default_language.clone(),
            Some(raw) => Language::parse(raw)
                .map_err(|e| SubmissionError::InvalidInput(e.to_string()))?,
        };

        let job_id = JobId::new();
        let input_location = StoragePath::for_upload(&job_id, &file.filename);

        let size = self
            .upload_store
            .store(&input_location, file.data)
            .await
            .map_err(SubmissionError::Storage)?;

        tracing::debug!(
            job_id = %job_id,
            path = %input_location,
            bytes = size,
            "Upload persisted"
        );

        let job = Job::new(job_id, input_location.clone(), language.clone());
        self.job_repository
            .create(&job)
            .await
            .map_err(SubmissionError::Repository)?;

        let msg = OcrMessage {
            job_id,
            input_location: input_location.clone(),
            language: language.clone(),
        };

        if let Err(e) = self.sender.send(msg).await {
            tracing::error!(job_id = %job_id, error = %e, "Failed to enqueue OCR job");
            if let Err(update_err) = self
                .job_repository
                .update_status(
                    job_id,
                    JobStatus::Failed,
                    None,
                    Some("Unexpected: queue unavailable"),
                )
                .await
            {
                tracing::warn!(error = %update_err, "Could not mark unqueued job as failed");
            }
            return Err(SubmissionError::QueueUnavailable);
        }

        tracing::info!(
            job_id = %job_id,
            filename = %file.filename,
            language = %language,
            "OCR job enqueued"
        );

        Ok(job_id)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum SubmissionError {
    #[error("{0}")]
    InvalidInput(String),
    #[error("storage: {0}")]
    Storage(StagingStoreError),
    #[error("repository: {0}")]
    Repository(RepositoryError),
    #[error("OCR queue unavailable")]
    QueueUnavailable,
}
