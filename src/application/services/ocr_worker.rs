use std::fmt;
use std::sync::Arc;
use std::time::Duration;

use bytes::Bytes;
use futures::{StreamExt, TryStreamExt, stream};
use tokio::sync::{Mutex, mpsc};
use tokio::task::JoinHandle;
use tracing::Instrument;

use crate::application::ports::{
    JobRepository, OcrEngine, OcrEngineError, Rasterizer, RasterizerError, RepositoryError,
    StagingStore, StagingStoreError,
};
use crate::domain::{DocumentKind, JobId, JobStatus, Language, StoragePath, repair_hyphenation};

/// Queue payload: everything a worker needs to run one job.
#[derive(Debug, Clone)]
pub struct OcrMessage {
    pub job_id: JobId,
    pub input_location: StoragePath,
    pub language: Language,
}

#[derive(Debug, Clone, Copy)]
pub struct ProcessingOptions {
    pub job_timeout: Duration,
    pub page_concurrency: usize,
}

impl Default for ProcessingOptions {
    fn default() -> Self {
        Self {
            job_timeout: Duration::from_secs(600),
            page_concurrency: 1,
        }
    }
}

/// Runs a single job end to end and records the outcome in the job repository.
pub struct OcrJobProcessor {
    upload_store: Arc<dyn StagingStore>,
    artifact_store: Arc<dyn StagingStore>,
    job_repository: Arc<dyn JobRepository>,
    ocr_engine: Arc<dyn OcrEngine>,
    rasterizer: Arc<dyn Rasterizer>,
    options: ProcessingOptions,
}

impl OcrJobProcessor {
    pub fn new(
        upload_store: Arc<dyn StagingStore>,
        artifact_store: Arc<dyn StagingStore>,
        job_repository: Arc<dyn JobRepository>,
        ocr_engine: Arc<dyn OcrEngine>,
        rasterizer: Arc<dyn Rasterizer>,
        options: ProcessingOptions,
    ) -> Self {
        Self {
            upload_store,
            artifact_store,
            job_repository,
            ocr_engine,
            rasterizer,
            options,
        }
    }

    /// Returns the artifact location on success, `None` when the message was a
    /// redelivery of a job another worker already picked up.
    pub async fn process(&self, msg: &OcrMessage) -> Result<Option<StoragePath>, OcrWorkerError> {
        let job_id = msg.job_id;

        match self.job_repository.get_by_id(job_id).await {
            Ok(Some(job)) if job.status == JobStatus::Queued => {}
            Ok(Some(job)) => {
                tracing::warn!(status = %job.status, "Skipping redelivered job");
                return Ok(None);
            }
            Ok(None) => {
                return Err(OcrWorkerError::Repository(RepositoryError::NotFound(
                    job_id.to_string(),
                )));
            }
            Err(e) => return Err(OcrWorkerError::Repository(e)),
        }

        self.update_status(job_id, JobStatus::Processing, None, None)
            .await?;

        // On timeout `recognize` is dropped; adapters stop their in-flight work on drop.
        let result = match tokio::time::timeout(self.options.job_timeout, self.recognize(msg)).await
        {
            Ok(result) => result,
            Err(_) => Err(OcrWorkerError::Timeout(self.options.job_timeout)),
        };

        let outcome = match result {
            Ok(text) => self.publish(job_id, text).await,
            Err(e) => Err(e),
        };

        match outcome {
            Ok(artifact) => {
                tracing::info!(artifact = %artifact, "OCR job succeeded");
                Ok(Some(artifact))
            }
            Err(e) => {
                self.mark_failed(job_id, &e.job_error()).await;
                Err(e)
            }
        }
    }

    /// Best effort: used where the failure itself must not raise another error.
    pub async fn mark_failed(&self, job_id: JobId, reason: &str) {
        if let Err(e) = self
            .update_status(job_id, JobStatus::Failed, None, Some(reason))
            .await
        {
            tracing::error!(error = %e, "Could not record job failure");
        }
    }

    async fn recognize(&self, msg: &OcrMessage) -> Result<String, OcrWorkerError> {
        let data = self
            .upload_store
            .fetch(&msg.input_location)
            .await
            .map_err(OcrWorkerError::Staging)?;

        let pages = match DocumentKind::of(&msg.input_location) {
            DocumentKind::Pdf => self
                .rasterizer
                .rasterize(&data)
                .await
                .map_err(OcrWorkerError::Rasterization)?,
            DocumentKind::Image => vec![data],
        };

        tracing::debug!(pages = pages.len(), "Recognizing pages");

        // Page futures own their inputs; the job future must be `Send`.
        let engine = Arc::clone(&self.ocr_engine);
        let language = msg.language.clone();
        let fragments: Vec<String> = stream::iter(pages.into_iter().enumerate())
            .map(move |(page, image)| {
                let engine = Arc::clone(&engine);
                let language = language.clone();
                async move {
                    engine
                        .recognize(&image, &language)
                        .await
                        .map_err(|source| OcrWorkerError::Ocr { page, source })
                }
            })
            .buffered(self.options.page_concurrency.max(1))
            .try_collect()
            .await?;

        Ok(repair_hyphenation(&fragments.concat()))
    }

    /// Writes the artifact, then flips the job to `Succeeded`. The artifact is
    /// removed again if the state change cannot be recorded.
    async fn publish(&self, job_id: JobId, text: String) -> Result<StoragePath, OcrWorkerError> {
        let artifact = StoragePath::for_artifact(&job_id);

        self.artifact_store
            .store(&artifact, Bytes::from(text))
            .await
            .map_err(OcrWorkerError::Artifact)?;

        if let Err(e) = self
            .update_status(job_id, JobStatus::Succeeded, Some(&artifact), None)
            .await
        {
            if let Err(del_err) = self.artifact_store.delete(&artifact).await {
                tracing::warn!(
                    error = %del_err,
                    artifact = %artifact,
                    "Failed to remove artifact of unrecorded job"
                );
            }
            return Err(e);
        }

        Ok(artifact)
    }

    async fn update_status(
        &self,
        job_id: JobId,
        status: JobStatus,
        output_location: Option<&StoragePath>,
        error_message: Option<&str>,
    ) -> Result<(), OcrWorkerError> {
        tracing::debug!(status = %status, "Job status transition");
        self.job_repository
            .update_status(job_id, status, output_location, error_message)
            .await
            .map_err(OcrWorkerError::Repository)
    }
}

/// Long-lived queue consumer. Several workers share one receiver and each takes
/// one message at a time.
pub struct OcrWorker {
    id: usize,
    receiver: Arc<Mutex<mpsc::Receiver<OcrMessage>>>,
    processor: Arc<OcrJobProcessor>,
}

impl OcrWorker {
    pub fn new(
        id: usize,
        receiver: Arc<Mutex<mpsc::Receiver<OcrMessage>>>,
        processor: Arc<OcrJobProcessor>,
    ) -> Self {
        Self {
            id,
            receiver,
            processor,
        }
    }

    pub async fn run(self) {
        tracing::info!(worker = self.id, "OCR worker started");
        loop {
            let next = {
                let mut receiver = self.receiver.lock().await;
                receiver.recv().await
            };
            let Some(msg) = next else { break };

            let span = tracing::info_span!(
                "ocr_job",
                worker = self.id,
                job_id = %msg.job_id,
                input = %msg.input_location,
                language = %msg.language,
            );

            // Run on its own task so a panic in an engine adapter fails the job
            // instead of killing the worker.
            let job_id = msg.job_id;
            let processor = Arc::clone(&self.processor);
            let handle = tokio::spawn(
                async move {
                    if let Err(e) = processor.process(&msg).await {
                        tracing::error!(
                            error = %e,
                            kind = %e.kind(),
                            input = %msg.input_location,
                            "OCR job failed"
                        );
                    }
                }
                .instrument(span.clone()),
            );

            if let Err(join_err) = handle.await {
                let reason = format!("{}: worker task aborted", JobErrorKind::Unexpected);
                async {
                    tracing::error!(error = %join_err, "OCR job aborted");
                    self.processor.mark_failed(job_id, &reason).await;
                }
                .instrument(span)
                .await;
            }
        }
        tracing::info!(worker = self.id, "OCR worker stopped: channel closed");
    }
}

pub fn spawn_workers(
    count: usize,
    receiver: mpsc::Receiver<OcrMessage>,
    processor: Arc<OcrJobProcessor>,
) -> Vec<JoinHandle<()>> {
    let receiver = Arc::new(Mutex::new(receiver));
    (0..count.max(1))
        .map(|id| {
            let worker = OcrWorker::new(id, Arc::clone(&receiver), Arc::clone(&processor));
            tokio::spawn(worker.run())
        })
        .collect()
}

/// Waits for workers to finish after the queue sender is gone. Returns `false`
/// if `grace` elapsed first; the remaining workers are left running.
pub async fn drain_workers(workers: Vec<JoinHandle<()>>, grace: Duration) -> bool {
    let pending = workers.len();
    tracing::info!(workers = pending, grace = ?grace, "Draining OCR workers");
    match tokio::time::timeout(grace, futures::future::join_all(workers)).await {
        Ok(results) => {
            for err in results.into_iter().filter_map(Result::err) {
                tracing::error!(error = %err, "OCR worker ended abnormally");
            }
            true
        }
        Err(_) => {
            tracing::warn!(workers = pending, "Workers still busy after grace period");
            false
        }
    }
}

/// Failure classes recorded on a failed job.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum JobErrorKind {
    EngineFailure,
    Timeout,
    Unexpected,
}

impl fmt::Display for JobErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            JobErrorKind::EngineFailure => "EngineFailure",
            JobErrorKind::Timeout => "Timeout",
            JobErrorKind::Unexpected => "Unexpected",
        };
        f.write_str(name)
    }
}

#[derive(Debug, thiserror::Error)]
pub enum OcrWorkerError {
    #[error("reading upload: {0}")]
    Staging(StagingStoreError),
    #[error("rasterization: {0}")]
    Rasterization(RasterizerError),
    #[error("ocr of page {page}: {source}")]
    Ocr { page: usize, source: OcrEngineError },
    #[error("writing artifact: {0}")]
    Artifact(StagingStoreError),
    #[error("repository: {0}")]
    Repository(RepositoryError),
    #[error("job exceeded {0:?}")]
    Timeout(Duration),
}

impl OcrWorkerError {
    pub fn kind(&self) -> JobErrorKind {
        match self {
            OcrWorkerError::Rasterization(_) | OcrWorkerError::Ocr { .. } => {
                JobErrorKind::EngineFailure
            }
            OcrWorkerError::Timeout(_) => JobErrorKind::Timeout,
            OcrWorkerError::Staging(_)
            | OcrWorkerError::Artifact(_)
            | OcrWorkerError::Repository(_) => JobErrorKind::Unexpected,
        }
    }

    /// Text stored as the job's error message.
    pub fn job_error(&self) -> String {
        format!("{}: {}", self.kind(), self)
    }
}
