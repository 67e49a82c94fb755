#![allow(dead_code)]

use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

use bytes::Bytes;
use tempfile::TempDir;
use tokio::sync::Mutex;

use papyrus::application::ports::{
    JobRepository, OcrEngine, OcrEngineError, Rasterizer, RasterizerError, StagingStore,
};
use papyrus::application::services::{OcrJobProcessor, OcrMessage, ProcessingOptions};
use papyrus::domain::{Job, JobId, JobStatus, Language, StoragePath};
use papyrus::infrastructure::persistence::InMemoryJobRepository;
use papyrus::infrastructure::storage::LocalStagingStore;

/// Echoes the image bytes back as recognized text, optionally after a delay
/// computed from the image, and records completion order.
pub struct EchoOcrEngine {
    pub calls: AtomicUsize,
    pub completed: Mutex<Vec<String>>,
    delay: Box<dyn Fn(&[u8]) -> Duration + Send + Sync>,
}

impl EchoOcrEngine {
    pub fn new() -> Self {
        Self::with_delay(|_| Duration::ZERO)
    }

    pub fn with_delay(delay: impl Fn(&[u8]) -> Duration + Send + Sync + 'static) -> Self {
        Self {
            calls: AtomicUsize::new(0),
            completed: Mutex::new(Vec::new()),
            delay: Box::new(delay),
        }
    }

    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait::async_trait]
impl OcrEngine for EchoOcrEngine {
    async fn recognize(
        &self,
        image: &[u8],
        _language: &Language,
    ) -> Result<String, OcrEngineError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        let delay = (self.delay)(image);
        if !delay.is_zero() {
            tokio::time::sleep(delay).await;
        }
        let text = String::from_utf8_lossy(image).to_string();
        self.completed.lock().await.push(text.clone());
        Ok(text)
    }
}

pub struct FailingOcrEngine;

#[async_trait::async_trait]
impl OcrEngine for FailingOcrEngine {
    async fn recognize(
        &self,
        _image: &[u8],
        _language: &Language,
    ) -> Result<String, OcrEngineError> {
        Err(OcrEngineError::RecognitionFailed(
            "Failed loading language 'xyz'".to_string(),
        ))
    }
}

pub struct HangingOcrEngine;

#[async_trait::async_trait]
impl OcrEngine for HangingOcrEngine {
    async fn recognize(
        &self,
        _image: &[u8],
        _language: &Language,
    ) -> Result<String, OcrEngineError> {
        std::future::pending().await
    }
}

/// Panics on images containing `panic`, echoes everything else.
pub struct PanickingOcrEngine;

#[async_trait::async_trait]
impl OcrEngine for PanickingOcrEngine {
    async fn recognize(
        &self,
        image: &[u8],
        _language: &Language,
    ) -> Result<String, OcrEngineError> {
        let text = String::from_utf8_lossy(image).to_string();
        if text.contains("panic") {
            panic!("engine adapter bug");
        }
        Ok(text)
    }
}

/// Ignores the document and returns fixed page images.
pub struct FixedPagesRasterizer {
    pub pages: Vec<Vec<u8>>,
}

impl FixedPagesRasterizer {
    pub fn new(pages: &[&str]) -> Self {
        Self {
            pages: pages.iter().map(|p| p.as_bytes().to_vec()).collect(),
        }
    }
}

#[async_trait::async_trait]
impl Rasterizer for FixedPagesRasterizer {
    async fn rasterize(&self, _document: &[u8]) -> Result<Vec<Vec<u8>>, RasterizerError> {
        Ok(self.pages.clone())
    }
}

pub struct FailingRasterizer;

#[async_trait::async_trait]
impl Rasterizer for FailingRasterizer {
    async fn rasterize(&self, _document: &[u8]) -> Result<Vec<Vec<u8>>, RasterizerError> {
        Err(RasterizerError::OpenFailed("not a PDF".to_string()))
    }
}

/// Reports a document longer than the page limit.
pub struct OversizedPdfRasterizer {
    pub count: usize,
    pub max: usize,
}

#[async_trait::async_trait]
impl Rasterizer for OversizedPdfRasterizer {
    async fn rasterize(&self, _document: &[u8]) -> Result<Vec<Vec<u8>>, RasterizerError> {
        Err(RasterizerError::TooManyPages {
            count: self.count,
            max: self.max,
        })
    }
}

/// Temp-dir backed stores plus an in-memory job repository.
pub struct TestPipeline {
    pub upload_dir: TempDir,
    pub output_dir: TempDir,
    pub upload_store: Arc<dyn StagingStore>,
    pub artifact_store: Arc<dyn StagingStore>,
    pub job_repository: Arc<dyn JobRepository>,
}

impl TestPipeline {
    pub fn new() -> Self {
        let upload_dir = TempDir::new().unwrap();
        let output_dir = TempDir::new().unwrap();
        let upload_store: Arc<dyn StagingStore> =
            Arc::new(LocalStagingStore::new(upload_dir.path().to_path_buf()).unwrap());
        let artifact_store: Arc<dyn StagingStore> =
            Arc::new(LocalStagingStore::new(output_dir.path().to_path_buf()).unwrap());
        Self {
            upload_dir,
            output_dir,
            upload_store,
            artifact_store,
            job_repository: Arc::new(InMemoryJobRepository::new()),
        }
    }

    pub fn processor(
        &self,
        ocr_engine: Arc<dyn OcrEngine>,
        rasterizer: Arc<dyn Rasterizer>,
        options: ProcessingOptions,
    ) -> OcrJobProcessor {
        OcrJobProcessor::new(
            Arc::clone(&self.upload_store),
            Arc::clone(&self.artifact_store),
            Arc::clone(&self.job_repository),
            ocr_engine,
            rasterizer,
            options,
        )
    }

    /// Stores an upload and records a queued job for it, as submission would.
    pub async fn queued_job(&self, filename: &str, data: &str) -> OcrMessage {
        let job_id = JobId::new();
        let input_location = StoragePath::for_upload(&job_id, filename);
        self.upload_store
            .store(&input_location, Bytes::from(data.to_string()))
            .await
            .unwrap();

        let language = Language::parse("eng").unwrap();
        let job = Job::new(job_id, input_location.clone(), language.clone());
        self.job_repository.create(&job).await.unwrap();

        OcrMessage {
            job_id,
            input_location,
            language,
        }
    }

    pub async fn job(&self, job_id: JobId) -> Job {
        self.job_repository
            .get_by_id(job_id)
            .await
            .unwrap()
            .expect("job exists")
    }

    pub fn artifact_exists(&self, job_id: JobId) -> bool {
        self.output_dir
            .path()
            .join(format!("{}.txt", job_id.as_uuid()))
            .exists()
    }

    /// Polls until the job is terminal or the deadline passes.
    pub async fn wait_for_terminal(&self, job_id: JobId) -> Job {
        wait_for_terminal(&self.job_repository, job_id).await
    }
}

pub async fn wait_for_terminal(job_repository: &Arc<dyn JobRepository>, job_id: JobId) -> Job {
    for _ in 0..250 {
        if let Some(job) = job_repository.get_by_id(job_id).await.unwrap() {
            if job.status.is_terminal() {
                return job;
            }
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    panic!("job {job_id} did not reach a terminal state");
}

pub fn fast_options() -> ProcessingOptions {
    ProcessingOptions {
        job_timeout: Duration::from_secs(5),
        page_concurrency: 1,
    }
}

pub fn assert_status(job: &Job, status: JobStatus) {
    assert_eq!(
        job.status, status,
        "unexpected status, error: {:?}",
        job.error_message
    );
}
