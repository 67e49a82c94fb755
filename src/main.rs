use std::sync::Arc;
use std::time::Duration;

use anyhow::Context;
use tokio::net::TcpListener;
use tokio::sync::mpsc;

use papyrus::application::ports::{JobRepository, OcrEngine, Rasterizer, StagingStore};
use papyrus::application::services::{
    OcrJobProcessor, ProcessingOptions, RetrievalService, SubmissionService, drain_workers,
    recover_pending_jobs, spawn_workers,
};
use papyrus::domain::Language;
use papyrus::infrastructure::observability::{TracingConfig, init_tracing};
use papyrus::infrastructure::ocr::TesseractEngine;
use papyrus::infrastructure::persistence::JobRepositoryFactory;
use papyrus::infrastructure::rasterizer::PdfiumRasterizer;
use papyrus::infrastructure::storage::LocalStagingStore;
use papyrus::presentation::{AppState, Environment, Settings, create_router};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    let environment = Environment::from_env()?;

    let settings = Settings::load(environment).context("Failed to load settings")?;

    init_tracing(&TracingConfig::from_settings(
        environment.as_str(),
        &settings.logging,
    ));

    let default_language = Language::parse(&settings.ocr.default_language)
        .context("ocr.default_language is not a valid language code")?;

    let upload_store: Arc<dyn StagingStore> = Arc::new(
        LocalStagingStore::new(settings.storage.upload_dir.clone())
            .context("Failed to open upload directory")?,
    );
    let artifact_store: Arc<dyn StagingStore> = Arc::new(
        LocalStagingStore::new(settings.storage.output_dir.clone())
            .context("Failed to open output directory")?,
    );
    let job_repository: Arc<dyn JobRepository> =
        JobRepositoryFactory::create(&settings.database)
            .await
            .context("Failed to initialise job store")?;

    let ocr_engine: Arc<dyn OcrEngine> = Arc::new(TesseractEngine::new(
        settings.ocr.tesseract_cmd.clone(),
        settings.ocr.tessdata_dir.clone(),
        settings.ocr.engine_mode,
    ));
    let rasterizer: Arc<dyn Rasterizer> = Arc::new(PdfiumRasterizer::new(
        settings.rasterizer.pdfium_library_dir.clone(),
        settings.rasterizer.render_dpi,
        settings.rasterizer.max_pages,
    ));

    let (sender, receiver) = mpsc::channel(settings.worker.queue_capacity.max(1));
    let job_timeout = Duration::from_secs(settings.worker.job_timeout_secs);

    let processor = Arc::new(OcrJobProcessor::new(
        Arc::clone(&upload_store),
        Arc::clone(&artifact_store),
        Arc::clone(&job_repository),
        ocr_engine,
        rasterizer,
        ProcessingOptions {
            job_timeout,
            page_concurrency: settings.ocr.page_concurrency,
        },
    ));
    let workers = spawn_workers(settings.worker.count, receiver, processor);
    tracing::info!(workers = workers.len(), "OCR workers spawned");

    recover_pending_jobs(&job_repository, &sender)
        .await
        .context("Failed to recover pending jobs")?;

    let submission_service = Arc::new(SubmissionService::new(
        upload_store,
        Arc::clone(&job_repository),
        sender,
        default_language,
    ));
    let retrieval_service = Arc::new(RetrievalService::new(artifact_store, job_repository));

    let addr = format!("{}:{}", settings.server.host, settings.server.port);
    let state = AppState {
        submission_service,
        retrieval_service,
        settings: Arc::new(settings),
    };
    let router = create_router(state);

    let listener = TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    tracing::info!("Listening on {}", addr);

    axum::serve(listener, router)
        .with_graceful_shutdown(shutdown_signal())
        .await?;
    tracing::info!("Server stopped");

    // The router owned the last queue sender, so workers exit once the queue is empty.
    if !drain_workers(workers, job_timeout).await {
        tracing::warn!("Exiting with jobs still in flight");
    }
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
        std::future::pending::<()>().await;
    }
    tracing::info!("Shutdown signal received");
}
