mod job_repository;
mod ocr_engine;
mod rasterizer;
mod repository_error;
mod staging_store;

pub use job_repository::JobRepository;
pub use ocr_engine::{OcrEngine, OcrEngineError};
pub use rasterizer::{Rasterizer, RasterizerError};
pub use repository_error::RepositoryError;
pub use staging_store::{StagingStore, StagingStoreError};
