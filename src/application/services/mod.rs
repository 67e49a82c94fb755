mod job_recovery;
mod ocr_worker;
mod retrieval_service;
mod submission_service;

pub use job_recovery::recover_pending_jobs;
pub use ocr_worker::{
    JobErrorKind, OcrJobProcessor, OcrMessage, OcrWorker, OcrWorkerError, ProcessingOptions,
    drain_workers, spawn_workers,
};
pub use retrieval_service::{RetrievalError, RetrievalService};
pub use submission_service::{
    SubmissionError, SubmissionRequest, SubmissionService, UploadedFile,
};
