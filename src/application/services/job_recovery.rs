use std::sync::Arc;

use tokio::sync::mpsc;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::JobStatus;

use super::OcrMessage;

/// Re-enqueues jobs a previous process accepted but never started, and fails
/// the ones it was in the middle of. Only meaningful with a durable repository.
pub async fn recover_pending_jobs(
    job_repository: &Arc<dyn JobRepository>,
    sender: &mpsc::Sender<OcrMessage>,
) -> Result<usize, RepositoryError> {
    let interrupted = job_repository.list_by_status(JobStatus::Processing).await?;
    for job in &interrupted {
        tracing::warn!(job_id = %job.id, "Failing job interrupted by restart");
        job_repository
            .update_status(
                job.id,
                JobStatus::Failed,
                None,
                Some("Unexpected: interrupted by restart"),
            )
            .await?;
    }

    let queued = job_repository.list_by_status(JobStatus::Queued).await?;
    let mut requeued = 0;
    for job in queued {
        let msg = OcrMessage {
            job_id: job.id,
            input_location: job.input_location,
            language: job.language,
        };
        if sender.send(msg).await.is_err() {
            tracing::error!("OCR queue closed during recovery");
            break;
        }
        requeued += 1;
    }

    if requeued > 0 || !interrupted.is_empty() {
        tracing::info!(
            requeued,
            interrupted = interrupted.len(),
            "Recovered pending jobs"
        );
    }

    Ok(requeued)
}
