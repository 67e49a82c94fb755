use chrono::{DateTime, Utc};

use super::{JobId, JobStatus, Language, StoragePath};

#[derive(Debug, Clone, PartialEq)]
pub struct Job {
    pub id: JobId,
    pub input_location: StoragePath,
    pub language: Language,
    pub status: JobStatus,
    /// Set only once the job has `Succeeded`.
    pub output_location: Option<StoragePath>,
    pub error_message: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Job {
    pub fn new(id: JobId, input_location: StoragePath, language: Language) -> Self {
        let now = Utc::now();
        Self {
            id,
            input_location,
            language,
            status: JobStatus::Queued,
            output_location: None,
            error_message: None,
            created_at: now,
            updated_at: now,
        }
    }
}
