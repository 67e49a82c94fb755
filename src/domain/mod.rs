mod document;
mod filename;
mod hyphenation;
mod job;
mod job_id;
mod job_status;
mod language;
mod storage_path;

pub use document::DocumentKind;
pub use filename::sanitize_filename;
pub use hyphenation::repair_hyphenation;
pub use job::Job;
pub use job_id::JobId;
pub use job_status::JobStatus;
pub use language::{InvalidLanguage, Language};
pub use storage_path::StoragePath;
