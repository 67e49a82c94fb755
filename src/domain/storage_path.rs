use std::fmt;

use super::JobId;
use super::filename::sanitize_filename;

/// Location of a blob relative to the root of a `StagingStore`.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct StoragePath(String);

impl StoragePath {
    /// `<job_id>_<original filename>`, sanitized as a whole.
    pub fn for_upload(job_id: &JobId, original_filename: &str) -> Self {
        Self(sanitize_filename(&format!(
            "{}_{}",
            job_id.as_uuid(),
            original_filename
        )))
    }

    /// `<job_id>.txt`
    pub fn for_artifact(job_id: &JobId) -> Self {
        Self(format!("{}.txt", job_id.as_uuid()))
    }

    pub fn from_raw(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for StoragePath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}
