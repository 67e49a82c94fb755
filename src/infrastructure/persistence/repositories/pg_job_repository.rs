use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::postgres::PgRow;
use sqlx::{PgPool, Row};
use tracing::instrument;
use uuid::Uuid;

use crate::application::ports::{JobRepository, RepositoryError};
use crate::domain::{Job, JobId, JobStatus, Language, StoragePath};

const ALL_STATUSES: [JobStatus; 4] = [
    JobStatus::Queued,
    JobStatus::Processing,
    JobStatus::Succeeded,
    JobStatus::Failed,
];

pub struct PgJobRepository {
    pool: PgPool,
}

impl PgJobRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl JobRepository for PgJobRepository {
    #[instrument(skip(self, job), fields(job_id = %job.id))]
    async fn create(&self, job: &Job) -> Result<(), RepositoryError> {
        sqlx::query(
            r#"
            INSERT INTO ocr_jobs (id, input_location, language, status, output_location, error_message, created_at, updated_at)
            VALUES ($1, $2, $3, $4, $5, $6, $7, $8)
            "#,
        )
        .bind(job.id.as_uuid())
        .bind(job.input_location.as_str())
        .bind(job.language.as_str())
        .bind(job.status.as_str())
        .bind(job.output_location.as_ref().map(StoragePath::as_str))
        .bind(job.error_message.as_deref())
        .bind(job.created_at)
        .bind(job.updated_at)
        .execute(&self.pool)
        .await
        .map_err(|e| match e {
            sqlx::Error::Database(db) if db.is_unique_violation() => {
                RepositoryError::ConstraintViolation(db.to_string())
            }
            other => RepositoryError::QueryFailed(other.to_string()),
        })?;

        Ok(())
    }

    #[instrument(skip(self), fields(job_id = %id))]
    async fn get_by_id(&self, id: JobId) -> Result<Option<Job>, RepositoryError> {
        let row = sqlx::query(
            r#"
            SELECT id, input_location, language, status, output_location, error_message, created_at, updated_at
            FROM ocr_jobs
            WHERE id = $1
            "#,
        )
        .bind(id.as_uuid())
        .fetch_optional(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        row.as_ref().map(job_from_row).transpose()
    }

    /// The transition check and the write are a single conditional `UPDATE`, so
    /// concurrent writers cannot both move a job out of the same state.
    #[instrument(skip(self, output_location, error_message), fields(job_id = %id, status = %status))]
    async fn update_status(
        &self,
        id: JobId,
        status: JobStatus,
        output_location: Option<&StoragePath>,
        error_message: Option<&str>,
    ) -> Result<(), RepositoryError> {
        let predecessors: Vec<&str> = ALL_STATUSES
            .iter()
            .filter(|from| from.can_transition_to(status))
            .map(JobStatus::as_str)
            .collect();
        let output_location = match status {
            JobStatus::Succeeded => output_location.map(StoragePath::as_str),
            _ => None,
        };

        let result = sqlx::query(
            r#"
            UPDATE ocr_jobs
            SET status = $1, output_location = $2, error_message = $3, updated_at = $4
            WHERE id = $5 AND status = ANY($6)
            "#,
        )
        .bind(status.as_str())
        .bind(output_location)
        .bind(error_message)
        .bind(Utc::now())
        .bind(id.as_uuid())
        .bind(predecessors)
        .execute(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        if result.rows_affected() == 1 {
            return Ok(());
        }

        match self.get_by_id(id).await? {
            Some(job) => Err(RepositoryError::InvalidTransition {
                from: job.status,
                to: status,
            }),
            None => Err(RepositoryError::NotFound(id.to_string())),
        }
    }

    #[instrument(skip(self), fields(status = %status))]
    async fn list_by_status(&self, status: JobStatus) -> Result<Vec<Job>, RepositoryError> {
        let rows = sqlx::query(
            r#"
            SELECT id, input_location, language, status, output_location, error_message, created_at, updated_at
            FROM ocr_jobs
            WHERE status = $1
            ORDER BY created_at ASC
            "#,
        )
        .bind(status.as_str())
        .fetch_all(&self.pool)
        .await
        .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?;

        rows.iter().map(job_from_row).collect()
    }
}

fn job_from_row(row: &PgRow) -> Result<Job, RepositoryError> {
    let column_err = |e: sqlx::Error| RepositoryError::QueryFailed(e.to_string());

    let id: Uuid = row.try_get("id").map_err(column_err)?;
    let input_location: String = row.try_get("input_location").map_err(column_err)?;
    let language: String = row.try_get("language").map_err(column_err)?;
    let status: String = row.try_get("status").map_err(column_err)?;
    let output_location: Option<String> = row.try_get("output_location").map_err(column_err)?;
    let error_message: Option<String> = row.try_get("error_message").map_err(column_err)?;
    let created_at: DateTime<Utc> = row.try_get("created_at").map_err(column_err)?;
    let updated_at: DateTime<Utc> = row.try_get("updated_at").map_err(column_err)?;

    Ok(Job {
        id: JobId::from_uuid(id),
        input_location: StoragePath::from_raw(input_location),
        language: Language::parse(&language)
            .map_err(|e| RepositoryError::QueryFailed(e.to_string()))?,
        status: status
            .parse::<JobStatus>()
            .map_err(RepositoryError::QueryFailed)?,
        output_location: output_location.map(StoragePath::from_raw),
        error_message,
        created_at,
        updated_at,
    })
}
