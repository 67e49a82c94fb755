use axum::Json;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::error_response::error_response;
use crate::application::services::RetrievalError;
use crate::domain::JobId;
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct JobStatusResponse {
    pub job_id: String,
    pub state: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    pub created_at: String,
    pub updated_at: String,
}

#[tracing::instrument(skip(state))]
pub async fn job_status_handler(
    State(state): State<AppState>,
    Path(job_id): Path<String>,
) -> Response {
    let Ok(id) = JobId::parse(&job_id) else {
        return error_response(
            StatusCode::BAD_REQUEST,
            format!("Invalid job ID: {}", job_id),
        );
    };

    match state.retrieval_service.job_status(id).await {
        Ok(job) => {
            let response = JobStatusResponse {
                job_id: job.id.to_string(),
                state: job.status.as_str().to_string(),
                error: job.error_message,
                output: job.output_location.map(|path| path.to_string()),
                created_at: job.created_at.to_rfc3339(),
                updated_at: job.updated_at.to_rfc3339(),
            };
            (StatusCode::OK, Json(response)).into_response()
        }
        Err(RetrievalError::NotFound(_)) => {
            error_response(StatusCode::NOT_FOUND, format!("Job not found: {}", job_id))
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to fetch job status");
            error_response(StatusCode::INTERNAL_SERVER_ERROR, "Failed to fetch job")
        }
    }
}
