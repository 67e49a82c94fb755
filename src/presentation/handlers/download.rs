use axum::extract::{Path, State};
use axum::http::{StatusCode, header};
use axum::response::{IntoResponse, Response};

use super::error_response::error_response;
use crate::application::services::RetrievalError;
use crate::presentation::state::AppState;

#[tracing::instrument(skip(state))]
pub async fn download_handler(
    State(state): State<AppState>,
    Path(artifact_name): Path<String>,
) -> Response {
    match state.retrieval_service.fetch_artifact(&artifact_name).await {
        Ok(data) => (
            StatusCode::OK,
            [
                (header::CONTENT_TYPE, "text/plain; charset=utf-8".to_string()),
                (
                    header::CONTENT_DISPOSITION,
                    format!("attachment; filename=\"{}\"", artifact_name),
                ),
            ],
            data,
        )
            .into_response(),
        Err(RetrievalError::NotFound(_)) => {
            tracing::debug!("Artifact not available");
            error_response(StatusCode::NOT_FOUND, "File not found")
        }
        Err(e) => {
            tracing::error!(error = %e, "Failed to read artifact");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while reading the file",
            )
        }
    }
}
