use axum::Json;
use axum::extract::multipart::MultipartRejection;
use axum::extract::{Multipart, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde::Serialize;

use super::error_response::error_response;
use crate::application::services::{SubmissionError, SubmissionRequest, UploadedFile};
use crate::presentation::state::AppState;

#[derive(Serialize)]
pub struct UploadResponse {
    pub job_id: String,
    pub message: String,
}

/// `POST /upload`: multipart with a required `file` part and optional
/// `language`. Answers 202 once the job is queued. Malformed or oversized
/// bodies keep the status multer assigns (400 or 413).
#[tracing::instrument(skip(state, multipart))]
pub async fn upload_handler(
    State(state): State<AppState>,
    multipart: Result<Multipart, MultipartRejection>,
) -> Response {
    let mut multipart = match multipart {
        Ok(m) => m,
        Err(rejection) => {
            tracing::warn!(error = %rejection, "Rejected upload request");
            return error_response(StatusCode::BAD_REQUEST, "No file part");
        }
    };

    let mut request = SubmissionRequest {
        file: None,
        language: None,
    };

    loop {
        let field = match multipart.next_field().await {
            Ok(Some(field)) => field,
            Ok(None) => break,
            Err(e) => {
                tracing::warn!(error = %e, "Failed to read multipart");
                return error_response(
                    e.status(),
                    format!("Failed to read multipart: {}", e.body_text()),
                );
            }
        };

        let name = field.name().map(str::to_string);
        match name.as_deref() {
            Some("file") => {
                let filename = field.file_name().unwrap_or_default().to_string();
                let data = match field.bytes().await {
                    Ok(d) => d,
                    Err(e) => {
                        tracing::warn!(error = %e, "Failed to read file bytes");
                        return error_response(
                            e.status(),
                            format!("Failed to read file: {}", e.body_text()),
                        );
                    }
                };
                tracing::debug!(filename = %filename, bytes = data.len(), "File part received");
                request.file = Some(UploadedFile { filename, data });
            }
            Some("language") => match field.text().await {
                Ok(text) => request.language = Some(text),
                Err(e) => {
                    return error_response(
                        e.status(),
                        format!("Failed to read language: {}", e.body_text()),
                    );
                }
            },
            other => tracing::debug!(field = ?other, "Ignoring multipart field"),
        }
    }

    match state.submission_service.submit(request).await {
        Ok(job_id) => (
            StatusCode::ACCEPTED,
            Json(UploadResponse {
                job_id: job_id.to_string(),
                message: "File received".to_string(),
            }),
        )
            .into_response(),
        Err(SubmissionError::InvalidInput(message)) => {
            tracing::warn!(reason = %message, "Invalid upload");
            error_response(StatusCode::BAD_REQUEST, message)
        }
        Err(SubmissionError::QueueUnavailable) => error_response(
            StatusCode::SERVICE_UNAVAILABLE,
            SubmissionError::QueueUnavailable.to_string(),
        ),
        Err(e) => {
            tracing::error!(error = %e, "Upload failed");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while processing the upload",
            )
        }
    }
}
