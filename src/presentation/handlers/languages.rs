use std::io::ErrorKind;

use axum::Json;
use axum::extract::State;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};

use super::error_response::error_response;
use crate::presentation::state::AppState;

/// Serves the configured language catalog. The file is read per request so it
/// can be edited without a restart.
#[tracing::instrument(skip(state))]
pub async fn languages_handler(State(state): State<AppState>) -> Response {
    let path = &state.settings.languages.file;

    let raw = match tokio::fs::read_to_string(path).await {
        Ok(raw) => raw,
        Err(e) if e.kind() == ErrorKind::NotFound => {
            tracing::warn!(path = %path.display(), "Languages file missing");
            return error_response(StatusCode::NOT_FOUND, "Languages file not found");
        }
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Error reading languages file");
            return error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while reading the file",
            );
        }
    };

    match serde_json::from_str::<serde_json::Value>(&raw) {
        Ok(languages) => (StatusCode::OK, Json(languages)).into_response(),
        Err(e) => {
            tracing::error!(error = %e, path = %path.display(), "Languages file is not valid JSON");
            error_response(
                StatusCode::INTERNAL_SERVER_ERROR,
                "An error occurred while reading the file",
            )
        }
    }
}
