use crate::services::scanner::{PollingError, SubmissionError};
use crate::services::storage::UploadError;
use axum::{
    Json,
    http::StatusCode,
    response::{IntoResponse, Response},
};
use serde_json::json;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error(transparent)]
    Upload(#[from] UploadError),

    #[error(transparent)]
    Submission(#[from] SubmissionError),

    #[error(transparent)]
    Polling(#[from] PollingError),
}

impl IntoResponse for AppError {
    /// Every failure kind maps to the same wire shape: HTTP 500 with a
    /// human-readable message and the underlying error text.
    fn into_response(self) -> Response {
        tracing::error!("💥 Scan request failed: {}", self);

        let body = Json(json!({
            "message": "Error analyzing file",
            "error": self.to_string(),
        }));

        (StatusCode::INTERNAL_SERVER_ERROR, body).into_response()
    }
}
