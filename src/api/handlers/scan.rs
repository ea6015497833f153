use crate::AppState;
use crate::api::error::AppError;
use crate::services::scanner::AnalysisReport;
use crate::services::storage::UploadError;
use axum::{Json, extract::Multipart, extract::State};
use bytes::Bytes;
use serde::Serialize;
use serde_json::{Value, json};
use std::time::Duration;
use utoipa::ToSchema;

#[derive(Serialize, ToSchema)]
pub struct ScanResponse {
    pub message: String,
    /// Final report from the scanning service, passed through unmodified
    #[schema(value_type = Object)]
    pub data: AnalysisReport,
}

#[utoipa::path(
    post,
    path = "/upload",
    request_body(content = Multipart, description = "Multipart body with a single 'file' field"),
    responses(
        (status = 200, description = "File analyzed and removed", body = ScanResponse),
        (status = 500, description = "Upload, submission or polling failed")
    ),
    tag = "scan"
)]
pub async fn upload_and_scan(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<ScanResponse>, AppError> {
    let mut upload: Option<(String, Bytes)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| UploadError::Multipart(e.to_string()))?
    {
        if field.name() == Some("file") {
            let original_name = field.file_name().unwrap_or("unnamed").to_string();
            let data = field
                .bytes()
                .await
                .map_err(|e| UploadError::Multipart(e.to_string()))?;
            upload = Some((original_name, data));
            break;
        }
    }

    let report = state.workflow.run(upload).await?;

    Ok(Json(ScanResponse {
        message: "File analyzed and removed".to_string(),
        data: report,
    }))
}

#[utoipa::path(
    post,
    path = "/uploads",
    responses(
        (status = 200, description = "Fixed placeholder payload")
    ),
    tag = "scan"
)]
pub async fn uploads_placeholder() -> Json<Value> {
    // Legacy stub endpoint: fixed payload after an artificial delay.
    tokio::time::sleep(Duration::from_secs(1)).await;
    Json(json!({ "data": "Analysis results" }))
}
