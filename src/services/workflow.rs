use crate::api::error::AppError;
use crate::services::poller::AnalysisPoller;
use crate::services::scanner::{AnalysisClient, AnalysisReport};
use crate::services::storage::{TempStorage, UploadError, UploadedFile};
use bytes::Bytes;
use std::sync::Arc;
use tracing::info;

/// Coordinates one upload's trip through the scanning service:
/// store -> submit -> poll -> cleanup.
///
/// Whatever the outcome after the file hits the disk, the temp file is
/// released exactly once before the HTTP response is produced. Submission
/// and each status query are await points, so a slow remote scan never
/// blocks other requests.
pub struct ScanWorkflow {
    storage: Arc<TempStorage>,
    client: Arc<dyn AnalysisClient>,
    poller: AnalysisPoller,
}

impl ScanWorkflow {
    pub fn new(
        storage: Arc<TempStorage>,
        client: Arc<dyn AnalysisClient>,
        poller: AnalysisPoller,
    ) -> Self {
        Self {
            storage,
            client,
            poller,
        }
    }

    /// Run the full workflow for one request's upload.
    ///
    /// `upload` is the parsed `file` multipart field, if any. A missing field
    /// fails the request before any network traffic happens.
    pub async fn run(&self, upload: Option<(String, Bytes)>) -> Result<AnalysisReport, AppError> {
        let (original_name, data) = upload.ok_or(UploadError::NoFile)?;

        let file = self.storage.store(&original_name, data).await?;

        // Terminal outcome first, then the single release of the temp file.
        let outcome = self.scan(&file).await;
        self.storage.release(file).await;

        outcome
    }

    async fn scan(&self, file: &UploadedFile) -> Result<AnalysisReport, AppError> {
        let handle = self.client.submit(file).await?;
        info!(
            analysis_id = %handle.analysis_id,
            "📨 Submitted '{}' for analysis", file.original_name
        );

        let report = self
            .poller
            .wait_for_report(self.client.as_ref(), &handle)
            .await?;
        info!(analysis_id = %handle.analysis_id, "✅ Analysis completed");

        Ok(report)
    }
}
