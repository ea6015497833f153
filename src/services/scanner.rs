use crate::config::ScanConfig;
use crate::services::storage::UploadedFile;
use serde::Serialize;
use serde_json::{Value, json};
use thiserror::Error;
use tracing::debug;

/// Opaque token identifying one scan job at the remote service
#[derive(Debug, Clone)]
pub struct AnalysisHandle {
    pub analysis_id: String,
}

/// One status query's answer: the extracted status plus the full body,
/// which becomes the report once the status is terminal.
#[derive(Debug, Clone)]
pub struct AnalysisResponse {
    pub status: String,
    pub body: Value,
}

impl AnalysisResponse {
    /// `completed` is the only terminal status; every other value
    /// (`queued`, `in-progress`, anything unrecognized) means "not yet done".
    pub fn is_completed(&self) -> bool {
        self.status == "completed"
    }
}

/// Final report from the scanning service, passed through to the caller unmodified
#[derive(Debug, Clone, Serialize)]
#[serde(transparent)]
pub struct AnalysisReport(pub Value);

#[derive(Error, Debug)]
pub enum SubmissionError {
    #[error("failed to read stored upload: {0}")]
    Read(#[from] std::io::Error),

    #[error("scan submission request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("scan service rejected submission with HTTP status {0}")]
    Status(u16),

    #[error("scan service response is missing the analysis id")]
    MalformedResponse,
}

#[derive(Error, Debug)]
pub enum PollingError {
    #[error("analysis status request failed: {0}")]
    Transport(#[from] reqwest::Error),

    #[error("analysis status query returned HTTP status {0}")]
    Status(u16),

    #[error("analysis did not complete within {0} status queries")]
    AttemptsExhausted(u32),
}

/// Trait for clients of a remote malware-analysis service
#[async_trait::async_trait]
pub trait AnalysisClient: Send + Sync {
    /// Send the stored file for analysis and return the job's handle.
    /// No retry at this layer; a failure is reported upward immediately.
    async fn submit(&self, file: &UploadedFile) -> Result<AnalysisHandle, SubmissionError>;

    /// Query the current state of one analysis
    async fn fetch_analysis(&self, handle: &AnalysisHandle) -> Result<AnalysisResponse, PollingError>;

    /// Check if the scanning service is reachable
    async fn health_check(&self) -> bool;
}

/// Client for the VirusTotal v3 API
pub struct VirusTotalClient {
    client: reqwest::Client,
    base_url: String,
    api_key: String,
}

impl VirusTotalClient {
    pub fn new(base_url: impl Into<String>, api_key: impl Into<String>) -> Self {
        Self {
            client: reqwest::Client::new(),
            base_url: base_url.into(),
            api_key: api_key.into(),
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.api_url.clone(), config.api_key.clone())
    }
}

#[async_trait::async_trait]
impl AnalysisClient for VirusTotalClient {
    async fn submit(&self, file: &UploadedFile) -> Result<AnalysisHandle, SubmissionError> {
        let data = tokio::fs::read(&file.path).await?;

        let part = reqwest::multipart::Part::bytes(data).file_name(file.original_name.clone());
        let form = reqwest::multipart::Form::new().part("file", part);

        let response = self
            .client
            .post(format!("{}/files", self.base_url))
            .header("x-apikey", &self.api_key)
            .multipart(form)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(SubmissionError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        debug!("Scanner submit response: {}", body);

        let analysis_id = body
            .pointer("/data/id")
            .and_then(Value::as_str)
            .ok_or(SubmissionError::MalformedResponse)?
            .to_string();

        Ok(AnalysisHandle { analysis_id })
    }

    async fn fetch_analysis(&self, handle: &AnalysisHandle) -> Result<AnalysisResponse, PollingError> {
        let response = self
            .client
            .get(format!("{}/analyses/{}", self.base_url, handle.analysis_id))
            .header("x-apikey", &self.api_key)
            .send()
            .await?;

        if !response.status().is_success() {
            return Err(PollingError::Status(response.status().as_u16()));
        }

        let body: Value = response.json().await?;
        let status = body
            .pointer("/data/attributes/status")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string();

        Ok(AnalysisResponse { status, body })
    }

    async fn health_check(&self) -> bool {
        // Any HTTP answer (even 4xx) proves the service is reachable;
        // only a transport failure counts as unhealthy.
        self.client
            .get(&self.base_url)
            .header("x-apikey", &self.api_key)
            .send()
            .await
            .is_ok()
    }
}

/// Stub client for development/testing: every submission immediately
/// reports a completed analysis with a canned clean verdict.
pub struct StubClient;

impl StubClient {
    fn canned_report(analysis_id: &str) -> Value {
        json!({
            "data": {
                "id": analysis_id,
                "type": "analysis",
                "attributes": {
                    "status": "completed",
                    "stats": {
                        "malicious": 0,
                        "suspicious": 0,
                        "undetected": 0,
                        "harmless": 0
                    }
                }
            }
        })
    }
}

#[async_trait::async_trait]
impl AnalysisClient for StubClient {
    async fn submit(&self, file: &UploadedFile) -> Result<AnalysisHandle, SubmissionError> {
        tracing::warn!(
            "StubClient: skipping real scan for '{}' (development mode)",
            file.original_name
        );
        Ok(AnalysisHandle {
            analysis_id: format!("stub-{}", uuid::Uuid::new_v4()),
        })
    }

    async fn fetch_analysis(&self, handle: &AnalysisHandle) -> Result<AnalysisResponse, PollingError> {
        Ok(AnalysisResponse {
            status: "completed".to_string(),
            body: Self::canned_report(&handle.analysis_id),
        })
    }

    async fn health_check(&self) -> bool {
        true
    }
}

/// Factory function to create the appropriate client based on config
pub fn create_client(config: &ScanConfig) -> Box<dyn AnalysisClient> {
    match config.scan_client_type.to_lowercase().as_str() {
        "virustotal" => Box::new(VirusTotalClient::from_config(config)),
        "stub" | "none" | "disabled" => Box::new(StubClient),
        other => {
            tracing::warn!("Unknown scan client type '{}', using StubClient", other);
            Box::new(StubClient)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use bytes::Bytes;

    #[test]
    fn test_completed_is_the_only_terminal_status() {
        for status in ["queued", "in-progress", "anything-else", ""] {
            let response = AnalysisResponse {
                status: status.to_string(),
                body: json!({}),
            };
            assert!(!response.is_completed(), "'{status}' must not be terminal");
        }

        let response = AnalysisResponse {
            status: "completed".to_string(),
            body: json!({}),
        };
        assert!(response.is_completed());
    }

    #[tokio::test]
    async fn test_stub_client_completes_immediately() {
        let dir = tempfile::tempdir().unwrap();
        let storage = crate::services::storage::TempStorage::new(dir.path());
        let file = storage
            .store("sample.txt", Bytes::from_static(b"sample"))
            .await
            .unwrap();

        let client = StubClient;
        let handle = client.submit(&file).await.unwrap();
        let response = client.fetch_analysis(&handle).await.unwrap();

        assert!(response.is_completed());
        assert_eq!(
            response.body.pointer("/data/id").and_then(Value::as_str),
            Some(handle.analysis_id.as_str())
        );
        assert!(client.health_check().await);

        storage.release(file).await;
    }

    #[tokio::test]
    async fn test_create_client_falls_back_to_stub() {
        let mut config = ScanConfig::development();
        config.scan_client_type = "something-else".to_string();
        // Unknown types degrade to the stub rather than failing startup.
        let client = create_client(&config);
        assert!(client.health_check().await);

        config.scan_client_type = "disabled".to_string();
        let client = create_client(&config);
        assert!(client.health_check().await);
    }
}
