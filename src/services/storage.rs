use bytes::Bytes;
use std::path::PathBuf;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// A file written to local disk while it waits for analysis.
///
/// Owned by the request that received it; `TempStorage::release` consumes it,
/// so a second delete attempt on the same upload cannot compile.
#[derive(Debug)]
pub struct UploadedFile {
    pub path: PathBuf,
    pub original_name: String,
    pub size_bytes: u64,
}

#[derive(Error, Debug)]
pub enum UploadError {
    #[error("no file field in request")]
    NoFile,

    #[error("invalid multipart payload: {0}")]
    Multipart(String),

    #[error("failed to write upload to disk: {0}")]
    Write(#[from] std::io::Error),
}

/// Disk-backed store for uploads in transit to the scanning service
pub struct TempStorage {
    dir: PathBuf,
}

impl TempStorage {
    pub fn new(dir: impl Into<PathBuf>) -> Self {
        Self { dir: dir.into() }
    }

    /// Write one uploaded file under a fresh random name and hand back its handle
    pub async fn store(&self, original_name: &str, data: Bytes) -> Result<UploadedFile, UploadError> {
        let path = self.dir.join(Uuid::new_v4().to_string());
        tokio::fs::write(&path, &data).await?;

        info!(
            "📄 Stored upload '{}' ({} bytes) at {}",
            original_name,
            data.len(),
            path.display()
        );

        Ok(UploadedFile {
            path,
            original_name: original_name.to_string(),
            size_bytes: data.len() as u64,
        })
    }

    /// Best-effort delete. The response has already been decided when this
    /// runs, so a failure is logged and swallowed.
    pub async fn release(&self, file: UploadedFile) {
        match tokio::fs::remove_file(&file.path).await {
            Ok(()) => info!("🗑️  Removed temp file {}", file.path.display()),
            Err(e) => warn!("⚠️  Failed to remove temp file {}: {}", file.path.display(), e),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_store_writes_file_to_disk() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TempStorage::new(dir.path());

        let file = storage
            .store("report.pdf", Bytes::from_static(b"file body"))
            .await
            .unwrap();

        assert_eq!(file.original_name, "report.pdf");
        assert_eq!(file.size_bytes, 9);
        assert_eq!(tokio::fs::read(&file.path).await.unwrap(), b"file body");
    }

    #[tokio::test]
    async fn test_release_removes_file() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TempStorage::new(dir.path());

        let file = storage
            .store("a.bin", Bytes::from_static(b"x"))
            .await
            .unwrap();
        let path = file.path.clone();
        assert!(path.exists());

        storage.release(file).await;
        assert!(!path.exists());
    }

    #[tokio::test]
    async fn test_release_of_missing_file_does_not_panic() {
        let dir = tempfile::tempdir().unwrap();
        let storage = TempStorage::new(dir.path());

        let file = storage
            .store("a.bin", Bytes::from_static(b"x"))
            .await
            .unwrap();
        tokio::fs::remove_file(&file.path).await.unwrap();

        // Already gone; release only logs.
        storage.release(file).await;
    }

    #[tokio::test]
    async fn test_store_fails_when_dir_missing() {
        let storage = TempStorage::new("/nonexistent-upload-dir/nested");
        let err = storage
            .store("a.bin", Bytes::from_static(b"x"))
            .await
            .unwrap_err();
        assert!(matches!(err, UploadError::Write(_)));
    }
}
