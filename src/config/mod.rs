use std::env;
use std::path::PathBuf;
use std::time::Duration;

/// Scan workflow configuration
#[derive(Debug, Clone)]
pub struct ScanConfig {
    /// Port for the HTTP listener (default: 3800)
    pub port: u16,

    /// Directory for transient uploads awaiting analysis (default: "uploads")
    pub upload_dir: PathBuf,

    /// API credential for the remote scanning service
    pub api_key: String,

    /// Base URL of the remote scanning service
    pub api_url: String,

    /// Delay between analysis status queries (default: 5 seconds)
    pub poll_interval: Duration,

    /// Maximum number of status queries before giving up. 0 means unbounded.
    pub max_poll_attempts: u32,

    /// Maximum upload size in bytes (default: 32 MB, the scanner's free-tier cap)
    pub max_file_size: usize,

    /// Scan client type: "virustotal" or "stub" (default: "virustotal")
    pub scan_client_type: String,
}

impl Default for ScanConfig {
    fn default() -> Self {
        Self {
            port: 3800,
            upload_dir: PathBuf::from("uploads"),
            api_key: String::new(),
            api_url: "https://www.virustotal.com/api/v3".to_string(),
            poll_interval: Duration::from_secs(5),
            max_poll_attempts: 0,
            max_file_size: 32 * 1024 * 1024, // 32 MB
            scan_client_type: "virustotal".to_string(),
        }
    }
}

impl ScanConfig {
    /// Load configuration from environment variables
    pub fn from_env() -> Self {
        let default = Self::default();

        Self {
            port: env::var("PORT")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.port),

            upload_dir: env::var("UPLOAD_DIR")
                .map(PathBuf::from)
                .unwrap_or(default.upload_dir),

            api_key: env::var("VIRUSTOTAL_API_KEY").unwrap_or(default.api_key),

            api_url: env::var("VIRUSTOTAL_API_URL").unwrap_or(default.api_url),

            poll_interval: env::var("POLL_INTERVAL_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .map(Duration::from_secs)
                .unwrap_or(default.poll_interval),

            max_poll_attempts: env::var("MAX_POLL_ATTEMPTS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_poll_attempts),

            max_file_size: env::var("MAX_FILE_SIZE")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(default.max_file_size),

            scan_client_type: env::var("SCAN_CLIENT_TYPE").unwrap_or(default.scan_client_type),
        }
    }

    /// Create config for development (stub client, no real credential needed)
    pub fn development() -> Self {
        Self {
            api_key: "dev-key".to_string(),
            scan_client_type: "stub".to_string(),
            ..Self::default()
        }
    }
}
