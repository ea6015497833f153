use crate::config::ScanConfig;
use crate::services::scanner::{AnalysisClient, create_client};
use std::sync::Arc;
use tracing::info;

pub async fn setup_scanner(config: &ScanConfig) -> Arc<dyn AnalysisClient> {
    let client: Arc<dyn AnalysisClient> = create_client(config).into();

    // Warm up the connection to the scanning service
    if client.health_check().await {
        info!("🦠 Scanning service reachable");
    } else {
        tracing::warn!("⚠️  Scanning service unreachable! Uploads will fail until it recovers.");
    }

    client
}
