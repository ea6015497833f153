use crate::config::ScanConfig;
use crate::services::scanner::{AnalysisClient, AnalysisHandle, AnalysisReport, PollingError};
use std::time::Duration;
use tracing::debug;

/// Waits for a submitted analysis to reach its terminal status.
///
/// A non-terminal status is retried after a fixed delay; a failed status
/// query is not retried and aborts the wait. With `max_attempts == 0` the
/// loop is unbounded; setting a bound turns a stuck analysis into
/// `PollingError::AttemptsExhausted` instead of a request that never
/// finishes.
pub struct AnalysisPoller {
    interval: Duration,
    max_attempts: u32,
}

impl AnalysisPoller {
    pub fn new(interval: Duration, max_attempts: u32) -> Self {
        Self {
            interval,
            max_attempts,
        }
    }

    pub fn from_config(config: &ScanConfig) -> Self {
        Self::new(config.poll_interval, config.max_poll_attempts)
    }

    pub async fn wait_for_report(
        &self,
        client: &dyn AnalysisClient,
        handle: &AnalysisHandle,
    ) -> Result<AnalysisReport, PollingError> {
        let mut attempts: u32 = 0;

        loop {
            let response = client.fetch_analysis(handle).await?;

            if response.is_completed() {
                debug!(
                    analysis_id = %handle.analysis_id,
                    "Analysis completed after {} non-terminal responses", attempts
                );
                return Ok(AnalysisReport(response.body));
            }

            attempts += 1;
            if self.max_attempts > 0 && attempts >= self.max_attempts {
                return Err(PollingError::AttemptsExhausted(attempts));
            }

            debug!(
                analysis_id = %handle.analysis_id,
                status = %response.status,
                "Analysis not finished, retrying in {:?}", self.interval
            );
            tokio::time::sleep(self.interval).await;
        }
    }
}
