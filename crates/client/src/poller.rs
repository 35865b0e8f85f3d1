//! Fixed-interval status polling with a timeout budget.
//!
//! [`JobPoller::wait_for_completion`] queries the status endpoint until the
//! job reports `Completed`, the timeout elapses, a query fails, or the
//! [`CancellationToken`] fires. There is no backoff; every wait is exactly
//! one interval.

use std::time::Duration;

use tokio::time::Instant;
use tokio_util::sync::CancellationToken;

use gophic_core::job::JobStatus;
use gophic_core::types::JobId;

use crate::api::JobApi;
use crate::error::ClientError;

/// Tunable parameters for the poll loop.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    /// Delay between consecutive status queries.
    pub interval: Duration,
    /// Budget measured from the first query. Exceeding it fails the loop.
    pub timeout: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            interval: Duration::from_millis(2000),
            timeout: Duration::from_millis(300_000),
        }
    }
}

/// Successful end of a poll loop.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PollOutcome {
    pub job_id: JobId,
    /// Number of status queries performed, including the final one.
    pub attempts: u32,
    pub elapsed: Duration,
}

pub struct JobPoller<'a> {
    api: &'a dyn JobApi,
    config: PollConfig,
}

impl<'a> JobPoller<'a> {
    pub fn new(api: &'a dyn JobApi, config: PollConfig) -> Self {
        Self { api, config }
    }

    /// Poll until the job completes.
    ///
    /// `NotFound` and unrecognised statuses keep the loop going and count
    /// against the same timeout as `In Progress`.
    pub async fn wait_for_completion(
        &self,
        job_id: &JobId,
        cancel: &CancellationToken,
    ) -> Result<PollOutcome, ClientError> {
        let started = Instant::now();
        let mut attempts = 0u32;

        loop {
            attempts += 1;

            let status = tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(job_id = %job_id, attempts, "Polling cancelled");
                    return Err(ClientError::Cancelled);
                }
                result = self.api.job_status(job_id) => result?,
            };

            let elapsed = started.elapsed();
            tracing::debug!(
                job_id = %job_id,
                attempt = attempts,
                status = %status,
                elapsed_ms = elapsed.as_millis() as u64,
                "Polled job status",
            );

            match status {
                JobStatus::Completed => {
                    tracing::info!(job_id = %job_id, attempts, "Job completed");
                    return Ok(PollOutcome {
                        job_id: job_id.clone(),
                        attempts,
                        elapsed,
                    });
                }
                JobStatus::NotFound => {
                    tracing::debug!(job_id = %job_id, "Job not visible yet, continuing");
                }
                _ => {}
            }

            if elapsed > self.config.timeout {
                tracing::warn!(
                    job_id = %job_id,
                    attempts,
                    elapsed_ms = elapsed.as_millis() as u64,
                    "Job polling timed out",
                );
                return Err(ClientError::Timeout {
                    job_id: job_id.clone(),
                    elapsed_ms: elapsed.as_millis() as u64,
                });
            }

            tokio::select! {
                biased;
                _ = cancel.cancelled() => {
                    tracing::info!(job_id = %job_id, attempts, "Polling cancelled");
                    return Err(ClientError::Cancelled);
                }
                _ = tokio::time::sleep(self.config.interval) => {}
            }
        }
    }
}
