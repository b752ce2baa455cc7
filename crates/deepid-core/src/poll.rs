//! Fixed-interval polling for job results.
//!
//! Status is queried up to `max_retries` times. A terminal status ends the
//! loop immediately; any other status is followed by a `retry_delay` pause,
//! including after the final attempt. There is no backoff, jitter or
//! cancellation: a job that never finishes blocks the caller for
//! `max_retries * retry_delay`.

use anyhow::{Context, Result};
use serde_json::Value;
use std::time::Duration;

use crate::client::{AnalysisBackend, JobId};
use crate::config::{DEFAULT_MAX_RETRIES, DEFAULT_RETRY_DELAY_SECS};

/// Polling limits
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct PollConfig {
    pub max_retries: u32,
    pub retry_delay: Duration,
}

impl Default for PollConfig {
    fn default() -> Self {
        Self {
            max_retries: DEFAULT_MAX_RETRIES,
            retry_delay: Duration::from_secs(DEFAULT_RETRY_DELAY_SECS),
        }
    }
}

impl PollConfig {
    /// Longest time a single job can block the batch
    pub fn max_wait(&self) -> Duration {
        self.retry_delay * self.max_retries
    }
}

/// Poll until the job finishes, sleeping on the current thread between attempts.
///
/// Returns `Ok(None)` when every attempt came back non-terminal, or when the
/// job finished with empty results. Errors from the status call are not retried.
pub fn poll_results<B: AnalysisBackend>(
    backend: &B,
    job: &JobId,
    config: &PollConfig,
) -> Result<Option<Value>> {
    poll_results_with(backend, job, config, std::thread::sleep)
}

/// [`poll_results`] with a caller-supplied sleep
pub fn poll_results_with<B, S>(
    backend: &B,
    job: &JobId,
    config: &PollConfig,
    mut sleep: S,
) -> Result<Option<Value>>
where
    B: AnalysisBackend,
    S: FnMut(Duration),
{
    for attempt in 1..=config.max_retries {
        let status = backend
            .status(job)
            .with_context(|| format!("Failed to query status of job {job}"))?;

        crate::verbose!(
            "Job {} attempt {}/{}: {}",
            job,
            attempt,
            config.max_retries,
            status.status
        );

        if status.is_terminal() {
            return Ok(status.into_results());
        }

        sleep(config.retry_delay);
    }

    crate::verbose!(
        "Job {} not finished after {} attempts",
        job,
        config.max_retries
    );
    Ok(None)
}
