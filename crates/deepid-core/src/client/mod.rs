//! Access to the DeepID analysis service.
//!
//! The batch driver only sees the [`AnalysisBackend`] trait: submit a file,
//! then ask for its status. [`DeepIdClient`] is the HTTP implementation; tests
//! swap in scripted backends.

mod http;

use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::path::Path;

use crate::error::ApiError;
use crate::modality::Modality;

pub use http::{DEFAULT_TIMEOUT_SECS, DeepIdClient};

/// Statuses after which a job's results are final
pub const TERMINAL_STATUSES: &[&str] = &["PROCESSED", "RESULTS"];

/// Identifier of an asynchronous analysis job
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct JobId(String);

impl JobId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for JobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// A single file submission
#[derive(Debug, Clone, Copy)]
pub struct SubmitRequest<'a> {
    pub path: &'a Path,
    pub modalities: &'a [Modality],
    /// Ask the service for a written explanation alongside the scores
    pub run_description: bool,
}

/// Status endpoint payload
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobStatus {
    /// Service-owned state name, e.g. `PENDING`, `PROCESSED`
    pub status: String,
    #[serde(default)]
    pub results: Option<Value>,
}

impl JobStatus {
    pub fn pending() -> Self {
        Self {
            status: "PENDING".to_string(),
            results: None,
        }
    }

    pub fn processed(results: Value) -> Self {
        Self {
            status: "PROCESSED".to_string(),
            results: Some(results),
        }
    }

    /// Whether polling can stop
    pub fn is_terminal(&self) -> bool {
        TERMINAL_STATUSES.contains(&self.status.as_str())
    }

    /// Results of a finished job, if there is anything in them.
    ///
    /// `null`, `false`, zero and empty objects, arrays or strings count as no
    /// results.
    pub fn into_results(self) -> Option<Value> {
        match self.results? {
            Value::Null | Value::Bool(false) => None,
            Value::Number(n) if n.as_f64() == Some(0.0) => None,
            Value::Object(map) if map.is_empty() => None,
            Value::Array(items) if items.is_empty() => None,
            Value::String(s) if s.is_empty() => None,
            other => Some(other),
        }
    }
}

/// Remote analysis service seam
pub trait AnalysisBackend {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Upload a file for asynchronous analysis
    fn submit(&self, request: &SubmitRequest<'_>) -> Result<JobId, ApiError>;

    /// Fetch the current status of a job
    fn status(&self, job: &JobId) -> Result<JobStatus, ApiError>;
}

impl<T: AnalysisBackend + ?Sized> AnalysisBackend for &T {
    fn name(&self) -> &'static str {
        (**self).name()
    }

    fn submit(&self, request: &SubmitRequest<'_>) -> Result<JobId, ApiError> {
        (**self).submit(request)
    }

    fn status(&self, job: &JobId) -> Result<JobStatus, ApiError> {
        (**self).status(job)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_terminal_statuses() {
        assert!(JobStatus::processed(json!({"score": 0.9})).is_terminal());
        let results = JobStatus {
            status: "RESULTS".to_string(),
            results: None,
        };
        assert!(results.is_terminal());
        assert!(!JobStatus::pending().is_terminal());
        // Status names are matched exactly
        let lower = JobStatus {
            status: "processed".to_string(),
            results: None,
        };
        assert!(!lower.is_terminal());
    }

    #[test]
    fn test_empty_results_are_none() {
        for empty in [json!(null), json!({}), json!([]), json!("")] {
            assert_eq!(JobStatus::processed(empty).into_results(), None);
        }
        let payload = json!({"image": {"score": 0.12}});
        assert_eq!(
            JobStatus::processed(payload.clone()).into_results(),
            Some(payload)
        );
    }

    #[test]
    fn test_falsy_scalars_are_none() {
        for falsy in [json!(0), json!(0.0), json!(false)] {
            assert_eq!(JobStatus::processed(falsy).into_results(), None);
        }
        for truthy in [json!(1), json!(-0.5), json!(true)] {
            assert_eq!(
                JobStatus::processed(truthy.clone()).into_results(),
                Some(truthy)
            );
        }
    }

    #[test]
    fn test_status_deserializes_without_results() {
        let status: JobStatus = serde_json::from_str(r#"{"status":"PENDING"}"#).unwrap();
        assert_eq!(status, JobStatus::pending());
    }
}
