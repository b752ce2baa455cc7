//! HTTP implementation of the DeepID REST API.
//!
//! - `POST {base}/file/async`: multipart upload with a `file` part, one
//!   `modalities` field per modality and a `run_description` flag. Answers
//!   `{"id": ...}`.
//! - `GET {base}/file/{id}`: answers `{"status": ..., "results": ...}`.
//!
//! Both endpoints authenticate with a `Bearer` API key.

use anyhow::{Context, Result};
use reqwest::blocking::{Client, Response, multipart};
use serde::Deserialize;
use serde_json::Value;
use std::time::Duration;

use super::{AnalysisBackend, JobId, JobStatus, SubmitRequest};
use crate::config::Environment;
use crate::error::ApiError;

/// Request timeout; uploads of large videos need the headroom
pub const DEFAULT_TIMEOUT_SECS: u64 = 300;

#[derive(Deserialize)]
struct SubmitResponse {
    id: Value,
}

/// Blocking DeepID API client
#[derive(Debug, Clone)]
pub struct DeepIdClient {
    http: Client,
    base_url: String,
    api_key: String,
}

impl DeepIdClient {
    /// Create a client for a named environment
    pub fn for_environment(api_key: &str, environment: Environment) -> Result<Self> {
        Self::new(api_key, environment.base_url())
    }

    /// Create a client against an explicit base URL
    pub fn new(api_key: &str, base_url: &str) -> Result<Self> {
        if api_key.trim().is_empty() {
            return Err(ApiError::MissingApiKey.into());
        }

        let base_url = normalize_base_url(base_url)?;
        let http = Client::builder()
            .timeout(Duration::from_secs(DEFAULT_TIMEOUT_SECS))
            .user_agent(concat!("deepid-cli/", env!("CARGO_PKG_VERSION")))
            .build()
            .context("Failed to create HTTP client")?;

        Ok(Self {
            http,
            base_url,
            api_key: api_key.trim().to_string(),
        })
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    fn authorization(&self) -> String {
        format!("Bearer {}", self.api_key)
    }
}

impl AnalysisBackend for DeepIdClient {
    fn name(&self) -> &'static str {
        "deepid"
    }

    fn submit(&self, request: &SubmitRequest<'_>) -> Result<JobId, ApiError> {
        let mut form = multipart::Form::new().text(
            "run_description",
            if request.run_description {
                "true"
            } else {
                "false"
            },
        );
        for modality in request.modalities {
            form = form.text("modalities", modality.as_str());
        }
        let form = form
            .file("file", request.path)
            .map_err(|source| ApiError::ReadFile {
                path: request.path.to_path_buf(),
                source,
            })?;

        let url = format!("{}/file/async", self.base_url);
        crate::verbose!("POST {} ({})", url, request.path.display());

        let response = self
            .http
            .post(&url)
            .header("Authorization", self.authorization())
            .multipart(form)
            .send()?;
        let body: SubmitResponse = ensure_success(response)?.json()?;

        job_id_from_value(body.id)
    }

    fn status(&self, job: &JobId) -> Result<JobStatus, ApiError> {
        let url = format!("{}/file/{}", self.base_url, job);
        crate::verbose!("GET {}", url);

        let response = self
            .http
            .get(&url)
            .header("Authorization", self.authorization())
            .send()?;

        Ok(ensure_success(response)?.json()?)
    }
}

fn ensure_success(response: Response) -> Result<Response, ApiError> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }

    let body = response
        .text()
        .unwrap_or_else(|_| "Unknown error".to_string());
    Err(ApiError::Http {
        status: status.as_u16(),
        body,
    })
}

/// Job ids arrive as strings or numbers depending on the deployment
fn job_id_from_value(id: Value) -> Result<JobId, ApiError> {
    match id {
        Value::String(s) if !s.is_empty() => Ok(JobId::new(s)),
        Value::Number(n) => Ok(JobId::new(n.to_string())),
        other => Err(ApiError::InvalidResponse(format!(
            "submission returned no usable job id: {other}"
        ))),
    }
}

/// Validate a base URL and strip any trailing slash
fn normalize_base_url(base_url: &str) -> Result<String> {
    let trimmed = base_url.trim();
    let after_scheme = trimmed
        .strip_prefix("http://")
        .or_else(|| trimmed.strip_prefix("https://"));

    match after_scheme {
        None => anyhow::bail!(
            "Invalid DeepID API URL: must start with http:// or https://\n\
             Got: {}",
            trimmed
        ),
        Some(rest) if rest.is_empty() || rest.starts_with('/') => anyhow::bail!(
            "Invalid DeepID API URL: missing host\n\
             Got: {}",
            trimmed
        ),
        Some(_) => Ok(trimmed.trim_end_matches('/').to_string()),
    }
}
