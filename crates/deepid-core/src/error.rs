use std::path::PathBuf;
use thiserror::Error;

/// Failures talking to the DeepID API
#[derive(Debug, Error)]
pub enum ApiError {
    /// No API key in settings or environment
    #[error("DeepID API key not configured")]
    MissingApiKey,

    /// Upload source could not be opened
    #[error("Failed to read {}: {source}", .path.display())]
    ReadFile {
        path: PathBuf,
        source: std::io::Error,
    },

    /// Request never produced a response (DNS, TLS, timeout, ...)
    #[error("Network error: {0}")]
    Network(String),

    /// Server answered with a non-success status code
    #[error("API error ({status}): {body}")]
    Http { status: u16, body: String },

    /// Response body was not what the endpoint documents
    #[error("Unexpected API response: {0}")]
    InvalidResponse(String),
}

impl ApiError {
    /// Whether the server rejected our credentials
    pub fn is_unauthorized(&self) -> bool {
        matches!(self, ApiError::Http { status: 401 | 403, .. })
    }
}

impl From<reqwest::Error> for ApiError {
    fn from(err: reqwest::Error) -> Self {
        if err.is_decode() {
            ApiError::InvalidResponse(err.to_string())
        } else {
            ApiError::Network(err.to_string())
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_error_display() {
        let err = ApiError::Http {
            status: 413,
            body: "file too large".to_string(),
        };
        assert_eq!(err.to_string(), "API error (413): file too large");
        assert!(!err.is_unauthorized());
    }

    #[test]
    fn test_unauthorized_detection() {
        let err = ApiError::Http {
            status: 401,
            body: String::new(),
        };
        assert!(err.is_unauthorized());
    }
}
