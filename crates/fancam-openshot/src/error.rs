//! OpenShot error types.

use thiserror::Error;

pub type OpenShotResult<T> = Result<T, OpenShotError>;

#[derive(Debug, Error)]
pub enum OpenShotError {
    #[error("Failed to configure OpenShot client: {0}")]
    ConfigError(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("OpenShot returned {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Invalid property {key}: {source}")]
    InvalidProperty {
        key: String,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid response: {0}")]
    InvalidResponse(String),

    #[error("Network error: {0}")]
    Network(#[from] reqwest::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),
}

impl OpenShotError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn invalid_response(msg: impl Into<String>) -> Self {
        Self::InvalidResponse(msg.into())
    }

    /// Check if the request is worth repeating.
    pub fn is_retryable(&self) -> bool {
        match self {
            Self::Network(e) => e.is_timeout() || e.is_connect(),
            Self::Status { status, .. } => *status >= 500 || *status == 429,
            _ => false,
        }
    }

    /// Build an error from a non-success HTTP status.
    pub fn from_status(status: u16, body: impl Into<String>) -> Self {
        let body = body.into();
        if status == 404 {
            Self::NotFound(body)
        } else {
            Self::Status { status, body }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_status() {
        assert!(matches!(
            OpenShotError::from_status(404, "missing"),
            OpenShotError::NotFound(_)
        ));
        assert!(matches!(
            OpenShotError::from_status(500, "boom"),
            OpenShotError::Status { status: 500, .. }
        ));
    }

    #[test]
    fn test_is_retryable() {
        assert!(OpenShotError::from_status(503, "").is_retryable());
        assert!(OpenShotError::from_status(429, "").is_retryable());
        assert!(!OpenShotError::from_status(400, "").is_retryable());
        assert!(!OpenShotError::from_status(404, "").is_retryable());
    }
}
