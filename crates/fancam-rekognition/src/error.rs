//! Rekognition error types.

use thiserror::Error;

use fancam_tracking::TrackingError;

pub type RekognitionResult<T> = Result<T, RekognitionError>;

#[derive(Debug, Error)]
pub enum RekognitionError {
    #[error("Failed to configure Rekognition client: {0}")]
    ConfigError(String),

    #[error("GetPersonTracking request failed: {0}")]
    RequestFailed(String),

    #[error("Person tracking job {job_id} failed: {message}")]
    JobFailed { job_id: String, message: String },
}

impl RekognitionError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn request_failed(msg: impl Into<String>) -> Self {
        Self::RequestFailed(msg.into())
    }
}

impl From<RekognitionError> for TrackingError {
    fn from(err: RekognitionError) -> Self {
        match err {
            RekognitionError::ConfigError(msg) => TrackingError::config_error(msg),
            other => TrackingError::page_fetch(other.to_string()),
        }
    }
}
