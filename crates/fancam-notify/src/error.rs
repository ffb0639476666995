//! Notification error types.

use thiserror::Error;

use fancam_tracking::TrackingError;

pub type NotifyResult<T> = Result<T, NotifyError>;

#[derive(Debug, Error)]
pub enum NotifyError {
    #[error("Failed to configure notifier: {0}")]
    ConfigError(String),

    #[error("Publish failed: {0}")]
    PublishFailed(String),

    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl NotifyError {
    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    pub fn publish_failed(msg: impl Into<String>) -> Self {
        Self::PublishFailed(msg.into())
    }
}

impl From<NotifyError> for TrackingError {
    fn from(err: NotifyError) -> Self {
        TrackingError::notify(err.to_string())
    }
}
