//! Tracking pipeline error types.

use std::time::Duration;

use thiserror::Error;

pub type TrackingResult<T> = Result<T, TrackingError>;

#[derive(Debug, Error)]
pub enum TrackingError {
    #[error("Invalid geometry: {0} missing or not finite")]
    InvalidGeometry(&'static str),

    #[error("Page fetch failed: {0}")]
    PageFetch(String),

    #[error("Keyframe commit failed: {0}")]
    Commit(String),

    #[error("Export trigger failed: {0}")]
    ExportTrigger(String),

    #[error("Notification failed: {0}")]
    Notify(String),

    #[error("Job deadline of {0:?} exceeded")]
    DeadlineExceeded(Duration),

    #[error("Configuration error: {0}")]
    ConfigError(String),
}

impl TrackingError {
    pub fn page_fetch(msg: impl Into<String>) -> Self {
        Self::PageFetch(msg.into())
    }

    pub fn commit(msg: impl Into<String>) -> Self {
        Self::Commit(msg.into())
    }

    pub fn export_trigger(msg: impl Into<String>) -> Self {
        Self::ExportTrigger(msg.into())
    }

    pub fn notify(msg: impl Into<String>) -> Self {
        Self::Notify(msg.into())
    }

    pub fn config_error(msg: impl Into<String>) -> Self {
        Self::ConfigError(msg.into())
    }

    /// Short machine-readable kind, used as a metrics label.
    pub fn kind(&self) -> &'static str {
        match self {
            TrackingError::InvalidGeometry(_) => "invalid_geometry",
            TrackingError::PageFetch(_) => "page_fetch",
            TrackingError::Commit(_) => "commit",
            TrackingError::ExportTrigger(_) => "export_trigger",
            TrackingError::Notify(_) => "notify",
            TrackingError::DeadlineExceeded(_) => "deadline_exceeded",
            TrackingError::ConfigError(_) => "config",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_kind_labels() {
        assert_eq!(TrackingError::export_trigger("boom").kind(), "export_trigger");
        assert_eq!(TrackingError::page_fetch("boom").kind(), "page_fetch");
        assert_eq!(TrackingError::config_error("boom").kind(), "config");
    }
}
