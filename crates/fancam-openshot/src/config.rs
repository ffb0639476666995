//! OpenShot configuration.

use std::time::Duration;

use url::Url;

use crate::error::{OpenShotError, OpenShotResult};

/// How a tracked person is framed in their clip.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct TrackingFraming {
    /// Fraction of the frame width the person should fill after zooming
    pub fill: f64,
    /// Upper bound on the zoom factor
    pub max_scale: f64,
}

impl Default for TrackingFraming {
    fn default() -> Self {
        Self {
            fill: 0.5,
            max_scale: 3.0,
        }
    }
}

/// OpenShot Cloud API configuration.
#[derive(Debug, Clone)]
pub struct OpenShotConfig {
    /// API root, e.g. "http://cloud.openshot.org"
    pub base_url: String,
    pub username: String,
    pub password: String,
    /// Project that holds the source clip
    pub project_id: i64,
    /// Clip duplicated once per tracked person
    pub source_clip_id: i64,
    /// Request timeout
    pub timeout: Duration,
    /// Max retries for transient failures
    pub max_retries: u32,
    pub framing: TrackingFraming,
    /// Export container format
    pub export_format: String,
    /// Export video codec
    pub export_codec: String,
}

impl OpenShotConfig {
    /// Create config from environment variables.
    pub fn from_env() -> OpenShotResult<Self> {
        let config = Self {
            base_url: std::env::var("OPENSHOT_BASE_URL")
                .unwrap_or_else(|_| "http://cloud.openshot.org".to_string()),
            username: std::env::var("OPENSHOT_USERNAME")
                .map_err(|_| OpenShotError::config_error("OPENSHOT_USERNAME not set"))?,
            password: std::env::var("OPENSHOT_PASSWORD")
                .map_err(|_| OpenShotError::config_error("OPENSHOT_PASSWORD not set"))?,
            project_id: required_id("OPENSHOT_PROJECT_ID")?,
            source_clip_id: required_id("OPENSHOT_SOURCE_CLIP_ID")?,
            timeout: Duration::from_secs(
                std::env::var("OPENSHOT_TIMEOUT")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(30),
            ),
            max_retries: std::env::var("OPENSHOT_RETRIES")
                .ok()
                .and_then(|s| s.parse().ok())
                .unwrap_or(2),
            framing: TrackingFraming {
                fill: std::env::var("OPENSHOT_TRACKING_FILL")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(0.5),
                max_scale: std::env::var("OPENSHOT_TRACKING_MAX_SCALE")
                    .ok()
                    .and_then(|s| s.parse().ok())
                    .unwrap_or(3.0),
            },
            export_format: std::env::var("OPENSHOT_EXPORT_FORMAT")
                .unwrap_or_else(|_| "mp4".to_string()),
            export_codec: std::env::var("OPENSHOT_EXPORT_CODEC")
                .unwrap_or_else(|_| "libx264".to_string()),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the values the client depends on.
    pub fn validate(&self) -> OpenShotResult<()> {
        Url::parse(&self.base_url)
            .map_err(|e| OpenShotError::config_error(format!("invalid base URL: {}", e)))?;

        if self.framing.fill <= 0.0 || self.framing.max_scale < 1.0 {
            return Err(OpenShotError::config_error(
                "tracking fill must be positive and max scale at least 1.0",
            ));
        }
        Ok(())
    }
}

fn required_id(var: &str) -> OpenShotResult<i64> {
    std::env::var(var)
        .map_err(|_| OpenShotError::config_error(format!("{} not set", var)))?
        .parse()
        .map_err(|_| OpenShotError::config_error(format!("{} is not a number", var)))
}

#[cfg(test)]
pub(crate) fn test_config(base_url: &str) -> OpenShotConfig {
    OpenShotConfig {
        base_url: base_url.to_string(),
        username: "editor".to_string(),
        password: "secret".to_string(),
        project_id: 1,
        source_clip_id: 5,
        timeout: Duration::from_secs(5),
        max_retries: 0,
        framing: TrackingFraming::default(),
        export_format: "mp4".to_string(),
        export_codec: "libx264".to_string(),
    }
}
