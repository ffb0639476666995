//! Conversion configuration.

use std::str::FromStr;
use std::time::Duration;

use fancam_models::PersonIndex;

use crate::error::{TrackingError, TrackingResult};
use crate::pagination::{DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};

/// Conversion pipeline configuration.
#[derive(Debug, Clone, PartialEq)]
pub struct ConversionConfig {
    /// Observations requested per result page
    pub page_size: i32,
    /// Deadline for fetching all pages (None = no deadline)
    pub job_timeout: Option<Duration>,
    /// Only build a track for this identity (None = every identity)
    pub person_filter: Option<PersonIndex>,
}

impl Default for ConversionConfig {
    fn default() -> Self {
        Self {
            page_size: DEFAULT_PAGE_SIZE,
            job_timeout: None,
            person_filter: None,
        }
    }
}

impl ConversionConfig {
    /// Create config from environment variables.
    ///
    /// Set but unparseable or out-of-range values are rejected rather than
    /// replaced by defaults.
    pub fn from_env() -> TrackingResult<Self> {
        let config = Self {
            page_size: env_var("TRACKING_PAGE_SIZE")?.unwrap_or(DEFAULT_PAGE_SIZE),
            job_timeout: env_var::<u64>("TRACKING_JOB_TIMEOUT_SECS")?
                .filter(|secs| *secs > 0)
                .map(Duration::from_secs),
            person_filter: env_var("TRACKING_PERSON_INDEX")?.map(PersonIndex),
        };

        config.validate()?;
        Ok(config)
    }

    /// Check the values pagination depends on.
    pub fn validate(&self) -> TrackingResult<()> {
        if !(1..=MAX_PAGE_SIZE).contains(&self.page_size) {
            return Err(TrackingError::config_error(format!(
                "page size {} outside 1..={}",
                self.page_size, MAX_PAGE_SIZE
            )));
        }
        Ok(())
    }

    pub fn with_page_size(mut self, page_size: i32) -> Self {
        self.page_size = page_size;
        self
    }

    pub fn with_job_timeout(mut self, timeout: Duration) -> Self {
        self.job_timeout = Some(timeout);
        self
    }

    pub fn with_person_filter(mut self, index: PersonIndex) -> Self {
        self.person_filter = Some(index);
        self
    }
}

fn env_var<T: FromStr>(name: &str) -> TrackingResult<Option<T>> {
    parse_var(name, std::env::var(name).ok())
}

/// Parse an optional variable value; empty counts as unset.
fn parse_var<T: FromStr>(name: &str, value: Option<String>) -> TrackingResult<Option<T>> {
    match value.as_deref().map(str::trim) {
        None | Some("") => Ok(None),
        Some(raw) => raw
            .parse()
            .map(Some)
            .map_err(|_| TrackingError::config_error(format!("{} has invalid value {:?}", name, raw))),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_config_defaults() {
        let config = ConversionConfig::default();
        assert_eq!(config.page_size, 100);
        assert!(config.job_timeout.is_none());
        assert!(config.person_filter.is_none());
    }

    #[test]
    fn test_builders() {
        let config = ConversionConfig::default()
            .with_page_size(250)
            .with_job_timeout(Duration::from_secs(60))
            .with_person_filter(PersonIndex(0));

        assert_eq!(config.page_size, 250);
        assert_eq!(config.job_timeout, Some(Duration::from_secs(60)));
        assert_eq!(config.person_filter, Some(PersonIndex(0)));
    }

    #[test]
    fn test_validate_page_size_bounds() {
        assert!(ConversionConfig::default().validate().is_ok());
        assert!(ConversionConfig::default().with_page_size(MAX_PAGE_SIZE).validate().is_ok());

        let err = ConversionConfig::default().with_page_size(5000).validate().unwrap_err();
        assert!(matches!(err, TrackingError::ConfigError(_)));
        assert!(ConversionConfig::default().with_page_size(0).validate().is_err());
    }

    #[test]
    fn test_parse_var() {
        assert_eq!(parse_var::<i32>("TRACKING_PAGE_SIZE", None).unwrap(), None);
        assert_eq!(parse_var::<i32>("TRACKING_PAGE_SIZE", Some(" ".into())).unwrap(), None);
        assert_eq!(parse_var::<i32>("TRACKING_PAGE_SIZE", Some("250".into())).unwrap(), Some(250));

        let err = parse_var::<i32>("TRACKING_PAGE_SIZE", Some("lots".into())).unwrap_err();
        assert!(err.to_string().contains("TRACKING_PAGE_SIZE"));
        assert!(parse_var::<u32>("TRACKING_PERSON_INDEX", Some("-1".into())).is_err());
    }
}
