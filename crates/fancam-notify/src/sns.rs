//! SNS completion notifier.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_sns::config::Region;
use aws_sdk_sns::error::DisplayErrorContext;
use aws_sdk_sns::types::MessageAttributeValue;
use aws_sdk_sns::Client;
use tracing::info;

use fancam_models::CompletionNotice;
use fancam_tracking::{CompletionNotifier, TrackingResult};

use crate::error::{NotifyError, NotifyResult};

/// SNS subjects are limited to 100 characters.
const MAX_SUBJECT_LEN: usize = 100;

/// Configuration for the SNS notifier.
#[derive(Debug, Clone)]
pub struct SnsConfig {
    /// Topic receiving completion notices
    pub topic_arn: String,
    pub region: String,
    pub endpoint_url: Option<String>,
}

impl SnsConfig {
    /// Create config from environment variables.
    ///
    /// Returns `None` when `SNS_TOPIC_ARN` is not set.
    pub fn from_env() -> Option<Self> {
        let topic_arn = std::env::var("SNS_TOPIC_ARN").ok().filter(|s| !s.trim().is_empty())?;
        Some(Self {
            topic_arn,
            region: std::env::var("SNS_REGION")
                .or_else(|_| std::env::var("AWS_REGION"))
                .unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint_url: std::env::var("SNS_ENDPOINT_URL").ok(),
        })
    }
}

/// Subject line for a completion notice.
pub fn notice_subject(notice: &CompletionNotice) -> String {
    let outcome = if notice.is_success() { "completed" } else { "completed with errors" };
    let subject = format!("Fancam job {} {}", notice.job_id, outcome);
    subject.chars().take(MAX_SUBJECT_LEN).collect()
}

/// Publishes completion notices to an SNS topic.
#[derive(Clone)]
pub struct SnsNotifier {
    client: Client,
    topic_arn: String,
}

impl SnsNotifier {
    pub async fn new(config: SnsConfig) -> NotifyResult<Self> {
        if !config.topic_arn.starts_with("arn:") {
            return Err(NotifyError::config_error(format!(
                "invalid topic ARN: {}",
                config.topic_arn
            )));
        }

        let mut loader =
            aws_config::defaults(BehaviorVersion::latest()).region(Region::new(config.region.clone()));
        if let Some(endpoint) = config.endpoint_url.as_deref() {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        info!(topic = %config.topic_arn, "Initialized SNS notifier");

        Ok(Self {
            client: Client::new(&sdk_config),
            topic_arn: config.topic_arn,
        })
    }

    pub async fn publish(&self, notice: &CompletionNotice) -> NotifyResult<String> {
        let message = serde_json::to_string(notice)?;
        let status = MessageAttributeValue::builder()
            .data_type("String")
            .string_value(if notice.is_success() { "SUCCEEDED" } else { "PARTIAL" })
            .build()
            .map_err(|e| NotifyError::publish_failed(e.to_string()))?;

        let output = self
            .client
            .publish()
            .topic_arn(&self.topic_arn)
            .subject(notice_subject(notice))
            .message(message)
            .message_attributes("status", status)
            .send()
            .await
            .map_err(|e| NotifyError::publish_failed(DisplayErrorContext(&e).to_string()))?;

        let message_id = output.message_id.unwrap_or_default();
        info!(
            job_id = %notice.job_id,
            message_id = %message_id,
            exports = notice.exports.len(),
            "Published completion notice"
        );
        Ok(message_id)
    }
}

#[async_trait]
impl CompletionNotifier for SnsNotifier {
    async fn notify(&self, notice: &CompletionNotice) -> TrackingResult<()> {
        self.publish(notice).await?;
        Ok(())
    }
}

/// Notifier that only logs.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogNotifier;

#[async_trait]
impl CompletionNotifier for LogNotifier {
    async fn notify(&self, notice: &CompletionNotice) -> TrackingResult<()> {
        info!(
            job_id = %notice.job_id,
            people = notice.people_count,
            exports = notice.exports.len(),
            error = notice.error.as_deref().unwrap_or("-"),
            "Conversion complete"
        );
        for export in &notice.exports {
            info!(
                export_id = %export.id,
                url = %export.url,
                project_url = export.project_url.as_deref().unwrap_or("-"),
                "Export"
            );
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use fancam_models::DetectionJobId;

    fn notice(job: &str, error: Option<&str>) -> CompletionNotice {
        CompletionNotice::new(
            DetectionJobId::from_string(job),
            2,
            Vec::new(),
            error.map(str::to_string),
        )
    }

    #[test]
    fn test_subject_reflects_outcome() {
        assert_eq!(notice_subject(&notice("job-1", None)), "Fancam job job-1 completed");
        assert_eq!(
            notice_subject(&notice("job-1", Some("export failed"))),
            "Fancam job job-1 completed with errors"
        );
    }

    #[test]
    fn test_subject_is_truncated() {
        let long = "x".repeat(200);
        assert_eq!(notice_subject(&notice(&long, None)).chars().count(), MAX_SUBJECT_LEN);
    }

    #[tokio::test]
    async fn test_invalid_topic_rejected() {
        let config = SnsConfig {
            topic_arn: "fancam-complete".to_string(),
            region: "us-east-1".to_string(),
            endpoint_url: None,
        };
        assert!(matches!(
            SnsNotifier::new(config).await,
            Err(NotifyError::ConfigError(_))
        ));
    }

    #[tokio::test]
    async fn test_log_notifier_accepts_notice() {
        assert!(LogNotifier.notify(&notice("job-2", None)).await.is_ok());
    }
}
