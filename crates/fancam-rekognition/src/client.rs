//! Rekognition person-tracking client.

use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_rekognition::config::Region;
use aws_sdk_rekognition::error::DisplayErrorContext;
use aws_sdk_rekognition::types::VideoJobStatus;
use aws_sdk_rekognition::Client;
use tracing::{debug, info};

use fancam_models::{DetectionJobId, ResultPage};
use fancam_tracking::{DetectionSource, TrackingResult};

use crate::convert;
use crate::error::{RekognitionError, RekognitionResult};

/// Configuration for the Rekognition client.
#[derive(Debug, Clone)]
pub struct RekognitionConfig {
    /// AWS region of the analysis jobs
    pub region: String,
    /// Endpoint override (local stacks, VPC endpoints)
    pub endpoint_url: Option<String>,
}

impl Default for RekognitionConfig {
    fn default() -> Self {
        Self {
            region: "us-east-1".to_string(),
            endpoint_url: None,
        }
    }
}

impl RekognitionConfig {
    /// Create config from environment variables.
    pub fn from_env() -> Self {
        Self {
            region: std::env::var("REKOGNITION_REGION")
                .or_else(|_| std::env::var("AWS_REGION"))
                .unwrap_or_else(|_| "us-east-1".to_string()),
            endpoint_url: std::env::var("REKOGNITION_ENDPOINT_URL").ok(),
        }
    }
}

/// Detection source backed by Rekognition `GetPersonTracking`.
#[derive(Clone)]
pub struct RekognitionSource {
    client: Client,
}

impl RekognitionSource {
    /// Create a new client, resolving credentials from the environment.
    pub async fn new(config: RekognitionConfig) -> RekognitionResult<Self> {
        if config.region.trim().is_empty() {
            return Err(RekognitionError::config_error("region is empty"));
        }

        let mut loader = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()));
        if let Some(endpoint) = config.endpoint_url.as_deref() {
            loader = loader.endpoint_url(endpoint);
        }
        let sdk_config = loader.load().await;

        info!(region = %config.region, "Initialized Rekognition client");

        Ok(Self {
            client: Client::new(&sdk_config),
        })
    }

    /// Create from environment variables.
    pub async fn from_env() -> RekognitionResult<Self> {
        Self::new(RekognitionConfig::from_env()).await
    }

    /// Fetch one page of person-tracking results.
    pub async fn fetch_page(
        &self,
        job_id: &DetectionJobId,
        max_results: i32,
        next_token: Option<String>,
    ) -> RekognitionResult<ResultPage> {
        let output = self
            .client
            .get_person_tracking()
            .job_id(job_id.as_str())
            .max_results(max_results)
            .set_next_token(next_token)
            .send()
            .await
            .map_err(|e| RekognitionError::request_failed(DisplayErrorContext(&e).to_string()))?;

        if matches!(output.job_status, Some(VideoJobStatus::Failed)) {
            return Err(RekognitionError::JobFailed {
                job_id: job_id.to_string(),
                message: output
                    .status_message
                    .clone()
                    .unwrap_or_else(|| "no status message".to_string()),
            });
        }

        let detections = output.persons.unwrap_or_default();
        let observations = convert::observations(&detections);
        let unidentified = convert::unidentified(&detections, &observations);

        debug!(
            job_id = %job_id,
            detections = detections.len(),
            observations = observations.len(),
            unidentified,
            "Converted person detections"
        );

        Ok(ResultPage {
            observations,
            next_token: output.next_token,
            video: output.video_metadata.as_ref().map(convert::video_metadata),
            unidentified,
        })
    }
}

#[async_trait]
impl DetectionSource for RekognitionSource {
    async fn get_page(
        &self,
        job_id: &DetectionJobId,
        max_results: i32,
        next_token: Option<String>,
    ) -> TrackingResult<ResultPage> {
        Ok(self.fetch_page(job_id, max_results, next_token).await?)
    }

    fn name(&self) -> &'static str {
        "rekognition"
    }
}
