//! Inbound job completion notification.
//!
//! The detection service publishes one of these to a notification topic
//! when a person-tracking job finishes. Field names follow the wire format.

use serde::{Deserialize, Serialize};

use crate::job::{DetectionJobId, JobStatus};

/// Source video the job analysed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct VideoReference {
    #[serde(rename = "S3ObjectName")]
    pub object_name: String,
    #[serde(rename = "S3Bucket")]
    pub bucket: String,
}

/// Completion notification for a person-tracking job.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct JobCompletionNotification {
    /// Job identifier
    #[serde(rename = "JobId")]
    pub job_id: DetectionJobId,

    /// Final job status
    #[serde(rename = "Status")]
    pub status: JobStatus,

    /// API that started the job (e.g. "StartPersonTracking")
    #[serde(rename = "API", default, skip_serializing_if = "Option::is_none")]
    pub api: Option<String>,

    /// Client-supplied tag
    #[serde(rename = "JobTag", default, skip_serializing_if = "Option::is_none")]
    pub job_tag: Option<String>,

    /// Completion time (milliseconds since epoch)
    #[serde(rename = "Timestamp", default, skip_serializing_if = "Option::is_none")]
    pub timestamp: Option<i64>,

    /// Analysed video
    #[serde(rename = "Video", default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoReference>,
}

impl JobCompletionNotification {
    /// Parse the notification from the raw message string.
    pub fn from_message(message: &str) -> Result<Self, serde_json::Error> {
        serde_json::from_str(message)
    }

    /// Whether this notification should start a conversion.
    pub fn should_process(&self) -> bool {
        self.status.is_success()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_full_notification() {
        let message = r#"{
            "JobId": "51a3a9bed1dca4015708e18b24c884ec",
            "Status": "SUCCEEDED",
            "API": "StartPersonTracking",
            "Timestamp": 1561578416813,
            "Video": {"S3ObjectName": "files/concert.mp4", "S3Bucket": "fancamgenerator"}
        }"#;

        let notification = JobCompletionNotification::from_message(message).unwrap();
        assert_eq!(notification.job_id.as_str(), "51a3a9bed1dca4015708e18b24c884ec");
        assert_eq!(notification.api.as_deref(), Some("StartPersonTracking"));
        assert_eq!(notification.video.unwrap().bucket, "fancamgenerator");
    }

    #[test]
    fn test_should_process_only_success() {
        let ok = JobCompletionNotification::from_message(r#"{"JobId":"abc","Status":"SUCCEEDED"}"#)
            .unwrap();
        assert!(ok.should_process());

        let failed =
            JobCompletionNotification::from_message(r#"{"JobId":"abc","Status":"FAILED"}"#).unwrap();
        assert!(!failed.should_process());
    }

    #[test]
    fn test_missing_job_id_is_rejected() {
        assert!(JobCompletionNotification::from_message(r#"{"Status":"SUCCEEDED"}"#).is_err());
    }
}
