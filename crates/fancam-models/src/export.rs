//! Export artifacts and completion notices.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::job::DetectionJobId;

/// Export artifact produced (or scheduled) by the editing backend.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ExportDescriptor {
    /// Backend identifier of the export
    pub id: String,
    /// API URL of the export resource
    pub url: String,
    /// Project the export belongs to
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub project_url: Option<String>,
    /// Location of the rendered file, once available
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output: Option<String>,
    /// Backend status string
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
}

/// Payload of the completion notification sent after a conversion.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CompletionNotice {
    pub job_id: DetectionJobId,
    pub people_count: u32,
    pub exports: Vec<ExportDescriptor>,
    /// Error that ended the export step, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    pub completed_at: DateTime<Utc>,
}

impl CompletionNotice {
    pub fn new(
        job_id: DetectionJobId,
        people_count: u32,
        exports: Vec<ExportDescriptor>,
        error: Option<String>,
    ) -> Self {
        Self {
            job_id,
            people_count,
            exports,
            error,
            completed_at: Utc::now(),
        }
    }

    pub fn is_success(&self) -> bool {
        self.error.is_none()
    }
}
