//! Person-tracking job identifiers and statuses.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Opaque identifier of an asynchronous person-tracking job.
///
/// Issued by the detection service when the job is started and carried
/// unchanged through the completion notification.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DetectionJobId(pub String);

impl DetectionJobId {
    /// Create from an existing string.
    pub fn from_string(s: impl Into<String>) -> Self {
        Self(s.into())
    }

    /// Get the inner string.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Whether the token is empty (never valid on the wire).
    pub fn is_empty(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for DetectionJobId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Status reported by the detection service for a finished job.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum JobStatus {
    /// Analysis completed and results can be paged
    Succeeded,
    /// Analysis failed
    Failed,
    /// Service-side error
    Error,
    /// Analysis still running
    InProgress,
    /// Any status this service does not know about
    #[serde(other)]
    Unknown,
}

impl JobStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            JobStatus::Succeeded => "SUCCEEDED",
            JobStatus::Failed => "FAILED",
            JobStatus::Error => "ERROR",
            JobStatus::InProgress => "IN_PROGRESS",
            JobStatus::Unknown => "UNKNOWN",
        }
    }

    /// Only successfully completed jobs are converted.
    pub fn is_success(&self) -> bool {
        matches!(self, JobStatus::Succeeded)
    }
}

impl fmt::Display for JobStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}
