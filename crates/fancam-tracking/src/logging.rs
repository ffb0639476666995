//! Structured job logging utilities.
//!
//! Keeps the job id and pipeline stage on every log line of a conversion.

use tracing::{error, info, warn};

use fancam_models::DetectionJobId;

/// Job logger for structured logging with consistent formatting.
#[derive(Debug, Clone)]
pub struct JobLogger {
    job_id: String,
    operation: String,
}

impl JobLogger {
    /// Create a logger for a job and operation (e.g. "tracking_conversion").
    pub fn new(job_id: &DetectionJobId, operation: &str) -> Self {
        Self {
            job_id: job_id.to_string(),
            operation: operation.to_string(),
        }
    }

    pub fn log_start(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job started: {}", message
        );
    }

    /// Log a pipeline stage transition.
    pub fn log_stage(&self, stage: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            stage = stage,
            "Job stage: {}", stage
        );
    }

    pub fn log_progress(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job progress: {}", message
        );
    }

    pub fn log_warning(&self, message: &str) {
        warn!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job warning: {}", message
        );
    }

    pub fn log_error(&self, message: &str) {
        error!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job error: {}", message
        );
    }

    pub fn log_completion(&self, message: &str) {
        info!(
            job_id = %self.job_id,
            operation = %self.operation,
            "Job completed: {}", message
        );
    }

    pub fn job_id(&self) -> &str {
        &self.job_id
    }

    pub fn operation(&self) -> &str {
        &self.operation
    }

}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_job_logger_creation() {
        let job_id = DetectionJobId::from_string("51a3a9be");
        let logger = JobLogger::new(&job_id, "tracking_conversion");

        assert_eq!(logger.job_id(), "51a3a9be");
        assert_eq!(logger.operation(), "tracking_conversion");
    }
}
