//! Export triggering and completion notification.
//!
//! Both steps are best-effort: failures are logged and reported back to the
//! caller as data, never as an `Err` that would fail the job.

use std::sync::Arc;

use fancam_models::{CompletionNotice, DetectionJobId, ExportDescriptor};

use crate::error::{TrackingError, TrackingResult};
use crate::logging::JobLogger;
use crate::metrics;
use crate::providers::{CompletionNotifier, ExportTrigger};

/// Result of the export and notify steps.
#[derive(Debug, Default)]
pub struct ExportOutcome {
    pub exports: Vec<ExportDescriptor>,
    /// Export trigger failure, if any
    pub export_error: Option<TrackingError>,
    /// Notification failure, if any
    pub notify_error: Option<TrackingError>,
}

/// Triggers pending exports and notifies completion.
#[derive(Clone)]
pub struct ExportNotifier {
    trigger: Arc<dyn ExportTrigger>,
    notifier: Arc<dyn CompletionNotifier>,
}

impl ExportNotifier {
    pub fn new(trigger: Arc<dyn ExportTrigger>, notifier: Arc<dyn CompletionNotifier>) -> Self {
        Self { trigger, notifier }
    }

    /// Ask the export collaborator to materialize every eligible export.
    pub async fn trigger_pending_exports(&self) -> TrackingResult<Vec<ExportDescriptor>> {
        self.trigger.trigger_pending_exports().await
    }

    /// Send a single completion notification.
    ///
    /// Fire-and-forget: a failure is logged and returned for reporting.
    pub async fn notify_completion(
        &self,
        job_id: &DetectionJobId,
        people_count: u32,
        exports: &[ExportDescriptor],
        error: Option<&TrackingError>,
    ) -> Option<TrackingError> {
        let notice = CompletionNotice::new(
            job_id.clone(),
            people_count,
            exports.to_vec(),
            error.map(|e| e.to_string()),
        );

        match self.notifier.notify(&notice).await {
            Ok(()) => None,
            Err(e) => {
                metrics::record_best_effort_failure(&e);
                JobLogger::new(job_id, "notify_completion")
                    .log_warning(&format!("Completion notification failed: {}", e));
                Some(e)
            }
        }
    }

    /// Trigger exports, then notify with whatever came out of it.
    pub async fn run(&self, job_id: &DetectionJobId, people_count: u32) -> ExportOutcome {
        let logger = JobLogger::new(job_id, "export");

        let (exports, export_error) = match self.trigger_pending_exports().await {
            Ok(exports) => {
                for export in &exports {
                    logger.log_progress(&format!(
                        "Export {} triggered: {} (project {})",
                        export.id,
                        export.url,
                        export.project_url.as_deref().unwrap_or("-")
                    ));
                }
                (exports, None)
            }
            Err(e) => {
                metrics::record_best_effort_failure(&e);
                logger.log_warning(&format!("Export trigger failed: {}", e));
                (Vec::new(), Some(e))
            }
        };

        logger.log_stage("notifying");
        let notify_error = self
            .notify_completion(job_id, people_count, &exports, export_error.as_ref())
            .await;

        ExportOutcome {
            exports,
            export_error,
            notify_error,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::providers::{MockCompletionNotifier, MockExportTrigger};

    fn descriptor(id: &str) -> ExportDescriptor {
        ExportDescriptor {
            id: id.to_string(),
            url: format!("http://openshot/exports/{}/", id),
            project_url: Some("http://openshot/projects/1/".to_string()),
            output: None,
            status: Some("pending".to_string()),
        }
    }

    #[tokio::test]
    async fn test_run_notifies_with_exports() {
        let mut trigger = MockExportTrigger::new();
        trigger
            .expect_trigger_pending_exports()
            .times(1)
            .returning(|| Ok(vec![descriptor("7"), descriptor("8")]));

        let mut notifier = MockCompletionNotifier::new();
        notifier
            .expect_notify()
            .withf(|notice| notice.exports.len() == 2 && notice.error.is_none() && notice.people_count == 3)
            .times(1)
            .returning(|_| Ok(()));

        let step = ExportNotifier::new(Arc::new(trigger), Arc::new(notifier));
        let outcome = step.run(&DetectionJobId::from_string("job"), 3).await;

        assert_eq!(outcome.exports.len(), 2);
        assert!(outcome.export_error.is_none());
        assert!(outcome.notify_error.is_none());
    }

    #[tokio::test]
    async fn test_trigger_failure_is_notified() {
        let mut trigger = MockExportTrigger::new();
        trigger
            .expect_trigger_pending_exports()
            .returning(|| Err(TrackingError::export_trigger("backend down")));

        let mut notifier = MockCompletionNotifier::new();
        notifier
            .expect_notify()
            .withf(|notice| {
                notice.exports.is_empty()
                    && notice
                        .error
                        .as_deref()
                        .is_some_and(|e| e.contains("backend down"))
            })
            .times(1)
            .returning(|_| Ok(()));

        let step = ExportNotifier::new(Arc::new(trigger), Arc::new(notifier));
        let outcome = step.run(&DetectionJobId::from_string("job"), 1).await;

        assert!(outcome.exports.is_empty());
        assert!(matches!(outcome.export_error, Some(TrackingError::ExportTrigger(_))));
    }

    #[tokio::test]
    async fn test_notify_failure_is_swallowed() {
        let mut trigger = MockExportTrigger::new();
        trigger.expect_trigger_pending_exports().returning(|| Ok(Vec::new()));

        let mut notifier = MockCompletionNotifier::new();
        notifier
            .expect_notify()
            .returning(|_| Err(TrackingError::notify("topic missing")));

        let step = ExportNotifier::new(Arc::new(trigger), Arc::new(notifier));
        let outcome = step.run(&DetectionJobId::from_string("job"), 0).await;

        assert!(outcome.export_error.is_none());
        assert!(matches!(outcome.notify_error, Some(TrackingError::Notify(_))));
    }
}
