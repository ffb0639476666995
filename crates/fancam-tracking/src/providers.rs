//! Collaborator traits for the conversion pipeline.
//!
//! The orchestrator only talks to the outside world through these traits,
//! so detection, editing and notification backends are injected at
//! construction time and can be swapped for fakes in tests.

use async_trait::async_trait;

use fancam_models::{
    CompletionNotice, DetectionJobId, ExportDescriptor, PersonIndex, ResultPage, TrackingKeyframe,
};

use crate::error::TrackingResult;

/// Paginated source of person-tracking observations.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait DetectionSource: Send + Sync {
    /// Fetch one page of results.
    ///
    /// `next_token` is the continuation token of the previous page, `None`
    /// for the first request.
    async fn get_page(
        &self,
        job_id: &DetectionJobId,
        max_results: i32,
        next_token: Option<String>,
    ) -> TrackingResult<ResultPage>;

    /// Source name for logging.
    fn name(&self) -> &'static str;
}

/// Editing backend that receives per-person keyframes.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait EditingBackend: Send + Sync {
    /// Set one tracking keyframe on the clip that follows `person`.
    async fn set_tracking_keyframe(
        &self,
        person: PersonIndex,
        keyframe: &TrackingKeyframe,
    ) -> TrackingResult<()>;

    /// Persist anything the backend buffered. Called once after the last
    /// keyframe of a job.
    async fn flush(&self) -> TrackingResult<()>;
}

/// Materializes exports once clip properties are final.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait ExportTrigger: Send + Sync {
    /// Trigger every export currently eligible and describe them.
    async fn trigger_pending_exports(&self) -> TrackingResult<Vec<ExportDescriptor>>;
}

/// Sends the completion notification for a job.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait CompletionNotifier: Send + Sync {
    async fn notify(&self, notice: &CompletionNotice) -> TrackingResult<()>;
}
