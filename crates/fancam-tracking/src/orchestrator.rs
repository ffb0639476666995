//! Conversion orchestration.
//!
//! One job runs through a linear sequence of stages:
//!
//! ```text
//! Start -> Paginating -> Committing -> Exporting -> Notifying -> Done
//!              |              |
//!              +---> Failed <-+
//! ```
//!
//! Accumulation is interleaved with pagination, one page at a time.
//! Keyframes reach the editing backend only after every page has been
//! fetched, so a failed fetch leaves nothing behind. Export and notify
//! failures are logged and never move the job to `Failed`.

use std::fmt;
use std::sync::Arc;
use std::time::Instant;

use serde::Serialize;

use fancam_models::{DetectionJobId, ExportDescriptor};

use crate::accumulator::{AccumulatorStats, TrackAccumulator};
use crate::config::ConversionConfig;
use crate::error::{TrackingError, TrackingResult};
use crate::exports::ExportNotifier;
use crate::logging::JobLogger;
use crate::metrics;
use crate::pagination::PaginationDriver;
use crate::providers::{DetectionSource, EditingBackend};

/// Stage of a conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ConversionState {
    Start,
    Paginating,
    Committing,
    Exporting,
    Notifying,
    Done,
    Failed,
}

impl ConversionState {
    pub fn as_str(&self) -> &'static str {
        match self {
            ConversionState::Start => "start",
            ConversionState::Paginating => "paginating",
            ConversionState::Committing => "committing",
            ConversionState::Exporting => "exporting",
            ConversionState::Notifying => "notifying",
            ConversionState::Done => "done",
            ConversionState::Failed => "failed",
        }
    }
}

impl fmt::Display for ConversionState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Summary of a finished conversion.
#[derive(Debug, Clone, Serialize)]
pub struct ConversionReport {
    pub job_id: DetectionJobId,
    pub state: ConversionState,
    pub pages: u32,
    #[serde(flatten)]
    pub stats: AccumulatorStats,
    pub keyframes_committed: u64,
    pub exports: Vec<ExportDescriptor>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub export_error: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notify_error: Option<String>,
}

impl ConversionReport {
    pub fn people_count(&self) -> u32 {
        self.stats.people_count
    }
}

/// Failed conversion: the stage that failed and why.
#[derive(Debug)]
pub struct ConversionFailure {
    pub job_id: DetectionJobId,
    pub stage: ConversionState,
    pub error: TrackingError,
}

impl fmt::Display for ConversionFailure {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "job {} failed while {}: {}", self.job_id, self.stage, self.error)
    }
}

impl std::error::Error for ConversionFailure {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        Some(&self.error)
    }
}

/// Top-level sequencing of one conversion job.
///
/// Collaborators are injected; the orchestrator holds no global state and
/// several instances may run jobs in parallel.
pub struct ConversionOrchestrator {
    source: Arc<dyn DetectionSource>,
    backend: Arc<dyn EditingBackend>,
    exports: ExportNotifier,
    config: ConversionConfig,
}

impl ConversionOrchestrator {
    pub fn new(
        source: Arc<dyn DetectionSource>,
        backend: Arc<dyn EditingBackend>,
        exports: ExportNotifier,
        config: ConversionConfig,
    ) -> Self {
        Self {
            source,
            backend,
            exports,
            config,
        }
    }

    /// Run one job to a terminal state.
    pub async fn process(
        &self,
        job_id: &DetectionJobId,
    ) -> Result<ConversionReport, ConversionFailure> {
        let logger = JobLogger::new(job_id, "tracking_conversion");
        let started = Instant::now();
        logger.log_start(&format!("source={}", self.source.name()));

        let fail = |stage: ConversionState, error: TrackingError| {
            logger.log_error(&format!("Failed while {}: {}", stage, error));
            metrics::record_conversion("failed", started.elapsed().as_secs_f64());
            ConversionFailure {
                job_id: job_id.clone(),
                stage,
                error,
            }
        };

        logger.log_stage(ConversionState::Paginating.as_str());
        let mut accumulator = TrackAccumulator::with_filter(self.config.person_filter);
        let pages = match self.paginate(job_id, &mut accumulator).await {
            Ok(pages) => pages,
            Err(e) => return Err(fail(ConversionState::Paginating, e)),
        };

        let stats = accumulator.stats();
        logger.log_progress(&format!(
            "Fetched {} pages: {} person detections, {} with bounding box, {} people",
            pages, stats.total_observed, stats.total_with_bounding_box, stats.people_count
        ));
        if stats.skipped_invalid > 0 {
            logger.log_warning(&format!(
                "Skipped {} detections with incomplete geometry",
                stats.skipped_invalid
            ));
        }

        logger.log_stage(ConversionState::Committing.as_str());
        let keyframes_committed = match self.commit(&accumulator).await {
            Ok(count) => count,
            Err(e) => return Err(fail(ConversionState::Committing, e)),
        };
        metrics::record_keyframes_committed(keyframes_committed);

        logger.log_stage(ConversionState::Exporting.as_str());
        let outcome = self.exports.run(job_id, stats.people_count).await;

        logger.log_completion(&format!(
            "{} keyframes committed, {} exports triggered",
            keyframes_committed,
            outcome.exports.len()
        ));
        metrics::record_conversion("done", started.elapsed().as_secs_f64());

        Ok(ConversionReport {
            job_id: job_id.clone(),
            state: ConversionState::Done,
            pages,
            stats,
            keyframes_committed,
            exports: outcome.exports,
            export_error: outcome.export_error.map(|e| e.to_string()),
            notify_error: outcome.notify_error.map(|e| e.to_string()),
        })
    }

    /// Fetch all pages into the accumulator, honouring the job deadline.
    async fn paginate(
        &self,
        job_id: &DetectionJobId,
        accumulator: &mut TrackAccumulator,
    ) -> TrackingResult<u32> {
        let driver = PaginationDriver::new(self.source.as_ref(), self.config.page_size)?;
        let fetch = driver.fetch_all(job_id, |page| accumulator.observe_page(page));

        match self.config.job_timeout {
            Some(deadline) => tokio::time::timeout(deadline, fetch)
                .await
                .map_err(|_| TrackingError::DeadlineExceeded(deadline))?,
            None => fetch.await,
        }
    }

    /// Hand every keyframe to the editing backend, then flush it.
    ///
    /// A backend failure part-way leaves earlier keyframes in place; the
    /// backend offers no rollback.
    async fn commit(&self, accumulator: &TrackAccumulator) -> TrackingResult<u64> {
        let mut committed = 0u64;

        for track in accumulator.tracks() {
            for keyframe in track.keyframes() {
                self.backend
                    .set_tracking_keyframe(track.index(), keyframe)
                    .await?;
                committed += 1;
            }
        }

        self.backend.flush().await?;
        Ok(committed)
    }
}
