//! Conversion pipeline metrics.
//!
//! Recorded through the `metrics` facade; the binary decides whether a
//! Prometheus recorder is installed.

use metrics::{counter, histogram};

use crate::error::TrackingError;

// =============================================================================
// Metric Names
// =============================================================================

/// Metric name constants for consistency.
pub mod names {
    /// Result pages fetched, by source.
    pub const PAGES_TOTAL: &str = "fancam_result_pages_total";

    /// Failed page fetches, by source and error kind.
    pub const PAGE_FAILURES_TOTAL: &str = "fancam_result_page_failures_total";

    /// Observations per page.
    pub const PAGE_OBSERVATIONS: &str = "fancam_result_page_observations";

    /// Keyframes handed to the editing backend.
    pub const KEYFRAMES_COMMITTED_TOTAL: &str = "fancam_keyframes_committed_total";

    /// Finished conversions, by outcome.
    pub const CONVERSIONS_TOTAL: &str = "fancam_conversions_total";

    /// Conversion duration in seconds.
    pub const CONVERSION_DURATION_SECONDS: &str = "fancam_conversion_duration_seconds";

    /// Best-effort step failures (export trigger, notify).
    pub const BEST_EFFORT_FAILURES_TOTAL: &str = "fancam_best_effort_failures_total";
}

// =============================================================================
// Recording Functions
// =============================================================================

pub fn record_page(source: &str, observations: usize) {
    counter!(names::PAGES_TOTAL, "source" => source.to_string()).increment(1);
    histogram!(names::PAGE_OBSERVATIONS, "source" => source.to_string())
        .record(observations as f64);
}

pub fn record_page_failure(source: &str, error: &TrackingError) {
    counter!(
        names::PAGE_FAILURES_TOTAL,
        "source" => source.to_string(),
        "kind" => error.kind()
    )
    .increment(1);
}

pub fn record_keyframes_committed(count: u64) {
    counter!(names::KEYFRAMES_COMMITTED_TOTAL).increment(count);
}

pub fn record_conversion(outcome: &'static str, duration_secs: f64) {
    counter!(names::CONVERSIONS_TOTAL, "outcome" => outcome).increment(1);
    histogram!(names::CONVERSION_DURATION_SECONDS, "outcome" => outcome).record(duration_secs);
}

pub fn record_best_effort_failure(error: &TrackingError) {
    counter!(names::BEST_EFFORT_FAILURES_TOTAL, "kind" => error.kind()).increment(1);
}
