//! Person-tracking to timeline keyframe conversion.
//!
//! This crate provides:
//! - Geometry normalization of detected bounding boxes
//! - Per-person keyframe accumulation
//! - Pagination over detection results
//! - Export triggering and completion notification
//! - The conversion orchestrator tying them together
//!
//! External systems are reached only through the traits in [`providers`].

pub mod accumulator;
pub mod config;
pub mod error;
pub mod exports;
pub mod logging;
pub mod metrics;
pub mod normalizer;
pub mod orchestrator;
pub mod pagination;
pub mod providers;

pub use accumulator::{AccumulatorStats, PersonTrack, TrackAccumulator};
pub use config::ConversionConfig;
pub use error::{TrackingError, TrackingResult};
pub use exports::{ExportNotifier, ExportOutcome};
pub use logging::JobLogger;
pub use normalizer::normalize;
pub use orchestrator::{ConversionFailure, ConversionOrchestrator, ConversionReport, ConversionState};
pub use pagination::{PaginationDriver, DEFAULT_PAGE_SIZE, MAX_PAGE_SIZE};
pub use providers::{CompletionNotifier, DetectionSource, EditingBackend, ExportTrigger};
