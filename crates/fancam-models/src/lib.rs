//! Shared data models for the fancam tracking converter.
//!
//! This crate provides Serde-serializable types for:
//! - Person-tracking jobs and their completion notifications
//! - Per-frame person observations and result pages
//! - Tracking keyframes and the editing backend's keyframe schema
//! - Export descriptors and completion notices

pub mod export;
pub mod job;
pub mod keyframe;
pub mod notification;
pub mod observation;

// Re-export common types
pub use export::{CompletionNotice, ExportDescriptor};
pub use job::{DetectionJobId, JobStatus};
pub use keyframe::{
    Coordinate, InterpolationMode, InvalidInterpolationMode, Point, Property, TrackingKeyframe,
};
pub use notification::{JobCompletionNotification, VideoReference};
pub use observation::{BoundingBox, PersonIndex, PersonObservation, ResultPage, VideoMetadata};
