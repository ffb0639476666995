//! AWS Rekognition person-tracking detection source.
//!
//! This crate provides:
//! - A paginated `GetPersonTracking` client implementing `DetectionSource`
//! - Conversion of Rekognition person detections into observations

pub mod client;
pub mod convert;
pub mod error;

pub use client::{RekognitionConfig, RekognitionSource};
pub use error::{RekognitionError, RekognitionResult};
