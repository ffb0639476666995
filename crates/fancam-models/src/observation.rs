//! Per-frame person observations produced by the detection service.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Identity index assigned by the detection service to a tracked person.
///
/// Stable within one job. Non-negative by construction.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PersonIndex(pub u32);

impl PersonIndex {
    pub fn new(index: u32) -> Self {
        Self(index)
    }

    /// Convert a wire index, rejecting negative or out-of-range values.
    pub fn from_wire(index: i64) -> Option<Self> {
        u32::try_from(index).ok().map(Self)
    }

    pub fn value(&self) -> u32 {
        self.0
    }
}

impl fmt::Display for PersonIndex {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Bounding box of a detected person.
///
/// Every field is a fraction of the frame dimension. The detection service
/// may omit any of them.
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct BoundingBox {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub left: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub width: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub height: Option<f64>,
}

impl BoundingBox {
    /// Create a fully populated bounding box.
    pub fn new(top: f64, left: f64, width: f64, height: f64) -> Self {
        Self {
            top: Some(top),
            left: Some(left),
            width: Some(width),
            height: Some(height),
        }
    }
}

/// One frame's detection of one person.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PersonObservation {
    /// Identity index of the person
    pub index: PersonIndex,
    /// Position in the video, in seconds
    pub timestamp: f64,
    /// Detected bounding box, if any
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub bounding_box: Option<BoundingBox>,
}

impl PersonObservation {
    pub fn new(index: PersonIndex, timestamp: f64, bounding_box: Option<BoundingBox>) -> Self {
        Self {
            index,
            timestamp,
            bounding_box,
        }
    }
}

/// Video metadata reported alongside detection results.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct VideoMetadata {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub codec: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub duration_millis: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_rate: Option<f64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_width: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub frame_height: Option<i64>,
}

/// One page of detection results.
///
/// A present `next_token` means more pages remain.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct ResultPage {
    pub observations: Vec<PersonObservation>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub next_token: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub video: Option<VideoMetadata>,
    /// Detections on this page that carried no person identity.
    #[serde(default)]
    pub unidentified: u64,
}

impl ResultPage {
    pub fn new(observations: Vec<PersonObservation>, next_token: Option<String>) -> Self {
        Self {
            observations,
            next_token,
            video: None,
            unidentified: 0,
        }
    }

    pub fn with_unidentified(mut self, count: u64) -> Self {
        self.unidentified = count;
        self
    }

    /// Whether this is the final page.
    pub fn is_last(&self) -> bool {
        self.next_token.is_none()
    }
}
