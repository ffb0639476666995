//! Rekognition SDK types to observation models.

use aws_sdk_rekognition::types::{
    BoundingBox as SdkBoundingBox, PersonDetection, VideoMetadata as SdkVideoMetadata,
};
use tracing::{debug, warn};

use fancam_models::{BoundingBox, PersonIndex, PersonObservation, VideoMetadata};

/// Convert one person detection.
///
/// Detections without person details carry no identity and are dropped, as
/// are detections whose index is negative. Timestamps arrive in milliseconds.
pub fn observation_from_detection(detection: &PersonDetection) -> Option<PersonObservation> {
    let Some(person) = detection.person.as_ref() else {
        debug!(timestamp_ms = detection.timestamp, "Detection without person details");
        return None;
    };

    let Some(index) = PersonIndex::from_wire(person.index) else {
        warn!(index = person.index, "Dropping detection with invalid person index");
        return None;
    };

    Some(PersonObservation::new(
        index,
        millis_to_seconds(detection.timestamp),
        person.bounding_box.as_ref().map(bounding_box),
    ))
}

/// Convert every usable detection of a page, preserving order.
pub fn observations(detections: &[PersonDetection]) -> Vec<PersonObservation> {
    detections.iter().filter_map(observation_from_detection).collect()
}

/// Detections that still count as observed but cannot be tracked.
pub fn unidentified(detections: &[PersonDetection], observations: &[PersonObservation]) -> u64 {
    detections.len().saturating_sub(observations.len()) as u64
}

pub fn bounding_box(bbox: &SdkBoundingBox) -> BoundingBox {
    BoundingBox {
        top: bbox.top.map(f64::from),
        left: bbox.left.map(f64::from),
        width: bbox.width.map(f64::from),
        height: bbox.height.map(f64::from),
    }
}

pub fn video_metadata(metadata: &SdkVideoMetadata) -> VideoMetadata {
    VideoMetadata {
        codec: metadata.codec.clone(),
        duration_millis: metadata.duration_millis,
        frame_rate: metadata.frame_rate.map(f64::from),
        frame_width: metadata.frame_width,
        frame_height: metadata.frame_height,
    }
}

fn millis_to_seconds(millis: i64) -> f64 {
    millis as f64 / 1000.0
}
