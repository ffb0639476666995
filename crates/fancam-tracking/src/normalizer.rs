//! Bounding box to timeline keyframe conversion.

use fancam_models::{BoundingBox, TrackingKeyframe};

use crate::error::{TrackingError, TrackingResult};

/// Convert one bounding-box observation into a tracking keyframe.
///
/// Only `left` and `width` are carried into the keyframe; `top` and `height`
/// are ignored even when present. Values are not clamped to `[0, 1]` because
/// the detection service reports boxes that extend past the frame edge.
pub fn normalize(timestamp: f64, bbox: &BoundingBox) -> TrackingResult<TrackingKeyframe> {
    let left = finite(bbox.left, "left")?;
    let width = finite(bbox.width, "width")?;

    if !timestamp.is_finite() {
        return Err(TrackingError::InvalidGeometry("timestamp"));
    }

    Ok(TrackingKeyframe::new(timestamp, left, width))
}

fn finite(value: Option<f64>, field: &'static str) -> TrackingResult<f64> {
    match value {
        Some(v) if v.is_finite() => Ok(v),
        _ => Err(TrackingError::InvalidGeometry(field)),
    }
}
