//! Tracking keyframes and the editing backend's keyframe schema.
//!
//! Clip properties in the editing backend are animated by a list of points:
//!
//! ```json
//! {"Points": [{"co": {"X": 1, "Y": 0.25}, "interpolation": 1}]}
//! ```
//!
//! `X` is a 1-based frame number, `Y` the property value at that frame.

use serde::{Deserialize, Serialize};
use std::fmt;
use thiserror::Error;

/// Timeline keyframe derived from one bounding-box observation.
///
/// Only the horizontal geometry is carried; top and height are dropped.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct TrackingKeyframe {
    /// Position in the video, in seconds
    pub timestamp: f64,
    /// Left edge as a fraction of frame width
    pub left: f64,
    /// Width as a fraction of frame width
    pub width: f64,
}

impl TrackingKeyframe {
    pub fn new(timestamp: f64, left: f64, width: f64) -> Self {
        Self {
            timestamp,
            left,
            width,
        }
    }

    /// Horizontal centre of the box as a fraction of frame width.
    pub fn center_x(&self) -> f64 {
        self.left + self.width / 2.0
    }
}

/// Interpolation between adjacent keyframe points.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(try_from = "u8", into = "u8")]
pub enum InterpolationMode {
    Bezier,
    #[default]
    Linear,
    Constant,
}

impl InterpolationMode {
    pub fn as_str(&self) -> &'static str {
        match self {
            InterpolationMode::Bezier => "bezier",
            InterpolationMode::Linear => "linear",
            InterpolationMode::Constant => "constant",
        }
    }
}

impl fmt::Display for InterpolationMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Rejected interpolation code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Error)]
#[error("invalid interpolation mode {0}, expected 0 (bezier), 1 (linear) or 2 (constant)")]
pub struct InvalidInterpolationMode(pub u8);

impl TryFrom<u8> for InterpolationMode {
    type Error = InvalidInterpolationMode;

    fn try_from(value: u8) -> Result<Self, Self::Error> {
        match value {
            0 => Ok(InterpolationMode::Bezier),
            1 => Ok(InterpolationMode::Linear),
            2 => Ok(InterpolationMode::Constant),
            other => Err(InvalidInterpolationMode(other)),
        }
    }
}

impl From<InterpolationMode> for u8 {
    fn from(mode: InterpolationMode) -> Self {
        match mode {
            InterpolationMode::Bezier => 0,
            InterpolationMode::Linear => 1,
            InterpolationMode::Constant => 2,
        }
    }
}

/// Coordinate of a keyframe point (frame, value).
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Coordinate {
    #[serde(rename = "X")]
    pub x: f64,
    #[serde(rename = "Y")]
    pub y: f64,
}

/// A single keyframe point on an animated property.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Point {
    pub co: Coordinate,
    pub interpolation: InterpolationMode,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_left: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_right: Option<Coordinate>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handle_type: Option<u8>,
}

impl Point {
    pub fn new(frame: i64, value: f64, interpolation: InterpolationMode) -> Self {
        Self {
            co: Coordinate {
                x: frame as f64,
                y: value,
            },
            interpolation,
            handle_left: None,
            handle_right: None,
            handle_type: None,
        }
    }
}

/// Animated clip property.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Property {
    #[serde(rename = "Points", default)]
    pub points: Vec<Point>,
}

impl Property {
    /// Append a point, keeping submission order.
    pub fn push(&mut self, point: Point) {
        self.points.push(point);
    }

    pub fn len(&self) -> usize {
        self.points.len()
    }

    pub fn is_empty(&self) -> bool {
        self.points.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_interpolation_wire_codes() {
        assert_eq!(serde_json::to_string(&InterpolationMode::Bezier).unwrap(), "0");
        assert_eq!(serde_json::to_string(&InterpolationMode::Constant).unwrap(), "2");

        let mode: InterpolationMode = serde_json::from_str("1").unwrap();
        assert_eq!(mode, InterpolationMode::Linear);
    }

    #[test]
    fn test_interpolation_rejects_unknown_code() {
        assert!(serde_json::from_str::<InterpolationMode>("3").is_err());
        assert_eq!(InterpolationMode::try_from(7), Err(InvalidInterpolationMode(7)));
    }

    #[test]
    fn test_property_wire_format() {
        let json = r#"{"Points":[{"co":{"X":1,"Y":0.5},"interpolation":2}]}"#;
        let property: Property = serde_json::from_str(json).unwrap();

        assert_eq!(property.len(), 1);
        assert_eq!(property.points[0].co.x, 1.0);
        assert_eq!(property.points[0].interpolation, InterpolationMode::Constant);
    }

    #[test]
    fn test_property_with_bad_interpolation_is_rejected() {
        let json = r#"{"Points":[{"co":{"X":1,"Y":0.5},"interpolation":9}]}"#;
        assert!(serde_json::from_str::<Property>(json).is_err());
    }

    #[test]
    fn test_keyframe_center() {
        let kf = TrackingKeyframe::new(1.0, 0.2, 0.4);
        assert!((kf.center_x() - 0.4).abs() < 1e-9);
    }
}
