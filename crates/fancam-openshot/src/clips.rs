//! Keyframe editing of clip properties.
//!
//! Properties live in the clip's `json` map under their OpenShot names. A
//! missing property starts empty; a present one must decode as a point list,
//! otherwise the edit is rejected rather than overwriting foreign data.

use serde_json::Value;

use fancam_models::{InterpolationMode, Point, Property};

use crate::error::{OpenShotError, OpenShotResult};
use crate::types::Clip;

pub const LOCATION_X: &str = "location_x";
pub const SCALE_X: &str = "scale_x";
pub const SCALE_Y: &str = "scale_y";
const SCALE_MODE: &str = "scale";

/// How a clip is fitted into the project canvas.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScaleMode {
    Crop,
    Fit,
    Stretch,
    None,
}

impl ScaleMode {
    fn code(self) -> u8 {
        match self {
            ScaleMode::Crop => 0,
            ScaleMode::Fit => 1,
            ScaleMode::Stretch => 2,
            ScaleMode::None => 3,
        }
    }
}

/// Read an animated property, empty if the clip does not carry it.
pub fn property(clip: &Clip, key: &str) -> OpenShotResult<Property> {
    match clip.json.get(key) {
        None | Some(Value::Null) => Ok(Property::default()),
        Some(value) => {
            serde_json::from_value(value.clone()).map_err(|source| OpenShotError::InvalidProperty {
                key: key.to_string(),
                source,
            })
        }
    }
}

/// Append a point to an animated property.
pub fn add_property_point(
    clip: &mut Clip,
    key: &str,
    frame: i64,
    value: f64,
    interpolation: InterpolationMode,
) -> OpenShotResult<()> {
    let mut prop = property(clip, key)?;
    prop.push(Point::new(frame, value, interpolation));
    clip.json.insert(key.to_string(), serde_json::to_value(&prop)?);
    Ok(())
}

/// Set the clip's scale mode.
pub fn set_scale_mode(clip: &mut Clip, mode: ScaleMode) {
    clip.json.insert(SCALE_MODE.to_string(), Value::from(mode.code()));
}
