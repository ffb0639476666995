//! OpenShot Cloud API resources.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

use fancam_models::ExportDescriptor;

/// Project resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Project {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub name: String,
    pub width: i64,
    pub height: i64,
    pub fps_num: i64,
    pub fps_den: i64,
    #[serde(default = "default_sample_rate")]
    pub sample_rate: i64,
    #[serde(default = "default_channels")]
    pub channels: i64,
    #[serde(default = "default_channel_layout")]
    pub channel_layout: i64,
    #[serde(default)]
    pub json: Map<String, Value>,
}

fn default_sample_rate() -> i64 {
    44_100
}

fn default_channels() -> i64 {
    2
}

fn default_channel_layout() -> i64 {
    3
}

impl Project {
    /// Frames per second.
    pub fn fps(&self) -> f64 {
        if self.fps_den == 0 {
            return 0.0;
        }
        self.fps_num as f64 / self.fps_den as f64
    }
}

/// Project request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewProject {
    pub name: String,
    pub width: i64,
    pub height: i64,
    pub fps_num: i64,
    pub fps_den: i64,
    pub sample_rate: i64,
    pub channels: i64,
    pub channel_layout: i64,
    pub json: Map<String, Value>,
}

impl NewProject {
    /// Empty project with the same canvas and timing as `project`.
    pub fn like(project: &Project, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            width: project.width,
            height: project.height,
            fps_num: project.fps_num,
            fps_den: project.fps_den,
            sample_rate: project.sample_rate,
            channels: project.channels,
            channel_layout: project.channel_layout,
            json: Map::new(),
        }
    }
}

/// File resource.
///
/// `json` describes where the media lives (for S3 uploads: `url`, `bucket`
/// and `name`).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct File {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub media: Option<String>,
    pub project: String,
    #[serde(default)]
    pub json: Map<String, Value>,
}

/// File request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewFile {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub media: Option<String>,
    pub project: String,
    pub json: Map<String, Value>,
}

impl File {
    /// Request registering the same media in another project.
    pub fn copy_into(&self, project_url: impl Into<String>) -> NewFile {
        NewFile {
            media: self.media.clone(),
            project: project_url.into(),
            json: self.json.clone(),
        }
    }
}

/// Clip resource.
///
/// `json` carries the clip's keyframed properties (`location_x`, `scale_x`,
/// and so on) in the OpenShot property format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Clip {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub id: Option<i64>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub url: Option<String>,
    /// File resource URL
    pub file: String,
    /// Timeline position in seconds
    pub position: f64,
    /// Trim start in seconds
    pub start: f64,
    /// Trim end in seconds
    pub end: f64,
    pub layer: i64,
    /// Project resource URL
    pub project: String,
    #[serde(default)]
    pub json: Map<String, Value>,
}

impl Clip {
    /// Copy of this clip without its server identity, placed in another
    /// project and reading that project's copy of the media.
    pub fn duplicate_into(&self, project_url: impl Into<String>, file_url: impl Into<String>) -> Self {
        Self {
            id: None,
            url: None,
            project: project_url.into(),
            file: file_url.into(),
            ..self.clone()
        }
    }

    /// Timeline length in seconds.
    pub fn duration(&self) -> f64 {
        (self.end - self.start).max(0.0)
    }
}

/// Export request body.
#[derive(Debug, Clone, Serialize)]
pub struct NewExport {
    pub export_type: String,
    pub video_format: String,
    pub video_codec: String,
    pub video_bitrate: u64,
    pub audio_codec: String,
    pub audio_bitrate: u64,
    pub start_frame: i64,
    pub end_frame: i64,
    pub project: String,
    pub json: Map<String, Value>,
}

impl NewExport {
    /// Video export of `project` trimmed to `[start_frame, end_frame]`.
    pub fn trimmed(
        project: impl Into<String>,
        format: impl Into<String>,
        codec: impl Into<String>,
        start_frame: i64,
        end_frame: i64,
    ) -> Self {
        Self {
            export_type: "video".to_string(),
            video_format: format.into(),
            video_codec: codec.into(),
            video_bitrate: 8_000_000,
            audio_codec: "ac3".to_string(),
            audio_bitrate: 1_920_000,
            start_frame,
            end_frame,
            project: project.into(),
            json: Map::new(),
        }
    }
}

/// Export resource.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Export {
    pub id: i64,
    pub url: String,
    #[serde(default)]
    pub output: Option<String>,
    pub project: String,
    #[serde(default)]
    pub status: Option<String>,
    #[serde(default)]
    pub progress: Option<f64>,
    #[serde(default)]
    pub start_frame: Option<i64>,
    #[serde(default)]
    pub end_frame: Option<i64>,
}

impl From<&Export> for ExportDescriptor {
    fn from(export: &Export) -> Self {
        ExportDescriptor {
            id: export.id.to_string(),
            url: export.url.clone(),
            project_url: Some(export.project.clone()),
            output: export.output.clone(),
            status: export.status.clone(),
        }
    }
}
