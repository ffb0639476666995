//! Tracking editing backend on top of OpenShot.
//!
//! Each tracked person gets a project of their own, shaped like the source
//! project, holding a single duplicate of the source clip. Keyframes pan the
//! clip horizontally (`location_x`) and zoom it (`scale_x`/`scale_y`) so the
//! person stays centred. Edits are staged locally and written with one PUT
//! per clip on `flush`. Each export renders one person's project over the
//! frames where that person was tracked, so no other person's clip is ever
//! composited into it.

use std::collections::BTreeMap;

use async_trait::async_trait;
use tokio::sync::Mutex;
use tracing::{debug, info};

use fancam_models::{ExportDescriptor, InterpolationMode, PersonIndex, TrackingKeyframe};
use fancam_tracking::{EditingBackend, ExportTrigger, TrackingError, TrackingResult};

use crate::client::OpenShotClient;
use crate::clips::{self, ScaleMode, LOCATION_X, SCALE_X, SCALE_Y};
use crate::config::{OpenShotConfig, TrackingFraming};
use crate::error::{OpenShotError, OpenShotResult};
use crate::types::{Clip, File, NewExport, NewProject, Project};

/// Clip-local frame for a video timestamp. Frames are 1-based.
pub fn frame_for(timestamp: f64, fps: f64) -> i64 {
    (timestamp * fps).round() as i64 + 1
}

/// Zoom that makes a box of `width` fill the configured share of the frame.
pub fn scale_for(width: f64, framing: &TrackingFraming) -> f64 {
    if width <= 0.0 {
        return framing.max_scale;
    }
    (framing.fill / width).clamp(1.0, framing.max_scale)
}

/// Horizontal offset that moves `center_x` to the middle of the canvas at `scale`.
pub fn location_x_for(center_x: f64, scale: f64) -> f64 {
    scale * (0.5 - center_x)
}

struct PersonClip {
    project_id: i64,
    project_url: String,
    clip: Clip,
    first_timestamp: f64,
    last_timestamp: f64,
    dirty: bool,
    flushed: bool,
    exported: bool,
}

#[derive(Default)]
struct Session {
    project: Option<Project>,
    source: Option<Clip>,
    source_file: Option<File>,
    clips: BTreeMap<PersonIndex, PersonClip>,
}

/// Editing backend and export trigger for one conversion job.
pub struct OpenShotBackend {
    client: OpenShotClient,
    config: OpenShotConfig,
    session: Mutex<Session>,
}

impl OpenShotBackend {
    pub fn new(config: OpenShotConfig) -> OpenShotResult<Self> {
        Ok(Self {
            client: OpenShotClient::new(&config)?,
            config,
            session: Mutex::new(Session::default()),
        })
    }

    /// Create from environment variables.
    pub fn from_env() -> OpenShotResult<Self> {
        Self::new(OpenShotConfig::from_env()?)
    }

    /// Number of person projects created so far.
    pub async fn clip_count(&self) -> usize {
        self.session.lock().await.clips.len()
    }

    async fn load(&self, session: &mut Session) -> OpenShotResult<(f64, Project, Clip)> {
        if session.project.is_none() {
            let project = self.client.get_project(self.config.project_id).await?;
            info!(
                project_id = project.id,
                fps = project.fps(),
                "Loaded OpenShot project"
            );
            session.project = Some(project);
        }
        if session.source.is_none() {
            session.source = Some(self.client.get_clip(self.config.source_clip_id).await?);
        }

        let project = session
            .project
            .clone()
            .ok_or_else(|| OpenShotError::invalid_response("source project not loaded"))?;
        let fps = project.fps();
        if fps <= 0.0 {
            return Err(OpenShotError::invalid_response("project has no frame rate"));
        }
        let source = session
            .source
            .clone()
            .ok_or_else(|| OpenShotError::invalid_response("source clip not loaded"))?;
        Ok((fps, project, source))
    }

    /// Create the person's project with a copy of the source media and the
    /// duplicated source clip.
    async fn create_person_clip(
        &self,
        session: &mut Session,
        person: PersonIndex,
        source_project: &Project,
        source: &Clip,
    ) -> OpenShotResult<(Project, Clip)> {
        if session.source_file.is_none() {
            session.source_file = Some(self.client.get_file(&source.file).await?);
        }
        let source_file = session
            .source_file
            .as_ref()
            .ok_or_else(|| OpenShotError::invalid_response("source file not loaded"))?;

        let name = match source_project.name.as_str() {
            "" => format!("person {}", person),
            source_name => format!("{} - person {}", source_name, person),
        };
        let project = self
            .client
            .create_project(&NewProject::like(source_project, name))
            .await?;
        let file = self
            .client
            .create_file(project.id, &source_file.copy_into(project.url.clone()))
            .await?;

        let mut clip = source.duplicate_into(project.url.clone(), file.url);
        clips::set_scale_mode(&mut clip, ScaleMode::Crop);
        let created = self.client.create_clip(project.id, &clip).await?;

        debug!(
            person = %person,
            project_id = project.id,
            clip_id = ?created.id,
            "Created person project"
        );
        Ok((project, created))
    }

    async fn stage_keyframe(
        &self,
        person: PersonIndex,
        keyframe: &TrackingKeyframe,
    ) -> OpenShotResult<()> {
        let mut session = self.session.lock().await;
        let (fps, source_project, source) = self.load(&mut session).await?;

        if !session.clips.contains_key(&person) {
            let (project, clip) = self
                .create_person_clip(&mut session, person, &source_project, &source)
                .await?;

            session.clips.insert(
                person,
                PersonClip {
                    project_id: project.id,
                    project_url: project.url,
                    clip,
                    first_timestamp: keyframe.timestamp,
                    last_timestamp: keyframe.timestamp,
                    dirty: false,
                    flushed: false,
                    exported: false,
                },
            );
        }

        let framing = self.config.framing;
        let Some(entry) = session.clips.get_mut(&person) else {
            return Err(OpenShotError::invalid_response("person clip missing"));
        };

        let frame = frame_for(keyframe.timestamp, fps);
        let scale = scale_for(keyframe.width, &framing);
        let location_x = location_x_for(keyframe.center_x(), scale);
        let mode = InterpolationMode::Linear;

        clips::add_property_point(&mut entry.clip, LOCATION_X, frame, location_x, mode)?;
        clips::add_property_point(&mut entry.clip, SCALE_X, frame, scale, mode)?;
        clips::add_property_point(&mut entry.clip, SCALE_Y, frame, scale, mode)?;

        entry.first_timestamp = entry.first_timestamp.min(keyframe.timestamp);
        entry.last_timestamp = entry.last_timestamp.max(keyframe.timestamp);
        entry.dirty = true;
        Ok(())
    }

    async fn write_clips(&self) -> OpenShotResult<usize> {
        let mut session = self.session.lock().await;
        let mut written = 0;

        for (person, entry) in session.clips.iter_mut().filter(|(_, e)| e.dirty) {
            self.client.update_clip(&entry.clip).await?;
            entry.dirty = false;
            entry.flushed = true;
            written += 1;
            debug!(person = %person, "Saved person clip");
        }

        Ok(written)
    }

    async fn export_clips(&self) -> OpenShotResult<Vec<ExportDescriptor>> {
        let mut session = self.session.lock().await;
        let fps = session.project.as_ref().map(Project::fps).unwrap_or_default();
        let mut exports = Vec::new();

        for (person, entry) in session
            .clips
            .iter_mut()
            .filter(|(_, e)| e.flushed && !e.exported)
        {
            let offset = entry.clip.position - entry.clip.start;
            let start_frame = frame_for(offset + entry.first_timestamp, fps).max(1);
            let end_frame = frame_for(offset + entry.last_timestamp, fps).max(start_frame);

            let request = NewExport::trimmed(
                entry.project_url.clone(),
                self.config.export_format.clone(),
                self.config.export_codec.clone(),
                start_frame,
                end_frame,
            );
            let export = self.client.create_export(entry.project_id, &request).await?;
            entry.exported = true;

            info!(
                person = %person,
                project_id = entry.project_id,
                export_id = export.id,
                start_frame,
                end_frame,
                "Triggered trimmed export"
            );
            exports.push(ExportDescriptor::from(&export));
        }

        Ok(exports)
    }
}

#[async_trait]
impl EditingBackend for OpenShotBackend {
    async fn set_tracking_keyframe(
        &self,
        person: PersonIndex,
        keyframe: &TrackingKeyframe,
    ) -> TrackingResult<()> {
        self.stage_keyframe(person, keyframe)
            .await
            .map_err(|e| TrackingError::commit(format!("person {}: {}", person, e)))
    }

    async fn flush(&self) -> TrackingResult<()> {
        let written = self
            .write_clips()
            .await
            .map_err(|e| TrackingError::commit(e.to_string()))?;
        info!(clips = written, "Flushed person clips");
        Ok(())
    }
}

#[async_trait]
impl ExportTrigger for OpenShotBackend {
    async fn trigger_pending_exports(&self) -> TrackingResult<Vec<ExportDescriptor>> {
        self.export_clips()
            .await
            .map_err(|e| TrackingError::export_trigger(e.to_string()))
    }
}
