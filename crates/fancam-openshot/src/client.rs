//! OpenShot Cloud API HTTP client.

use std::time::Duration;

use reqwest::{Client, RequestBuilder, Response};
use serde::de::DeserializeOwned;
use tracing::{debug, warn};

use crate::config::OpenShotConfig;
use crate::error::{OpenShotError, OpenShotResult};
use crate::types::{Clip, Export, File, NewExport, NewFile, NewProject, Project};

/// Client for the OpenShot Cloud API.
#[derive(Clone)]
pub struct OpenShotClient {
    http: Client,
    base_url: String,
    username: String,
    password: String,
    max_retries: u32,
}

impl OpenShotClient {
    /// Create a new client.
    pub fn new(config: &OpenShotConfig) -> OpenShotResult<Self> {
        config.validate()?;

        let http = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(OpenShotError::Network)?;

        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
            username: config.username.clone(),
            password: config.password.clone(),
            max_retries: config.max_retries,
        })
    }

    /// Resource URL of a project, as used in clip and export bodies.
    pub fn project_url(&self, project_id: i64) -> String {
        format!("{}/projects/{}/", self.base_url, project_id)
    }

    fn clip_url(&self, clip_id: i64) -> String {
        format!("{}/clips/{}/", self.base_url, clip_id)
    }

    pub async fn get_project(&self, project_id: i64) -> OpenShotResult<Project> {
        let url = self.project_url(project_id);
        self.with_retry(|| self.send_json(self.http.get(&url))).await
    }

    /// Create an empty project.
    pub async fn create_project(&self, project: &NewProject) -> OpenShotResult<Project> {
        let url = format!("{}/projects/", self.base_url);
        debug!("Creating project {:?}", project.name);
        self.send_json(self.http.post(&url).json(project)).await
    }

    /// Fetch a file by its resource URL.
    pub async fn get_file(&self, file_url: &str) -> OpenShotResult<File> {
        self.with_retry(|| self.send_json(self.http.get(file_url))).await
    }

    /// Register media in a project.
    pub async fn create_file(&self, project_id: i64, file: &NewFile) -> OpenShotResult<File> {
        let url = format!("{}files/", self.project_url(project_id));
        self.send_json(self.http.post(&url).json(file)).await
    }

    pub async fn get_clip(&self, clip_id: i64) -> OpenShotResult<Clip> {
        let url = self.clip_url(clip_id);
        self.with_retry(|| self.send_json(self.http.get(&url))).await
    }

    /// Create a clip in a project, returning it with its server identity.
    pub async fn create_clip(&self, project_id: i64, clip: &Clip) -> OpenShotResult<Clip> {
        let url = format!("{}clips/", self.project_url(project_id));
        debug!("Creating clip on layer {} at {}", clip.layer, url);
        self.send_json(self.http.post(&url).json(clip)).await
    }

    /// Replace a clip's state.
    pub async fn update_clip(&self, clip: &Clip) -> OpenShotResult<Clip> {
        let clip_id = clip
            .id
            .ok_or_else(|| OpenShotError::invalid_response("clip has no id"))?;
        let url = self.clip_url(clip_id);
        self.with_retry(|| self.send_json(self.http.put(&url).json(clip)))
            .await
    }

    /// Queue an export of a project.
    pub async fn create_export(
        &self,
        project_id: i64,
        export: &NewExport,
    ) -> OpenShotResult<Export> {
        let url = format!("{}exports/", self.project_url(project_id));
        debug!(
            "Creating export of frames {}..={} at {}",
            export.start_frame, export.end_frame, url
        );
        self.send_json(self.http.post(&url).json(export)).await
    }

    async fn send_json<T: DeserializeOwned>(&self, request: RequestBuilder) -> OpenShotResult<T> {
        let response = request
            .basic_auth(&self.username, Some(&self.password))
            .send()
            .await?;
        let response = check_status(response).await?;
        Ok(response.json().await?)
    }

    /// Execute with retry logic.
    async fn with_retry<F, Fut, T>(&self, operation: F) -> OpenShotResult<T>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = OpenShotResult<T>>,
    {
        let mut attempt = 0;
        loop {
            match operation().await {
                Err(e) if e.is_retryable() && attempt < self.max_retries => {
                    let delay = Duration::from_millis(500 * 2u64.pow(attempt));
                    warn!(
                        "OpenShot request failed (attempt {}), retrying in {:?}: {}",
                        attempt + 1,
                        delay,
                        e
                    );
                    tokio::time::sleep(delay).await;
                    attempt += 1;
                }
                result => return result,
            }
        }
    }
}

async fn check_status(response: Response) -> OpenShotResult<Response> {
    let status = response.status();
    if status.is_success() {
        return Ok(response);
    }
    let body = response.text().await.unwrap_or_default();
    Err(OpenShotError::from_status(status.as_u16(), body))
}
