//! Application state.

use std::sync::Arc;

use tracing::{info, warn};

use fancam_notify::{LogNotifier, SnsConfig, SnsNotifier};
use fancam_openshot::{OpenShotBackend, OpenShotConfig};
use fancam_rekognition::RekognitionSource;
use fancam_tracking::{
    CompletionNotifier, ConversionConfig, ConversionOrchestrator, DetectionSource, ExportNotifier,
};

use crate::config::ApiConfig;
use crate::error::ApiResult;

/// Builds one orchestrator per job.
///
/// Editing state is per job, so implementations must not hand out
/// orchestrators that share a backend across concurrent requests.
pub trait OrchestratorFactory: Send + Sync {
    fn orchestrator(&self) -> ApiResult<ConversionOrchestrator>;
}

/// Factory wired to Rekognition, OpenShot and the configured notifier.
pub struct LiveOrchestratorFactory {
    source: Arc<dyn DetectionSource>,
    notifier: Arc<dyn CompletionNotifier>,
    openshot: OpenShotConfig,
    conversion: ConversionConfig,
}

impl LiveOrchestratorFactory {
    pub fn new(
        source: Arc<dyn DetectionSource>,
        notifier: Arc<dyn CompletionNotifier>,
        openshot: OpenShotConfig,
        conversion: ConversionConfig,
    ) -> Self {
        Self {
            source,
            notifier,
            openshot,
            conversion,
        }
    }

    /// Create from environment variables.
    pub async fn from_env() -> anyhow::Result<Self> {
        let source = RekognitionSource::from_env().await?;
        let openshot = OpenShotConfig::from_env()?;
        let conversion = ConversionConfig::from_env()?;

        let notifier: Arc<dyn CompletionNotifier> = match SnsConfig::from_env() {
            Some(sns) => Arc::new(SnsNotifier::new(sns).await?),
            None => {
                warn!("SNS_TOPIC_ARN not set, completion notices will only be logged");
                Arc::new(LogNotifier)
            }
        };

        info!(
            page_size = conversion.page_size,
            project_id = openshot.project_id,
            source_clip_id = openshot.source_clip_id,
            "Conversion pipeline configured"
        );

        Ok(Self::new(Arc::new(source), notifier, openshot, conversion))
    }
}

impl OrchestratorFactory for LiveOrchestratorFactory {
    fn orchestrator(&self) -> ApiResult<ConversionOrchestrator> {
        let backend = Arc::new(OpenShotBackend::new(self.openshot.clone())?);
        let exports = ExportNotifier::new(backend.clone(), Arc::clone(&self.notifier));

        Ok(ConversionOrchestrator::new(
            Arc::clone(&self.source),
            backend,
            exports,
            self.conversion.clone(),
        ))
    }
}

/// Shared application state.
#[derive(Clone)]
pub struct AppState {
    pub config: ApiConfig,
    pub factory: Arc<dyn OrchestratorFactory>,
}

impl AppState {
    /// Create new application state from the environment.
    pub async fn new(config: ApiConfig) -> anyhow::Result<Self> {
        let factory = LiveOrchestratorFactory::from_env().await?;
        Ok(Self::with_factory(config, Arc::new(factory)))
    }

    pub fn with_factory(config: ApiConfig, factory: Arc<dyn OrchestratorFactory>) -> Self {
        Self { config, factory }
    }
}
