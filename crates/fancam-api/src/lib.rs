//! Webhook server for person-tracking job notifications.
//!
//! This crate provides:
//! - `POST /notifications/rekognition`, which runs one conversion per
//!   completed tracking job
//! - Health and Prometheus metrics endpoints

pub mod config;
pub mod envelope;
pub mod error;
pub mod handlers;
pub mod metrics;
pub mod middleware;
pub mod routes;
pub mod state;

pub use config::ApiConfig;
pub use error::{ApiError, ApiResult};
pub use routes::create_router;
pub use state::{AppState, LiveOrchestratorFactory, OrchestratorFactory};
