//! API error types.
//!
//! Every failure on the notification route answers 500 with the same
//! generic body; details go to the log only.

use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde::Serialize;
use thiserror::Error;
use tracing::error;

use fancam_openshot::OpenShotError;
use fancam_tracking::ConversionFailure;

pub type ApiResult<T> = Result<T, ApiError>;

pub const INTERNAL_SERVER_ERROR: &str = "Internal Server Error";

#[derive(Debug, Error)]
pub enum ApiError {
    #[error("Malformed trigger: {0}")]
    MalformedTrigger(String),

    #[error("Conversion failed: {0}")]
    Conversion(#[from] ConversionFailure),

    #[error("OpenShot error: {0}")]
    OpenShot(#[from] OpenShotError),
}

impl ApiError {
    pub fn malformed_trigger(msg: impl Into<String>) -> Self {
        Self::MalformedTrigger(msg.into())
    }

    pub fn kind(&self) -> &'static str {
        match self {
            ApiError::MalformedTrigger(_) => "malformed_trigger",
            ApiError::Conversion(_) => "conversion_failed",
            ApiError::OpenShot(_) => "openshot",
        }
    }
}

#[derive(Serialize)]
struct ErrorResponse {
    response: &'static str,
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        error!(kind = self.kind(), "{}", self);

        let body = ErrorResponse {
            response: INTERNAL_SERVER_ERROR,
        };
        (StatusCode::INTERNAL_SERVER_ERROR, Json(body)).into_response()
    }
}
