//! Person-tracking job notification handler.

use axum::body::Bytes;
use axum::extract::rejection::BytesRejection;
use axum::extract::State;
use axum::Json;
use serde::Serialize;
use tracing::{info, warn};

use fancam_tracking::ConversionReport;

use crate::envelope::parse_envelope;
use crate::error::{ApiError, ApiResult};
use crate::metrics;
use crate::state::AppState;

pub const PROCESSING_SUCCESSFUL: &str = "Processing Successful";
pub const SKIPPED: &str = "Skipped";
pub const SUBSCRIPTION_RECEIVED: &str = "Subscription confirmation received";

/// Notification response.
#[derive(Debug, Serialize)]
pub struct NotificationResponse {
    pub response: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub report: Option<ConversionReport>,
}

impl NotificationResponse {
    fn message(response: &'static str) -> Self {
        Self {
            response,
            report: None,
        }
    }
}

/// Run one conversion for a completed person-tracking job.
///
/// Jobs that did not succeed are acknowledged without processing so the
/// topic does not redeliver them. Bodies that cannot be read, including
/// ones over the configured limit, are malformed triggers.
pub async fn rekognition_notification(
    State(state): State<AppState>,
    body: Result<Bytes, BytesRejection>,
) -> ApiResult<Json<NotificationResponse>> {
    let body = body
        .map_err(|e| ApiError::malformed_trigger(format!("unreadable body: {}", e)))
        .inspect_err(|_| metrics::record_notification("malformed"))?;
    let envelope = parse_envelope(&body).inspect_err(|_| metrics::record_notification("malformed"))?;

    if envelope.is_subscription_confirmation() {
        info!(
            topic = envelope.topic_arn.as_deref().unwrap_or("-"),
            subscribe_url = envelope.subscribe_url.as_deref().unwrap_or("-"),
            "Received SNS subscription confirmation"
        );
        metrics::record_notification("subscription");
        return Ok(Json(NotificationResponse::message(SUBSCRIPTION_RECEIVED)));
    }

    let notification = envelope
        .notification()
        .inspect_err(|_| metrics::record_notification("malformed"))?;

    if !notification.should_process() {
        warn!(
            job_id = %notification.job_id,
            status = notification.status.as_str(),
            "Skipping notification for unsuccessful job"
        );
        metrics::record_notification("skipped");
        return Ok(Json(NotificationResponse::message(SKIPPED)));
    }

    info!(
        job_id = %notification.job_id,
        api = notification.api.as_deref().unwrap_or("-"),
        message_id = envelope.message_id.as_deref().unwrap_or("-"),
        "Processing person-tracking job"
    );

    let orchestrator = state.factory.orchestrator()?;
    let report = orchestrator
        .process(&notification.job_id)
        .await
        .inspect_err(|_| metrics::record_notification("failed"))?;

    metrics::record_notification("processed");
    Ok(Json(NotificationResponse {
        response: PROCESSING_SUCCESSFUL,
        report: Some(report),
    }))
}
