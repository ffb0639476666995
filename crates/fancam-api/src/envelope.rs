//! Inbound SNS delivery formats.
//!
//! Notifications arrive either as an SNS HTTP(S) subscription delivery, a
//! single envelope with `Type` and `Message`, or as a Lambda-style event
//! wrapping envelopes in `Records[].Sns`. Only the first record is used.

use serde::Deserialize;

use fancam_models::JobCompletionNotification;

use crate::error::{ApiError, ApiResult};

const SUBSCRIPTION_CONFIRMATION: &str = "SubscriptionConfirmation";

/// SNS message envelope.
#[derive(Debug, Clone, Deserialize)]
pub struct SnsEnvelope {
    #[serde(rename = "Type", default)]
    pub kind: Option<String>,
    #[serde(rename = "MessageId", default)]
    pub message_id: Option<String>,
    #[serde(rename = "TopicArn", default)]
    pub topic_arn: Option<String>,
    #[serde(rename = "Message")]
    pub message: String,
    #[serde(rename = "SubscribeURL", default)]
    pub subscribe_url: Option<String>,
}

impl SnsEnvelope {
    pub fn is_subscription_confirmation(&self) -> bool {
        self.kind.as_deref() == Some(SUBSCRIPTION_CONFIRMATION)
    }

    /// Decode the job notification carried in `Message`.
    ///
    /// A blank `JobId` cannot address any job and is rejected here.
    pub fn notification(&self) -> ApiResult<JobCompletionNotification> {
        let notification = JobCompletionNotification::from_message(&self.message)
            .map_err(|e| ApiError::malformed_trigger(format!("invalid message: {}", e)))?;

        if notification.job_id.is_empty() {
            return Err(ApiError::malformed_trigger("message has a blank JobId"));
        }
        Ok(notification)
    }
}

#[derive(Debug, Deserialize)]
struct LambdaRecord {
    #[serde(rename = "Sns", alias = "SNS")]
    sns: SnsEnvelope,
}

#[derive(Debug, Deserialize)]
struct LambdaEvent {
    #[serde(rename = "Records")]
    records: Vec<LambdaRecord>,
}

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum InboundBody {
    Lambda(LambdaEvent),
    Direct(SnsEnvelope),
}

/// Extract the SNS envelope from a request body in either format.
pub fn parse_envelope(body: &[u8]) -> ApiResult<SnsEnvelope> {
    let inbound: InboundBody = serde_json::from_slice(body)
        .map_err(|e| ApiError::malformed_trigger(format!("invalid body: {}", e)))?;

    match inbound {
        InboundBody::Direct(envelope) => Ok(envelope),
        InboundBody::Lambda(event) => event
            .records
            .into_iter()
            .next()
            .map(|record| record.sns)
            .ok_or_else(|| ApiError::malformed_trigger("event has no records")),
    }
}
