//! Completion notifiers.
//!
//! `SnsNotifier` publishes the completion notice to an SNS topic;
//! `LogNotifier` only logs it, for deployments without a topic.

pub mod error;
pub mod sns;

pub use error::{NotifyError, NotifyResult};
pub use sns::{notice_subject, LogNotifier, SnsConfig, SnsNotifier};
