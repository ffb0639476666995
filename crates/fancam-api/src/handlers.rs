//! HTTP handlers.

pub mod health;
pub mod notifications;

pub use health::health;
pub use notifications::rekognition_notification;
