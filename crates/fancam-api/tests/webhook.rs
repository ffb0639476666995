//! Webhook integration tests against in-memory collaborators.

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::{to_bytes, Body};
use axum::http::{Request, StatusCode};
use axum::Router;
use serde_json::{json, Value};
use tower::ServiceExt;

use fancam_api::{create_router, ApiConfig, ApiResult, AppState, OrchestratorFactory};
use fancam_models::{
    BoundingBox, CompletionNotice, DetectionJobId, ExportDescriptor, PersonIndex,
    PersonObservation, ResultPage, TrackingKeyframe,
};
use fancam_tracking::{
    CompletionNotifier, ConversionConfig, ConversionOrchestrator, DetectionSource, EditingBackend,
    ExportNotifier, ExportTrigger, TrackingError, TrackingResult,
};

/// Pages addressed by continuation token; token "n" is page n.
struct PagedSource {
    pages: Vec<ResultPage>,
    fail: bool,
}

#[async_trait]
impl DetectionSource for PagedSource {
    async fn get_page(
        &self,
        _job_id: &DetectionJobId,
        _max_results: i32,
        next_token: Option<String>,
    ) -> TrackingResult<ResultPage> {
        if self.fail {
            return Err(TrackingError::page_fetch("throttled"));
        }
        let index: usize = next_token.map(|t| t.parse().unwrap()).unwrap_or(0);
        Ok(self.pages[index].clone())
    }

    fn name(&self) -> &'static str {
        "paged"
    }
}

#[derive(Default)]
struct Recorder {
    keyframes: Mutex<Vec<(PersonIndex, TrackingKeyframe)>>,
    notices: Mutex<Vec<CompletionNotice>>,
}

struct RecordingBackend(Arc<Recorder>);

#[async_trait]
impl EditingBackend for RecordingBackend {
    async fn set_tracking_keyframe(
        &self,
        person: PersonIndex,
        keyframe: &TrackingKeyframe,
    ) -> TrackingResult<()> {
        self.0.keyframes.lock().unwrap().push((person, *keyframe));
        Ok(())
    }

    async fn flush(&self) -> TrackingResult<()> {
        Ok(())
    }
}

#[async_trait]
impl ExportTrigger for RecordingBackend {
    async fn trigger_pending_exports(&self) -> TrackingResult<Vec<ExportDescriptor>> {
        Ok(vec![ExportDescriptor {
            id: "1".to_string(),
            url: "http://openshot/exports/1/".to_string(),
            project_url: Some("http://openshot/projects/1/".to_string()),
            output: None,
            status: Some("pending".to_string()),
        }])
    }
}

#[async_trait]
impl CompletionNotifier for RecordingBackend {
    async fn notify(&self, notice: &CompletionNotice) -> TrackingResult<()> {
        self.0.notices.lock().unwrap().push(notice.clone());
        Ok(())
    }
}

struct TestFactory {
    recorder: Arc<Recorder>,
    fail_pages: bool,
}

impl OrchestratorFactory for TestFactory {
    fn orchestrator(&self) -> ApiResult<ConversionOrchestrator> {
        let bbox = |left| Some(BoundingBox::new(0.1, left, 0.2, 0.5));
        let source = PagedSource {
            pages: vec![
                ResultPage::new(
                    vec![
                        PersonObservation::new(PersonIndex(0), 0.0, bbox(0.1)),
                        PersonObservation::new(PersonIndex(1), 0.0, bbox(0.6)),
                    ],
                    Some("1".to_string()),
                ),
                ResultPage::new(
                    vec![
                        PersonObservation::new(PersonIndex(0), 0.5, bbox(0.2)),
                        PersonObservation::new(PersonIndex(1), 0.5, None),
                    ],
                    None,
                ),
            ],
            fail: self.fail_pages,
        };

        let backend = Arc::new(RecordingBackend(Arc::clone(&self.recorder)));
        let exports = ExportNotifier::new(backend.clone(), backend.clone());
        Ok(ConversionOrchestrator::new(
            Arc::new(source),
            backend,
            exports,
            ConversionConfig::default(),
        ))
    }
}

fn test_router(fail_pages: bool) -> (Router, Arc<Recorder>) {
    let recorder = Arc::new(Recorder::default());
    let factory = TestFactory {
        recorder: Arc::clone(&recorder),
        fail_pages,
    };
    let state = AppState::with_factory(ApiConfig::default(), Arc::new(factory));
    (create_router(state, None), recorder)
}

fn lambda_event(job_id: &str, status: &str) -> Value {
    let message = json!({"JobId": job_id, "Status": status, "API": "StartPersonTracking"});
    json!({"Records": [{"Sns": {"Type": "Notification", "Message": message.to_string()}}]})
}

async fn post_notification(app: Router, body: String) -> (StatusCode, Value) {
    let response = app
        .oneshot(
            Request::builder()
                .method("POST")
                .uri("/notifications/rekognition")
                .header("content-type", "application/json")
                .body(Body::from(body))
                .unwrap(),
        )
        .await
        .unwrap();

    let status = response.status();
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    (status, serde_json::from_slice(&bytes).unwrap())
}

#[tokio::test]
async fn test_health_endpoint() {
    let (app, _) = test_router(false);

    let response = app
        .oneshot(Request::builder().uri("/health").body(Body::empty()).unwrap())
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    assert!(response.headers().contains_key("x-request-id"));
}

#[tokio::test]
async fn test_successful_job_is_processed() {
    let (app, recorder) = test_router(false);

    let (status, body) = post_notification(app, lambda_event("job-42", "SUCCEEDED").to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Processing Successful");
    assert_eq!(body["report"]["job_id"], "job-42");
    assert_eq!(body["report"]["state"], "done");
    assert_eq!(body["report"]["people_count"], 2);
    assert_eq!(body["report"]["pages"], 2);
    assert_eq!(body["report"]["exports"].as_array().unwrap().len(), 1);

    let keyframes = recorder.keyframes.lock().unwrap();
    let person0: Vec<f64> = keyframes
        .iter()
        .filter(|(p, _)| *p == PersonIndex(0))
        .map(|(_, kf)| kf.left)
        .collect();
    assert_eq!(person0, vec![0.1, 0.2]);
    assert_eq!(keyframes.len(), 3);

    let notices = recorder.notices.lock().unwrap();
    assert_eq!(notices.len(), 1);
    assert_eq!(notices[0].people_count, 2);
}

#[tokio::test]
async fn test_direct_sns_delivery_is_accepted() {
    let (app, _) = test_router(false);
    let body = json!({
        "Type": "Notification",
        "MessageId": "m-1",
        "Message": json!({"JobId": "job-7", "Status": "SUCCEEDED"}).to_string()
    });

    let (status, body) = post_notification(app, body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["report"]["job_id"], "job-7");
}

#[tokio::test]
async fn test_failed_job_is_skipped() {
    let (app, recorder) = test_router(false);

    let (status, body) = post_notification(app, lambda_event("job-1", "FAILED").to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Skipped");
    assert!(body.get("report").is_none());
    assert!(recorder.keyframes.lock().unwrap().is_empty());
    assert!(recorder.notices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_subscription_confirmation_is_acknowledged() {
    let (app, recorder) = test_router(false);
    let body = json!({
        "Type": "SubscriptionConfirmation",
        "Message": "You have chosen to subscribe to the topic",
        "SubscribeURL": "https://sns.us-east-1.amazonaws.com/?Action=ConfirmSubscription"
    });

    let (status, body) = post_notification(app, body.to_string()).await;

    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["response"], "Subscription confirmation received");
    assert!(recorder.notices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_malformed_body_is_internal_error() {
    let (app, _) = test_router(false);

    let (status, body) = post_notification(app, "{not json".to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"response": "Internal Server Error"}));
}

#[tokio::test]
async fn test_page_failure_is_internal_error_without_commit() {
    let (app, recorder) = test_router(true);

    let (status, body) = post_notification(app, lambda_event("job-9", "SUCCEEDED").to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body["response"], "Internal Server Error");
    assert!(body.to_string().find("throttled").is_none());
    assert!(recorder.keyframes.lock().unwrap().is_empty());
    assert!(recorder.notices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_oversized_body_is_internal_error() {
    let (app, recorder) = test_router(false);
    let mut event = lambda_event("job-big", "SUCCEEDED");
    event["Padding"] = Value::String("x".repeat(300 * 1024));

    let (status, body) = post_notification(app, event.to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"response": "Internal Server Error"}));
    assert!(recorder.keyframes.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_blank_job_id_is_internal_error() {
    let (app, recorder) = test_router(false);

    let (status, body) = post_notification(app, lambda_event("   ", "SUCCEEDED").to_string()).await;

    assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
    assert_eq!(body, json!({"response": "Internal Server Error"}));
    assert!(recorder.notices.lock().unwrap().is_empty());
}

#[tokio::test]
async fn test_request_id_is_echoed() {
    let (app, _) = test_router(false);

    let response = app
        .oneshot(
            Request::builder()
                .uri("/health")
                .header("X-Request-ID", "sns-delivery-1")
                .body(Body::empty())
                .unwrap(),
        )
        .await
        .unwrap();

    assert_eq!(response.headers()["x-request-id"], "sns-delivery-1");
}
