use std::collections::VecDeque;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use http::StatusCode;
use rstest::rstest;
use serde::Deserialize;
use serde_json::{Value, json};

use super::*;
use crate::events::ERROR_EVENT;

const URL: &str = "http://www.test.com/graphql";
const GQL: &str = "{ app { ping } }";

#[derive(Debug, Clone)]
struct RecordedRequest {
    method: http::Method,
    uri: http::Uri,
    headers: http::HeaderMap,
    body: String,
}

// In-memory transport: records requests, replays canned responses
#[derive(Debug, Clone, Default)]
struct RecordingTransport {
    responses: Arc<Mutex<VecDeque<Result<http::Response<String>, TransportError>>>>,
    requests: Arc<Mutex<Vec<RecordedRequest>>>,
}

impl RecordingTransport {
    fn respond(self, status: u16, body: &str) -> Self {
        let mut response = http::Response::new(body.to_string());
        *response.status_mut() = StatusCode::from_u16(status).expect("valid status");
        response.headers_mut().insert(
            http::header::CONTENT_TYPE,
            http::HeaderValue::from_static("application/json"),
        );
        self.responses
            .lock()
            .expect("lock")
            .push_back(Ok(response));
        self
    }

    fn respond_json(self, body: &Value) -> Self {
        self.respond(200, &body.to_string())
    }

    fn fail(self, message: &str) -> Self {
        self.responses
            .lock()
            .expect("lock")
            .push_back(Err(TransportError::Connection {
                message: message.to_string(),
            }));
        self
    }

    fn requests(&self) -> Vec<RecordedRequest> {
        self.requests.lock().expect("lock").clone()
    }

    fn last_request(&self) -> RecordedRequest {
        self.requests().pop().expect("a request should have been sent")
    }
}

impl Transport for RecordingTransport {
    async fn send(
        &self,
        request: http::Request<String>,
    ) -> Result<http::Response<String>, TransportError> {
        let (parts, body) = request.into_parts();
        self.requests.lock().expect("lock").push(RecordedRequest {
            method: parts.method,
            uri: parts.uri,
            headers: parts.headers,
            body,
        });
        self.responses
            .lock()
            .expect("lock")
            .pop_front()
            .unwrap_or_else(|| {
                Err(TransportError::Connection {
                    message: "no response prepared".to_string(),
                })
            })
    }
}

fn hunter(transport: &RecordingTransport) -> Hunter<RecordingTransport> {
    Hunter::builder().with_transport(transport.clone()).build()
}

fn error_counter(hunter: &Hunter<RecordingTransport>) -> Arc<AtomicUsize> {
    let count = Arc::new(AtomicUsize::new(0));
    hunter.on(ERROR_EVENT, {
        let count = Arc::clone(&count);
        move |_: &ApiError| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    });
    count
}

fn errors_envelope() -> Value {
    json!({"errors": [{"name": "Test Error", "message": "test_error"}]})
}

#[rstest]
#[case::query(OperationKind::Query)]
#[case::mutation(OperationKind::Mutation)]
#[tokio::test]
async fn should_get_a_successful_response(#[case] kind: OperationKind) {
    let transport = RecordingTransport::default().respond_json(&json!({"data": {"hello": "world"}}));
    let hunter = hunter(&transport);

    let data = hunter.operation(kind, URL, GQL).await.expect("should succeed");

    assert_eq!(data, json!({"hello": "world"}));
}

#[rstest]
#[case::query(OperationKind::Query)]
#[case::mutation(OperationKind::Mutation)]
#[tokio::test]
async fn should_send_post_with_json_body(#[case] kind: OperationKind) {
    let transport = RecordingTransport::default().respond_json(&json!({"data": {}}));
    let hunter = hunter(&transport);

    hunter.operation(kind, URL, GQL).await.expect("should succeed");

    let request = transport.last_request();
    assert_eq!(request.method, http::Method::POST);
    assert_eq!(request.uri, URL);
    assert_eq!(request.headers["content-type"], "application/json");
    assert!(request.headers.get("authorization").is_none());
    let body: Value = serde_json::from_str(&request.body).expect("json body");
    assert_eq!(body, json!({"query": GQL}));
}

#[rstest]
#[case::query(OperationKind::Query)]
#[case::mutation(OperationKind::Mutation)]
#[tokio::test]
async fn should_send_a_token(#[case] kind: OperationKind) {
    let token = "test_token";
    let transport = RecordingTransport::default().respond_json(&json!({"data": {}}));
    let hunter = hunter(&transport);

    hunter
        .operation(kind, URL, GQL)
        .with_token(token)
        .await
        .expect("should succeed");

    let request = transport.last_request();
    assert_eq!(request.headers["authorization"], format!("Bearer {token}"));
}

#[tokio::test]
async fn should_send_options_and_default_headers() {
    let transport = RecordingTransport::default().respond_json(&json!({"data": {}}));
    let hunter = Hunter::builder()
        .with_transport(transport.clone())
        .with_default_header("X-Client", "rip-hunter")
        .expect("valid header")
        .with_default_header("X-Tenant", "default")
        .expect("valid header")
        .build();
    let options = CallOptions::new()
        .with_token("test_token")
        .with_header("X-Tenant", "acme");

    hunter
        .query(URL, GQL)
        .with_options(options)
        .await
        .expect("should succeed");

    let headers = transport.last_request().headers;
    assert_eq!(headers["x-client"], "rip-hunter");
    assert_eq!(headers["x-tenant"], "acme");
    assert_eq!(headers["authorization"], "Bearer test_token");
}

#[rstest]
#[case::query(OperationKind::Query)]
#[case::mutation(OperationKind::Mutation)]
#[tokio::test]
async fn should_get_an_error(#[case] kind: OperationKind) {
    let transport = RecordingTransport::default().respond_json(&errors_envelope());
    let hunter = hunter(&transport);

    let result = hunter.operation(kind, URL, GQL).await;

    let Err(error) = result else {
        panic!("an errors envelope should fail");
    };
    let api_error = error.api_error().expect("should be an API error");
    assert_eq!(
        api_error.errors().first().map(String::as_str),
        Some("test_error")
    );
    assert_eq!(error.to_string(), "GraphQL API error: test_error");
}

#[rstest]
#[case::query(OperationKind::Query)]
#[case::mutation(OperationKind::Mutation)]
#[tokio::test]
async fn should_emit_an_error_event(#[case] kind: OperationKind) {
    let transport = RecordingTransport::default().respond_json(&errors_envelope());
    let hunter = hunter(&transport);
    let received = Arc::new(Mutex::new(Vec::new()));
    hunter.on(ERROR_EVENT, {
        let received = Arc::clone(&received);
        move |error: &ApiError| received.lock().expect("lock").push(error.clone())
    });

    let result = hunter.operation(kind, URL, GQL).await;

    assert!(result.is_err());
    let received = received.lock().expect("lock").clone();
    assert_eq!(received, vec![ApiError::new(vec!["test_error".to_string()])]);
}

#[tokio::test]
async fn should_emit_once_per_failing_call_for_every_listener() {
    let transport = RecordingTransport::default()
        .respond_json(&errors_envelope())
        .respond_json(&errors_envelope());
    let hunter = hunter(&transport);
    let first = error_counter(&hunter);
    let second = error_counter(&hunter);

    let _ = hunter.query(URL, GQL).await;
    let _ = hunter.mutation(URL, GQL).await;

    assert_eq!(first.load(Ordering::SeqCst), 2);
    assert_eq!(second.load(Ordering::SeqCst), 2);
}

#[tokio::test]
async fn should_fail_without_listeners() {
    let transport = RecordingTransport::default().respond_json(&errors_envelope());
    let hunter = hunter(&transport);

    let result = hunter.query(URL, GQL).await;

    assert!(matches!(result, Err(HunterError::Api(_))));
}

#[tokio::test]
async fn should_not_emit_after_listener_removed() {
    let transport = RecordingTransport::default().respond_json(&errors_envelope());
    let hunter = hunter(&transport);
    let count = Arc::new(AtomicUsize::new(0));
    let id = hunter.on(ERROR_EVENT, {
        let count = Arc::clone(&count);
        move |_: &ApiError| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    });

    assert!(hunter.off(id));
    let _ = hunter.query(URL, GQL).await;

    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn should_emit_on_shared_event_bus() {
    let events = crate::EventBus::<ApiError>::new();
    let count = Arc::new(AtomicUsize::new(0));
    events.on(ERROR_EVENT, {
        let count = Arc::clone(&count);
        move |_: &ApiError| {
            count.fetch_add(1, Ordering::SeqCst);
        }
    });
    let transport = RecordingTransport::default().respond_json(&errors_envelope());
    let hunter = Hunter::builder()
        .with_transport(transport)
        .with_event_bus(events)
        .build();

    let _ = hunter.query(URL, GQL).await;

    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn should_fail_with_api_error_on_error_status_with_envelope() {
    let transport = RecordingTransport::default().respond(400, &errors_envelope().to_string());
    let hunter = hunter(&transport);
    let count = error_counter(&hunter);

    let result = hunter.query(URL, GQL).await;

    assert!(matches!(result, Err(HunterError::Api(_))));
    assert_eq!(count.load(Ordering::SeqCst), 1);
}

#[tokio::test]
async fn should_propagate_transport_failure_without_event() {
    let transport = RecordingTransport::default().fail("connection refused");
    let hunter = hunter(&transport);
    let count = error_counter(&hunter);

    let result = hunter.query(URL, GQL).await;

    let Err(error) = result else {
        panic!("a transport failure should fail");
    };
    assert!(matches!(error, HunterError::Transport(_)));
    assert!(error.api_error().is_none());
    insta::assert_snapshot!(error, @"Connection failed: connection refused");
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn should_reject_non_json_body() {
    let transport = RecordingTransport::default().respond(200, "<html>oops</html>");
    let hunter = hunter(&transport);
    let count = error_counter(&hunter);

    let result = hunter.query(URL, GQL).await;

    let Err(HunterError::InvalidJson { endpoint, body, .. }) = result else {
        panic!("a non JSON body should be rejected");
    };
    assert_eq!(endpoint, URL);
    assert_eq!(body, "<html>oops</html>");
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[rstest]
#[case::plain_text(502, "Bad Gateway")]
#[case::json_without_errors(503, r#"{"message": "maintenance"}"#)]
#[tokio::test]
async fn should_reject_unexpected_status(#[case] status: u16, #[case] body: &str) {
    let transport = RecordingTransport::default().respond(status, body);
    let hunter = hunter(&transport);
    let count = error_counter(&hunter);

    let result = hunter.query(URL, GQL).await;

    let Err(HunterError::UnexpectedStatusCode {
        status_code,
        body: received,
    }) = result
    else {
        panic!("status {status} should be rejected");
    };
    assert_eq!(status_code, status);
    assert_eq!(received, body);
    assert_eq!(count.load(Ordering::SeqCst), 0);
}

#[tokio::test]
async fn should_resolve_null_when_data_is_missing() {
    let transport = RecordingTransport::default().respond_json(&json!({"errors": []}));
    let hunter = hunter(&transport);

    let data = hunter.query(URL, GQL).await.expect("should succeed");

    assert_eq!(data, Value::Null);
}

#[tokio::test]
async fn should_not_send_with_invalid_endpoint() {
    let transport = RecordingTransport::default();
    let hunter = hunter(&transport);

    let result = hunter.query("not a url", GQL).await;

    assert!(matches!(result, Err(HunterError::UrlError(_))));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn should_not_send_with_invalid_token() {
    let transport = RecordingTransport::default();
    let hunter = hunter(&transport);

    let result = hunter.query(URL, GQL).with_token("bad\ntoken").await;

    assert!(matches!(result, Err(HunterError::Authentication(_))));
    assert!(transport.requests().is_empty());
}

#[tokio::test]
async fn should_compact_operation_when_configured() {
    let transport = RecordingTransport::default().respond_json(&json!({"data": {}}));
    let hunter = Hunter::builder()
        .with_transport(transport.clone())
        .with_compact_operations(true)
        .build();

    hunter
        .query(URL, r#"{ user(name: "rip hunter") { id } }"#)
        .await
        .expect("should succeed");

    let body: Value = serde_json::from_str(&transport.last_request().body).expect("json body");
    assert_eq!(body, json!({"query": r#"{user(name:"rip hunter"){id}}"#}));
}

#[derive(Debug, Deserialize, PartialEq)]
struct Hello {
    hello: String,
}

#[tokio::test]
async fn should_decode_typed_data() {
    let transport = RecordingTransport::default().respond_json(&json!({"data": {"hello": "world"}}));
    let hunter = hunter(&transport);

    let data: Hello = hunter.query(URL, GQL).data().await.expect("should succeed");

    assert_eq!(
        data,
        Hello {
            hello: "world".to_string()
        }
    );
}

#[tokio::test]
async fn should_report_path_of_mismatched_data() {
    #[derive(Debug, Deserialize)]
    #[allow(dead_code)]
    struct Users {
        users: Vec<Hello>,
    }

    let transport = RecordingTransport::default()
        .respond_json(&json!({"data": {"users": [{"hello": "world"}, {"hello": 42}]}}));
    let hunter = hunter(&transport);

    let result = hunter.query(URL, GQL).data::<Users>().await;

    let Err(error) = result else {
        panic!("mismatched data should fail");
    };
    assert!(matches!(error, HunterError::DataDeserialization { .. }));
    assert!(error.to_string().starts_with("Failed to deserialize GraphQL data at 'users[1].hello'"));
}

#[tokio::test]
async fn should_share_client_between_tasks() {
    let transport = RecordingTransport::default()
        .respond_json(&json!({"data": {"n": 1}}))
        .respond_json(&json!({"data": {"n": 1}}));
    let hunter = Arc::new(hunter(&transport));

    let handles = (0..2)
        .map(|_| {
            let hunter = Arc::clone(&hunter);
            tokio::spawn(async move { hunter.query(URL, GQL).await })
        })
        .collect::<Vec<_>>();

    for handle in handles {
        let data = handle.await.expect("task").expect("should succeed");
        assert_eq!(data, json!({"n": 1}));
    }
    assert_eq!(transport.requests().len(), 2);
}
