// Drives HttpTransport and LottoApi against a throwaway axum backend.
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::IntoResponse;
use axum::routing::{get, post};
use axum::{Json, Router};
use lotto_event::{
    ApiError, BearerAuth, HttpTransport, LottoApi, ParticipateRequest, RequestInterceptor,
    ResultCheckRequest, Transport, TransportError,
};
use serde_json::{Value, json};
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::time::Duration;

#[derive(Clone, Default)]
struct Hits(Arc<AtomicUsize>);

impl Hits {
    fn count(&self) -> usize {
        self.0.load(Ordering::SeqCst)
    }
}

async fn open_period(State(hits): State<Hits>) -> impl IntoResponse {
    hits.0.fetch_add(1, Ordering::SeqCst);
    Json(json!({ "success": true, "data": null, "error": null }))
}

async fn closed_announce() -> impl IntoResponse {
    (
        StatusCode::BAD_REQUEST,
        Json(json!({
            "success": false,
            "data": null,
            "error": { "code": "ANNOUNCE_NOT_ACTIVE", "message": "results are not announced" }
        })),
    )
}

async fn participate(headers: HeaderMap, Json(body): Json<Value>) -> impl IntoResponse {
    let content_type = headers
        .get("content-type")
        .and_then(|v| v.to_str().ok())
        .unwrap_or_default()
        .to_string();
    let auth = headers
        .get("authorization")
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    if body["phone"] == "010-9999-9999" {
        return (
            StatusCode::BAD_REQUEST,
            Json(json!({
                "success": false,
                "data": null,
                "error": { "code": "DUPLICATE_PARTICIPATION", "message": "already joined" }
            })),
        );
    }

    (
        StatusCode::OK,
        Json(json!({
            "success": true,
            "data": { "participantId": 42, "lottoNumber": "LT-0042" },
            "error": null,
            "echo": { "contentType": content_type, "authorization": auth }
        })),
    )
}

async fn check_result() -> impl IntoResponse {
    Json(json!({
        "success": false,
        "data": null,
        "error": { "code": "NOT_FOUND", "message": "no participation found" }
    }))
}

async fn bad_gateway() -> impl IntoResponse {
    (StatusCode::BAD_GATEWAY, "upstream down")
}

async fn slow() -> impl IntoResponse {
    tokio::time::sleep(Duration::from_secs(2)).await;
    Json(json!({ "success": true, "data": null, "error": null }))
}

async fn spawn_backend(hits: Hits) -> String {
    let app = Router::new()
        .route("/api/participations/check-period", get(open_period))
        .route("/api/results/check-period", get(closed_announce))
        .route("/api/participations", post(participate))
        .route("/api/results/check", post(check_result))
        .route("/api/broken", get(bad_gateway))
        .route("/api/slow", get(slow))
        .with_state(hits);

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });
    format!("http://{}/api", addr)
}

// Backend that answers every call with a bare `200 OK` text body.
async fn spawn_plain_backend() -> String {
    let app = Router::new()
        .route("/api/participations/check-period", get(|| async { "OK" }))
        .route("/api/results/check-period", get(|| async { "OK" }))
        .route("/api/participations", post(|| async { "OK" }));

    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind ephemeral test port");
    let addr = listener.local_addr().expect("get local addr");
    tokio::spawn(async move {
        axum::serve(listener, app).await.expect("server failed");
    });
    format!("http://{}/api", addr)
}

fn transport(base_url: &str) -> HttpTransport {
    HttpTransport::new(base_url, Duration::from_secs(10)).expect("client builds")
}

#[tokio::test]
async fn successful_body_is_returned_directly() {
    let base_url = spawn_backend(Hits::default()).await;
    let body = transport(&base_url)
        .post("/participations", json!({ "phone": "010-1234-5678" }))
        .await
        .unwrap();

    assert_eq!(body["success"], true);
    assert_eq!(body["data"]["participantId"], 42);
    assert_eq!(body["echo"]["contentType"], "application/json");
    assert_eq!(body["echo"]["authorization"], Value::Null);
}

#[tokio::test]
async fn structured_error_body_becomes_domain_error() {
    let base_url = spawn_backend(Hits::default()).await;
    let err = transport(&base_url)
        .post("/participations", json!({ "phone": "010-9999-9999" }))
        .await
        .unwrap_err();

    match err {
        ApiError::Domain { code, message } => {
            assert_eq!(code, "DUPLICATE_PARTICIPATION");
            assert_eq!(message, "already joined");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn unstructured_error_is_a_status_failure() {
    let base_url = spawn_backend(Hits::default()).await;
    let err = transport(&base_url).get("/broken").await.unwrap_err();

    match err {
        ApiError::Transport(TransportError::Status { status, body }) => {
            assert_eq!(status.as_u16(), 502);
            assert_eq!(body, "upstream down");
        }
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn slow_backend_times_out() {
    let base_url = spawn_backend(Hits::default()).await;
    let transport =
        HttpTransport::new(base_url, Duration::from_millis(200)).expect("client builds");
    let err = transport.get("/slow").await.unwrap_err();

    match err {
        ApiError::Transport(TransportError::Request(e)) => assert!(e.is_timeout()),
        other => panic!("unexpected error: {other:?}"),
    }
}

#[tokio::test]
async fn connection_refused_is_a_request_failure() {
    let listener = std::net::TcpListener::bind("127.0.0.1:0").expect("bind");
    let addr = listener.local_addr().expect("addr");
    drop(listener);

    let err = transport(&format!("http://{}/api", addr))
        .get("/participations/check-period")
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Request(_))));
}

#[tokio::test]
async fn bearer_interceptor_attaches_header() {
    let base_url = spawn_backend(Hits::default()).await;
    let body = transport(&base_url)
        .with_interceptor(BearerAuth::new("secret-token"))
        .post("/participations", json!({ "phone": "010-1234-5678" }))
        .await
        .unwrap();

    assert_eq!(body["echo"]["authorization"], "Bearer secret-token");
}

struct Reject;

impl RequestInterceptor for Reject {
    fn intercept(
        &self,
        _request: reqwest::RequestBuilder,
    ) -> Result<reqwest::RequestBuilder, ApiError> {
        Err(TransportError::InvalidRequest("no session".to_string()).into())
    }
}

#[tokio::test]
async fn rejected_request_is_never_sent() {
    let hits = Hits::default();
    let base_url = spawn_backend(hits.clone()).await;
    let err = transport(&base_url)
        .with_interceptor(Reject)
        .get("/participations/check-period")
        .await
        .unwrap_err();

    assert!(matches!(
        err,
        ApiError::Transport(TransportError::InvalidRequest(_))
    ));
    assert_eq!(hits.count(), 0);
}

#[tokio::test]
async fn api_end_to_end() {
    let hits = Hits::default();
    let base_url = spawn_backend(hits.clone()).await;
    let api = LottoApi::new(transport(&base_url));

    assert!(api.check_event_active().await.unwrap());
    assert_eq!(hits.count(), 1);
    assert!(!api.check_announce_active().await.unwrap());

    let joined = api
        .participate(&ParticipateRequest {
            phone: "010-1234-5678".to_string(),
        })
        .await
        .unwrap();
    assert_eq!(joined.participant_id, 42);
    assert_eq!(joined.lotto_number, "LT-0042");

    let err = api
        .check_result(&ResultCheckRequest {
            phone: "010-0000-0000".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Business { .. }));
    assert_eq!(err.to_string(), "no participation found");
}

#[tokio::test]
async fn plain_text_success_keeps_periods_open() {
    let base_url = spawn_plain_backend().await;
    let body = transport(&base_url)
        .get("/participations/check-period")
        .await
        .unwrap();
    assert_eq!(body, Value::String("OK".to_string()));

    let api = LottoApi::new(transport(&base_url));
    assert!(api.check_event_active().await.unwrap());
    assert!(api.check_announce_active().await.unwrap());
}

#[tokio::test]
async fn plain_text_success_is_not_an_envelope() {
    let base_url = spawn_plain_backend().await;
    let api = LottoApi::new(transport(&base_url));
    let err = api
        .participate(&ParticipateRequest {
            phone: "010-1234-5678".to_string(),
        })
        .await
        .unwrap_err();
    assert!(matches!(err, ApiError::Transport(TransportError::Decode(_))));
}
