use std::sync::Arc;
use std::time::Duration;

use axum::body::{Body, to_bytes};
use axum::http::{Request, StatusCode};
use sea_orm::DatabaseConnection;
use serde_json::Value;
use tower::ServiceExt;

use tiffin_payments::infra::gateway::HttpPayoutGateway;
use tiffin_payments::infra::signature::{SIGNATURE_HEADER, sign};
use tiffin_payments::router::build_router;
use tiffin_payments::state::AppState;

use crate::helpers::{PLATFORM, TEST_WEBHOOK_SECRET};

/// Router over a disconnected database: only paths that never reach storage succeed.
fn app() -> axum::Router {
    let gateway = HttpPayoutGateway::new(
        "http://127.0.0.1:9",
        "key_id",
        "key_secret",
        "2323230041626905",
        Duration::from_secs(1),
    )
    .unwrap();
    build_router(AppState {
        db: DatabaseConnection::default(),
        gateway,
        platform_account_id: PLATFORM,
        payout_timeout: Duration::from_secs(1),
        distribution_lease: Duration::from_secs(120),
        webhook_secret: Arc::from(TEST_WEBHOOK_SECRET),
        retry_delay: Duration::from_secs(30),
    })
}

fn webhook(body: &'static str, signature: Option<String>) -> Request<Body> {
    let mut request = Request::builder()
        .method("POST")
        .uri("/payments/webhooks/payout")
        .header("content-type", "application/json");
    if let Some(signature) = signature {
        request = request.header(SIGNATURE_HEADER, signature);
    }
    request.body(Body::from(body)).unwrap()
}

fn get(uri: &str) -> Request<Body> {
    Request::builder().uri(uri).body(Body::empty()).unwrap()
}

async fn json_body(response: axum::response::Response) -> Value {
    let bytes = to_bytes(response.into_body(), usize::MAX).await.unwrap();
    serde_json::from_slice(&bytes).unwrap()
}

// ── Health ───────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_report_live_but_not_ready_without_database() {
    let live = app().oneshot(get("/healthz")).await.unwrap();
    assert_eq!(live.status(), StatusCode::OK);

    let ready = app().oneshot(get("/readyz")).await.unwrap();
    assert_eq!(ready.status(), StatusCode::SERVICE_UNAVAILABLE);
}

#[tokio::test]
async fn should_echo_request_id() {
    let response = app().oneshot(get("/healthz")).await.unwrap();
    assert!(response.headers().contains_key("x-request-id"));
}

// ── POST /payments/webhooks/payout ───────────────────────────────────────────

const IGNORED_EVENT: &str = r#"{"event":"payout.queued","payload":{"payout":{"id":"pout_1"}}}"#;

#[tokio::test]
async fn should_reject_webhook_without_signature() {
    let response = app().oneshot(webhook(IGNORED_EVENT, None)).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["kind"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn should_reject_webhook_with_wrong_signature() {
    let signature = sign("another-secret", IGNORED_EVENT.as_bytes());
    let response = app()
        .oneshot(webhook(IGNORED_EVENT, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["kind"], "INVALID_SIGNATURE");
}

#[tokio::test]
async fn should_reject_signed_webhook_with_malformed_body() {
    let body = r#"{"event":"payout.failed"}"#;
    let signature = sign(TEST_WEBHOOK_SECRET, body.as_bytes());
    let response = app().oneshot(webhook(body, Some(signature))).await.unwrap();

    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["kind"], "INVALID_PAYLOAD");
}

#[tokio::test]
async fn should_acknowledge_signed_event_it_does_not_act_on() {
    let signature = sign(TEST_WEBHOOK_SECRET, IGNORED_EVENT.as_bytes());
    let response = app()
        .oneshot(webhook(IGNORED_EVENT, Some(signature)))
        .await
        .unwrap();

    assert_eq!(response.status(), StatusCode::OK);
    let body = json_body(response).await;
    assert_eq!(body["success"], true);
    assert_eq!(body["message"], "event ignored");
    assert!(body.get("payout_record").is_none());
}

// ── Read APIs ────────────────────────────────────────────────────────────────

#[tokio::test]
async fn should_reject_malformed_order_id() {
    let response = app()
        .oneshot(get("/payments/orders/order-1/distribution"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_unknown_recipient_type() {
    let response = app()
        .oneshot(get(
            "/payments/accounts/chef/0190f5b4-7c3a-7000-8000-0000000000b1",
        ))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn should_reject_unknown_payout_status_filter() {
    let response = app()
        .oneshot(get("/payments/payouts?status=settled"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
    assert_eq!(json_body(response).await["kind"], "INVALID_PAYLOAD");
}
