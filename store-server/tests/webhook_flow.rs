//! Razorpay webhook handling through the full router
//! Run: cargo test -p store-server --test webhook_flow

use axum::body::Body;
use axum::http::{Request, StatusCode};
use hmac::{Hmac, Mac};
use sha2::Sha256;
use tower::ServiceExt;

use store_server::api;
use store_server::db::DbService;
use store_server::db::models::{Address, Order, OrderItem, PaymentMethod};
use store_server::db::repository::OrderRepository;
use store_server::state::AppState;

use shared::status::OrderStatus;

const WEBHOOK_SECRET: &str = "whsec_test";

async fn test_state(tmp: &tempfile::TempDir, webhook_secret: Option<&str>) -> AppState {
    let path = tmp.path().join("store.db");
    let service = DbService::new(path.to_str().unwrap()).await.unwrap();

    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    AppState {
        db: service.db,
        ses: aws_sdk_sesv2::Client::new(&aws_config),
        jwt_secret: "jwt-test-secret".to_string(),
        razorpay_key_id: "rzp_test_key".to_string(),
        razorpay_key_secret: "rzp_test_secret".to_string(),
        razorpay_webhook_secret: webhook_secret.map(String::from),
        currency: "INR".to_string(),
        ses_from_email: "noreply@example.com".to_string(),
        support_email: "support@example.com".to_string(),
        shipping_api_url: "http://127.0.0.1:1".to_string(),
        shipping_api_token: "ship-test-token".to_string(),
    }
}

fn sign(payload: &[u8]) -> String {
    let mut mac = Hmac::<Sha256>::new_from_slice(WEBHOOK_SECRET.as_bytes()).unwrap();
    mac.update(payload);
    hex::encode(mac.finalize().into_bytes())
}

fn webhook_request(payload: &str, signature: Option<&str>) -> Request<Body> {
    let mut builder = Request::builder()
        .method("POST")
        .uri("/api/webhook/razorpay")
        .header("content-type", "application/json");
    if let Some(sig) = signature {
        builder = builder.header("x-razorpay-signature", sig);
    }
    builder.body(Body::from(payload.to_string())).unwrap()
}

fn captured_event(order_id: &str) -> String {
    serde_json::json!({
        "event": "payment.captured",
        "payload": {
            "payment": {
                "entity": {
                    "id": "pay_test_1",
                    "status": "captured",
                    "amount": 89900,
                    "method": "upi",
                    "contact": "+91 9000000000",
                    "notes": { "order_id": order_id }
                }
            }
        }
    })
    .to_string()
}

async fn seed_order(state: &AppState) -> String {
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .create(Order::new(
            "user:u1",
            vec![OrderItem::new("product:p1", "Blue Kurta", 899.0, 1, None)],
            Address::default(),
            PaymentMethod::Prepaid,
        ))
        .await
        .unwrap();
    order.id_string()
}

#[tokio::test]
async fn verified_capture_marks_order_paid() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp, Some(WEBHOOK_SECRET)).await;
    let order_id = seed_order(&state).await;
    let app = api::create_router(state.clone());

    let payload = captured_event(&order_id);
    let response = app
        .oneshot(webhook_request(&payload, Some(&sign(payload.as_bytes()))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    let repo = OrderRepository::new(state.db.clone());
    let order = repo.get(&order_id).await.unwrap();
    assert!(order.is_paid);
    assert_eq!(order.status, OrderStatus::Processing);
    assert_eq!(order.payment.unwrap().payment_id, "pay_test_1");
}

#[tokio::test]
async fn tampered_body_with_stale_signature_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp, Some(WEBHOOK_SECRET)).await;
    let order_id = seed_order(&state).await;
    let app = api::create_router(state.clone());

    // Signature computed over the original body, amount inflated afterwards
    let original = captured_event(&order_id);
    let tampered = original.replace("89900", "1");
    assert_ne!(original, tampered);
    let response = app
        .oneshot(webhook_request(&tampered, Some(&sign(original.as_bytes()))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);

    let repo = OrderRepository::new(state.db.clone());
    assert!(!repo.get(&order_id).await.unwrap().is_paid);
}

#[tokio::test]
async fn missing_signature_header_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp, Some(WEBHOOK_SECRET)).await;
    let app = api::create_router(state);

    let payload = captured_event("order:any");
    let response = app
        .oneshot(webhook_request(&payload, None))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn unconfigured_secret_is_a_server_error() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp, None).await;
    let app = api::create_router(state);

    let payload = captured_event("order:any");
    let response = app
        .oneshot(webhook_request(&payload, Some(&sign(payload.as_bytes()))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::INTERNAL_SERVER_ERROR);
}

#[tokio::test]
async fn ignored_event_acknowledges_without_touching_orders() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp, Some(WEBHOOK_SECRET)).await;
    let order_id = seed_order(&state).await;
    let app = api::create_router(state.clone());

    let payload = serde_json::json!({
        "event": "refund.created",
        "payload": {
            "refund": { "entity": { "id": "rfnd_1" } },
            "payment": {
                "entity": {
                    "id": "pay_test_1",
                    "notes": { "order_id": order_id }
                }
            }
        }
    })
    .to_string();

    let response = app
        .oneshot(webhook_request(&payload, Some(&sign(payload.as_bytes()))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::OK);

    // The payment handler never ran
    let repo = OrderRepository::new(state.db.clone());
    assert!(!repo.get(&order_id).await.unwrap().is_paid);
}

#[tokio::test]
async fn missing_order_reference_is_rejected() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp, Some(WEBHOOK_SECRET)).await;
    let app = api::create_router(state);

    let payload = serde_json::json!({
        "event": "payment.captured",
        "payload": {
            "payment": { "entity": { "id": "pay_test_1", "notes": {} } }
        }
    })
    .to_string();

    let response = app
        .oneshot(webhook_request(&payload, Some(&sign(payload.as_bytes()))))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::BAD_REQUEST);
}

#[tokio::test]
async fn duplicate_event_id_is_processed_once() {
    let tmp = tempfile::tempdir().unwrap();
    let state = test_state(&tmp, Some(WEBHOOK_SECRET)).await;
    let order_id = seed_order(&state).await;

    let payload = captured_event(&order_id);
    let sig = sign(payload.as_bytes());

    for _ in 0..2 {
        let request = Request::builder()
            .method("POST")
            .uri("/api/webhook/razorpay")
            .header("content-type", "application/json")
            .header("x-razorpay-signature", &sig)
            .header("x-razorpay-event-id", "evt_dup_1")
            .body(Body::from(payload.clone()))
            .unwrap();
        let response = api::create_router(state.clone()).oneshot(request).await.unwrap();
        assert_eq!(response.status(), StatusCode::OK);
    }

    let repo = OrderRepository::new(state.db.clone());
    assert!(repo.get(&order_id).await.unwrap().is_paid);
}
