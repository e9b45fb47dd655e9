//! COD verification flow against an embedded store
//! Run: cargo test -p store-server --test cod_flow

use axum::body::Body;
use axum::http::{Request, StatusCode};
use tower::ServiceExt;

use store_server::api;
use store_server::auth::create_token;
use store_server::db::DbService;
use store_server::db::models::{
    Address, COD_CODE_TTL_MS, OrderItem, PendingCodOrder, UserRole,
};
use store_server::db::repository::PendingCodRepository;
use store_server::state::AppState;
use store_server::util::{hash_password, verify_password};

use surrealdb::Surreal;
use surrealdb::engine::local::Db;

const JWT_SECRET: &str = "jwt-test-secret";

async fn open_store() -> (tempfile::TempDir, Surreal<Db>) {
    let tmp = tempfile::tempdir().unwrap();
    let path = tmp.path().join("store.db");
    let service = DbService::new(path.to_str().unwrap()).await.unwrap();
    (tmp, service.db)
}

fn pending_with_code(code: &str, now: i64) -> PendingCodOrder {
    PendingCodOrder {
        id: None,
        user_id: "user:u1".to_string(),
        items: vec![OrderItem::new("product:p1", "Blue Kurta", 899.0, 1, None)],
        total: 899.0,
        shipping_address: Address::default(),
        code_hash: hash_password(code).unwrap(),
        attempts: 0,
        expires_at: now + COD_CODE_TTL_MS,
        created_at: now,
    }
}

#[tokio::test]
async fn stored_hash_verifies_the_code_and_only_the_code() {
    let (_tmp, db) = open_store().await;
    let repo = PendingCodRepository::new(db);
    let now = shared::util::now_millis();

    let pending = repo.create(pending_with_code("482913", now)).await.unwrap();
    let stored = repo
        .find_by_id(&pending.id_string())
        .await
        .unwrap()
        .unwrap();

    // Only the hash is stored
    assert_ne!(stored.code_hash, "482913");
    assert!(verify_password("482913", &stored.code_hash));
    assert!(!verify_password("482914", &stored.code_hash));
    assert!(!stored.is_expired(now));
    assert!(stored.is_expired(now + COD_CODE_TTL_MS + 1));
}

#[tokio::test]
async fn attempts_accumulate_until_rearm() {
    let (_tmp, db) = open_store().await;
    let repo = PendingCodRepository::new(db);
    let now = shared::util::now_millis();

    let pending = repo.create(pending_with_code("482913", now)).await.unwrap();
    let id = pending.id_string();

    repo.increment_attempts(&id).await.unwrap();
    repo.increment_attempts(&id).await.unwrap();
    let stored = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.attempts, 2);

    // Resend: new code, new expiry, attempts reset, old code dead
    let new_hash = hash_password("175502").unwrap();
    repo.rearm(&id, &new_hash, now + COD_CODE_TTL_MS).await.unwrap();

    let stored = repo.find_by_id(&id).await.unwrap().unwrap();
    assert_eq!(stored.attempts, 0);
    assert!(verify_password("175502", &stored.code_hash));
    assert!(!verify_password("482913", &stored.code_hash));
}

async fn test_state(db: Surreal<Db>) -> AppState {
    let aws_config = aws_config::load_defaults(aws_config::BehaviorVersion::latest()).await;
    AppState {
        db,
        ses: aws_sdk_sesv2::Client::new(&aws_config),
        jwt_secret: JWT_SECRET.to_string(),
        razorpay_key_id: "rzp_test_key".to_string(),
        razorpay_key_secret: "rzp_test_secret".to_string(),
        razorpay_webhook_secret: Some("whsec_test".to_string()),
        currency: "INR".to_string(),
        ses_from_email: "noreply@example.com".to_string(),
        support_email: "support@example.com".to_string(),
        shipping_api_url: "http://127.0.0.1:1".to_string(),
        shipping_api_token: "ship-test-token".to_string(),
    }
}

fn verify_request(order_id: &str, code: &str) -> Request<Body> {
    let token = create_token("user:u1", "u1@example.com", UserRole::Customer, JWT_SECRET).unwrap();
    Request::builder()
        .method("POST")
        .uri("/api/order/verify-cod")
        .header("content-type", "application/json")
        .header("authorization", format!("Bearer {token}"))
        .body(Body::from(
            serde_json::json!({ "orderId": order_id, "code": code }).to_string(),
        ))
        .unwrap()
}

async fn response_message(response: axum::response::Response) -> String {
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
        .await
        .unwrap();
    let value: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
    value["message"].as_str().unwrap_or_default().to_string()
}

#[tokio::test]
async fn verification_fails_closed_with_one_generic_error() {
    let (_tmp, db) = open_store().await;
    let repo = PendingCodRepository::new(db.clone());
    let state = test_state(db).await;
    let now = shared::util::now_millis();

    // Correct code, but expired
    let mut expired = pending_with_code("482913", now);
    expired.expires_at = now - 1;
    let expired = repo.create(expired).await.unwrap();

    let response = api::create_router(state.clone())
        .oneshot(verify_request(&expired.id_string(), "482913"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let expired_msg = response_message(response).await;

    // Wrong code, not expired
    let live = repo.create(pending_with_code("482913", now)).await.unwrap();
    let response = api::create_router(state.clone())
        .oneshot(verify_request(&live.id_string(), "000000"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let wrong_msg = response_message(response).await;

    // Missing record
    let response = api::create_router(state)
        .oneshot(verify_request("pending_cod_order:missing", "482913"))
        .await
        .unwrap();
    assert_eq!(response.status(), StatusCode::UNPROCESSABLE_ENTITY);
    let missing_msg = response_message(response).await;

    // All three failures read identically; nothing leaks which check failed
    assert_eq!(expired_msg, wrong_msg);
    assert_eq!(wrong_msg, missing_msg);
    assert!(!expired_msg.to_lowercase().contains("expired"));
    assert!(!expired_msg.contains('$'), "no hash material in the response");
}

#[tokio::test]
async fn promoted_record_is_removed() {
    let (_tmp, db) = open_store().await;
    let repo = PendingCodRepository::new(db);
    let now = shared::util::now_millis();

    let pending = repo.create(pending_with_code("482913", now)).await.unwrap();
    let id = pending.id_string();

    repo.delete(&id).await.unwrap();
    assert!(repo.find_by_id(&id).await.unwrap().is_none());
}
