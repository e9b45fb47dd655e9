//! Razorpay webhook handler
//!
//! POST /api/webhook/razorpay — raw body for signature verification.
//!
//! Failure semantics: signature mismatch and missing configuration are
//! permanent (400/500 with no useful retry); handler failures return 500 on
//! purpose so the provider's automatic redelivery retries them — that
//! redelivery is the system's only retry mechanism.

use axum::body::Bytes;
use axum::extract::State;
use axum::http::{HeaderMap, StatusCode};
use axum::response::{IntoResponse, Response};
use axum::Json;

use crate::db::repository::{CartRepository, OrderRepository, WebhookEventRepository};
use crate::orders::payment::{PaymentResult, handle_payment_success};
use crate::payments;
use crate::state::AppState;

/// Events this handler acts on
const PROCESSED_EVENTS: [&str; 2] = ["payment.captured", "order.paid"];

/// Events we expect to receive and deliberately do nothing with
const IGNORED_EVENTS: [&str; 4] = [
    "payment.authorized",
    "payment.failed",
    "refund.created",
    "refund.processed",
];

fn reject(status: StatusCode, message: &str) -> Response {
    (
        status,
        Json(serde_json::json!({ "success": false, "message": message })),
    )
        .into_response()
}

fn acknowledge() -> Response {
    (StatusCode::OK, Json(serde_json::json!({ "status": "ok" }))).into_response()
}

/// Handle incoming Razorpay webhook events
///
/// Must receive the raw body (not parsed JSON): the signature is an HMAC of
/// the exact bytes sent.
pub async fn handle_webhook(
    State(state): State<AppState>,
    headers: HeaderMap,
    body: Bytes,
) -> Response {
    // 1. Webhook secret must be configured
    let secret = match &state.razorpay_webhook_secret {
        Some(s) => s,
        None => {
            tracing::error!("RAZORPAY_WEBHOOK_SECRET is not configured");
            return reject(
                StatusCode::INTERNAL_SERVER_ERROR,
                "Webhook secret not configured",
            );
        }
    };

    // 2. Signature header + HMAC verification over the raw body
    let sig_header = match headers
        .get("x-razorpay-signature")
        .and_then(|v| v.to_str().ok())
    {
        Some(s) => s,
        None => {
            tracing::warn!("Missing x-razorpay-signature header");
            return reject(StatusCode::BAD_REQUEST, "Missing signature header");
        }
    };

    if let Err(e) = payments::verify_webhook_signature(&body, sig_header, secret) {
        tracing::warn!(error = e, "Webhook signature verification failed");
        return reject(StatusCode::BAD_REQUEST, "Invalid signature");
    }

    // 3. Parse JSON only after the signature checks out
    let event: serde_json::Value = match serde_json::from_slice(&body) {
        Ok(v) => v,
        Err(e) => {
            tracing::warn!(%e, "Failed to parse webhook JSON");
            return reject(StatusCode::BAD_REQUEST, "Malformed payload");
        }
    };

    let event_type = event["event"].as_str().unwrap_or("");
    tracing::info!(event_type = event_type, "Received Razorpay webhook");

    // 4. Explicit allow-list: processed / known-ignored / unrecognized.
    //    Everything not processed still acknowledges 200 so the provider
    //    does not keep redelivering events we will never act on.
    if !PROCESSED_EVENTS.contains(&event_type) {
        if IGNORED_EVENTS.contains(&event_type) {
            tracing::debug!(event_type = event_type, "Ignored webhook event type");
        } else {
            tracing::warn!(event_type = event_type, "Unrecognized webhook event type");
        }
        return acknowledge();
    }

    // 5. Idempotency: record the event id first; duplicates are no-ops
    if let Some(event_id) = headers
        .get("x-razorpay-event-id")
        .and_then(|v| v.to_str().ok())
    {
        let events = WebhookEventRepository::new(state.db.clone());
        match events.insert_new(event_id, event_type).await {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(event_id = event_id, "Duplicate webhook event, skipping");
                return acknowledge();
            }
            Err(e) => {
                tracing::error!(error = %e, "DB error recording webhook event");
                return reject(StatusCode::INTERNAL_SERVER_ERROR, "Storage error");
            }
        }
    }

    // 6. Correlate back to our order via notes.order_id — set when the
    //    provider order was created at checkout (caller contract)
    let payment_entity = event
        .get("payload")
        .and_then(|p| p.get("payment"))
        .and_then(|p| p.get("entity"));
    let order_entity = event
        .get("payload")
        .and_then(|p| p.get("order"))
        .and_then(|o| o.get("entity"));

    let order_id = [payment_entity, order_entity]
        .into_iter()
        .flatten()
        .find_map(|entity| entity.get("notes").and_then(|n| n["order_id"].as_str()));

    let order_id = match order_id {
        Some(id) => id.to_string(),
        None => {
            tracing::warn!(event_type = event_type, "Webhook payload missing notes.order_id");
            return reject(StatusCode::BAD_REQUEST, "missing order_id");
        }
    };

    // 7. Normalized payment result for the success handler
    let payment = PaymentResult {
        payment_id: payment_entity
            .and_then(|e| e["id"].as_str())
            .unwrap_or_default()
            .to_string(),
        status: payment_entity
            .and_then(|e| e["status"].as_str())
            .unwrap_or("captured")
            .to_string(),
        method: payment_entity
            .and_then(|e| e["method"].as_str())
            .map(String::from),
        contact: payment_entity
            .and_then(|e| e["contact"].as_str())
            .map(String::from),
    };

    let orders = OrderRepository::new(state.db.clone());
    let carts = CartRepository::new(state.db.clone());
    match handle_payment_success(&orders, &carts, &order_id, payment, payments::PROVIDER).await {
        Ok(_) => acknowledge(),
        Err(e) => {
            // 500 → the provider redelivers; transient failures heal themselves
            tracing::error!(order_id = %order_id, error = %e, "Payment success handler failed");
            reject(StatusCode::INTERNAL_SERVER_ERROR, "Payment handling failed")
        }
    }
}
