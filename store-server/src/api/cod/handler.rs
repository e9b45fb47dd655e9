//! COD verification handlers
//!
//! Verification fails closed: expired code, wrong code, exhausted attempts,
//! and missing record all produce the same generic error so a caller learns
//! nothing about which check failed.

use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::api::{ApiResult, ok, ok_with_message};
use crate::auth::CurrentUser;
use crate::db::models::{COD_CODE_TTL_MS, COD_MAX_ATTEMPTS, Order, PaymentMethod};
use crate::db::repository::{CartRepository, OrderRepository, PendingCodRepository};
use crate::email;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

fn verification_failed() -> AppError {
    AppError::new(ErrorCode::CodVerificationFailed)
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyRequest {
    pub order_id: String,
    pub code: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct VerifyResponse {
    pub order_id: String,
    pub status: String,
}

/// POST /api/order/verify-cod
pub async fn verify(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<VerifyRequest>,
) -> ApiResult<VerifyResponse> {
    let pending_repo = PendingCodRepository::new(state.db.clone());
    let pending = pending_repo
        .find_by_id(&req.order_id)
        .await
        .map_err(AppError::from)?
        .filter(|p| p.user_id == user.user_id)
        .ok_or_else(verification_failed)?;

    let now = shared::util::now_millis();
    if pending.is_expired(now) || pending.attempts >= COD_MAX_ATTEMPTS {
        return Err(verification_failed());
    }

    pending_repo
        .increment_attempts(&pending.id_string())
        .await
        .map_err(AppError::from)?;

    if !verify_password(&req.code, &pending.code_hash) {
        return Err(verification_failed());
    }

    // Promote the pending record to a real order
    let orders = OrderRepository::new(state.db.clone());
    let order = orders
        .create(Order::new(
            &pending.user_id,
            pending.items.clone(),
            pending.shipping_address.clone(),
            PaymentMethod::Cod,
        ))
        .await
        .map_err(AppError::from)?;

    pending_repo
        .delete(&pending.id_string())
        .await
        .map_err(AppError::from)?;

    let carts = CartRepository::new(state.db.clone());
    if let Err(e) = carts.clear(&user.user_id).await {
        tracing::warn!(user_id = %user.user_id, error = %e, "Failed to clear cart after COD verification");
    }

    let order_id = order.id_string();
    let _ = email::send_order_confirmation(
        &state.ses,
        &state.ses_from_email,
        &user.email,
        &order_id,
        order.total,
    )
    .await;

    tracing::info!(order_id = %order_id, "COD order confirmed");
    Ok(ok(VerifyResponse {
        order_id,
        status: order.status.website_str().to_string(),
    }))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ResendRequest {
    pub order_id: String,
}

/// POST /api/order/resend-cod-verification
///
/// Regenerates the code/hash/expiry triple, invalidating the previous code.
pub async fn resend_verification(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<ResendRequest>,
) -> ApiResult<serde_json::Value> {
    let pending_repo = PendingCodRepository::new(state.db.clone());
    let pending = pending_repo
        .find_by_id(&req.order_id)
        .await
        .map_err(AppError::from)?
        .filter(|p| p.user_id == user.user_id)
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let code = shared::util::generate_code();
    let code_hash = hash_password(&code).map_err(|_| AppError::new(ErrorCode::InternalError))?;
    let now = shared::util::now_millis();

    pending_repo
        .rearm(&pending.id_string(), &code_hash, now + COD_CODE_TTL_MS)
        .await
        .map_err(AppError::from)?;

    if let Err(e) =
        email::send_cod_verification_code(&state.ses, &state.ses_from_email, &user.email, &code)
            .await
    {
        tracing::error!(error = %e, "Failed to resend COD verification code");
        return Err(AppError::new(ErrorCode::EmailSendFailed));
    }

    tracing::info!(pending_id = %pending.id_string(), "COD verification code resent");
    Ok(ok_with_message(
        serde_json::json!({}),
        "A new verification code has been sent",
    ))
}
