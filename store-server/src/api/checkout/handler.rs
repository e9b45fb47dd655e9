//! Checkout handler
//!
//! Builds an order from the cart. Prepaid checkouts create a provider order
//! carrying `notes.order_id` (the webhook correlates on it); COD checkouts
//! park the order as a pending record until the emailed code is verified.

use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::api::{ApiResult, ok};
use crate::auth::CurrentUser;
use crate::db::models::{
    Address, COD_CODE_TTL_MS, Order, OrderItem, PaymentMethod, PendingCodOrder,
};
use crate::db::repository::{
    CartRepository, OrderRepository, PendingCodRepository, ProductRepository,
};
use crate::email;
use crate::payments;
use crate::state::AppState;
use crate::util::hash_password;

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutRequest {
    pub shipping_address: Address,
    pub payment_method: PaymentMethod,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct CheckoutResponse {
    pub order_id: String,
    /// Provider order id the client passes to the payment widget (prepaid)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub razorpay_order_id: Option<String>,
    pub amount: f64,
    /// COD orders require code verification before the order is placed
    pub verification_required: bool,
}

/// POST /api/checkout
pub async fn checkout(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CheckoutRequest>,
) -> ApiResult<CheckoutResponse> {
    let carts = CartRepository::new(state.db.clone());
    let cart = carts
        .find_by_user(&user.user_id)
        .await
        .map_err(AppError::from)?
        .filter(|c| !c.items.is_empty())
        .ok_or_else(|| AppError::new(ErrorCode::CartEmpty))?;

    // Snapshot cart lines into order items, picking up the vendor from the
    // current product record
    let products = ProductRepository::new(state.db.clone());
    let mut items = Vec::with_capacity(cart.items.len());
    for line in &cart.items {
        let vendor_id = products
            .find_by_id(&line.product_id)
            .await
            .map_err(AppError::from)?
            .and_then(|p| p.vendor_id);
        items.push(OrderItem::new(
            line.product_id.clone(),
            line.name.clone(),
            line.price,
            line.quantity,
            vendor_id,
        ));
    }
    let total: f64 = items.iter().map(OrderItem::subtotal).sum();

    match req.payment_method {
        PaymentMethod::Prepaid => {
            let orders = OrderRepository::new(state.db.clone());
            let order = orders
                .create(Order::new(
                    &user.user_id,
                    items,
                    req.shipping_address,
                    PaymentMethod::Prepaid,
                ))
                .await
                .map_err(AppError::from)?;

            let order_id = order.id_string();
            let provider_order_id = payments::create_order(
                &state.razorpay_key_id,
                &state.razorpay_key_secret,
                payments::to_paise(total),
                &state.currency,
                &order_id,
            )
            .await
            .map_err(|e| {
                tracing::error!(error = %e, "Payment provider order creation failed");
                AppError::new(ErrorCode::PaymentProviderError)
            })?;

            let mut order = order;
            order.payment_intent_id = Some(provider_order_id.clone());
            orders.save(&order).await.map_err(AppError::from)?;

            tracing::info!(order_id = %order_id, "Prepaid checkout created");
            Ok(ok(CheckoutResponse {
                order_id,
                razorpay_order_id: Some(provider_order_id),
                amount: total,
                verification_required: false,
            }))
        }
        PaymentMethod::Cod => {
            let code = shared::util::generate_code();
            let code_hash =
                hash_password(&code).map_err(|_| AppError::new(ErrorCode::InternalError))?;
            let now = shared::util::now_millis();

            let pending_repo = PendingCodRepository::new(state.db.clone());
            let pending = pending_repo
                .create(PendingCodOrder {
                    id: None,
                    user_id: user.user_id.clone(),
                    items,
                    total,
                    shipping_address: req.shipping_address,
                    code_hash,
                    attempts: 0,
                    expires_at: now + COD_CODE_TTL_MS,
                    created_at: now,
                })
                .await
                .map_err(AppError::from)?;

            if let Err(e) =
                email::send_cod_verification_code(&state.ses, &state.ses_from_email, &user.email, &code)
                    .await
            {
                tracing::error!(error = %e, "Failed to send COD verification code");
                return Err(AppError::new(ErrorCode::EmailSendFailed));
            }

            tracing::info!(pending_id = %pending.id_string(), "COD checkout pending verification");
            Ok(ok(CheckoutResponse {
                order_id: pending.id_string(),
                razorpay_order_id: None,
                amount: total,
                verification_required: true,
            }))
        }
    }
}
