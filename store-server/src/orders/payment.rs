//! Payment success handling
//!
//! The single transition of interest: `pending → paid`, driven by the
//! verified provider webhook. Marking the order paid and clearing the cart
//! are two independent single-document writes; the cart write is best-effort
//! (a stale cart is an inconvenience, a missed payment is not).

use crate::db::models::{Order, PaymentRecord, PaymentStatus};
use crate::db::repository::{CartRepository, OrderRepository};
use shared::error::{AppError, AppResult, ErrorCode};
use shared::status::OrderStatus;

/// Normalized payment result extracted from a provider webhook
#[derive(Debug, Clone)]
pub struct PaymentResult {
    pub payment_id: String,
    pub status: String,
    pub method: Option<String>,
    pub contact: Option<String>,
}

/// Mark the order paid and clear the owner's cart.
///
/// Idempotent: an already-paid order is returned unchanged so webhook
/// redeliveries are no-ops.
pub async fn handle_payment_success(
    orders: &OrderRepository,
    carts: &CartRepository,
    order_id: &str,
    payment: PaymentResult,
    provider: &str,
) -> AppResult<Order> {
    let mut order = orders
        .find_by_id(order_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| {
            AppError::with_message(
                ErrorCode::OrderNotFound,
                format!("Order {} not found", order_id),
            )
        })?;

    if order.is_paid {
        tracing::info!(order_id = %order.id_string(), "Order already paid, skipping");
        return Ok(order);
    }

    let now = shared::util::now_millis();
    order.payment_status = PaymentStatus::Paid;
    order.is_paid = true;
    order.paid_at = Some(now);
    order.payment = Some(PaymentRecord {
        payment_id: payment.payment_id,
        status: payment.status,
        method: payment.method,
        contact: payment.contact,
        provider: provider.to_string(),
        captured_at: now,
    });
    if order.status == OrderStatus::Pending {
        order.status = OrderStatus::Processing;
    }

    let saved = orders.save(&order).await.map_err(AppError::from)?;

    if let Err(e) = carts.clear(&saved.user_id).await {
        tracing::warn!(user_id = %saved.user_id, error = %e, "Failed to clear cart after payment");
    }

    tracing::info!(
        order_id = %saved.id_string(),
        provider = provider,
        "Order marked paid"
    );
    Ok(saved)
}
