//! Order API Handlers

use axum::extract::{Json, Path, Query, State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use shared::status::{ItemStatus, OrderStatus};

use crate::api::{ApiResult, ok, ok_with_message};
use crate::auth::CurrentUser;
use crate::db::models::{Order, UserRole};
use crate::db::repository::OrderRepository;
use crate::email;
use crate::orders::admin_view::AdminOrderView;
use crate::orders::cancel::{
    cancel_single_item, cancel_whole_order, request_item_cancellation, vendor_owns_all_items,
};
use crate::orders::sync;
use crate::shipping;
use crate::state::AppState;

// ==================== Customer views ====================

/// Customer-facing line item (website vocabulary is used order-level only;
/// item statuses render in the admin strings both UIs know)
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderItemView {
    pub item_id: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    pub status: String,
    pub cancel_requested: bool,
}

/// Customer-facing order
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct OrderView {
    pub id: String,
    /// Website vocabulary ("pending", "shipped", ...)
    pub status: String,
    pub items: Vec<OrderItemView>,
    pub total: f64,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    pub created_at: i64,
}

impl OrderView {
    fn from_order(order: &Order) -> Self {
        Self {
            id: order.id_string(),
            status: order.status.website_str().to_string(),
            items: order
                .items
                .iter()
                .map(|item| OrderItemView {
                    item_id: item.item_id.clone(),
                    product_id: item.product_id.clone(),
                    name: item.name.clone(),
                    price: item.price,
                    quantity: item.quantity,
                    status: item.status.admin_str().to_string(),
                    cancel_requested: item.cancel_requested,
                })
                .collect(),
            total: order.total,
            is_paid: order.is_paid,
            tracking_number: order.tracking_number.clone(),
            created_at: order.created_at,
        }
    }
}

/// Load an order and check the caller may act on it.
///
/// Owners and staff always may; vendors only when every item is theirs.
async fn load_authorized(
    repo: &OrderRepository,
    order_id: &str,
    user: &CurrentUser,
) -> Result<Order, AppError> {
    let order = repo
        .find_by_id(order_id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

    let allowed = order.user_id == user.user_id
        || user.role.is_staff()
        || (user.role == UserRole::Vendor && vendor_owns_all_items(&order, &user.user_id));
    if !allowed {
        return Err(AppError::new(ErrorCode::PermissionDenied));
    }
    Ok(order)
}

// ==================== Customer routes ====================

/// GET /api/user/orders
pub async fn list_own(
    State(state): State<AppState>,
    user: CurrentUser,
) -> ApiResult<Vec<OrderView>> {
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_by_user(&user.user_id)
        .await
        .map_err(AppError::from)?;
    Ok(ok(orders.iter().map(OrderView::from_order).collect()))
}

/// GET /api/user/orders/{id}
pub async fn get_own(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<OrderView> {
    let repo = OrderRepository::new(state.db.clone());
    let order = load_authorized(&repo, &id, &user).await?;
    Ok(ok(OrderView::from_order(&order)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelOrderRequest {
    pub order_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /api/user/order/cancel-order
///
/// Whole-order cancellation; rejected when any item has been dispatched.
pub async fn cancel_order(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CancelOrderRequest>,
) -> ApiResult<OrderView> {
    let repo = OrderRepository::new(state.db.clone());
    let mut order = load_authorized(&repo, &req.order_id, &user).await?;

    cancel_whole_order(&mut order, req.reason)?;
    let saved = repo.save(&order).await.map_err(AppError::from)?;

    tracing::info!(order_id = %saved.id_string(), "Order cancelled");
    Ok(ok_with_message(
        OrderView::from_order(&saved),
        "Order cancelled",
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelItemRequest {
    pub order_id: String,
    pub item_id: String,
    #[serde(default)]
    pub reason: Option<String>,
}

/// POST /api/user/order/product/cancel
///
/// Single-item cancellation; only from {Not Processed, Processing, Confirmed}.
pub async fn cancel_item(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CancelItemRequest>,
) -> ApiResult<OrderView> {
    let repo = OrderRepository::new(state.db.clone());
    let mut order = load_authorized(&repo, &req.order_id, &user).await?;

    cancel_single_item(&mut order, &req.item_id, req.reason)?;
    let saved = repo.save(&order).await.map_err(AppError::from)?;

    tracing::info!(
        order_id = %saved.id_string(),
        item_id = %req.item_id,
        "Order item cancelled"
    );
    Ok(ok_with_message(
        OrderView::from_order(&saved),
        "Item cancelled",
    ))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CancelRequestRequest {
    pub order_id: String,
    pub item_id: String,
    pub reason: String,
}

/// POST /api/user/order/product/cancel-request
///
/// Flags the item for staff review and notifies the support inbox.
pub async fn request_cancel(
    State(state): State<AppState>,
    user: CurrentUser,
    Json(req): Json<CancelRequestRequest>,
) -> ApiResult<OrderView> {
    let repo = OrderRepository::new(state.db.clone());
    let mut order = load_authorized(&repo, &req.order_id, &user).await?;

    let item_name = request_item_cancellation(&mut order, &req.item_id, req.reason.clone())?
        .name
        .clone();
    let saved = repo.save(&order).await.map_err(AppError::from)?;

    if let Err(e) = email::send_cancel_request_notice(
        &state.ses,
        &state.ses_from_email,
        &state.support_email,
        &saved.id_string(),
        &item_name,
        &req.reason,
    )
    .await
    {
        tracing::warn!(error = %e, "Failed to notify support about cancel request");
    }

    Ok(ok_with_message(
        OrderView::from_order(&saved),
        "Cancellation request submitted",
    ))
}

// ==================== Admin routes ====================

/// Query params for listing orders
#[derive(Debug, Deserialize)]
pub struct ListQuery {
    #[serde(default = "default_limit")]
    pub limit: i64,
    #[serde(default)]
    pub offset: i64,
}

fn default_limit() -> i64 {
    50
}

/// GET /api/admin/orders
pub async fn admin_list(
    State(state): State<AppState>,
    user: CurrentUser,
    Query(query): Query<ListQuery>,
) -> ApiResult<Vec<AdminOrderView>> {
    user.ensure_staff()?;
    let repo = OrderRepository::new(state.db.clone());
    let orders = repo
        .find_all(query.limit, query.offset)
        .await
        .map_err(AppError::from)?;
    Ok(ok(orders.iter().map(AdminOrderView::from_order).collect()))
}

/// GET /api/admin/orders/{id}
pub async fn admin_get(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
) -> ApiResult<AdminOrderView> {
    user.ensure_staff()?;
    let repo = OrderRepository::new(state.db.clone());
    let order = repo
        .find_by_id(&id)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
    Ok(ok(AdminOrderView::from_order(&order)))
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusRequest {
    /// Either vocabulary, any casing
    pub status: String,
    /// When set, the update targets one line item instead of the order
    #[serde(default)]
    pub product_id: Option<String>,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateStatusResponse {
    pub id: String,
    /// Admin vocabulary
    pub status: String,
    /// Website vocabulary
    pub website_status: String,
    pub order: AdminOrderView,
}

/// PATCH /api/admin/orders/{id}/update-status
///
/// With `productId`, updates one line item (located by item id or product
/// id) and lets the order-level status follow. Without it, sets the order
/// status directly; the Dispatched transition registers a shipment with the
/// delivery partner.
pub async fn update_status(
    State(state): State<AppState>,
    user: CurrentUser,
    Path(id): Path<String>,
    Json(req): Json<UpdateStatusRequest>,
) -> ApiResult<UpdateStatusResponse> {
    user.ensure_staff()?;
    let repo = OrderRepository::new(state.db.clone());

    let saved = match req.product_id {
        Some(ref product_id) => {
            let new_status = ItemStatus::parse(&req.status).ok_or_else(|| {
                AppError::validation(format!("Unknown item status '{}'", req.status))
            })?;

            // The admin UI sends whichever id it has: the subdocument id or
            // the product id
            let order = repo
                .find_by_id(&id)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;
            let item_id = order
                .items
                .iter()
                .find(|item| &item.item_id == product_id || &item.product_id == product_id)
                .map(|item| item.item_id.clone())
                .ok_or_else(|| AppError::new(ErrorCode::OrderItemNotFound))?;

            sync::update_item_status(&repo, &id, &item_id, new_status).await?
        }
        None => {
            let new_status = OrderStatus::parse_any(&req.status).ok_or_else(|| {
                AppError::validation(format!("Unknown order status '{}'", req.status))
            })?;

            let mut order = repo
                .find_by_id(&id)
                .await
                .map_err(AppError::from)?
                .ok_or_else(|| AppError::new(ErrorCode::OrderNotFound))?;

            if new_status == OrderStatus::Dispatched && order.tracking_number.is_none() {
                let shipment = shipping::create_shipment(
                    &state.shipping_api_url,
                    &state.shipping_api_token,
                    &order,
                )
                .await
                .map_err(|e| {
                    tracing::error!(order_id = %order.id_string(), error = %e, "Shipping partner call failed");
                    AppError::new(ErrorCode::ShippingPartnerError)
                })?;
                order.tracking_number = Some(shipment.tracking_number);
                order.manifest_id = Some(shipment.manifest_id);
                order.delivery_status = Some("in_transit".to_string());
            }

            order.status = new_status;
            repo.save(&order).await.map_err(AppError::from)?
        }
    };

    tracing::info!(
        order_id = %saved.id_string(),
        status = saved.status.admin_str(),
        "Order status updated"
    );
    Ok(ok(UpdateStatusResponse {
        id: saved.id_string(),
        status: saved.status.admin_str().to_string(),
        website_status: saved.status.website_str().to_string(),
        order: AdminOrderView::from_order(&saved),
    }))
}
