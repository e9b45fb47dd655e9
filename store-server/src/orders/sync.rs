//! Per-item status updates and order-level status rollup
//!
//! A single stored item collection makes it impossible for the two
//! serialized item views to drift apart; what remains is locating the item,
//! applying the transition, and recomputing the order-level status.

use crate::db::models::{Order, OrderItem};
use crate::db::repository::OrderRepository;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::status::{ItemStatus, OrderStatus};

/// Recompute the order-level status from its items.
///
/// Returns `None` when the items do not imply a change (e.g. nothing has
/// progressed yet) so callers keep the current status.
pub fn rollup_order_status(items: &[OrderItem]) -> Option<OrderStatus> {
    if items.is_empty() {
        return None;
    }

    let live: Vec<&OrderItem> = items
        .iter()
        .filter(|item| item.status != ItemStatus::Cancelled)
        .collect();

    if live.is_empty() {
        return Some(OrderStatus::Cancelled);
    }

    if live.iter().all(|item| item.status == ItemStatus::Completed) {
        return Some(OrderStatus::Completed);
    }
    if live.iter().all(|item| {
        matches!(item.status, ItemStatus::Delivered | ItemStatus::Completed)
    }) {
        return Some(OrderStatus::Delivered);
    }
    if live.iter().any(|item| item.status == ItemStatus::Dispatched) {
        return Some(OrderStatus::Dispatched);
    }
    if live.iter().any(|item| {
        matches!(item.status, ItemStatus::Processing | ItemStatus::Confirmed)
    }) {
        return Some(OrderStatus::Processing);
    }

    None
}

/// Apply a status to one item (by subdocument id) and refresh the
/// order-level status.
///
/// Errors with `OrderItemNotFound` when no item carries the id.
pub fn apply_item_status(
    order: &mut Order,
    item_id: &str,
    new_status: ItemStatus,
) -> AppResult<()> {
    let item = order.item_mut(item_id).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::OrderItemNotFound,
            format!("Order item {} not found", item_id),
        )
    })?;
    item.status = new_status;

    if let Some(status) = rollup_order_status(&order.items) {
        order.status = status;
    }
    Ok(())
}

/// Load, update, and persist one item's status.
///
/// Errors with `OrderNotFound` when the order does not exist and
/// `OrderItemNotFound` when the item id matches nothing.
pub async fn update_item_status(
    repo: &OrderRepository,
    order_id: &str,
    item_id: &str,
    new_status: ItemStatus,
) -> AppResult<Order> {
    let mut order = repo.find_by_id(order_id).await.map_err(AppError::from)?.ok_or_else(|| {
        AppError::with_message(
            ErrorCode::OrderNotFound,
            format!("Order {} not found", order_id),
        )
    })?;

    apply_item_status(&mut order, item_id, new_status)?;

    let saved = repo.save(&order).await.map_err(AppError::from)?;
    tracing::info!(
        order_id = %saved.id_string(),
        item_id = item_id,
        status = new_status.admin_str(),
        "Order item status updated"
    );
    Ok(saved)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{Address, PaymentMethod};

    fn order_with_statuses(statuses: &[ItemStatus]) -> Order {
        let items = statuses
            .iter()
            .enumerate()
            .map(|(i, status)| {
                let mut item =
                    OrderItem::new(format!("product:p{i}"), format!("Item {i}"), 100.0, 1, None);
                item.status = *status;
                item
            })
            .collect();
        Order::new("user:u1", items, Address::default(), PaymentMethod::Prepaid)
    }

    #[test]
    fn test_rollup_all_cancelled() {
        let order = order_with_statuses(&[ItemStatus::Cancelled, ItemStatus::Cancelled]);
        assert_eq!(rollup_order_status(&order.items), Some(OrderStatus::Cancelled));
    }

    #[test]
    fn test_rollup_all_delivered() {
        let order = order_with_statuses(&[ItemStatus::Delivered, ItemStatus::Completed]);
        assert_eq!(rollup_order_status(&order.items), Some(OrderStatus::Delivered));
    }

    #[test]
    fn test_rollup_all_completed() {
        let order = order_with_statuses(&[ItemStatus::Completed, ItemStatus::Completed]);
        assert_eq!(rollup_order_status(&order.items), Some(OrderStatus::Completed));
    }

    #[test]
    fn test_rollup_any_dispatched() {
        let order = order_with_statuses(&[ItemStatus::Dispatched, ItemStatus::Processing]);
        assert_eq!(rollup_order_status(&order.items), Some(OrderStatus::Dispatched));
    }

    #[test]
    fn test_rollup_ignores_cancelled_items() {
        let order = order_with_statuses(&[ItemStatus::Cancelled, ItemStatus::Delivered]);
        assert_eq!(rollup_order_status(&order.items), Some(OrderStatus::Delivered));
    }

    #[test]
    fn test_rollup_untouched_items_imply_no_change() {
        let order = order_with_statuses(&[ItemStatus::NotProcessed, ItemStatus::NotProcessed]);
        assert_eq!(rollup_order_status(&order.items), None);
    }

    #[test]
    fn test_apply_item_status_updates_rollup() {
        let mut order = order_with_statuses(&[ItemStatus::NotProcessed, ItemStatus::NotProcessed]);
        let item_id = order.items[0].item_id.clone();

        apply_item_status(&mut order, &item_id, ItemStatus::Dispatched).unwrap();

        assert_eq!(order.items[0].status, ItemStatus::Dispatched);
        assert_eq!(order.status, OrderStatus::Dispatched);
        // The untouched sibling keeps its own status
        assert_eq!(order.items[1].status, ItemStatus::NotProcessed);
    }

    #[test]
    fn test_apply_item_status_unknown_item() {
        let mut order = order_with_statuses(&[ItemStatus::NotProcessed]);
        let err = apply_item_status(&mut order, "missing-item", ItemStatus::Dispatched)
            .unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderItemNotFound);
    }

    #[test]
    fn test_cancelling_last_live_item_cancels_order() {
        let mut order = order_with_statuses(&[ItemStatus::Cancelled, ItemStatus::Processing]);
        let item_id = order.items[1].item_id.clone();

        apply_item_status(&mut order, &item_id, ItemStatus::Cancelled).unwrap();
        assert_eq!(order.status, OrderStatus::Cancelled);
    }
}
