//! Cancellation rules
//!
//! An item may be cancelled only from {Not Processed, Processing, Confirmed};
//! an item that has reached {Dispatched, Delivered, Completed} blocks
//! whole-order cancellation. All comparisons happen on the canonical enums.

use crate::db::models::{Order, OrderItem};
use crate::orders::sync::rollup_order_status;
use shared::error::{AppError, AppResult, ErrorCode};
use shared::status::{ItemStatus, OrderStatus};

/// Cancel the whole order.
///
/// Rejects when the order is already cancelled or when any item has
/// progressed past the cancellable states.
pub fn cancel_whole_order(order: &mut Order, reason: Option<String>) -> AppResult<()> {
    if order.status == OrderStatus::Cancelled {
        return Err(AppError::new(ErrorCode::OrderAlreadyCancelled));
    }

    if let Some(blocking) = order
        .items
        .iter()
        .find(|item| item.status.blocks_order_cancellation())
    {
        return Err(AppError::with_message(
            ErrorCode::OrderNotCancellable,
            format!(
                "Item '{}' is already {}",
                blocking.name,
                blocking.status.admin_str()
            ),
        ));
    }

    for item in &mut order.items {
        if item.status != ItemStatus::Cancelled {
            item.status = ItemStatus::Cancelled;
            item.cancel_reason = reason.clone();
        }
    }
    order.status = OrderStatus::Cancelled;
    Ok(())
}

/// Cancel a single item.
///
/// Allowed only from {Not Processed, Processing, Confirmed}; the order
/// becomes cancelled when its last live item is cancelled.
pub fn cancel_single_item(
    order: &mut Order,
    item_id: &str,
    reason: Option<String>,
) -> AppResult<()> {
    let item = order.item_mut(item_id).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::OrderItemNotFound,
            format!("Order item {} not found", item_id),
        )
    })?;

    if item.status == ItemStatus::Cancelled {
        return Err(AppError::new(ErrorCode::OrderAlreadyCancelled));
    }
    if !item.status.is_cancellable() {
        return Err(AppError::with_message(
            ErrorCode::OrderNotCancellable,
            format!("Item is already {}", item.status.admin_str()),
        ));
    }

    item.status = ItemStatus::Cancelled;
    item.cancel_reason = reason;

    if let Some(status) = rollup_order_status(&order.items) {
        order.status = status;
    }
    Ok(())
}

/// Flag an item for staff review instead of cancelling it outright
pub fn request_item_cancellation<'a>(
    order: &'a mut Order,
    item_id: &str,
    reason: String,
) -> AppResult<&'a OrderItem> {
    let item = order.item_mut(item_id).ok_or_else(|| {
        AppError::with_message(
            ErrorCode::OrderItemNotFound,
            format!("Order item {} not found", item_id),
        )
    })?;

    if item.status == ItemStatus::Cancelled {
        return Err(AppError::new(ErrorCode::OrderAlreadyCancelled));
    }

    item.cancel_requested = true;
    item.cancel_reason = Some(reason);
    Ok(item)
}

/// A vendor may cancel an order only when every item is theirs
pub fn vendor_owns_all_items(order: &Order, vendor_id: &str) -> bool {
    !order.items.is_empty()
        && order
            .items
            .iter()
            .all(|item| item.vendor_id.as_deref() == Some(vendor_id))
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
    fn test_cancel_whole_order_from_early_states() {
        let mut order = order_with_statuses(&[
            ItemStatus::NotProcessed,
            ItemStatus::Processing,
            ItemStatus::Confirmed,
        ]);
        cancel_whole_order(&mut order, Some("changed my mind".to_string())).unwrap();

        assert_eq!(order.status, OrderStatus::Cancelled);
        assert!(order.items.iter().all(|i| i.status == ItemStatus::Cancelled));
        assert!(order.items.iter().all(|i| i.cancel_reason.is_some()));
    }

    #[test]
    fn test_cancel_whole_order_blocked_by_dispatched_item() {
        for blocking in [
            ItemStatus::Dispatched,
            ItemStatus::Delivered,
            ItemStatus::Completed,
        ] {
            let mut order = order_with_statuses(&[ItemStatus::NotProcessed, blocking]);
            let err = cancel_whole_order(&mut order, None).unwrap_err();
            assert_eq!(err.code, ErrorCode::OrderNotCancellable);
            // Nothing was touched
            assert_eq!(order.items[0].status, ItemStatus::NotProcessed);
        }
    }

    #[test]
    fn test_cancel_already_cancelled_order() {
        let mut order = order_with_statuses(&[ItemStatus::Cancelled]);
        order.status = OrderStatus::Cancelled;
        let err = cancel_whole_order(&mut order, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderAlreadyCancelled);
    }

    #[test]
    fn test_cancel_single_item_only_from_cancellable_states() {
        let mut order = order_with_statuses(&[ItemStatus::Dispatched]);
        let item_id = order.items[0].item_id.clone();
        let err = cancel_single_item(&mut order, &item_id, None).unwrap_err();
        assert_eq!(err.code, ErrorCode::OrderNotCancellable);

        let mut order = order_with_statuses(&[ItemStatus::Confirmed]);
        let item_id = order.items[0].item_id.clone();
        cancel_single_item(&mut order, &item_id, Some("dup".to_string())).unwrap();
        assert_eq!(order.items[0].status, ItemStatus::Cancelled);
        assert_eq!(order.status, OrderStatus::Cancelled);
    }

    #[test]
    fn test_cancel_single_item_keeps_order_alive_with_siblings() {
        let mut order =
            order_with_statuses(&[ItemStatus::Processing, ItemStatus::Processing]);
        let item_id = order.items[0].item_id.clone();
        cancel_single_item(&mut order, &item_id, None).unwrap();

        assert_eq!(order.items[0].status, ItemStatus::Cancelled);
        assert_eq!(order.items[1].status, ItemStatus::Processing);
        assert_eq!(order.status, OrderStatus::Processing);
    }

    #[test]
    fn test_cancel_request_flags_item() {
        let mut order = order_with_statuses(&[ItemStatus::Dispatched]);
        let item_id = order.items[0].item_id.clone();
        let item =
            request_item_cancellation(&mut order, &item_id, "arrived damaged".to_string())
                .unwrap();
        assert!(item.cancel_requested);
        assert_eq!(item.cancel_reason.as_deref(), Some("arrived damaged"));
        // A request does not change the status
        assert_eq!(item.status, ItemStatus::Dispatched);
    }

    #[test]
    fn test_vendor_exclusivity() {
        let mut order = order_with_statuses(&[ItemStatus::NotProcessed, ItemStatus::NotProcessed]);
        order.items[0].vendor_id = Some("user:v1".to_string());
        order.items[1].vendor_id = Some("user:v1".to_string());
        assert!(vendor_owns_all_items(&order, "user:v1"));

        order.items[1].vendor_id = Some("user:v2".to_string());
        assert!(!vendor_owns_all_items(&order, "user:v1"));

        order.items[1].vendor_id = None;
        assert!(!vendor_owns_all_items(&order, "user:v1"));
    }
}
