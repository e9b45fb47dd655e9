//! Admin-facing order serialization adapter
//!
//! Two generations of UI consumed orders under different field names:
//! `orderItems` vs `products`, `total` vs `totalAmount`, `shippingAddress`
//! vs `deliveryAddress`, and lowercase vs titlecase status strings. Orders
//! are stored once, canonically; this adapter produces the dual legacy shape
//! at the serialization boundary so both historical readers keep working.
//!
//! [`normalize`] additionally accepts a partially-shaped inbound view (an
//! import, or a payload from an old client) and backfills whichever half of
//! each field pair is missing. It never mutates its input and is idempotent.

use crate::db::models::{Address, Order, OrderItem};
use serde::{Deserialize, Serialize};
use shared::status::{ItemStatus, OrderStatus};

/// Line item as the admin surface reads it
///
/// `qty` and `quantity` are both populated; older admin views read one,
/// newer ones the other.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminItemView {
    pub id: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub qty: i32,
    pub quantity: i32,
    /// Admin vocabulary ("Not Processed", "Dispatched", ...)
    pub status: String,
    pub cancel_requested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    pub reviewed: bool,
}

impl AdminItemView {
    fn from_item(item: &OrderItem) -> Self {
        Self {
            id: item.item_id.clone(),
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            qty: item.quantity,
            quantity: item.quantity,
            status: item.status.admin_str().to_string(),
            cancel_requested: item.cancel_requested,
            cancel_reason: item.cancel_reason.clone(),
            reviewed: item.reviewed,
        }
    }
}

/// Order as the admin surface reads it (both legacy shapes populated)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
#[serde(rename_all = "camelCase", default)]
pub struct AdminOrderView {
    pub id: String,
    pub user_id: String,
    pub order_items: Vec<AdminItemView>,
    pub products: Vec<AdminItemView>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub total_amount: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub shipping_address: Option<Address>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_address: Option<Address>,
    /// Admin vocabulary at rest; [`normalize`] converts website-vocabulary
    /// values it recognizes
    pub status: String,
    pub payment_status: String,
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
}

impl AdminOrderView {
    /// Fully-populated view of a canonical order
    pub fn from_order(order: &Order) -> Self {
        let items: Vec<AdminItemView> = order.items.iter().map(AdminItemView::from_item).collect();
        Self {
            id: order.id_string(),
            user_id: order.user_id.clone(),
            order_items: items.clone(),
            products: items,
            total: Some(order.total),
            total_amount: Some(order.total),
            shipping_address: Some(order.shipping_address.clone()),
            delivery_address: Some(order.shipping_address.clone()),
            status: order.status.admin_str().to_string(),
            payment_status: format!("{:?}", order.payment_status).to_lowercase(),
            is_paid: order.is_paid,
            tracking_number: order.tracking_number.clone(),
            manifest_id: order.manifest_id.clone(),
            delivery_status: order.delivery_status.clone(),
        }
    }
}

/// Backfill the missing half of each legacy field pair.
///
/// Every branch is guarded by "target is empty/absent", which makes the
/// function idempotent; the input is cloned, never mutated.
pub fn normalize(view: &AdminOrderView) -> AdminOrderView {
    let mut out = view.clone();

    // (a) orderItems populated, products empty: mirror through the admin
    //     status converter, quantity under both keys
    if !out.order_items.is_empty() && out.products.is_empty() {
        out.products = out
            .order_items
            .iter()
            .map(|item| {
                let mut mirrored = item.clone();
                mirrored.status = ItemStatus::parse_lossy(&item.status).admin_str().to_string();
                let qty = if item.quantity != 0 { item.quantity } else { item.qty };
                mirrored.qty = qty;
                mirrored.quantity = qty;
                mirrored
            })
            .collect();
    }

    // (b) harmonize shippingAddress / deliveryAddress
    if out.shipping_address.is_none() && out.delivery_address.is_some() {
        out.shipping_address = out.delivery_address.clone();
    }
    if out.delivery_address.is_none() && out.shipping_address.is_some() {
        out.delivery_address = out.shipping_address.clone();
    }

    // (c) harmonize total / totalAmount
    if out.total.is_none() && out.total_amount.is_some() {
        out.total = out.total_amount;
    }
    if out.total_amount.is_none() && out.total.is_some() {
        out.total_amount = out.total;
    }

    // (d) recognized website-vocabulary status converts to admin vocabulary
    if let Some(status) = OrderStatus::parse_website(&out.status) {
        out.status = status.admin_str().to_string();
    }

    out
}

/// Convert a (normalized) legacy view into a canonical item list.
///
/// Used when ingesting legacy-shaped documents; reads whichever array is
/// populated.
pub fn items_from_view(view: &AdminOrderView) -> Vec<OrderItem> {
    let source = if !view.order_items.is_empty() {
        &view.order_items
    } else {
        &view.products
    };
    source
        .iter()
        .map(|item| OrderItem {
            item_id: item.id.clone(),
            product_id: item.product_id.clone(),
            name: item.name.clone(),
            price: item.price,
            quantity: if item.quantity != 0 { item.quantity } else { item.qty },
            status: ItemStatus::parse_lossy(&item.status),
            vendor_id: None,
            cancel_requested: item.cancel_requested,
            cancel_reason: item.cancel_reason.clone(),
            reviewed: item.reviewed,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::db::models::{PaymentMethod, order::Address};

    fn sample_item(status: &str) -> AdminItemView {
        AdminItemView {
            id: "item-1".to_string(),
            product_id: "product:p1".to_string(),
            name: "Blue Kurta".to_string(),
            price: 899.0,
            qty: 0,
            quantity: 2,
            status: status.to_string(),
            cancel_requested: false,
            cancel_reason: None,
            reviewed: false,
        }
    }

    fn sample_address() -> Address {
        Address {
            name: "Asha".to_string(),
            line1: "12 MG Road".to_string(),
            line2: None,
            city: "Pune".to_string(),
            state: "MH".to_string(),
            postal_code: "411001".to_string(),
            phone: "+91 9000000000".to_string(),
        }
    }

    fn legacy_view() -> AdminOrderView {
        AdminOrderView {
            id: "order:o1".to_string(),
            user_id: "user:u1".to_string(),
            order_items: vec![sample_item("shipped"), sample_item("pending")],
            products: Vec::new(),
            total: None,
            total_amount: Some(1798.0),
            shipping_address: None,
            delivery_address: Some(sample_address()),
            status: "processing".to_string(),
            payment_status: "paid".to_string(),
            is_paid: true,
            tracking_number: None,
            manifest_id: None,
            delivery_status: None,
        }
    }

    #[test]
    fn test_normalize_builds_products_from_order_items() {
        let view = legacy_view();
        let normalized = normalize(&view);

        assert_eq!(normalized.products.len(), normalized.order_items.len());
        assert_eq!(normalized.products[0].status, "Dispatched");
        assert_eq!(normalized.products[1].status, "Not Processed");
        for item in &normalized.products {
            assert_eq!(item.qty, item.quantity);
            assert_ne!(item.qty, 0);
        }
    }

    #[test]
    fn test_normalize_harmonizes_field_pairs() {
        let view = legacy_view();
        let normalized = normalize(&view);

        assert_eq!(normalized.total, Some(1798.0));
        assert_eq!(normalized.total_amount, Some(1798.0));
        assert_eq!(normalized.shipping_address, normalized.delivery_address);
        assert!(normalized.shipping_address.is_some());
        assert_eq!(normalized.status, "Processing");
    }

    #[test]
    fn test_normalize_is_idempotent() {
        let view = legacy_view();
        let once = normalize(&view);
        let twice = normalize(&once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_normalize_does_not_mutate_input() {
        let view = legacy_view();
        let snapshot = view.clone();
        let _ = normalize(&view);
        assert_eq!(view, snapshot);
    }

    #[test]
    fn test_normalize_leaves_unknown_status_untouched() {
        let mut view = legacy_view();
        view.status = "Dispatched".to_string();
        let normalized = normalize(&view);
        // Already admin vocabulary; not a recognized website value, unchanged
        assert_eq!(normalized.status, "Dispatched");
    }

    #[test]
    fn test_from_order_mirrors_arrays() {
        let items = vec![
            OrderItem::new("product:p1", "Blue Kurta", 899.0, 2, None),
            OrderItem::new("product:p2", "Sandals", 499.0, 1, None),
        ];
        let order = Order::new("user:u1", items, sample_address(), PaymentMethod::Prepaid);
        let view = AdminOrderView::from_order(&order);

        assert_eq!(view.order_items, view.products);
        assert_eq!(view.total, view.total_amount);
        assert_eq!(view.total, Some(899.0 * 2.0 + 499.0));
        assert_eq!(view.status, "Not Processed");
        // A full view is already normalized
        assert_eq!(normalize(&view), view);
    }

    #[test]
    fn test_items_from_view_reads_either_array() {
        let view = legacy_view();
        let items = items_from_view(&view);
        assert_eq!(items.len(), 2);
        assert_eq!(items[0].status, shared::status::ItemStatus::Dispatched);

        let mut products_only = legacy_view();
        products_only.products = products_only.order_items.clone();
        products_only.order_items.clear();
        let items = items_from_view(&products_only);
        assert_eq!(items.len(), 2);
    }
}
