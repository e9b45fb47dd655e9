//! Order model
//!
//! Orders are stored once, canonically: a single `items` collection and the
//! canonical status enums from `shared::status`. The legacy dual-shape
//! (`orderItems`/`products`, `total`/`totalAmount`, ...) exists only at the
//! API boundary, produced by [`crate::orders::admin_view::AdminOrderView`].

use super::serde_helpers;
use serde::{Deserialize, Serialize};
use shared::status::{ItemStatus, OrderStatus};
use surrealdb::RecordId;

/// Payment method chosen at checkout
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentMethod {
    /// Paid online through the payment provider
    Prepaid,
    /// Cash on delivery (code-verified)
    Cod,
}

/// Payment state of an order
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PaymentStatus {
    #[default]
    Unpaid,
    Paid,
    Refunded,
}

/// Normalized payment result recorded from a provider webhook
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PaymentRecord {
    /// Provider-side payment id
    pub payment_id: String,
    /// Provider-reported status (e.g. "captured")
    pub status: String,
    /// Payment method reported by the provider (card, upi, netbanking, ...)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub method: Option<String>,
    /// Customer contact reported by the provider
    #[serde(skip_serializing_if = "Option::is_none")]
    pub contact: Option<String>,
    /// Provider tag ("razorpay")
    pub provider: String,
    /// When the payment was recorded (ms)
    pub captured_at: i64,
}

/// Shipping / delivery address
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Default)]
pub struct Address {
    pub name: String,
    pub line1: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub line2: Option<String>,
    pub city: String,
    pub state: String,
    pub postal_code: String,
    pub phone: String,
}

/// Order line item (embedded subdocument)
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct OrderItem {
    /// Stable subdocument id (uuid)
    pub item_id: String,
    pub product_id: String,
    pub name: String,
    pub price: f64,
    pub quantity: i32,
    #[serde(default)]
    pub status: ItemStatus,
    /// Vendor owning the product, if any
    #[serde(skip_serializing_if = "Option::is_none")]
    pub vendor_id: Option<String>,
    /// Customer asked for cancellation; awaiting staff review
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub cancel_requested: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub cancel_reason: Option<String>,
    /// Item has been reviewed by the customer
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub reviewed: bool,
}

impl OrderItem {
    pub fn new(
        product_id: impl Into<String>,
        name: impl Into<String>,
        price: f64,
        quantity: i32,
        vendor_id: Option<String>,
    ) -> Self {
        Self {
            item_id: uuid::Uuid::new_v4().to_string(),
            product_id: product_id.into(),
            name: name.into(),
            price,
            quantity,
            status: ItemStatus::NotProcessed,
            vendor_id,
            cancel_requested: false,
            cancel_reason: None,
            reviewed: false,
        }
    }

    /// Line total
    pub fn subtotal(&self) -> f64 {
        self.price * self.quantity as f64
    }
}

/// Order aggregate
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Order {
    #[serde(
        default,
        skip_serializing_if = "Option::is_none",
        with = "serde_helpers::option_record_id"
    )]
    pub id: Option<RecordId>,
    pub user_id: String,
    pub items: Vec<OrderItem>,
    #[serde(default)]
    pub status: OrderStatus,
    pub payment_method: PaymentMethod,
    #[serde(default)]
    pub payment_status: PaymentStatus,
    /// Provider-side order/intent id created at checkout (prepaid only)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment_intent_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub payment: Option<PaymentRecord>,
    #[serde(default, deserialize_with = "serde_helpers::bool_false")]
    pub is_paid: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub paid_at: Option<i64>,
    pub shipping_address: Address,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub tracking_number: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub manifest_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub delivery_status: Option<String>,
    pub total: f64,
    pub created_at: i64,
    pub updated_at: i64,
}

impl Order {
    /// Create a fresh pending order
    pub fn new(
        user_id: impl Into<String>,
        items: Vec<OrderItem>,
        shipping_address: Address,
        payment_method: PaymentMethod,
    ) -> Self {
        let now = shared::util::now_millis();
        let total = items.iter().map(OrderItem::subtotal).sum();
        Self {
            id: None,
            user_id: user_id.into(),
            items,
            status: OrderStatus::Pending,
            payment_method,
            payment_status: PaymentStatus::Unpaid,
            payment_intent_id: None,
            payment: None,
            is_paid: false,
            paid_at: None,
            shipping_address,
            tracking_number: None,
            manifest_id: None,
            delivery_status: None,
            total,
            created_at: now,
            updated_at: now,
        }
    }

    /// "order:xyz" string form of the record id
    pub fn id_string(&self) -> String {
        self.id.as_ref().map(|id| id.to_string()).unwrap_or_default()
    }

    /// Find an item by its subdocument id
    pub fn item(&self, item_id: &str) -> Option<&OrderItem> {
        self.items.iter().find(|item| item.item_id == item_id)
    }

    /// Mutable lookup by subdocument id
    pub fn item_mut(&mut self, item_id: &str) -> Option<&mut OrderItem> {
        self.items.iter_mut().find(|item| item.item_id == item_id)
    }
}
