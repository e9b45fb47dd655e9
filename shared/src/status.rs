//! Canonical order and item status vocabularies
//!
//! The storefront historically spoke two status dialects: a lowercase
//! "website" vocabulary used by customer-facing code (`pending`, `shipped`,
//! `refunded`, ...) and a titlecase "admin" vocabulary used by staff-facing
//! code (`Not Processed`, `Dispatched`, `Processing Refund`, ...). Both are
//! kept as serialization formats only; everything in the system compares and
//! stores the canonical enums defined here.
//!
//! Parsing is total: an unrecognized status string coerces to the default
//! (`Pending` / `Not Processed`) instead of failing. Callers that need to
//! distinguish "unknown" from "default" use the `parse_*` variants returning
//! `Option`.

use serde::{Deserialize, Serialize};

/// Order-level status (canonical)
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum OrderStatus {
    /// Placed, payment not confirmed
    #[default]
    Pending,
    /// Paid / being prepared
    Processing,
    /// Handed to the delivery partner
    Dispatched,
    /// Delivered to the customer
    Delivered,
    /// Cancelled before dispatch
    Cancelled,
    /// Refund in progress
    Refunded,
    /// Fully settled
    Completed,
}

impl OrderStatus {
    /// All known statuses, in lifecycle order
    pub const ALL: [OrderStatus; 7] = [
        OrderStatus::Pending,
        OrderStatus::Processing,
        OrderStatus::Dispatched,
        OrderStatus::Delivered,
        OrderStatus::Cancelled,
        OrderStatus::Refunded,
        OrderStatus::Completed,
    ];

    /// Customer-facing ("website") rendering
    pub const fn website_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "pending",
            OrderStatus::Processing => "processing",
            OrderStatus::Dispatched => "shipped",
            OrderStatus::Delivered => "delivered",
            OrderStatus::Cancelled => "cancelled",
            OrderStatus::Refunded => "refunded",
            OrderStatus::Completed => "completed",
        }
    }

    /// Staff-facing ("admin") rendering
    pub const fn admin_str(&self) -> &'static str {
        match self {
            OrderStatus::Pending => "Not Processed",
            OrderStatus::Processing => "Processing",
            OrderStatus::Dispatched => "Dispatched",
            OrderStatus::Delivered => "Delivered",
            OrderStatus::Cancelled => "Cancelled",
            OrderStatus::Refunded => "Processing Refund",
            OrderStatus::Completed => "Completed",
        }
    }

    /// Parse a website-vocabulary status string
    pub fn parse_website(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.website_str().eq_ignore_ascii_case(s))
    }

    /// Parse an admin-vocabulary status string
    pub fn parse_admin(s: &str) -> Option<Self> {
        Self::ALL
            .into_iter()
            .find(|status| status.admin_str().eq_ignore_ascii_case(s))
    }

    /// Parse a status string in either vocabulary, any casing
    pub fn parse_any(s: &str) -> Option<Self> {
        Self::parse_website(s).or_else(|| Self::parse_admin(s))
    }

    /// Total parse from website vocabulary; unknown input coerces to Pending
    pub fn from_website(s: &str) -> Self {
        Self::parse_website(s).unwrap_or_default()
    }

    /// Total parse from admin vocabulary; unknown input coerces to Pending
    pub fn from_admin(s: &str) -> Self {
        Self::parse_admin(s).unwrap_or_default()
    }

    /// Terminal states never transition again
    pub const fn is_terminal(&self) -> bool {
        matches!(
            self,
            OrderStatus::Delivered
                | OrderStatus::Completed
                | OrderStatus::Cancelled
                | OrderStatus::Refunded
        )
    }
}

/// Map a website-vocabulary status string to the admin vocabulary.
///
/// Unknown input maps to "Not Processed" rather than erroring.
pub fn map_website_status_to_admin(status: &str) -> &'static str {
    OrderStatus::from_website(status).admin_str()
}

/// Map an admin-vocabulary status string to the website vocabulary.
///
/// Unknown input maps to "pending" rather than erroring.
pub fn map_admin_status_to_website(status: &str) -> &'static str {
    OrderStatus::from_admin(status).website_str()
}

/// Per-line-item status (canonical)
///
/// Items carry a slightly wider vocabulary than orders: `Confirmed` sits
/// between `Processing` and `Dispatched` and only exists at item level.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ItemStatus {
    #[default]
    NotProcessed,
    Processing,
    Confirmed,
    Dispatched,
    Delivered,
    Completed,
    Cancelled,
}

impl ItemStatus {
    /// All known item statuses
    pub const ALL: [ItemStatus; 7] = [
        ItemStatus::NotProcessed,
        ItemStatus::Processing,
        ItemStatus::Confirmed,
        ItemStatus::Dispatched,
        ItemStatus::Delivered,
        ItemStatus::Completed,
        ItemStatus::Cancelled,
    ];

    /// Staff-facing rendering (the item status wire format)
    pub const fn admin_str(&self) -> &'static str {
        match self {
            ItemStatus::NotProcessed => "Not Processed",
            ItemStatus::Processing => "Processing",
            ItemStatus::Confirmed => "Confirmed",
            ItemStatus::Dispatched => "Dispatched",
            ItemStatus::Delivered => "Delivered",
            ItemStatus::Completed => "Completed",
            ItemStatus::Cancelled => "Cancelled",
        }
    }

    /// Parse an item status in any casing; accepts the website synonym
    /// "shipped" for Dispatched and "pending" for Not Processed.
    pub fn parse(s: &str) -> Option<Self> {
        if let Some(status) = Self::ALL
            .into_iter()
            .find(|status| status.admin_str().eq_ignore_ascii_case(s))
        {
            return Some(status);
        }
        match s.to_ascii_lowercase().as_str() {
            "pending" => Some(ItemStatus::NotProcessed),
            "shipped" => Some(ItemStatus::Dispatched),
            _ => None,
        }
    }

    /// Total parse; unknown input coerces to Not Processed
    pub fn parse_lossy(s: &str) -> Self {
        Self::parse(s).unwrap_or_default()
    }

    /// An item may only be cancelled before it has been prepared for dispatch
    pub const fn is_cancellable(&self) -> bool {
        matches!(
            self,
            ItemStatus::NotProcessed | ItemStatus::Processing | ItemStatus::Confirmed
        )
    }

    /// An item this far along blocks whole-order cancellation
    pub const fn blocks_order_cancellation(&self) -> bool {
        matches!(
            self,
            ItemStatus::Dispatched | ItemStatus::Delivered | ItemStatus::Completed
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_website_admin_roundtrip() {
        for status in OrderStatus::ALL {
            let admin = map_website_status_to_admin(status.website_str());
            assert_eq!(map_admin_status_to_website(admin), status.website_str());
        }
    }

    #[test]
    fn test_admin_website_roundtrip() {
        for status in OrderStatus::ALL {
            let website = map_admin_status_to_website(status.admin_str());
            assert_eq!(map_website_status_to_admin(website), status.admin_str());
        }
    }

    #[test]
    fn test_unknown_status_maps_to_default() {
        assert_eq!(map_website_status_to_admin("warehoused"), "Not Processed");
        assert_eq!(map_admin_status_to_website("Warehoused"), "pending");
        assert_eq!(map_website_status_to_admin(""), "Not Processed");
    }

    #[test]
    fn test_parse_any_accepts_both_vocabularies() {
        assert_eq!(OrderStatus::parse_any("shipped"), Some(OrderStatus::Dispatched));
        assert_eq!(OrderStatus::parse_any("Dispatched"), Some(OrderStatus::Dispatched));
        assert_eq!(
            OrderStatus::parse_any("processing refund"),
            Some(OrderStatus::Refunded)
        );
        assert_eq!(OrderStatus::parse_any("bogus"), None);
    }

    #[test]
    fn test_item_status_parse_any_casing() {
        // The original code compared "cancelled" in one route and "Cancelled"
        // in another; the canonical parse accepts both.
        assert_eq!(ItemStatus::parse("cancelled"), Some(ItemStatus::Cancelled));
        assert_eq!(ItemStatus::parse("Cancelled"), Some(ItemStatus::Cancelled));
        assert_eq!(ItemStatus::parse("not processed"), Some(ItemStatus::NotProcessed));
        assert_eq!(ItemStatus::parse("shipped"), Some(ItemStatus::Dispatched));
        assert_eq!(ItemStatus::parse("nope"), None);
        assert_eq!(ItemStatus::parse_lossy("nope"), ItemStatus::NotProcessed);
    }

    #[test]
    fn test_item_cancellation_rules() {
        assert!(ItemStatus::NotProcessed.is_cancellable());
        assert!(ItemStatus::Processing.is_cancellable());
        assert!(ItemStatus::Confirmed.is_cancellable());
        assert!(!ItemStatus::Dispatched.is_cancellable());
        assert!(!ItemStatus::Delivered.is_cancellable());

        assert!(ItemStatus::Dispatched.blocks_order_cancellation());
        assert!(ItemStatus::Delivered.blocks_order_cancellation());
        assert!(ItemStatus::Completed.blocks_order_cancellation());
        assert!(!ItemStatus::Cancelled.blocks_order_cancellation());
        assert!(!ItemStatus::Processing.blocks_order_cancellation());
    }

    #[test]
    fn test_terminal_states() {
        assert!(OrderStatus::Delivered.is_terminal());
        assert!(OrderStatus::Cancelled.is_terminal());
        assert!(!OrderStatus::Pending.is_terminal());
        assert!(!OrderStatus::Dispatched.is_terminal());
    }
}
