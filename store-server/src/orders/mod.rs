//! Order domain logic
//!
//! - [`admin_view`] - legacy dual-shape serialization adapter
//! - [`sync`] - per-item status updates + order-level rollup
//! - [`cancel`] - cancellation rules
//! - [`payment`] - webhook-driven payment confirmation

pub mod admin_view;
pub mod cancel;
pub mod payment;
pub mod sync;

pub use admin_view::AdminOrderView;
pub use payment::PaymentResult;
