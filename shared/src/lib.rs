//! Shared types for the storefront
//!
//! Common types used across crates: error codes, the API response envelope,
//! the canonical order/item status vocabularies, and small utilities.

pub mod error;
pub mod status;
pub mod util;

// Re-exports
pub use serde::{Deserialize, Serialize};
