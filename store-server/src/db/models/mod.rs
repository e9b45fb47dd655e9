//! Database models

pub mod cart;
pub mod content;
pub mod order;
pub mod pending_cod;
pub mod product;
pub mod serde_helpers;
pub mod user;
pub mod webhook_event;

pub use cart::{Cart, CartItem};
pub use content::StoreContent;
pub use order::{Address, Order, OrderItem, PaymentMethod, PaymentRecord, PaymentStatus};
pub use pending_cod::{COD_CODE_TTL_MS, COD_MAX_ATTEMPTS, PendingCodOrder};
pub use product::{Product, ProductCreate, ProductUpdate};
pub use user::{User, UserRole, Verification};
pub use webhook_event::WebhookEvent;
