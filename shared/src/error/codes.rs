//! Unified error codes for the storefront
//!
//! Error codes are shared by the server and its clients and are organized by
//! category:
//! - 0xxx: General errors
//! - 1xxx: Authentication errors
//! - 2xxx: Permission errors
//! - 3xxx: Account / verification errors
//! - 4xxx: Order and cart errors
//! - 5xxx: Payment errors
//! - 6xxx: Product errors
//! - 7xxx: Delivery errors
//! - 9xxx: System errors

use serde::{Deserialize, Serialize};
use std::fmt;

/// Unified error code enum
///
/// All error codes are represented as u16 values for efficient serialization
/// and cross-language compatibility (Rust, TypeScript, etc.)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(into = "u16", try_from = "u16")]
#[repr(u16)]
pub enum ErrorCode {
    // ==================== 0xxx: General ====================
    /// Operation completed successfully
    Success = 0,
    /// Unknown error
    Unknown = 1,
    /// Validation failed
    ValidationFailed = 2,
    /// Resource not found
    NotFound = 3,
    /// Resource already exists
    AlreadyExists = 4,
    /// Invalid request
    InvalidRequest = 5,
    /// Invalid format
    InvalidFormat = 6,
    /// Required field missing
    RequiredField = 7,

    // ==================== 1xxx: Auth ====================
    /// User is not authenticated
    NotAuthenticated = 1001,
    /// Invalid credentials (email/password)
    InvalidCredentials = 1002,
    /// Token has expired
    TokenExpired = 1003,
    /// Token is invalid
    TokenInvalid = 1004,
    /// Account is disabled
    AccountDisabled = 1005,

    // ==================== 2xxx: Permission ====================
    /// Permission denied
    PermissionDenied = 2001,
    /// Staff role required
    StaffRequired = 2002,
    /// Admin role required
    AdminRequired = 2003,

    // ==================== 3xxx: Account / Verification ====================
    /// User not found
    UserNotFound = 3001,
    /// Email is already registered
    EmailAlreadyRegistered = 3002,
    /// Verification code expired
    VerificationCodeExpired = 3003,
    /// Verification code invalid
    VerificationCodeInvalid = 3004,
    /// Too many verification attempts
    TooManyAttempts = 3005,
    /// Password too short
    PasswordTooShort = 3006,
    /// COD verification failed (deliberately generic)
    CodVerificationFailed = 3007,

    // ==================== 4xxx: Order / Cart ====================
    /// Order not found
    OrderNotFound = 4001,
    /// Order has already been paid
    OrderAlreadyPaid = 4002,
    /// Order has already been cancelled
    OrderAlreadyCancelled = 4003,
    /// Order item not found
    OrderItemNotFound = 4004,
    /// Order cannot be cancelled in its current state
    OrderNotCancellable = 4005,
    /// Order is empty
    OrderEmpty = 4006,
    /// Cart is empty
    CartEmpty = 4101,
    /// Cart item not found
    CartItemNotFound = 4102,

    // ==================== 5xxx: Payment ====================
    /// Payment processing failed
    PaymentFailed = 5001,
    /// Webhook signature verification failed
    WebhookSignatureInvalid = 5002,
    /// Webhook signing secret is not configured
    WebhookSecretMissing = 5003,
    /// Payment provider call failed
    PaymentProviderError = 5004,
    /// Webhook payload missing the order reference
    MissingOrderReference = 5005,
    /// Invalid payment method
    PaymentInvalidMethod = 5006,

    // ==================== 6xxx: Product ====================
    /// Product not found
    ProductNotFound = 6001,
    /// Product is inactive
    ProductInactive = 6002,
    /// Product is out of stock
    ProductOutOfStock = 6003,

    // ==================== 7xxx: Delivery ====================
    /// Shipping partner call failed
    ShippingPartnerError = 7001,
    /// Shipment already created for this order
    ShipmentAlreadyCreated = 7002,

    // ==================== 9xxx: System ====================
    /// Internal server error
    InternalError = 9001,
    /// Database error
    DatabaseError = 9002,
    /// Email delivery failed
    EmailSendFailed = 9003,
    /// Configuration error
    ConfigError = 9004,
}

impl ErrorCode {
    /// Get the numeric code value
    #[inline]
    pub const fn code(&self) -> u16 {
        *self as u16
    }

    /// Check if this is a success code
    #[inline]
    pub const fn is_success(&self) -> bool {
        matches!(self, ErrorCode::Success)
    }

    /// Get the developer-facing English message for this error code
    pub const fn message(&self) -> &'static str {
        match self {
            // General
            ErrorCode::Success => "Operation completed successfully",
            ErrorCode::Unknown => "An unknown error occurred",
            ErrorCode::ValidationFailed => "Validation failed",
            ErrorCode::NotFound => "Resource not found",
            ErrorCode::AlreadyExists => "Resource already exists",
            ErrorCode::InvalidRequest => "Invalid request",
            ErrorCode::InvalidFormat => "Invalid format",
            ErrorCode::RequiredField => "Required field is missing",

            // Auth
            ErrorCode::NotAuthenticated => "User is not authenticated",
            ErrorCode::InvalidCredentials => "Invalid email or password",
            ErrorCode::TokenExpired => "Authentication token has expired",
            ErrorCode::TokenInvalid => "Authentication token is invalid",
            ErrorCode::AccountDisabled => "Account is disabled",

            // Permission
            ErrorCode::PermissionDenied => "Permission denied",
            ErrorCode::StaffRequired => "Staff role is required",
            ErrorCode::AdminRequired => "Administrator role is required",

            // Account / Verification
            ErrorCode::UserNotFound => "User not found",
            ErrorCode::EmailAlreadyRegistered => "Email is already registered",
            ErrorCode::VerificationCodeExpired => "Verification code has expired",
            ErrorCode::VerificationCodeInvalid => "Invalid verification code",
            ErrorCode::TooManyAttempts => "Too many attempts",
            ErrorCode::PasswordTooShort => "Password must be at least 8 characters",
            ErrorCode::CodVerificationFailed => "Verification failed",

            // Order / Cart
            ErrorCode::OrderNotFound => "Order not found",
            ErrorCode::OrderAlreadyPaid => "Order has already been paid",
            ErrorCode::OrderAlreadyCancelled => "Order has already been cancelled",
            ErrorCode::OrderItemNotFound => "Order item not found",
            ErrorCode::OrderNotCancellable => "Order cannot be cancelled in its current state",
            ErrorCode::OrderEmpty => "Order is empty",
            ErrorCode::CartEmpty => "Cart is empty",
            ErrorCode::CartItemNotFound => "Cart item not found",

            // Payment
            ErrorCode::PaymentFailed => "Payment processing failed",
            ErrorCode::WebhookSignatureInvalid => "Webhook signature verification failed",
            ErrorCode::WebhookSecretMissing => "Webhook signing secret is not configured",
            ErrorCode::PaymentProviderError => "Payment provider call failed",
            ErrorCode::MissingOrderReference => "missing order_id",
            ErrorCode::PaymentInvalidMethod => "Invalid payment method",

            // Product
            ErrorCode::ProductNotFound => "Product not found",
            ErrorCode::ProductInactive => "Product is inactive",
            ErrorCode::ProductOutOfStock => "Product is out of stock",

            // Delivery
            ErrorCode::ShippingPartnerError => "Shipping partner call failed",
            ErrorCode::ShipmentAlreadyCreated => "Shipment already created for this order",

            // System
            ErrorCode::InternalError => "Internal server error",
            ErrorCode::DatabaseError => "Database error",
            ErrorCode::EmailSendFailed => "Email delivery failed",
            ErrorCode::ConfigError => "Configuration error",
        }
    }
}

impl From<ErrorCode> for u16 {
    #[inline]
    fn from(code: ErrorCode) -> Self {
        code.code()
    }
}

/// Error when converting from an invalid u16 to ErrorCode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InvalidErrorCode(pub u16);

impl fmt::Display for InvalidErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "invalid error code: {}", self.0)
    }
}

impl std::error::Error for InvalidErrorCode {}

impl TryFrom<u16> for ErrorCode {
    type Error = InvalidErrorCode;

    fn try_from(value: u16) -> Result<Self, Self::Error> {
        match value {
            // General
            0 => Ok(ErrorCode::Success),
            1 => Ok(ErrorCode::Unknown),
            2 => Ok(ErrorCode::ValidationFailed),
            3 => Ok(ErrorCode::NotFound),
            4 => Ok(ErrorCode::AlreadyExists),
            5 => Ok(ErrorCode::InvalidRequest),
            6 => Ok(ErrorCode::InvalidFormat),
            7 => Ok(ErrorCode::RequiredField),

            // Auth
            1001 => Ok(ErrorCode::NotAuthenticated),
            1002 => Ok(ErrorCode::InvalidCredentials),
            1003 => Ok(ErrorCode::TokenExpired),
            1004 => Ok(ErrorCode::TokenInvalid),
            1005 => Ok(ErrorCode::AccountDisabled),

            // Permission
            2001 => Ok(ErrorCode::PermissionDenied),
            2002 => Ok(ErrorCode::StaffRequired),
            2003 => Ok(ErrorCode::AdminRequired),

            // Account / Verification
            3001 => Ok(ErrorCode::UserNotFound),
            3002 => Ok(ErrorCode::EmailAlreadyRegistered),
            3003 => Ok(ErrorCode::VerificationCodeExpired),
            3004 => Ok(ErrorCode::VerificationCodeInvalid),
            3005 => Ok(ErrorCode::TooManyAttempts),
            3006 => Ok(ErrorCode::PasswordTooShort),
            3007 => Ok(ErrorCode::CodVerificationFailed),

            // Order / Cart
            4001 => Ok(ErrorCode::OrderNotFound),
            4002 => Ok(ErrorCode::OrderAlreadyPaid),
            4003 => Ok(ErrorCode::OrderAlreadyCancelled),
            4004 => Ok(ErrorCode::OrderItemNotFound),
            4005 => Ok(ErrorCode::OrderNotCancellable),
            4006 => Ok(ErrorCode::OrderEmpty),
            4101 => Ok(ErrorCode::CartEmpty),
            4102 => Ok(ErrorCode::CartItemNotFound),

            // Payment
            5001 => Ok(ErrorCode::PaymentFailed),
            5002 => Ok(ErrorCode::WebhookSignatureInvalid),
            5003 => Ok(ErrorCode::WebhookSecretMissing),
            5004 => Ok(ErrorCode::PaymentProviderError),
            5005 => Ok(ErrorCode::MissingOrderReference),
            5006 => Ok(ErrorCode::PaymentInvalidMethod),

            // Product
            6001 => Ok(ErrorCode::ProductNotFound),
            6002 => Ok(ErrorCode::ProductInactive),
            6003 => Ok(ErrorCode::ProductOutOfStock),

            // Delivery
            7001 => Ok(ErrorCode::ShippingPartnerError),
            7002 => Ok(ErrorCode::ShipmentAlreadyCreated),

            // System
            9001 => Ok(ErrorCode::InternalError),
            9002 => Ok(ErrorCode::DatabaseError),
            9003 => Ok(ErrorCode::EmailSendFailed),
            9004 => Ok(ErrorCode::ConfigError),

            other => Err(InvalidErrorCode(other)),
        }
    }
}

impl fmt::Display for ErrorCode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.code())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_code_roundtrip() {
        for code in [
            ErrorCode::Success,
            ErrorCode::NotAuthenticated,
            ErrorCode::PermissionDenied,
            ErrorCode::CodVerificationFailed,
            ErrorCode::OrderNotFound,
            ErrorCode::WebhookSignatureInvalid,
            ErrorCode::ProductNotFound,
            ErrorCode::ShippingPartnerError,
            ErrorCode::InternalError,
        ] {
            assert_eq!(ErrorCode::try_from(code.code()), Ok(code));
        }
    }

    #[test]
    fn test_invalid_code() {
        assert_eq!(ErrorCode::try_from(12345), Err(InvalidErrorCode(12345)));
    }

    #[test]
    fn test_serialize_as_u16() {
        let json = serde_json::to_string(&ErrorCode::OrderNotFound).unwrap();
        assert_eq!(json, "4001");
        let code: ErrorCode = serde_json::from_str("4001").unwrap();
        assert_eq!(code, ErrorCode::OrderNotFound);
    }
}
