//! HTTP status code mapping for error codes

use super::codes::ErrorCode;
use http::StatusCode;

impl ErrorCode {
    /// Get the appropriate HTTP status code for this error code
    pub fn http_status(&self) -> StatusCode {
        match self {
            // Success
            Self::Success => StatusCode::OK,

            // 404 Not Found
            Self::NotFound
            | Self::UserNotFound
            | Self::OrderNotFound
            | Self::OrderItemNotFound
            | Self::CartItemNotFound
            | Self::ProductNotFound => StatusCode::NOT_FOUND,

            // 409 Conflict
            Self::AlreadyExists
            | Self::EmailAlreadyRegistered
            | Self::OrderAlreadyPaid
            | Self::OrderAlreadyCancelled
            | Self::ShipmentAlreadyCreated => StatusCode::CONFLICT,

            // 401 Unauthorized
            Self::NotAuthenticated
            | Self::InvalidCredentials
            | Self::TokenExpired
            | Self::TokenInvalid
            | Self::AccountDisabled => StatusCode::UNAUTHORIZED,

            // 403 Forbidden
            Self::PermissionDenied | Self::StaffRequired | Self::AdminRequired => {
                StatusCode::FORBIDDEN
            }

            // 422 Unprocessable Entity (generic, fail-closed verification)
            Self::CodVerificationFailed => StatusCode::UNPROCESSABLE_ENTITY,

            // 500 Internal Server Error
            Self::InternalError
            | Self::DatabaseError
            | Self::EmailSendFailed
            | Self::ConfigError
            | Self::WebhookSecretMissing
            | Self::PaymentProviderError
            | Self::PaymentFailed
            | Self::ShippingPartnerError => StatusCode::INTERNAL_SERVER_ERROR,

            // 400 Bad Request (default for validation/business errors)
            _ => StatusCode::BAD_REQUEST,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_http_status_mapping() {
        assert_eq!(
            ErrorCode::OrderNotFound.http_status(),
            StatusCode::NOT_FOUND
        );
        assert_eq!(
            ErrorCode::WebhookSignatureInvalid.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::WebhookSecretMissing.http_status(),
            StatusCode::INTERNAL_SERVER_ERROR
        );
        assert_eq!(
            ErrorCode::MissingOrderReference.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::OrderNotCancellable.http_status(),
            StatusCode::BAD_REQUEST
        );
        assert_eq!(
            ErrorCode::CodVerificationFailed.http_status(),
            StatusCode::UNPROCESSABLE_ENTITY
        );
    }
}
