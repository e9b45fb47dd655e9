//! JWT authentication
//!
//! Bearer-token auth for customer and staff routes. Handlers take
//! [`CurrentUser`] as an extractor; role gates are explicit helper calls.

use axum::{extract::FromRequestParts, http::request::Parts};
use jsonwebtoken::{DecodingKey, EncodingKey, Header, Validation};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};

use crate::db::models::UserRole;
use crate::state::AppState;

const JWT_EXPIRY_HOURS: i64 = 24;

/// JWT claims
#[derive(Debug, Serialize, Deserialize)]
pub struct Claims {
    /// User id ("user:abc")
    pub sub: String,
    pub email: String,
    pub role: UserRole,
    /// Expiration (Unix timestamp seconds)
    pub exp: usize,
    /// Issued at (Unix timestamp seconds)
    pub iat: usize,
}

/// Authenticated identity extracted from the JWT
#[derive(Debug, Clone)]
pub struct CurrentUser {
    pub user_id: String,
    pub email: String,
    pub role: UserRole,
}

impl CurrentUser {
    /// Staff/admin gate for the admin surface
    pub fn ensure_staff(&self) -> Result<(), AppError> {
        if self.role.is_staff() {
            Ok(())
        } else {
            Err(AppError::new(ErrorCode::StaffRequired))
        }
    }
}

/// Create a JWT for a user
pub fn create_token(
    user_id: &str,
    email: &str,
    role: UserRole,
    secret: &str,
) -> Result<String, jsonwebtoken::errors::Error> {
    let now = chrono::Utc::now();
    let claims = Claims {
        sub: user_id.to_string(),
        email: email.to_string(),
        role,
        exp: (now + chrono::Duration::hours(JWT_EXPIRY_HOURS)).timestamp() as usize,
        iat: now.timestamp() as usize,
    };

    jsonwebtoken::encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(secret.as_bytes()),
    )
}

/// Decode and validate a JWT
pub fn decode_token(token: &str, secret: &str) -> Result<Claims, AppError> {
    jsonwebtoken::decode::<Claims>(
        token,
        &DecodingKey::from_secret(secret.as_bytes()),
        &Validation::default(),
    )
    .map(|data| data.claims)
    .map_err(|e| match e.kind() {
        jsonwebtoken::errors::ErrorKind::ExpiredSignature => {
            AppError::new(ErrorCode::TokenExpired)
        }
        _ => AppError::new(ErrorCode::TokenInvalid),
    })
}

impl FromRequestParts<AppState> for CurrentUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        // Reuse if another extractor already validated this request
        if let Some(user) = parts.extensions.get::<CurrentUser>() {
            return Ok(user.clone());
        }

        let auth_header = parts
            .headers
            .get(http::header::AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .ok_or_else(|| AppError::new(ErrorCode::NotAuthenticated))?;

        let token = auth_header
            .strip_prefix("Bearer ")
            .ok_or_else(|| AppError::new(ErrorCode::TokenInvalid))?;

        let claims = decode_token(token, &state.jwt_secret)?;

        let user = CurrentUser {
            user_id: claims.sub,
            email: claims.email,
            role: claims.role,
        };
        parts.extensions.insert(user.clone());
        Ok(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_token_roundtrip() {
        let token = create_token("user:u1", "a@example.com", UserRole::Customer, "secret").unwrap();
        let claims = decode_token(&token, "secret").unwrap();
        assert_eq!(claims.sub, "user:u1");
        assert_eq!(claims.email, "a@example.com");
        assert_eq!(claims.role, UserRole::Customer);
    }

    #[test]
    fn test_wrong_secret_rejected() {
        let token = create_token("user:u1", "a@example.com", UserRole::Staff, "secret").unwrap();
        let err = decode_token(&token, "other").unwrap_err();
        assert_eq!(err.code, ErrorCode::TokenInvalid);
    }

    #[test]
    fn test_staff_gate() {
        let staff = CurrentUser {
            user_id: "user:s1".to_string(),
            email: "s@example.com".to_string(),
            role: UserRole::Staff,
        };
        assert!(staff.ensure_staff().is_ok());

        let customer = CurrentUser {
            user_id: "user:c1".to_string(),
            email: "c@example.com".to_string(),
            role: UserRole::Customer,
        };
        let err = customer.ensure_staff().unwrap_err();
        assert_eq!(err.code, ErrorCode::StaffRequired);
    }
}
