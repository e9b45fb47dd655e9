//! Auth API Handlers: register, login, forgot-password, reset-password
//!
//! The reset path answers generically regardless of whether the email exists
//! to prevent account enumeration.

use axum::extract::{Json, State};
use serde::{Deserialize, Serialize};
use shared::error::{AppError, ErrorCode};
use validator::Validate;

use crate::api::{ApiResult, ok, ok_with_message};
use crate::auth::create_token;
use crate::db::models::{User, UserRole};
use crate::db::repository::{UserRepository, VerificationRepository};
use crate::email;
use crate::state::AppState;
use crate::util::{hash_password, verify_password};

const RESET_PURPOSE: &str = "password_reset";
const RESET_CODE_TTL_MS: i64 = 15 * 60 * 1000;
const RESET_MAX_ATTEMPTS: i32 = 3;

#[derive(Debug, Deserialize, Validate)]
pub struct RegisterRequest {
    #[validate(email)]
    pub email: String,
    #[validate(length(min = 8))]
    pub password: String,
    #[validate(length(min = 1))]
    pub name: String,
}

#[derive(Debug, Serialize)]
pub struct AuthResponse {
    pub token: String,
    pub user_id: String,
    pub email: String,
}

/// POST /api/auth/register
pub async fn register(
    State(state): State<AppState>,
    Json(req): Json<RegisterRequest>,
) -> ApiResult<AuthResponse> {
    req.validate()
        .map_err(|e| AppError::validation(e.to_string()))?;

    let email = req.email.trim().to_lowercase();
    let repo = UserRepository::new(state.db.clone());

    if repo.find_by_email(&email).await.map_err(AppError::from)?.is_some() {
        return Err(AppError::new(ErrorCode::EmailAlreadyRegistered));
    }

    let password_hash =
        hash_password(&req.password).map_err(|_| AppError::new(ErrorCode::InternalError))?;
    let user = repo
        .create(User {
            id: None,
            email: email.clone(),
            password_hash,
            name: req.name,
            role: UserRole::Customer,
            addresses: Vec::new(),
            is_disabled: false,
            created_at: shared::util::now_millis(),
        })
        .await
        .map_err(AppError::from)?;

    let user_id = user.id_string();
    let token = create_token(&user_id, &email, user.role, &state.jwt_secret)
        .map_err(|e| AppError::internal(format!("JWT creation failed: {e}")))?;

    tracing::info!(user_id = %user_id, "User registered");
    Ok(ok(AuthResponse {
        token,
        user_id,
        email,
    }))
}

#[derive(Debug, Deserialize)]
pub struct LoginRequest {
    pub email: String,
    pub password: String,
}

/// POST /api/auth/login
pub async fn login(
    State(state): State<AppState>,
    Json(req): Json<LoginRequest>,
) -> ApiResult<AuthResponse> {
    let email = req.email.trim().to_lowercase();
    let repo = UserRepository::new(state.db.clone());

    let user = repo
        .find_by_email(&email)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::InvalidCredentials))?;

    if !verify_password(&req.password, &user.password_hash) {
        return Err(AppError::new(ErrorCode::InvalidCredentials));
    }
    if user.is_disabled {
        return Err(AppError::new(ErrorCode::AccountDisabled));
    }

    let user_id = user.id_string();
    let token = create_token(&user_id, &user.email, user.role, &state.jwt_secret)
        .map_err(|e| AppError::internal(format!("JWT creation failed: {e}")))?;

    Ok(ok(AuthResponse {
        token,
        user_id,
        email: user.email,
    }))
}

#[derive(Debug, Deserialize)]
pub struct ForgotPasswordRequest {
    pub email: String,
}

/// POST /api/auth/forgot-password
pub async fn forgot_password(
    State(state): State<AppState>,
    Json(req): Json<ForgotPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let email = req.email.trim().to_lowercase();
    let generic = "If the email exists, a reset code has been sent";

    let users = UserRepository::new(state.db.clone());
    let user = match users.find_by_email(&email).await {
        Ok(Some(u)) => u,
        _ => return Ok(ok_with_message(serde_json::json!({}), generic)),
    };

    let code = shared::util::generate_code();
    let code_hash = hash_password(&code).map_err(|_| AppError::new(ErrorCode::InternalError))?;
    let now = shared::util::now_millis();

    let verifications = VerificationRepository::new(state.db.clone());
    let _ = verifications
        .upsert(&email, RESET_PURPOSE, &code_hash, now + RESET_CODE_TTL_MS, now)
        .await;

    let _ = email::send_password_reset_code(&state.ses, &state.ses_from_email, &user.email, &code)
        .await;

    Ok(ok_with_message(serde_json::json!({}), generic))
}

#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub code: String,
    pub new_password: String,
}

/// POST /api/auth/reset-password
pub async fn reset_password(
    State(state): State<AppState>,
    Json(req): Json<ResetPasswordRequest>,
) -> ApiResult<serde_json::Value> {
    let email = req.email.trim().to_lowercase();

    if req.new_password.len() < 8 {
        return Err(AppError::new(ErrorCode::PasswordTooShort));
    }

    let verifications = VerificationRepository::new(state.db.clone());
    let record = verifications
        .find(&email, RESET_PURPOSE)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::VerificationCodeInvalid))?;

    let now = shared::util::now_millis();
    if now > record.expires_at {
        return Err(AppError::new(ErrorCode::VerificationCodeExpired));
    }
    if record.attempts >= RESET_MAX_ATTEMPTS {
        return Err(AppError::new(ErrorCode::TooManyAttempts));
    }

    verifications
        .increment_attempts(&email, RESET_PURPOSE)
        .await
        .map_err(AppError::from)?;

    if !verify_password(&req.code, &record.code_hash) {
        return Err(AppError::new(ErrorCode::VerificationCodeInvalid));
    }

    let users = UserRepository::new(state.db.clone());
    let user = users
        .find_by_email(&email)
        .await
        .map_err(AppError::from)?
        .ok_or_else(|| AppError::new(ErrorCode::UserNotFound))?;

    let hashed =
        hash_password(&req.new_password).map_err(|_| AppError::new(ErrorCode::InternalError))?;
    users
        .update_password(&user.id_string(), &hashed)
        .await
        .map_err(AppError::from)?;

    let _ = verifications.delete(&email, RESET_PURPOSE).await;

    tracing::info!(user_id = %user.id_string(), "Password reset");
    Ok(ok_with_message(
        serde_json::json!({}),
        "Password has been reset",
    ))
}
