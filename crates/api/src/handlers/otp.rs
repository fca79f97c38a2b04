//! Handlers for one-time code flows under `/auth/otp`.

use axum::extract::State;
use axum::http::StatusCode;
use axum::Json;
use jotbook_core::credentials::{
    name_from_email, normalize_email, validate_email, validate_password,
};
use jotbook_core::error::CoreError;
use jotbook_core::otp::OtpPurpose;
use jotbook_db::models::user::CreateUser;
use jotbook_db::repositories::{RefreshSessionRepo, UserRepo};
use serde::Deserialize;

use super::auth::{create_auth_response, AuthResponse};
use crate::auth::otp::{issue_code, verify_code};
use crate::auth::password::hash_password;
use crate::error::{AppError, AppResult};
use crate::state::AppState;

const INVALID_CODE: &str = "Invalid or expired code";

/// Request body for `POST /auth/otp/send`.
#[derive(Debug, Deserialize)]
pub struct SendCodeRequest {
    pub email: String,
    pub purpose: OtpPurpose,
}

/// Request body for `POST /auth/otp/verify-email` and `POST /auth/otp/sign-in`.
#[derive(Debug, Deserialize)]
pub struct VerifyCodeRequest {
    pub email: String,
    pub otp: String,
}

/// Request body for `POST /auth/otp/reset-password`.
#[derive(Debug, Deserialize)]
pub struct ResetPasswordRequest {
    pub email: String,
    pub otp: String,
    pub password: String,
}

fn invalid_code() -> AppError {
    AppError::Core(CoreError::Unauthorized(INVALID_CODE.into()))
}

/// POST /api/v1/auth/otp/send
///
/// Always 202 for a well-formed email, so the response does not reveal
/// whether an account exists.
pub async fn send_code(
    State(state): State<AppState>,
    Json(input): Json<SendCodeRequest>,
) -> AppResult<StatusCode> {
    validate_email(&input.email).map_err(CoreError::validation)?;
    let email = normalize_email(&input.email);

    // Sign-in codes may create an account; the others need one.
    let deliver = match input.purpose {
        OtpPurpose::SignIn => true,
        OtpPurpose::EmailVerification | OtpPurpose::ForgetPassword => {
            UserRepo::find_by_email(&state.pool, &email).await?.is_some()
        }
    };

    if deliver {
        issue_code(
            &state.pool,
            state.notifier.clone(),
            &state.config.otp,
            &email,
            input.purpose,
        )
        .await?;
    } else {
        tracing::debug!(purpose = %input.purpose, "No account for code request");
    }

    Ok(StatusCode::ACCEPTED)
}

/// POST /api/v1/auth/otp/verify-email
pub async fn verify_email(
    State(state): State<AppState>,
    Json(input): Json<VerifyCodeRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);
    if !verify_code(
        &state.pool,
        &state.config.otp,
        &email,
        OtpPurpose::EmailVerification,
        &input.otp,
    )
    .await?
    {
        return Err(invalid_code());
    }

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_code)?;
    let user = UserRepo::mark_email_verified(&state.pool, user.id)
        .await?
        .ok_or_else(invalid_code)?;
    tracing::info!(user_id = user.id, "Email verified");

    Ok(Json(create_auth_response(&state, &user).await?))
}

/// POST /api/v1/auth/otp/sign-in
///
/// Signs in with a code, creating the account on first use.
pub async fn sign_in(
    State(state): State<AppState>,
    Json(input): Json<VerifyCodeRequest>,
) -> AppResult<Json<AuthResponse>> {
    let email = normalize_email(&input.email);
    if !verify_code(
        &state.pool,
        &state.config.otp,
        &email,
        OtpPurpose::SignIn,
        &input.otp,
    )
    .await?
    {
        return Err(invalid_code());
    }

    let user = match UserRepo::find_by_email(&state.pool, &email).await? {
        Some(user) if user.email_verified => user,
        Some(user) => UserRepo::mark_email_verified(&state.pool, user.id)
            .await?
            .ok_or_else(invalid_code)?,
        None => {
            let user = UserRepo::create(
                &state.pool,
                &CreateUser {
                    name: name_from_email(&email),
                    email,
                    password_hash: None,
                    email_verified: true,
                    google_subject: None,
                },
            )
            .await?;
            tracing::info!(user_id = user.id, "User created by one-time code sign-in");
            user
        }
    };

    Ok(Json(create_auth_response(&state, &user).await?))
}

/// POST /api/v1/auth/otp/reset-password
///
/// Sets a new password and signs the account out everywhere. Returns 204.
pub async fn reset_password(
    State(state): State<AppState>,
    Json(input): Json<ResetPasswordRequest>,
) -> AppResult<StatusCode> {
    validate_password(&input.password).map_err(CoreError::validation)?;

    let email = normalize_email(&input.email);
    if !verify_code(
        &state.pool,
        &state.config.otp,
        &email,
        OtpPurpose::ForgetPassword,
        &input.otp,
    )
    .await?
    {
        return Err(invalid_code());
    }

    let user = UserRepo::find_by_email(&state.pool, &email)
        .await?
        .ok_or_else(invalid_code)?;

    let password_hash = hash_password(&input.password)
        .map_err(|e| AppError::InternalError(format!("Password hashing error: {e}")))?;
    UserRepo::update_password(&state.pool, user.id, &password_hash).await?;
    let revoked = RefreshSessionRepo::revoke_all_for_user(&state.pool, user.id).await?;
    tracing::info!(user_id = user.id, revoked, "Password reset");

    Ok(StatusCode::NO_CONTENT)
}
