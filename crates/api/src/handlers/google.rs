//! Handlers for Google sign-in under `/auth/google`.

use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Redirect, Response};
use axum::Json;
use chrono::Utc;
use jotbook_core::credentials::{name_from_email, normalize_email};
use jotbook_core::error::CoreError;
use jotbook_core::oauth_state::{sign_state, verify_state};
use jotbook_db::models::user::{CreateUser, User};
use jotbook_db::repositories::UserRepo;
use serde::Deserialize;
use sqlx::PgPool;

use super::auth::create_auth_response;
use crate::auth::google::{authorize_url, fetch_user_info, GoogleUserInfo, STATE_TTL_SECS};
use crate::error::{error_response, AppError, AppResult};
use crate::state::AppState;

/// Query string Google appends to the callback.
#[derive(Debug, Deserialize)]
pub struct CallbackQuery {
    pub code: Option<String>,
    pub state: Option<String>,
    /// Set instead of `code` when the user declines consent.
    pub error: Option<String>,
}

const UNVERIFIED_LINK_MESSAGE: &str =
    "Email is already registered; verify it with Google to link accounts";

fn not_configured() -> Response {
    error_response(
        StatusCode::NOT_FOUND,
        "NOT_FOUND",
        "Google sign-in is not configured",
    )
}

/// GET /api/v1/auth/google
///
/// 307 to Google's consent screen.
pub async fn start(State(state): State<AppState>) -> AppResult<Response> {
    let Some(google) = state.config.google.as_ref() else {
        return Ok(not_configured());
    };

    let oauth_state = sign_state(
        &state.config.jwt.secret,
        Utc::now().timestamp() + STATE_TTL_SECS,
    );
    let url = authorize_url(google, &oauth_state)
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    Ok(Redirect::temporary(url.as_str()).into_response())
}

/// GET /api/v1/auth/google/callback
pub async fn callback(
    State(state): State<AppState>,
    Query(query): Query<CallbackQuery>,
) -> AppResult<Response> {
    let Some(google) = state.config.google.as_ref() else {
        return Ok(not_configured());
    };

    if let Some(error) = query.error {
        return Err(AppError::BadRequest(format!("Google sign-in failed: {error}")));
    }
    let (Some(code), Some(oauth_state)) = (query.code, query.state) else {
        return Err(AppError::BadRequest("Missing code or state".into()));
    };

    verify_state(&state.config.jwt.secret, &oauth_state, Utc::now().timestamp()).map_err(
        |e| {
            tracing::debug!(error = %e, "Rejected OAuth state");
            AppError::Core(CoreError::Unauthorized("Invalid OAuth state".into()))
        },
    )?;

    let info = fetch_user_info(&state.http, google, &code)
        .await
        .map_err(|e| AppError::InternalError(e.to_string()))?;

    let user = find_or_create_user(&state.pool, info).await?;
    Ok(Json(create_auth_response(&state, &user).await?).into_response())
}

/// Match by Google subject, then by email (linking the subject), else create.
///
/// An existing account is linked only when Google vouches for the address.
async fn find_or_create_user(pool: &PgPool, info: GoogleUserInfo) -> AppResult<User> {
    if let Some(user) = UserRepo::find_by_google_subject(pool, &info.sub).await? {
        return Ok(user);
    }

    let email = normalize_email(&info.email);
    if let Some(existing) = UserRepo::find_by_email(pool, &email).await? {
        if !info.email_verified {
            tracing::warn!(user_id = existing.id, "Refused Google link with unverified email");
            return Err(CoreError::Conflict(UNVERIFIED_LINK_MESSAGE.into()).into());
        }
        let user = UserRepo::link_google_subject(pool, existing.id, &info.sub, true)
            .await?
            .ok_or(CoreError::NotFound {
                entity: "User",
                id: existing.id,
            })?;
        tracing::info!(user_id = user.id, "Google account linked");
        return Ok(user);
    }

    let name = info
        .name
        .filter(|n| !n.trim().is_empty())
        .unwrap_or_else(|| name_from_email(&email));
    let user = UserRepo::create(
        pool,
        &CreateUser {
            email,
            name,
            password_hash: None,
            email_verified: info.email_verified,
            google_subject: Some(info.sub),
        },
    )
    .await?;
    tracing::info!(user_id = user.id, "User created by Google sign-in");
    Ok(user)
}
