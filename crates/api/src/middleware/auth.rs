//! Session extractor for handlers outside the note service.

use axum::extract::FromRequestParts;
use axum::http::request::Parts;
use jotbook_core::error::CoreError;
use jotbook_core::types::DbId;

use crate::auth::session::RequestContext;
use crate::error::{AppError, AUTH_REQUIRED_MESSAGE};
use crate::state::AppState;

/// Authenticated caller, resolved through the same
/// [`SessionResolver`](crate::auth::session::SessionResolver) the note
/// service uses.
///
/// ```ignore
/// async fn me(user: AuthUser) -> AppResult<Json<()>> {
///     tracing::info!(user_id = user.user_id, "handling request");
///     Ok(Json(()))
/// }
/// ```
#[derive(Debug, Clone)]
pub struct AuthUser {
    pub user_id: DbId,
}

impl FromRequestParts<AppState> for AuthUser {
    type Rejection = AppError;

    async fn from_request_parts(
        parts: &mut Parts,
        state: &AppState,
    ) -> Result<Self, Self::Rejection> {
        let ctx = RequestContext::from_headers(&parts.headers);
        let session = state.sessions.resolve(&ctx).await.ok_or_else(|| {
            AppError::Core(CoreError::Unauthorized(AUTH_REQUIRED_MESSAGE.into()))
        })?;

        Ok(AuthUser {
            user_id: session.user_id,
        })
    }
}
