pub mod auth;
pub mod health;
pub mod notes;

use axum::Router;

use crate::state::AppState;

/// Build the `/api/v1` route tree.
///
/// ```text
/// /auth/...            accounts, tokens, one-time codes, Google sign-in
/// /notes               list, create
/// /notes/exists        title check
/// /notes/{id}          update, delete
/// ```
pub fn api_routes() -> Router<AppState> {
    Router::new()
        .nest("/auth", auth::router())
        .nest("/notes", notes::router())
}
