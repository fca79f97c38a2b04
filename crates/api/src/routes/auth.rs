//! Route definitions for the `/auth` resource.

use axum::routing::{get, post};
use axum::Router;

use crate::handlers::{auth, google, otp};
use crate::state::AppState;

/// Routes mounted at `/auth`.
///
/// ```text
/// POST /sign-up              -> sign_up
/// POST /sign-in              -> sign_in
/// POST /refresh              -> refresh
/// POST /sign-out             -> sign_out (requires auth)
/// GET  /me                   -> me (requires auth)
///
/// POST /otp/send             -> send_code
/// POST /otp/verify-email     -> verify_email
/// POST /otp/sign-in          -> sign_in
/// POST /otp/reset-password   -> reset_password
///
/// GET  /google               -> start (redirect)
/// GET  /google/callback      -> callback
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/sign-up", post(auth::sign_up))
        .route("/sign-in", post(auth::sign_in))
        .route("/refresh", post(auth::refresh))
        .route("/sign-out", post(auth::sign_out))
        .route("/me", get(auth::me))
        .route("/otp/send", post(otp::send_code))
        .route("/otp/verify-email", post(otp::verify_email))
        .route("/otp/sign-in", post(otp::sign_in))
        .route("/otp/reset-password", post(otp::reset_password))
        .route("/google", get(google::start))
        .route("/google/callback", get(google::callback))
}
