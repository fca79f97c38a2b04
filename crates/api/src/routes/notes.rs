//! Route definitions for the `/notes` resource.

use axum::routing::{get, put};
use axum::Router;

use crate::handlers::notes;
use crate::state::AppState;

/// Routes mounted at `/notes`.
///
/// ```text
/// GET    /          -> list_notes
/// POST   /          -> create_note
/// GET    /exists    -> title_exists (?title=)
/// PUT    /{id}      -> update_note
/// DELETE /{id}      -> delete_note
/// ```
pub fn router() -> Router<AppState> {
    Router::new()
        .route("/", get(notes::list_notes).post(notes::create_note))
        .route("/exists", get(notes::title_exists))
        .route("/{id}", put(notes::update_note).delete(notes::delete_note))
}
