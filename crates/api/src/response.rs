//! Shared response envelope types for API handlers.
//!
//! Successful responses use a `{ "data": ... }` envelope; errors use the
//! `{ "error", "code" }` body produced by [`AppError`](crate::error::AppError).

use serde::Serialize;

/// Standard `{ "data": T }` response envelope.
///
/// ```ignore
/// Ok(Json(DataResponse { data: notes }))
/// ```
#[derive(Debug, Serialize)]
pub struct DataResponse<T: Serialize> {
    pub data: T,
}
