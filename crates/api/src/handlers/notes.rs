//! Handlers for the `/notes` resource.
//!
//! Each handler passes the caller's [`RequestContext`] to the
//! [`NoteService`](crate::notes::NoteService), which does the session check.
//! Path, query and body rejections are held back until the caller is known,
//! so anonymous requests always get the same 401. Soft outcomes become
//! ordinary responses.

use axum::extract::rejection::{JsonRejection, PathRejection, QueryRejection};
use axum::extract::{Path, Query, State};
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use jotbook_core::notes::DUPLICATE_TITLE_MESSAGE;
use jotbook_core::types::DbId;
use jotbook_db::models::note::Note;
use serde::{Deserialize, Serialize};

use crate::auth::session::RequestContext;
use crate::error::{error_response, AppError, AppResult};
use crate::notes::{CreateOutcome, DeleteOutcome, UpdateOutcome};
use crate::response::DataResponse;
use crate::state::AppState;

/// Error code sent with a 409 when the caller already uses a title.
pub const DUPLICATE_TITLE_CODE: &str = "DUPLICATE_TITLE";

/// Request body for `POST /notes` and `PUT /notes/{id}`.
#[derive(Debug, Deserialize)]
pub struct NoteInput {
    pub title: String,
    #[serde(default)]
    pub content: Option<String>,
}

#[derive(Debug, Deserialize)]
pub struct TitleQuery {
    pub title: String,
}

#[derive(Debug, Serialize)]
pub struct TitleExists {
    pub exists: bool,
}

/// Result of an update or delete, as `"updated"`, `"deleted"` or `"not_found"`.
#[derive(Debug, Serialize)]
pub struct WriteOutcome {
    pub outcome: &'static str,
}

/// GET /api/v1/notes
pub async fn list_notes(
    State(state): State<AppState>,
    ctx: RequestContext,
) -> AppResult<Json<DataResponse<Vec<Note>>>> {
    let notes = state.notes.list_notes(&ctx).await?;
    Ok(Json(DataResponse { data: notes }))
}

/// GET /api/v1/notes/exists?title=
pub async fn title_exists(
    State(state): State<AppState>,
    ctx: RequestContext,
    query: Result<Query<TitleQuery>, QueryRejection>,
) -> AppResult<Json<DataResponse<TitleExists>>> {
    let Query(query) = after_session(&state, &ctx, query).await?;
    let exists = state.notes.title_exists(&ctx, &query.title).await?;
    Ok(Json(DataResponse {
        data: TitleExists { exists },
    }))
}

/// POST /api/v1/notes
///
/// 201 with the new note, or 409 `DUPLICATE_TITLE`.
pub async fn create_note(
    State(state): State<AppState>,
    ctx: RequestContext,
    input: Result<Json<NoteInput>, JsonRejection>,
) -> AppResult<Response> {
    let Json(input) = after_session(&state, &ctx, input).await?;
    let outcome = state
        .notes
        .create_note(&ctx, &input.title, input.content.as_deref())
        .await?;

    Ok(match outcome {
        CreateOutcome::Created(note) => {
            (StatusCode::CREATED, Json(DataResponse { data: note })).into_response()
        }
        CreateOutcome::DuplicateTitle => duplicate_title(),
    })
}

/// PUT /api/v1/notes/{id}
pub async fn update_note(
    State(state): State<AppState>,
    ctx: RequestContext,
    note_id: Result<Path<DbId>, PathRejection>,
    input: Result<Json<NoteInput>, JsonRejection>,
) -> AppResult<Response> {
    let Path(note_id) = after_session(&state, &ctx, note_id).await?;
    let Json(input) = after_session(&state, &ctx, input).await?;
    let outcome = state
        .notes
        .update_note(&ctx, note_id, &input.title, input.content.as_deref())
        .await?;

    let label = match outcome {
        UpdateOutcome::Updated => "updated",
        UpdateOutcome::NotFoundOrForbidden => "not_found",
        UpdateOutcome::DuplicateTitle => return Ok(duplicate_title()),
    };
    Ok(Json(DataResponse {
        data: WriteOutcome { outcome: label },
    })
    .into_response())
}

/// DELETE /api/v1/notes/{id}
///
/// Deleting a missing or foreign note is not an error.
pub async fn delete_note(
    State(state): State<AppState>,
    ctx: RequestContext,
    note_id: Result<Path<DbId>, PathRejection>,
) -> AppResult<Json<DataResponse<WriteOutcome>>> {
    let Path(note_id) = after_session(&state, &ctx, note_id).await?;
    let outcome = match state.notes.delete_note(&ctx, note_id).await? {
        DeleteOutcome::Deleted => "deleted",
        DeleteOutcome::NotFoundOrForbidden => "not_found",
    };
    Ok(Json(DataResponse {
        data: WriteOutcome { outcome },
    }))
}

/// Unwrap an extracted value, or report the rejection as a 400 once the
/// caller is known to be signed in.
async fn after_session<T, R: std::fmt::Display>(
    state: &AppState,
    ctx: &RequestContext,
    extracted: Result<T, R>,
) -> AppResult<T> {
    match extracted {
        Ok(value) => Ok(value),
        Err(rejection) => {
            state.notes.authorize(ctx).await?;
            Err(AppError::BadRequest(rejection.to_string()))
        }
    }
}

fn duplicate_title() -> Response {
    error_response(
        StatusCode::CONFLICT,
        DUPLICATE_TITLE_CODE,
        DUPLICATE_TITLE_MESSAGE,
    )
}
