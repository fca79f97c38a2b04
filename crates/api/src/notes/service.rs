//! Session-gated note operations.
//!
//! Every operation resolves the caller's session first and refuses with
//! [`NoteServiceError::Unauthorized`] before touching the store. All reads
//! and writes are scoped to the caller's own notes. Expected outcomes such
//! as a duplicate title or a missing note come back as data
//! ([`CreateOutcome`], [`UpdateOutcome`], [`DeleteOutcome`]), never as
//! errors.

use std::sync::Arc;

use jotbook_core::notes::{validate_content, validate_title, NOTES_VIEW_PATH};
use jotbook_core::types::DbId;
use jotbook_db::models::note::{CreateNote, Note, UpdateNote};
use jotbook_events::ViewInvalidator;

use super::store::{NoteStore, StoreError};
use crate::auth::session::{RequestContext, SessionResolver};

/// Hard failures of a note operation.
#[derive(Debug, thiserror::Error)]
pub enum NoteServiceError {
    /// No authenticated caller. Raised before any store access.
    #[error("Authentication required")]
    Unauthorized,

    #[error("{0}")]
    Validation(String),

    /// Store failure, passed through unchanged.
    #[error(transparent)]
    Backend(#[from] StoreError),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CreateOutcome {
    Created(Note),
    DuplicateTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UpdateOutcome {
    Updated,
    /// The note does not exist or belongs to another user.
    NotFoundOrForbidden,
    DuplicateTitle,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DeleteOutcome {
    Deleted,
    /// The note does not exist or belongs to another user.
    NotFoundOrForbidden,
}

/// Note operations for the current caller.
#[derive(Clone)]
pub struct NoteService {
    store: Arc<dyn NoteStore>,
    sessions: Arc<dyn SessionResolver>,
    views: Arc<dyn ViewInvalidator>,
}

impl NoteService {
    pub fn new(
        store: Arc<dyn NoteStore>,
        sessions: Arc<dyn SessionResolver>,
        views: Arc<dyn ViewInvalidator>,
    ) -> Self {
        Self {
            store,
            sessions,
            views,
        }
    }

    /// Resolve the caller's user id, or refuse.
    ///
    /// Handlers also call this before reporting malformed input, so an
    /// anonymous caller learns nothing about a request's shape.
    pub async fn authorize(&self, ctx: &RequestContext) -> Result<DbId, NoteServiceError> {
        self.sessions
            .resolve(ctx)
            .await
            .map(|session| session.user_id)
            .ok_or(NoteServiceError::Unauthorized)
    }

    /// The caller's notes, newest first.
    pub async fn list_notes(&self, ctx: &RequestContext) -> Result<Vec<Note>, NoteServiceError> {
        let user_id = self.authorize(ctx).await?;
        Ok(self.store.list_by_author(user_id).await?)
    }

    /// Whether the caller already has a note titled exactly `title`.
    pub async fn title_exists(
        &self,
        ctx: &RequestContext,
        title: &str,
    ) -> Result<bool, NoteServiceError> {
        let user_id = self.authorize(ctx).await?;
        Ok(self.store.find_by_title(user_id, title).await?.is_some())
    }

    pub async fn create_note(
        &self,
        ctx: &RequestContext,
        title: &str,
        content: Option<&str>,
    ) -> Result<CreateOutcome, NoteServiceError> {
        let user_id = self.authorize(ctx).await?;
        validate_note(title, content)?;

        if self.title_exists(ctx, title).await? {
            tracing::debug!(user_id, "Note title already taken");
            return Ok(CreateOutcome::DuplicateTitle);
        }

        let input = CreateNote {
            author_id: user_id,
            title: title.to_string(),
            content: content.map(str::to_string),
        };
        let note = match self.store.create(&input).await {
            Ok(note) => note,
            // Lost a race with a concurrent create of the same title.
            Err(StoreError::DuplicateTitle) => return Ok(CreateOutcome::DuplicateTitle),
            Err(e) => return Err(e.into()),
        };

        tracing::info!(user_id, note_id = note.id, "Note created");
        self.views.invalidate(NOTES_VIEW_PATH, user_id);
        Ok(CreateOutcome::Created(note))
    }

    pub async fn update_note(
        &self,
        ctx: &RequestContext,
        note_id: DbId,
        title: &str,
        content: Option<&str>,
    ) -> Result<UpdateOutcome, NoteServiceError> {
        let user_id = self.authorize(ctx).await?;
        validate_note(title, content)?;

        let input = UpdateNote {
            title: title.to_string(),
            content: content.map(str::to_string),
        };
        let rows = match self.store.update_for_author(note_id, user_id, &input).await {
            Ok(rows) => rows,
            Err(StoreError::DuplicateTitle) => return Ok(UpdateOutcome::DuplicateTitle),
            Err(e) => return Err(e.into()),
        };

        if rows == 0 {
            tracing::debug!(user_id, note_id, "Update matched no owned note");
            return Ok(UpdateOutcome::NotFoundOrForbidden);
        }

        tracing::info!(user_id, note_id, "Note updated");
        self.views.invalidate(NOTES_VIEW_PATH, user_id);
        Ok(UpdateOutcome::Updated)
    }

    pub async fn delete_note(
        &self,
        ctx: &RequestContext,
        note_id: DbId,
    ) -> Result<DeleteOutcome, NoteServiceError> {
        let user_id = self.authorize(ctx).await?;

        let rows = self.store.delete_for_author(note_id, user_id).await?;
        if rows == 0 {
            tracing::debug!(user_id, note_id, "Delete matched no owned note");
            return Ok(DeleteOutcome::NotFoundOrForbidden);
        }

        tracing::info!(user_id, note_id, "Note deleted");
        self.views.invalidate(NOTES_VIEW_PATH, user_id);
        Ok(DeleteOutcome::Deleted)
    }
}

fn validate_note(title: &str, content: Option<&str>) -> Result<(), NoteServiceError> {
    validate_title(title).map_err(NoteServiceError::Validation)?;
    validate_content(content).map_err(NoteServiceError::Validation)
}
