//! Persistence port for notes.
//!
//! [`NoteStore`] is what the [`NoteService`](super::NoteService) talks to.
//! [`PgNoteStore`] is the production implementation over
//! [`NoteRepo`]; tests substitute an in-memory store.

use async_trait::async_trait;
use jotbook_core::notes::TITLE_UNIQUE_CONSTRAINT;
use jotbook_core::types::DbId;
use jotbook_db::models::note::{CreateNote, Note, UpdateNote};
use jotbook_db::repositories::NoteRepo;
use sqlx::PgPool;

use crate::error::unique_violation_constraint;

/// Failure reported by a [`NoteStore`].
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The per-author title uniqueness constraint rejected the write.
    #[error("A note with this title already exists for the author")]
    DuplicateTitle,

    #[error("Database error: {0}")]
    Database(sqlx::Error),

    /// Non-database backend failure (used by alternative stores).
    #[error("Note store unavailable: {0}")]
    Unavailable(String),
}

impl From<sqlx::Error> for StoreError {
    fn from(err: sqlx::Error) -> Self {
        if unique_violation_constraint(&err) == Some(TITLE_UNIQUE_CONSTRAINT) {
            StoreError::DuplicateTitle
        } else {
            StoreError::Database(err)
        }
    }
}

/// Author-scoped note storage.
///
/// Every mutating call carries the author id and must only touch rows that
/// author owns; a zero row count means "missing or not yours".
#[async_trait]
pub trait NoteStore: Send + Sync {
    async fn find_by_title(&self, author_id: DbId, title: &str)
        -> Result<Option<Note>, StoreError>;

    /// All of the author's notes, newest first.
    async fn list_by_author(&self, author_id: DbId) -> Result<Vec<Note>, StoreError>;

    async fn create(&self, input: &CreateNote) -> Result<Note, StoreError>;

    async fn update_for_author(
        &self,
        id: DbId,
        author_id: DbId,
        input: &UpdateNote,
    ) -> Result<u64, StoreError>;

    async fn delete_for_author(&self, id: DbId, author_id: DbId) -> Result<u64, StoreError>;
}

/// [`NoteStore`] backed by PostgreSQL.
#[derive(Clone)]
pub struct PgNoteStore {
    pool: PgPool,
}

impl PgNoteStore {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl NoteStore for PgNoteStore {
    async fn find_by_title(
        &self,
        author_id: DbId,
        title: &str,
    ) -> Result<Option<Note>, StoreError> {
        Ok(NoteRepo::find_by_title(&self.pool, author_id, title).await?)
    }

    async fn list_by_author(&self, author_id: DbId) -> Result<Vec<Note>, StoreError> {
        Ok(NoteRepo::list_by_author(&self.pool, author_id).await?)
    }

    async fn create(&self, input: &CreateNote) -> Result<Note, StoreError> {
        Ok(NoteRepo::create(&self.pool, input).await?)
    }

    async fn update_for_author(
        &self,
        id: DbId,
        author_id: DbId,
        input: &UpdateNote,
    ) -> Result<u64, StoreError> {
        Ok(NoteRepo::update_for_author(&self.pool, id, author_id, input).await?)
    }

    async fn delete_for_author(&self, id: DbId, author_id: DbId) -> Result<u64, StoreError> {
        Ok(NoteRepo::delete_for_author(&self.pool, id, author_id).await?)
    }
}
