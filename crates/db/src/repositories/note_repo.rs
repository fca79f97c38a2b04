//! Repository for the `notes` table.
//!
//! Every query that touches an existing note is filtered by `author_id`, so
//! a caller can only ever see or change rows it owns.

use jotbook_core::types::DbId;
use sqlx::PgPool;

use crate::models::note::{CreateNote, Note, UpdateNote};

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, title, content, author_id, created_at, updated_at";

/// Provides author-scoped CRUD operations for notes.
pub struct NoteRepo;

impl NoteRepo {
    /// Insert a new note, returning the created row.
    ///
    /// Fails with a unique violation on `uq_notes_author_title` when the
    /// author already owns a note with this exact title.
    pub async fn create(pool: &PgPool, input: &CreateNote) -> Result<Note, sqlx::Error> {
        let query = format!(
            "INSERT INTO notes (title, content, author_id)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(&input.title)
            .bind(&input.content)
            .bind(input.author_id)
            .fetch_one(pool)
            .await
    }

    /// Find the author's note with exactly this title (case-sensitive).
    pub async fn find_by_title(
        pool: &PgPool,
        author_id: DbId,
        title: &str,
    ) -> Result<Option<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes WHERE author_id = $1 AND title = $2 LIMIT 1"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(author_id)
            .bind(title)
            .fetch_optional(pool)
            .await
    }

    /// List all of the author's notes, newest first.
    pub async fn list_by_author(pool: &PgPool, author_id: DbId) -> Result<Vec<Note>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM notes
             WHERE author_id = $1
             ORDER BY created_at DESC, id DESC"
        );
        sqlx::query_as::<_, Note>(&query)
            .bind(author_id)
            .fetch_all(pool)
            .await
    }

    /// Replace title and content of the note `id` if `author_id` owns it.
    ///
    /// Returns the number of rows changed: `0` when the note does not exist
    /// or belongs to someone else.
    pub async fn update_for_author(
        pool: &PgPool,
        id: DbId,
        author_id: DbId,
        input: &UpdateNote,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE notes SET title = $3, content = $4
             WHERE id = $1 AND author_id = $2",
        )
        .bind(id)
        .bind(author_id)
        .bind(&input.title)
        .bind(&input.content)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete the note `id` if `author_id` owns it. Returns rows deleted.
    pub async fn delete_for_author(
        pool: &PgPool,
        id: DbId,
        author_id: DbId,
    ) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM notes WHERE id = $1 AND author_id = $2")
            .bind(id)
            .bind(author_id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
