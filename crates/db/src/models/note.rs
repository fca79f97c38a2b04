//! Note model.

use jotbook_core::types::{DbId, Timestamp};
use serde::Serialize;
use sqlx::FromRow;

/// A row from the `notes` table.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, FromRow)]
pub struct Note {
    pub id: DbId,
    pub title: String,
    pub content: Option<String>,
    pub author_id: DbId,
    pub created_at: Timestamp,
    pub updated_at: Timestamp,
}

/// DTO for inserting a note. The author is always the resolved caller.
#[derive(Debug, Clone)]
pub struct CreateNote {
    pub author_id: DbId,
    pub title: String,
    pub content: Option<String>,
}

/// Replacement values for a note's editable fields.
#[derive(Debug, Clone)]
pub struct UpdateNote {
    pub title: String,
    pub content: Option<String>,
}
