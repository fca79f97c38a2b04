//! Refresh session rows.

use jotbook_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `refresh_sessions` table. Only the token's digest is kept.
#[derive(Debug, Clone, FromRow)]
pub struct RefreshSession {
    pub id: DbId,
    pub user_id: DbId,
    pub token_hash: String,
    pub expires_at: Timestamp,
    /// Set once the token has been redeemed or the user signed out.
    pub revoked_at: Option<Timestamp>,
    pub created_at: Timestamp,
}

