//! Repository for the `refresh_sessions` table.
//!
//! A refresh token is single use: [`RefreshSessionRepo::redeem`] closes the
//! row in the same statement that finds it, so of two concurrent refreshes
//! with one token exactly one gets a user id back.

use jotbook_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::refresh_session::RefreshSession;

const COLUMNS: &str = "id, user_id, token_hash, expires_at, revoked_at, created_at";

pub struct RefreshSessionRepo;

impl RefreshSessionRepo {
    /// Record a newly issued refresh token.
    pub async fn open(
        pool: &PgPool,
        user_id: DbId,
        token_hash: &str,
        expires_at: Timestamp,
    ) -> Result<RefreshSession, sqlx::Error> {
        let query = format!(
            "INSERT INTO refresh_sessions (user_id, token_hash, expires_at)
             VALUES ($1, $2, $3)
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, RefreshSession>(&query)
            .bind(user_id)
            .bind(token_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Close an open, unexpired session by token digest and return its user.
    ///
    /// `None` means the token is unknown, expired or already used.
    pub async fn redeem(pool: &PgPool, token_hash: &str) -> Result<Option<DbId>, sqlx::Error> {
        let row: Option<(DbId,)> = sqlx::query_as(
            "UPDATE refresh_sessions SET revoked_at = NOW()
             WHERE token_hash = $1 AND revoked_at IS NULL AND expires_at > NOW()
             RETURNING user_id",
        )
        .bind(token_hash)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(user_id,)| user_id))
    }

    /// Close every open session of a user. Returns how many were closed.
    pub async fn revoke_all_for_user(pool: &PgPool, user_id: DbId) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "UPDATE refresh_sessions SET revoked_at = NOW()
             WHERE user_id = $1 AND revoked_at IS NULL",
        )
        .bind(user_id)
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }

    /// Delete sessions that can never be redeemed again. Returns the count.
    pub async fn delete_stale(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query(
            "DELETE FROM refresh_sessions WHERE revoked_at IS NOT NULL OR expires_at < NOW()",
        )
        .execute(pool)
        .await?;
        Ok(result.rows_affected())
    }
}
