//! Repository for the `verification_codes` table.

use jotbook_core::types::{DbId, Timestamp};
use sqlx::PgPool;

use crate::models::verification_code::VerificationCode;

/// Column list shared across queries to avoid repetition.
const COLUMNS: &str = "id, email, purpose, code_hash, attempts, expires_at, created_at";

/// Stores one-time code digests, one live code per `(email, purpose)`.
pub struct VerificationCodeRepo;

impl VerificationCodeRepo {
    /// Store a code digest, replacing any earlier code for the same
    /// email and purpose and resetting its attempt counter.
    pub async fn upsert(
        pool: &PgPool,
        email: &str,
        purpose: &str,
        code_hash: &str,
        expires_at: Timestamp,
    ) -> Result<VerificationCode, sqlx::Error> {
        let query = format!(
            "INSERT INTO verification_codes (email, purpose, code_hash, expires_at)
             VALUES ($1, $2, $3, $4)
             ON CONFLICT ON CONSTRAINT uq_verification_codes_email_purpose
             DO UPDATE SET code_hash = EXCLUDED.code_hash,
                           expires_at = EXCLUDED.expires_at,
                           attempts = 0,
                           created_at = NOW()
             RETURNING {COLUMNS}"
        );
        sqlx::query_as::<_, VerificationCode>(&query)
            .bind(email)
            .bind(purpose)
            .bind(code_hash)
            .bind(expires_at)
            .fetch_one(pool)
            .await
    }

    /// Find the unexpired code for an email and purpose.
    pub async fn find_live(
        pool: &PgPool,
        email: &str,
        purpose: &str,
    ) -> Result<Option<VerificationCode>, sqlx::Error> {
        let query = format!(
            "SELECT {COLUMNS} FROM verification_codes
             WHERE email = $1 AND purpose = $2 AND expires_at > NOW()"
        );
        sqlx::query_as::<_, VerificationCode>(&query)
            .bind(email)
            .bind(purpose)
            .fetch_optional(pool)
            .await
    }

    /// Claim one attempt against a live code, provided fewer than
    /// `max_attempts` have been used. Returns the new count, or `None` when
    /// the code is exhausted, expired or gone.
    ///
    /// The check and the increment are a single statement, so concurrent
    /// verifiers cannot share an attempt.
    pub async fn claim_attempt(
        pool: &PgPool,
        id: DbId,
        max_attempts: i32,
    ) -> Result<Option<i32>, sqlx::Error> {
        let row: Option<(i32,)> = sqlx::query_as(
            "UPDATE verification_codes SET attempts = attempts + 1
             WHERE id = $1 AND attempts < $2 AND expires_at > NOW()
             RETURNING attempts",
        )
        .bind(id)
        .bind(max_attempts)
        .fetch_optional(pool)
        .await?;
        Ok(row.map(|(attempts,)| attempts))
    }

    /// Consume a code so it cannot be used again. Returns `true` if this call
    /// removed it (a concurrent verifier sees `false`).
    pub async fn consume(pool: &PgPool, id: DbId) -> Result<bool, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE id = $1")
            .bind(id)
            .execute(pool)
            .await?;
        Ok(result.rows_affected() > 0)
    }

    /// Delete expired codes. Returns the count deleted.
    pub async fn delete_expired(pool: &PgPool) -> Result<u64, sqlx::Error> {
        let result = sqlx::query("DELETE FROM verification_codes WHERE expires_at < NOW()")
            .execute(pool)
            .await?;
        Ok(result.rows_affected())
    }
}
