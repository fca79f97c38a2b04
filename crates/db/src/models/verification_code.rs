//! One-time verification code model.

use jotbook_core::types::{DbId, Timestamp};
use sqlx::FromRow;

/// A row from the `verification_codes` table. Only the code digest is stored.
#[derive(Debug, Clone, FromRow)]
pub struct VerificationCode {
    pub id: DbId,
    pub email: String,
    pub purpose: String,
    pub code_hash: String,
    pub attempts: i32,
    pub expires_at: Timestamp,
    pub created_at: Timestamp,
}
