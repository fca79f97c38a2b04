//! Primitive aliases shared across crates.

/// Row identifier for users, notes, sessions, and codes (PostgreSQL BIGSERIAL).
pub type DbId = i64;

/// UTC timestamp as stored in `TIMESTAMPTZ` columns.
pub type Timestamp = chrono::DateTime<chrono::Utc>;
