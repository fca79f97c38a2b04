//! Domain error shared by every Jotbook crate.

use crate::types::DbId;

/// A domain-level failure, independent of transport.
///
/// The API crate maps each variant onto an HTTP status; repositories never
/// produce these directly.
#[derive(Debug, thiserror::Error)]
pub enum CoreError {
    #[error("Entity not found: {entity} with id {id}")]
    NotFound { entity: &'static str, id: DbId },

    /// Input failed a validation rule (empty title, malformed email, ...).
    #[error("Validation failed: {0}")]
    Validation(String),

    /// The request collides with existing state (e.g. email already registered).
    #[error("Conflict: {0}")]
    Conflict(String),

    /// No session, or the presented credentials are not accepted.
    #[error("Unauthorized: {0}")]
    Unauthorized(String),
}

impl CoreError {
    /// Shorthand for a validation failure built from a rule's message.
    pub fn validation(msg: impl Into<String>) -> Self {
        Self::Validation(msg.into())
    }
}
