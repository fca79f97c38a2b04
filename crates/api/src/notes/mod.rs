//! Authenticated, owner-scoped note management.

pub mod service;
pub mod store;

pub use service::{CreateOutcome, DeleteOutcome, NoteService, NoteServiceError, UpdateOutcome};
pub use store::{NoteStore, PgNoteStore, StoreError};
