//! Repository layer.
//!
//! Each repository is a zero-sized struct providing async CRUD methods
//! that accept `&PgPool` as the first argument.

pub mod note_repo;
pub mod refresh_session_repo;
pub mod user_repo;
pub mod verification_code_repo;

pub use note_repo::NoteRepo;
pub use refresh_session_repo::RefreshSessionRepo;
pub use user_repo::UserRepo;
pub use verification_code_repo::VerificationCodeRepo;
