//! Row structs and DTOs.
//!
//! Each submodule contains a `FromRow` entity struct matching the table row
//! and the `Create*` DTO used for inserts.

pub mod note;
pub mod refresh_session;
pub mod user;
pub mod verification_code;
