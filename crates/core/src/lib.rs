//! Jotbook domain primitives.
//!
//! Holds the types, error enum, and validation rules shared by the database,
//! event, and API crates. Nothing here performs I/O.

pub mod credentials;
pub mod error;
pub mod hashing;
pub mod notes;
pub mod oauth_state;
pub mod otp;
pub mod types;
