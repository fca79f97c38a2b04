//! Jotbook API server library.
//!
//! Exposes the building blocks (config, state, error handling, session
//! guard, note service, routes) so integration tests and the binary
//! entrypoint can both access them.

pub mod auth;
pub mod background;
pub mod config;
pub mod error;
pub mod handlers;
pub mod middleware;
pub mod notes;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
