use std::sync::Arc;

use jotbook_events::{EventBus, Notifier};

use crate::auth::session::{JwtSessionResolver, SessionResolver};
use crate::config::ServerConfig;
use crate::notes::{NoteService, NoteStore, PgNoteStore};

/// Shared application state available to all Axum handlers via `State<AppState>`.
///
/// This is cheaply cloneable (inner data is behind `Arc` or is already `Clone`).
#[derive(Clone)]
pub struct AppState {
    /// Database connection pool.
    pub pool: jotbook_db::DbPool,
    pub config: Arc<ServerConfig>,
    /// Resolves the caller behind a request's bearer token.
    pub sessions: Arc<dyn SessionResolver>,
    pub notes: NoteService,
    /// Delivers one-time codes.
    pub notifier: Arc<dyn Notifier>,
    /// Broadcasts view invalidations and other application events.
    pub event_bus: Arc<EventBus>,
    /// Outbound HTTP client (Google OAuth).
    pub http: reqwest::Client,
}

impl AppState {
    /// Wire the production collaborators: JWT sessions and a Postgres-backed
    /// note store on `pool`.
    pub fn new(
        pool: jotbook_db::DbPool,
        config: ServerConfig,
        notifier: Arc<dyn Notifier>,
        event_bus: Arc<EventBus>,
    ) -> Self {
        let sessions: Arc<dyn SessionResolver> =
            Arc::new(JwtSessionResolver::new(config.jwt.clone()));
        let notes = NoteService::new(
            Arc::new(PgNoteStore::new(pool.clone())),
            Arc::clone(&sessions),
            event_bus.clone(),
        );

        Self {
            pool,
            config: Arc::new(config),
            sessions,
            notes,
            notifier,
            event_bus,
            http: reqwest::Client::new(),
        }
    }

    /// Replace the note store, keeping the same sessions and event bus.
    pub fn with_note_store(mut self, store: Arc<dyn NoteStore>) -> Self {
        self.notes = NoteService::new(store, Arc::clone(&self.sessions), self.event_bus.clone());
        self
    }
}
