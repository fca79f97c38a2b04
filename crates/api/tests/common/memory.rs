//! In-memory collaborators for exercising the note service without
//! PostgreSQL.

use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Mutex;

use async_trait::async_trait;
use chrono::{TimeZone, Utc};
use jotbook_api::auth::session::{RequestContext, Session, SessionResolver};
use jotbook_api::notes::{NoteStore, StoreError};
use jotbook_core::types::DbId;
use jotbook_db::models::note::{CreateNote, Note, UpdateNote};
use jotbook_events::ViewInvalidator;

/// Note store with the same ownership and uniqueness rules as the database.
#[derive(Default)]
pub struct MemoryNoteStore {
    notes: Mutex<Vec<Note>>,
    next_id: AtomicUsize,
    calls: AtomicUsize,
    lose_next_create_race: AtomicBool,
    fail: AtomicBool,
}

impl MemoryNoteStore {
    /// Number of store calls made so far.
    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }

    /// Every note, regardless of author.
    pub fn all(&self) -> Vec<Note> {
        self.notes.lock().unwrap().clone()
    }

    /// Make the next `create` fail as if a concurrent insert of the same
    /// title had committed first.
    pub fn lose_next_create_race(&self) {
        self.lose_next_create_race.store(true, Ordering::SeqCst);
    }

    /// Make every subsequent call fail with [`StoreError::Unavailable`].
    pub fn fail_everything(&self) {
        self.fail.store(true, Ordering::SeqCst);
    }

    fn enter(&self) -> Result<(), StoreError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        if self.fail.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable("store offline".into()));
        }
        Ok(())
    }
}

#[async_trait]
impl NoteStore for MemoryNoteStore {
    async fn find_by_title(
        &self,
        author_id: DbId,
        title: &str,
    ) -> Result<Option<Note>, StoreError> {
        self.enter()?;
        let notes = self.notes.lock().unwrap();
        Ok(notes
            .iter()
            .find(|n| n.author_id == author_id && n.title == title)
            .cloned())
    }

    async fn list_by_author(&self, author_id: DbId) -> Result<Vec<Note>, StoreError> {
        self.enter()?;
        let notes = self.notes.lock().unwrap();
        let mut mine: Vec<Note> = notes
            .iter()
            .filter(|n| n.author_id == author_id)
            .cloned()
            .collect();
        mine.sort_by(|a, b| b.created_at.cmp(&a.created_at).then(b.id.cmp(&a.id)));
        Ok(mine)
    }

    async fn create(&self, input: &CreateNote) -> Result<Note, StoreError> {
        self.enter()?;
        if self.lose_next_create_race.swap(false, Ordering::SeqCst) {
            return Err(StoreError::DuplicateTitle);
        }

        let mut notes = self.notes.lock().unwrap();
        if notes
            .iter()
            .any(|n| n.author_id == input.author_id && n.title == input.title)
        {
            return Err(StoreError::DuplicateTitle);
        }

        let id = self.next_id.fetch_add(1, Ordering::SeqCst) as DbId + 1;
        // Strictly increasing timestamps keep "newest first" deterministic.
        let created_at = Utc.timestamp_opt(1_700_000_000 + id, 0).unwrap();
        let note = Note {
            id,
            title: input.title.clone(),
            content: input.content.clone(),
            author_id: input.author_id,
            created_at,
            updated_at: created_at,
        };
        notes.push(note.clone());
        Ok(note)
    }

    async fn update_for_author(
        &self,
        id: DbId,
        author_id: DbId,
        input: &UpdateNote,
    ) -> Result<u64, StoreError> {
        self.enter()?;
        let mut notes = self.notes.lock().unwrap();
        if notes
            .iter()
            .any(|n| n.author_id == author_id && n.id != id && n.title == input.title)
        {
            return Err(StoreError::DuplicateTitle);
        }
        match notes
            .iter_mut()
            .find(|n| n.id == id && n.author_id == author_id)
        {
            Some(note) => {
                note.title = input.title.clone();
                note.content = input.content.clone();
                Ok(1)
            }
            None => Ok(0),
        }
    }

    async fn delete_for_author(&self, id: DbId, author_id: DbId) -> Result<u64, StoreError> {
        self.enter()?;
        let mut notes = self.notes.lock().unwrap();
        let before = notes.len();
        notes.retain(|n| !(n.id == id && n.author_id == author_id));
        Ok((before - notes.len()) as u64)
    }
}

/// Resolves bearer tokens from a fixed table and counts lookups.
#[derive(Default)]
pub struct StaticSessions {
    tokens: Mutex<HashMap<String, DbId>>,
    resolves: AtomicUsize,
}

impl StaticSessions {
    pub fn with_user(self, token: &str, user_id: DbId) -> Self {
        self.tokens.lock().unwrap().insert(token.to_string(), user_id);
        self
    }

    /// Invalidate `token`, as if its session had expired.
    pub fn revoke(&self, token: &str) {
        self.tokens.lock().unwrap().remove(token);
    }

    pub fn resolves(&self) -> usize {
        self.resolves.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl SessionResolver for StaticSessions {
    async fn resolve(&self, ctx: &RequestContext) -> Option<Session> {
        self.resolves.fetch_add(1, Ordering::SeqCst);
        let user_id = *self.tokens.lock().unwrap().get(ctx.bearer_token()?)?;
        Some(Session {
            user_id,
            expires_at: Utc::now() + chrono::Duration::minutes(15),
        })
    }
}

/// Records every invalidation signal.
#[derive(Default)]
pub struct RecordingInvalidator {
    signals: Mutex<Vec<(String, DbId)>>,
}

impl RecordingInvalidator {
    pub fn signals(&self) -> Vec<(String, DbId)> {
        self.signals.lock().unwrap().clone()
    }
}

impl ViewInvalidator for RecordingInvalidator {
    fn invalidate(&self, path: &str, actor: DbId) {
        self.signals.lock().unwrap().push((path.to_string(), actor));
    }
}
