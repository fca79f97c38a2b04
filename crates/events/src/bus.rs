//! In-process event bus backed by a `tokio::sync::broadcast` channel.
//!
//! [`EventBus`] is the publish/subscribe hub for [`AppEvent`]s. It is shared
//! via `Arc<EventBus>` and doubles as the [`ViewInvalidator`] handed to the
//! note service: every successful note write publishes a
//! [`VIEW_INVALIDATED`] event naming the stale view path.

use chrono::{DateTime, Utc};
use jotbook_core::types::DbId;
use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

/// Event kind published when a cached rendering of a path is stale.
pub const VIEW_INVALIDATED: &str = "view.invalidated";

// ---------------------------------------------------------------------------
// AppEvent
// ---------------------------------------------------------------------------

/// Something that happened inside the service.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AppEvent {
    /// Dot-separated event name, e.g. `"view.invalidated"`.
    pub kind: String,

    /// View path the event concerns, if any (e.g. `"/notes"`).
    pub path: Option<String>,

    /// Id of the user whose action triggered the event.
    pub actor_user_id: Option<DbId>,

    /// When the event was created (UTC).
    pub timestamp: DateTime<Utc>,
}

impl AppEvent {
    /// Create an event with only the required `kind`.
    pub fn new(kind: impl Into<String>) -> Self {
        Self {
            kind: kind.into(),
            path: None,
            actor_user_id: None,
            timestamp: Utc::now(),
        }
    }

    /// Shorthand for a [`VIEW_INVALIDATED`] event on `path`.
    pub fn view_invalidated(path: impl Into<String>, actor: DbId) -> Self {
        Self::new(VIEW_INVALIDATED).with_path(path).with_actor(actor)
    }

    /// Attach a view path.
    pub fn with_path(mut self, path: impl Into<String>) -> Self {
        self.path = Some(path.into());
        self
    }

    /// Attach the acting user.
    pub fn with_actor(mut self, user_id: DbId) -> Self {
        self.actor_user_id = Some(user_id);
        self
    }
}

// ---------------------------------------------------------------------------
// ViewInvalidator
// ---------------------------------------------------------------------------

/// Signals that the cached rendering of a view path is stale.
///
/// Fire-and-forget: implementations must not block and callers never inspect
/// a result.
pub trait ViewInvalidator: Send + Sync {
    fn invalidate(&self, path: &str, actor: DbId);
}

// ---------------------------------------------------------------------------
// EventBus
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast channel.
const DEFAULT_CAPACITY: usize = 256;

/// In-process fan-out event bus.
///
/// ```rust
/// use jotbook_events::bus::{AppEvent, EventBus};
///
/// let bus = EventBus::default();
/// let mut rx = bus.subscribe();
///
/// bus.publish(AppEvent::view_invalidated("/notes", 1));
/// ```
pub struct EventBus {
    sender: broadcast::Sender<AppEvent>,
}

impl EventBus {
    /// Create a bus with a specific channel capacity.
    ///
    /// When the buffer is full the oldest un-consumed events are dropped and
    /// slow receivers observe `RecvError::Lagged`.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self { sender }
    }

    /// Publish an event to all current subscribers.
    ///
    /// With no subscribers the event is dropped.
    pub fn publish(&self, event: AppEvent) {
        // A SendError only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to all events published from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<AppEvent> {
        self.sender.subscribe()
    }
}

impl Default for EventBus {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl ViewInvalidator for EventBus {
    fn invalidate(&self, path: &str, actor: DbId) {
        self.publish(AppEvent::view_invalidated(path, actor));
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
