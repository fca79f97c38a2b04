//! Jotbook event bus and out-of-band delivery.
//!
//! - [`EventBus`] -- in-process publish/subscribe hub backed by
//!   `tokio::sync::broadcast`; also the production [`ViewInvalidator`].
//! - [`AppEvent`] -- the event envelope.
//! - [`EventLogger`] -- background subscriber that traces every event.
//! - [`delivery`] -- the [`Notifier`] port for one-time codes, with SMTP and
//!   log-only implementations.

pub mod bus;
pub mod delivery;
pub mod logger;

pub use bus::{AppEvent, EventBus, ViewInvalidator, VIEW_INVALIDATED};
pub use delivery::email::{EmailConfig, EmailNotifier};
pub use delivery::log::LogNotifier;
pub use delivery::{NotifyError, Notifier};
pub use logger::EventLogger;
