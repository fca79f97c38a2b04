//! Background subscriber that traces every published event.
//!
//! [`EventLogger`] is the bus consumer wired up in `main`. It exits when the
//! [`EventBus`](crate::bus::EventBus) is dropped, which is how shutdown
//! reaches it.

use tokio::sync::broadcast;

use crate::bus::AppEvent;

/// Logs events at `debug` level as they arrive.
pub struct EventLogger;

impl EventLogger {
    /// Run the logging loop until the channel closes.
    ///
    /// Returns the number of events observed, which is mostly useful in tests.
    pub async fn run(mut receiver: broadcast::Receiver<AppEvent>) -> u64 {
        let mut seen = 0u64;
        loop {
            match receiver.recv().await {
                Ok(event) => {
                    seen += 1;
                    tracing::debug!(
                        kind = %event.kind,
                        path = event.path.as_deref().unwrap_or("-"),
                        actor_user_id = event.actor_user_id,
                        "Event published"
                    );
                }
                Err(broadcast::error::RecvError::Lagged(n)) => {
                    tracing::warn!(skipped = n, "Event logger lagged, some events were skipped");
                }
                Err(broadcast::error::RecvError::Closed) => {
                    tracing::info!(seen, "Event bus closed, event logger shutting down");
                    break;
                }
            }
        }
        seen
    }
}
