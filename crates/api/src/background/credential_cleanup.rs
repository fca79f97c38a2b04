//! Periodic purge of dead credentials.
//!
//! Removes refresh sessions that are revoked or past expiry, and one-time
//! codes past expiry. Neither can authenticate anyone any more; this only
//! keeps the tables small.

use std::time::Duration;

use jotbook_db::repositories::{RefreshSessionRepo, VerificationCodeRepo};
use sqlx::PgPool;
use tokio_util::sync::CancellationToken;

/// How often the cleanup job runs.
const CLEANUP_INTERVAL: Duration = Duration::from_secs(3600);

/// Run the cleanup loop until `cancel` is triggered.
///
/// The first sweep happens immediately on start.
pub async fn run(pool: PgPool, cancel: CancellationToken) {
    tracing::info!(
        interval_secs = CLEANUP_INTERVAL.as_secs(),
        "Credential cleanup job started"
    );

    let mut interval = tokio::time::interval(CLEANUP_INTERVAL);

    loop {
        tokio::select! {
            _ = cancel.cancelled() => {
                tracing::info!("Credential cleanup job stopping");
                break;
            }
            _ = interval.tick() => sweep(&pool).await,
        }
    }
}

async fn sweep(pool: &PgPool) {
    match RefreshSessionRepo::delete_stale(pool).await {
        Ok(0) => tracing::debug!("Credential cleanup: no stale sessions"),
        Ok(deleted) => tracing::info!(deleted, "Credential cleanup: purged stale sessions"),
        Err(e) => tracing::error!(error = %e, "Credential cleanup: session purge failed"),
    }

    match VerificationCodeRepo::delete_expired(pool).await {
        Ok(0) => tracing::debug!("Credential cleanup: no expired codes"),
        Ok(deleted) => tracing::info!(deleted, "Credential cleanup: purged expired codes"),
        Err(e) => tracing::error!(error = %e, "Credential cleanup: code purge failed"),
    }
}
