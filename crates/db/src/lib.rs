//! Jotbook persistence layer.
//!
//! Owns the PostgreSQL pool lifecycle (create, check, migrate, close) plus the
//! row models and repositories. The pool is built once at startup and passed
//! explicitly to whoever needs it; there is no process-global handle.

use std::time::Duration;

use sqlx::postgres::PgPoolOptions;

pub mod models;
pub mod repositories;

pub type DbPool = sqlx::PgPool;

/// Upper bound on pooled connections.
const MAX_CONNECTIONS: u32 = 20;

/// How long a request waits for a free connection before failing.
const ACQUIRE_TIMEOUT: Duration = Duration::from_secs(5);

/// Create a connection pool from a database URL.
pub async fn create_pool(database_url: &str) -> Result<DbPool, sqlx::Error> {
    PgPoolOptions::new()
        .max_connections(MAX_CONNECTIONS)
        .acquire_timeout(ACQUIRE_TIMEOUT)
        .connect(database_url)
        .await
}

/// Round-trip a trivial query to prove the database is reachable.
pub async fn health_check(pool: &DbPool) -> Result<(), sqlx::Error> {
    sqlx::query("SELECT 1").execute(pool).await?;
    Ok(())
}

/// Apply all pending migrations from `db/migrations`.
pub async fn run_migrations(pool: &DbPool) -> Result<(), sqlx::migrate::MigrateError> {
    sqlx::migrate!("../../db/migrations").run(pool).await
}

/// Close the pool, waiting for checked-out connections to be returned.
pub async fn close_pool(pool: &DbPool) {
    pool.close().await;
    tracing::info!("Database connection pool closed");
}
