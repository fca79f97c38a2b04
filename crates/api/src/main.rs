use std::net::SocketAddr;
use std::sync::Arc;
use std::time::Duration;

use jotbook_api::background;
use jotbook_api::config::ServerConfig;
use jotbook_api::router::build_app_router;
use jotbook_api::state::AppState;
use jotbook_events::{EmailConfig, EmailNotifier, EventBus, EventLogger, LogNotifier, Notifier};
use tokio_util::sync::CancellationToken;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();

    // --- Tracing ---
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "jotbook_api=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // --- Configuration ---
    let config = ServerConfig::from_env();
    tracing::info!(
        host = %config.host,
        port = %config.port,
        google_sign_in = config.google.is_some(),
        "Loaded server configuration"
    );

    // --- Database ---
    let database_url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");

    let pool = jotbook_db::create_pool(&database_url)
        .await
        .expect("Failed to connect to database");
    tracing::info!("Database connection pool created");

    jotbook_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    tracing::info!("Database health check passed");

    jotbook_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database migrations applied");

    // --- Code delivery ---
    let notifier = build_notifier();

    // --- Event bus ---
    let event_bus = Arc::new(EventBus::default());
    let logger_handle = tokio::spawn(EventLogger::run(event_bus.subscribe()));
    tracing::info!("Event bus created");

    // --- Background jobs ---
    let cleanup_cancel = CancellationToken::new();
    let cleanup_handle = tokio::spawn(background::credential_cleanup::run(
        pool.clone(),
        cleanup_cancel.clone(),
    ));

    // --- App state & router ---
    let state = AppState::new(pool.clone(), config.clone(), notifier, Arc::clone(&event_bus));
    let app = build_app_router(state, &config);

    // --- Start server ---
    let addr = SocketAddr::new(
        config.host.parse().expect("Invalid HOST address"),
        config.port,
    );
    tracing::info!(%addr, "Starting server");

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .expect("Failed to bind to address");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    // --- Post-shutdown cleanup ---
    tracing::info!("Server stopped accepting connections, cleaning up");
    let grace = Duration::from_secs(config.shutdown_timeout_secs);

    cleanup_cancel.cancel();
    let _ = tokio::time::timeout(grace, cleanup_handle).await;
    tracing::info!("Credential cleanup job stopped");

    // The router (and every state clone holding the bus) is gone now, so
    // dropping this last sender closes the channel and ends the logger.
    drop(event_bus);
    let _ = tokio::time::timeout(grace, logger_handle).await;
    tracing::info!("Event logger stopped");

    jotbook_db::close_pool(&pool).await;

    tracing::info!("Graceful shutdown complete");
}

/// SMTP delivery when configured, otherwise a notifier that only logs.
fn build_notifier() -> Arc<dyn Notifier> {
    let Some(email_config) = EmailConfig::from_env() else {
        tracing::warn!("SMTP_HOST not set, one-time codes will not be delivered");
        return Arc::new(LogNotifier);
    };

    let host = email_config.smtp_host.clone();
    match EmailNotifier::new(email_config) {
        Ok(notifier) => {
            tracing::info!(smtp_host = %host, "Email delivery enabled");
            Arc::new(notifier)
        }
        Err(e) => {
            tracing::error!(error = %e, "Invalid SMTP configuration, falling back to log delivery");
            Arc::new(LogNotifier)
        }
    }
}

/// Wait for a termination signal to initiate graceful shutdown.
///
/// Handles both SIGINT (Ctrl-C) and SIGTERM (on Unix).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl-C handler");
    };

    #[cfg(unix)]
    let terminate = async {
        tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate())
            .expect("Failed to install SIGTERM handler")
            .recv()
            .await;
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {
            tracing::info!("Received SIGINT (Ctrl-C), starting graceful shutdown");
        }
        () = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown");
        }
    }
}
