//! Flock Server — social graph backend core
//!
//! Main entry point that wires the infrastructure together: database pool
//! and migrations, ephemeral store, presence registry, and the maintenance
//! worker. Feature services are constructed by the embedding transport
//! layer on top of these.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use flock_core::config::AppConfig;
use flock_core::error::AppError;
use flock_core::traits::store::EphemeralStore as _;

#[tokio::main]
async fn main() {
    let env = std::env::var("FLOCK_ENV").unwrap_or_else(|_| "development".to_string());
    let config = match AppConfig::load(&env) {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {e}");
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(config).await {
        tracing::error!("Server error: {e}");
        std::process::exit(1);
    }
}

/// Initialize tracing/logging.
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt().json().with_env_filter(filter).with_target(true).init();
        }
        _ => {
            fmt().pretty().with_env_filter(filter).with_target(true).init();
        }
    }
}

/// Main run function.
async fn run(config: AppConfig) -> Result<(), AppError> {
    tracing::info!("Starting Flock v{}", env!("CARGO_PKG_VERSION"));

    // ── Step 1: Database connection + migrations ─────────────────
    let db = flock_database::DatabasePool::connect(&config.database).await?;
    flock_database::migration::run_migrations(db.pool()).await?;

    // ── Step 2: Ephemeral store ──────────────────────────────────
    tracing::info!(provider = %config.cache.provider, "Initializing ephemeral store...");
    let store_manager = flock_cache::StoreManager::new(&config.cache).await?;
    let store = store_manager.store();
    store.health_check().await?;
    tracing::info!("Ephemeral store ready");

    // ── Step 3: Presence registry ────────────────────────────────
    let presence = Arc::new(flock_realtime::PresenceRegistry::new(&config.realtime));
    tracing::info!(online = presence.online_count(), "Presence registry ready");

    // ── Step 4: Background worker ────────────────────────────────
    let mut scheduler = if config.worker.enabled {
        let notification_repo = Arc::new(
            flock_database::repositories::notification::NotificationRepository::new(
                db.pool().clone(),
            ),
        );
        let cleanup = Arc::new(flock_worker::jobs::cleanup::NotificationCleanup::new(
            notification_repo,
        ));

        let scheduler = flock_worker::CronScheduler::new().await?;
        scheduler
            .register_notification_cleanup(cleanup, &config.worker.notification_cleanup_schedule)
            .await?;
        scheduler.start().await?;
        Some(scheduler)
    } else {
        tracing::info!("Background worker disabled");
        None
    };

    tracing::info!("Flock core up; waiting for shutdown signal");

    // ── Step 5: Graceful shutdown ────────────────────────────────
    shutdown_signal().await;
    tracing::info!("Shutdown signal received, starting graceful shutdown...");

    if let Some(scheduler) = scheduler.as_mut() {
        scheduler.shutdown().await?;
    }
    db.close().await;

    tracing::info!("Flock shut down gracefully");
    Ok(())
}

/// Wait for shutdown signal (Ctrl+C or SIGTERM).
async fn shutdown_signal() {
    let ctrl_c = async {
        tokio::signal::ctrl_c()
            .await
            .expect("Failed to install Ctrl+C handler");
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
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
