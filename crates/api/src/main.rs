use std::sync::Arc;
use std::time::Duration;

use bluetape_api::config::ServerConfig;
use bluetape_api::render::HtmlRenderer;
use bluetape_api::router::build_app_router;
use bluetape_api::state::AppState;
use bluetape_api::storage::LocalFileStorage;
use bluetape_db::DbPool;
use bluetape_events::{NotificationConfig, NotificationDispatcher};
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;

const DEFAULT_LOG_FILTER: &str = "bluetape_api=debug,bluetape_events=debug,tower_http=debug";

#[tokio::main]
async fn main() {
    dotenvy::dotenv().ok();
    init_tracing();

    let config = ServerConfig::from_env();
    let addr = config.bind_addr();

    let pool = open_database().await;

    tokio::fs::create_dir_all(&config.upload_dir)
        .await
        .unwrap_or_else(|e| panic!("Cannot create {}: {e}", config.upload_dir.display()));
    let storage = LocalFileStorage::new(config.upload_dir.clone(), config.max_photo_size_mb);
    tracing::info!(
        upload_dir = %storage.root().display(),
        max_mb = config.max_photo_size_mb,
        "Upload storage ready"
    );

    let notifications = NotificationConfig::from_env();
    tracing::info!(
        email = notifications.email.is_some(),
        sms = notifications.sms.is_some(),
        "Notification channels configured (unconfigured channels are simulated)"
    );
    let notifier = NotificationDispatcher::new(notifications, config.app_name.clone())
        .expect("Failed to build notification dispatcher");

    let state = AppState {
        pool: pool.clone(),
        config: Arc::new(config.clone()),
        storage: Arc::new(storage),
        notifier: Arc::new(notifier),
        renderer: Arc::new(HtmlRenderer),
    };
    let app = build_app_router(state, &config);

    let listener = tokio::net::TcpListener::bind(addr)
        .await
        .unwrap_or_else(|e| panic!("Cannot bind {addr}: {e}"));
    tracing::info!(%addr, "Blue Tape API listening");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .expect("Server error");

    close_database(pool, Duration::from_secs(config.shutdown_timeout_secs)).await;
}

fn init_tracing() {
    let filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| DEFAULT_LOG_FILTER.into());
    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer())
        .init();
}

/// Connect, verify, and migrate. Any failure aborts startup.
async fn open_database() -> DbPool {
    let url = std::env::var("DATABASE_URL").expect("DATABASE_URL must be set");
    let pool = bluetape_db::create_pool(&url)
        .await
        .expect("Failed to connect to database");
    bluetape_db::health_check(&pool)
        .await
        .expect("Database health check failed");
    bluetape_db::run_migrations(&pool)
        .await
        .expect("Failed to run database migrations");
    tracing::info!("Database ready, migrations applied");
    pool
}

async fn close_database(pool: DbPool, grace: Duration) {
    if tokio::time::timeout(grace, pool.close()).await.is_err() {
        tracing::warn!(grace_secs = grace.as_secs(), "Database pool did not close in time");
    } else {
        tracing::info!("Shutdown complete");
    }
}

/// Resolves on SIGINT, or SIGTERM on Unix.
async fn shutdown_signal() {
    let interrupt = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Cannot listen for Ctrl-C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "Cannot listen for SIGTERM");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = interrupt => tracing::info!("SIGINT received, draining requests"),
        () = terminate => tracing::info!("SIGTERM received, draining requests"),
    }
}
