//! LWW Sync Server
//!
//! Self-hosted key/value sync for multiple devices with last-write-wins
//! reconciliation.

use tokio::signal;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use lww_sync_server::config::Config;
use lww_sync_server::routes;
use lww_sync_server::state::AppState;
use lww_sync_server::sync::SyncStore;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "lww_sync_server=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    dotenvy::dotenv().ok();

    let config = Config::from_env()?;
    let addr = config.listen_addr()?;

    tracing::info!("Starting LWW Sync Server v{}", env!("CARGO_PKG_VERSION"));

    // Initialize database
    let store = SyncStore::connect(&config.database).await?;
    store.initialize().await?;
    tracing::info!("Database initialized at {}", config.database.url);

    let app_state = AppState::new(config, store.clone());
    let app = routes::app(app_state);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("LWW Sync Server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    store.close().await;
    tracing::info!("Server shutdown complete");

    Ok(())
}

/// Graceful shutdown signal handler
async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!("Failed to install Ctrl+C handler: {}", e);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut sigterm) => {
                sigterm.recv().await;
            }
            Err(e) => {
                tracing::error!("Failed to install SIGTERM handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {
            tracing::info!("Received Ctrl+C, starting graceful shutdown...");
        },
        _ = terminate => {
            tracing::info!("Received SIGTERM, starting graceful shutdown...");
        },
    }
}
