use space_leaderboard::api::handlers::ApiState;
use space_leaderboard::api::router::build_router;
use space_leaderboard::config::types::Config;
use space_leaderboard::leaderboard::maintainer::Leaderboard;
use space_leaderboard::leaderboard::sweeper::spawn_sweeper;
use space_leaderboard::store::backend::connect;

use std::sync::Arc;
use tokio::net::TcpListener;
use tokio::signal;
use tracing_subscriber::EnvFilter;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let config = Config::load()?;
    tracing::info!(
        "Starting leaderboard (top {}, store {}, collection {})",
        config.leaderboard_size,
        config.store.kind,
        config.store.collection
    );

    // 1. Store (degraded, not fatal, without credentials):
    let backend = connect(&config.store);
    if !backend.is_available() {
        tracing::warn!("Database not initialized, score endpoints will answer 503");
    }

    // 2. Leaderboard:
    let leaderboard = Arc::new(Leaderboard::new(backend));

    // 3. Background sweeper:
    match config.prune_interval {
        Some(period) => {
            tracing::info!("Pruning leaderboard every {}s", period.as_secs());
            spawn_sweeper(leaderboard.clone(), config.leaderboard_size, period);
        }
        None => tracing::info!("Leaderboard sweeper disabled"),
    }

    // 4. HTTP Router:
    let app = build_router(Arc::new(ApiState {
        leaderboard,
        leaderboard_size: config.leaderboard_size,
    }));

    // 5. Start HTTP server:
    let address = config.bind_address();
    let listener = TcpListener::bind(&address).await?;
    tracing::info!("HTTP server listening on {}", address);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Server shut down");
    Ok(())
}

async fn shutdown_signal() {
    let ctrl_c = async {
        match signal::ctrl_c().await {
            Ok(()) => tracing::info!("Received Ctrl+C, shutting down"),
            Err(e) => {
                tracing::error!("Failed to install Ctrl+C handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{SignalKind, signal};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
                tracing::info!("Received terminate signal, shutting down");
            }
            Err(e) => {
                tracing::error!("Failed to install signal handler: {}", e);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }
}
