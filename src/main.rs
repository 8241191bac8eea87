use std::sync::Arc;

use anyhow::Context;

use perchly_api::config::Config;
use perchly_api::date_key::SystemClock;
use perchly_api::db;
use perchly_api::session::{Session, SessionOptions};
use perchly_api::store::{SqliteStore, Store};
use perchly_api::{build_router, AppState};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "perchly_api=debug,tower_http=debug".into()),
        )
        .json()
        .init();

    let config = Arc::new(Config::from_env());

    // Database
    let pool = db::pool::create_pool(&config.database_url, 5)
        .await
        .context("Failed to open database")?;
    db::pool::run_migrations(&pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!("Database migrations applied");

    let store: Arc<dyn Store> = Arc::new(SqliteStore::new(pool));
    let mut session = Session::new(
        store.clone(),
        Arc::new(SystemClock),
        SessionOptions::from(config.as_ref()),
    );
    session.load().await;

    let state = AppState::new(session, store, config.clone());
    let app = build_router(state.clone());

    let addr = config.listen_addr();
    tracing::info!("Starting server on {}", addr);

    let listener = tokio::net::TcpListener::bind(&addr)
        .await
        .with_context(|| format!("Failed to bind {addr}"))?;
    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .context("Server error")?;

    // Drain pending writes before exit
    if let Err(e) = state.session.lock().await.flush().await {
        tracing::error!(error = %e, "Failed to flush pending writes");
    }
    tracing::info!("Shut down cleanly");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for shutdown signal");
    }
    tracing::info!("Shutdown signal received");
}
