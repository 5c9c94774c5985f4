//! # regatta-api: Binary Entry Point
//!
//! Starts the Axum HTTP server for the regatta documents API.
//! Binds to configurable port (default 8080).

use regatta_api::gateway::DocumentGateway;
use regatta_api::identity::IdentityGateway;
use regatta_api::state::{AppConfig, AppState};

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new("info")),
        )
        .init();

    let config = AppConfig::from_env();
    let port = config.port;

    // Optional: absent DATABASE_URL means in-memory only.
    let db_pool = regatta_api::db::init_pool().await.map_err(|e| {
        tracing::error!("Database initialization failed: {e}");
        e
    })?;
    let documents = DocumentGateway::from_pool(db_pool);
    if !documents.is_persistent() {
        tracing::warn!("DATABASE_URL not set, documents are kept in memory and lost on restart");
    }

    let identity = IdentityGateway::from_env().map_err(|e| {
        tracing::error!("Identity provider configuration failed: {e}");
        e
    })?;

    let app = regatta_api::app(AppState::new(documents, identity, config));

    let addr = std::net::SocketAddr::from(([0, 0, 0, 0], port));
    tracing::info!("Regatta API listening on {}", addr);

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
