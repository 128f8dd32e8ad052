//! Fintrack API Server
//!
//! Main entry point for the Fintrack backend service.

use std::sync::Arc;

use tokio::net::TcpListener;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use fintrack_api::{AppState, create_router};
use fintrack_db::{TransactionRepository, UserRepository, connect};
use fintrack_shared::{AppConfig, JwtService};
use fintrack_shared::jwt::JwtConfig;

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Load environment variables from .env file
    dotenvy::dotenv().ok();

    // Initialize tracing
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "fintrack=debug,tower_http=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    // Load configuration
    let config = AppConfig::load()?;

    // Connect to database
    let db = connect(&config.database.url, config.database.max_connections).await?;
    info!("Connected to database");

    // Create session token service
    let jwt_service = JwtService::new(JwtConfig {
        secret: config.auth.secret.clone(),
        session_hours: config.auth.session_hours,
        remember_me_days: config.auth.remember_me_days,
    });

    // Create application state backed by the database repositories
    let state = AppState {
        credentials: Arc::new(UserRepository::new(db.clone())),
        records: Arc::new(TransactionRepository::new(db)),
        jwt: Arc::new(jwt_service),
    };

    // Create router
    let app = create_router(state);

    // Start server
    let addr = format!("{}:{}", config.server.host, config.server.port);
    let listener = TcpListener::bind(&addr).await?;
    info!("Server listening on {}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}
