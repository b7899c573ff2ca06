//! Gateway server setup
//!
//! Builds shared state from configuration and serves the WebSocket route.

mod handler;
mod state;

pub use handler::gateway_handler;
pub use state::GatewayState;

use crate::handlers::{ReadyAssembler, Repositories};
use crate::session::SessionRegistry;
use axum::{routing::get, Router};
use derailed_common::{AppConfig, AppError, TokenService};
use derailed_core::SnowflakeGenerator;
use std::sync::Arc;
use tokio::net::TcpListener;
use tower_http::trace::TraceLayer;

/// Create the gateway router
pub fn create_router() -> Router<GatewayState> {
    Router::new()
        .route("/gateway", get(gateway_handler))
        .route("/health", get(health_check))
}

/// Health check endpoint
async fn health_check() -> &'static str {
    "OK"
}

/// Build the complete application
pub fn create_app(state: GatewayState) -> Router {
    create_router()
        .layer(TraceLayer::new_for_http())
        .with_state(state)
}

/// Postgres-backed repositories
pub fn postgres_repositories(pool: &derailed_db::PgPool) -> Repositories {
    Repositories {
        devices: Arc::new(derailed_db::PgDeviceRepository::new(pool.clone())),
        users: Arc::new(derailed_db::PgUserRepository::new(pool.clone())),
        members: Arc::new(derailed_db::PgMemberRepository::new(pool.clone())),
        read_states: Arc::new(derailed_db::PgReadStateRepository::new(pool.clone())),
        relationships: Arc::new(derailed_db::PgRelationshipRepository::new(pool.clone())),
    }
}

/// Initialize all dependencies and create `GatewayState`
pub async fn create_gateway_state(config: &AppConfig) -> Result<GatewayState, AppError> {
    tracing::info!("Connecting to PostgreSQL...");
    let settings = derailed_db::PoolSettings::new(config.database.url.clone()).connections(
        config.database.min_connections,
        config.database.max_connections,
    );
    let pool = derailed_db::create_pool(&settings)
        .await
        .map_err(|e| AppError::Database(e.to_string()))?;
    tracing::info!("PostgreSQL connection established");

    let tokens = TokenService::new(&config.jwt.secret, config.jwt.token_expiry);
    let assembler = ReadyAssembler::new(tokens, postgres_repositories(&pool));

    Ok(GatewayState::new(
        assembler,
        Arc::new(SessionRegistry::new()),
        SnowflakeGenerator::new(config.snowflake.worker_id),
        config.heartbeat,
    ))
}

/// Serve `app` on an already bound listener
pub async fn serve(listener: TcpListener, app: Router) -> Result<(), AppError> {
    if let Ok(addr) = listener.local_addr() {
        tracing::info!("Gateway listening on ws://{}/gateway", addr);
    }

    axum::serve(listener, app)
        .await
        .map_err(|e| AppError::Config(format!("Server error: {e}")))
}

/// Run the complete gateway server with configuration
pub async fn run(config: AppConfig) -> Result<(), AppError> {
    let addr = config.gateway.address();
    let state = create_gateway_state(&config).await?;

    tracing::info!("Starting Gateway server on {}", addr);
    let listener = TcpListener::bind(&addr)
        .await
        .map_err(|e| AppError::Config(format!("Failed to bind to {addr}: {e}")))?;

    serve(listener, create_app(state)).await
}

