//! services/api/src/bin/api.rs

use api_lib::{
    adapters::{DbAdapter, MemoryAdapter},
    config::{Config, StoreBackend},
    error::ApiError,
    web::{self, rest::ApiDoc, state::AppState},
};
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use std::sync::Arc;
use study_tracker_core::SystemClock;
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

#[tokio::main]
async fn main() -> Result<(), ApiError> {
    // --- 1. Load Configuration & Set Up Logging ---
    let config = Arc::new(Config::from_env()?);
    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::new(config.log_level.to_string()))
        .with(tracing_subscriber::fmt::layer())
        .init();
    info!("Configuration loaded. Starting server...");

    // --- 2. Connect the Store & Build the Shared AppState ---
    let clock = Arc::new(SystemClock);
    let app_state = match &config.store {
        StoreBackend::Postgres {
            database_url,
            max_connections,
        } => {
            info!("Connecting to database...");
            let db_pool = PgPoolOptions::new()
                .max_connections(*max_connections)
                .connect(database_url)
                .await?;
            let db_adapter = Arc::new(DbAdapter::new(db_pool));
            info!("Running database migrations...");
            db_adapter.run_migrations().await?;
            info!("Database migrations complete.");
            AppState::new(db_adapter, clock, config.clone())
        }
        StoreBackend::Memory => {
            info!("Using the in-memory store; nothing will be persisted.");
            AppState::new(Arc::new(MemoryAdapter::new()), clock, config.clone())
        }
    };
    info!(
        "Tracker cache TTL is {}s, study day offset is {}",
        config.cache_ttl.num_seconds(),
        config.calendar.offset()
    );

    // --- 3. Create the Web Router ---
    let cors = web::cors_layer(&config)?;
    let app = Router::new()
        .merge(web::router(Arc::new(app_state)))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(cors);

    // --- 4. Start the Server ---
    info!("Starting server on {}", config.bind_address);
    info!(
        "Swagger UI available at http://{}/swagger-ui",
        config.bind_address
    );
    let listener = tokio::net::TcpListener::bind(&config.bind_address).await?;
    axum::serve(listener, app).await?;

    Ok(())
}
