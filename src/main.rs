//! Ticketline API server binary.
//!
//! Loads configuration, connects to PostgreSQL, wires the adapters into the
//! application handlers and serves the ticketing API.

use std::sync::Arc;
use std::time::Duration;

use axum::http::HeaderValue;
use axum::routing::get;
use axum::Router;
use sqlx::postgres::PgPoolOptions;
use tokio::net::TcpListener;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing_subscriber::EnvFilter;

use ticketline::adapters::http::ticketing::{ticketing_router, TicketingAppState};
use ticketline::adapters::postgres::{
    PostgresCredentialRepository, PostgresTicketRepository, PostgresUserRepository,
    PostgresValidationRepository,
};
use ticketline::adapters::render::{HttpCredentialRenderer, RendererConfig};
use ticketline::config::AppConfig;

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let config = AppConfig::load()?;
    config.validate()?;

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new(config.server.log_level.clone())),
        )
        .init();

    let pool = PgPoolOptions::new()
        .min_connections(config.database.min_connections)
        .max_connections(config.database.max_connections)
        .acquire_timeout(config.database.acquire_timeout())
        .connect(&config.database.url)
        .await?;

    if config.database.run_migrations {
        info!("running database migrations");
        sqlx::migrate!("./migrations").run(&pool).await?;
    }

    let lock_timeout_ms = u64::from(config.database.lock_timeout_ms);
    let renderer = HttpCredentialRenderer::new(RendererConfig {
        base_url: config.renderer.base_url.clone(),
        request_timeout: config.renderer.request_timeout(),
    })?;

    let state = TicketingAppState {
        user_repository: Arc::new(PostgresUserRepository::new(pool.clone())),
        ticket_repository: Arc::new(
            PostgresTicketRepository::new(pool.clone()).with_lock_timeout_ms(lock_timeout_ms),
        ),
        credential_repository: Arc::new(PostgresCredentialRepository::new(pool.clone())),
        validation_repository: Arc::new(
            PostgresValidationRepository::new(pool.clone()).with_lock_timeout_ms(lock_timeout_ms),
        ),
        credential_renderer: Arc::new(renderer),
    };

    let cors = build_cors_layer(&config);

    let app = Router::new()
        .route("/health", get(|| async { "OK" }))
        .nest("/api", ticketing_router())
        .with_state(state)
        .layer(
            ServiceBuilder::new()
                .layer(TraceLayer::new_for_http())
                .layer(TimeoutLayer::new(Duration::from_secs(
                    config.server.request_timeout_secs,
                )))
                .layer(cors),
        );

    let addr = config.server.socket_addr();
    let listener = TcpListener::bind(addr).await?;
    info!("ticketline listening on http://{}", addr);

    axum::serve(listener, app).await?;

    Ok(())
}

fn build_cors_layer(config: &AppConfig) -> CorsLayer {
    let origins: Vec<HeaderValue> = config
        .server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();

    if origins.is_empty() {
        CorsLayer::new().allow_origin(Any).allow_headers(Any)
    } else {
        CorsLayer::new().allow_origin(origins).allow_headers(Any)
    }
}
