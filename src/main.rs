//! Studio Membership API
//!
//! REST service for membership subscriptions and klippekort.
//!
//! ## Endpoints
//!
//! - `/api/membership*`, `/api/memberships` - Member subscriptions
//! - `/api/klippekort*` - Member punch cards
//! - `/api/admin/*` - Staff endpoints
//! - `GET /health` - Liveness probe

use std::sync::Arc;

use anyhow::Context;
use axum::http::HeaderValue;
use axum::Router;
use secrecy::ExposeSecret;
use sqlx::postgres::PgPoolOptions;
use sqlx::PgPool;
use tokio::signal;
use tower::ServiceBuilder;
use tower_http::cors::{Any, CorsLayer};
use tower_http::timeout::TimeoutLayer;
use tower_http::trace::{DefaultMakeSpan, DefaultOnResponse, TraceLayer};
use tracing::Level;
use tracing_subscriber::layer::SubscriberExt;
use tracing_subscriber::util::SubscriberInitExt;
use tracing_subscriber::EnvFilter;

use studio_membership::adapters::auth::PostgresSessions;
use studio_membership::adapters::clock::SystemClock;
use studio_membership::adapters::http::{router, AppState};
use studio_membership::adapters::postgres::{
    PostgresKlippekortCatalog, PostgresMembershipCatalog, PostgresRulesRepository,
    PostgresUserKlippekortRepository, PostgresUserMembershipRepository,
};
use studio_membership::application::RuleConfiguration;
use studio_membership::config::{AppConfig, DatabaseConfig, ServerConfig};

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = AppConfig::load().context("failed to load configuration")?;
    config.validate().context("invalid configuration")?;

    init_tracing(&config.server)?;
    tracing::info!(
        environment = ?config.server.environment,
        timezone = %config.studio.timezone,
        "Starting studio membership API"
    );

    let pool = connect(&config.database).await?;
    if config.database.run_migrations {
        sqlx::migrate!("./migrations").run(&pool).await?;
        tracing::info!("Database migrations applied");
    }

    let state = build_state(&config, pool)?;
    let app = with_middleware(router(state), &config.server);

    let addr = config.server.socket_addr()?;
    let listener = tokio::net::TcpListener::bind(addr).await?;
    tracing::info!("HTTP server listening on {}", addr);

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    tracing::info!("Shutdown complete");
    Ok(())
}

fn init_tracing(server: &ServerConfig) -> anyhow::Result<()> {
    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&server.log_level))?;

    if server.is_production() {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().json())
            .init();
    } else {
        tracing_subscriber::registry()
            .with(filter)
            .with(tracing_subscriber::fmt::layer().pretty())
            .init();
    }
    Ok(())
}

async fn connect(database: &DatabaseConfig) -> anyhow::Result<PgPool> {
    let pool = PgPoolOptions::new()
        .min_connections(database.min_connections)
        .max_connections(database.max_connections)
        .acquire_timeout(database.acquire_timeout())
        .idle_timeout(database.idle_timeout())
        .max_lifetime(database.max_lifetime())
        .connect(database.url.expose_secret())
        .await
        .context("failed to connect to database")?;
    tracing::info!(
        max_connections = database.max_connections,
        "Database pool created"
    );
    Ok(pool)
}

fn build_state(config: &AppConfig, pool: PgPool) -> anyhow::Result<AppState> {
    let storage = config.studio.storage_policy();
    let rules_repository = Arc::new(PostgresRulesRepository::new(pool.clone()));
    let sessions = Arc::new(PostgresSessions::new(pool.clone()));

    Ok(AppState {
        memberships: Arc::new(PostgresUserMembershipRepository::new(pool.clone())),
        klippekort: Arc::new(PostgresUserKlippekortRepository::new(pool.clone())),
        membership_catalog: Arc::new(PostgresMembershipCatalog::new(pool.clone())),
        klippekort_catalog: Arc::new(PostgresKlippekortCatalog::new(pool)),
        rules: Arc::new(RuleConfiguration::new(rules_repository, storage)),
        clock: Arc::new(SystemClock::new(config.studio.tz()?)),
        sessions: sessions.clone(),
        authorizer: sessions,
        storage,
        expiry_warning_days: config.studio.expiry_warning_days,
    })
}

fn with_middleware(app: Router, server: &ServerConfig) -> Router {
    let origins: Vec<HeaderValue> = server
        .cors_origins_list()
        .iter()
        .filter_map(|origin| origin.parse().ok())
        .collect();
    let cors = if origins.is_empty() {
        CorsLayer::new().allow_origin(Any)
    } else {
        CorsLayer::new().allow_origin(origins)
    }
    .allow_methods(Any)
    .allow_headers(Any);

    // Order matters - outermost first
    let middleware = ServiceBuilder::new()
        .layer(
            TraceLayer::new_for_http()
                .make_span_with(DefaultMakeSpan::new().level(Level::INFO))
                .on_response(DefaultOnResponse::new().level(Level::INFO)),
        )
        .layer(cors)
        .layer(TimeoutLayer::new(server.request_timeout()));

    app.layer(middleware)
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = signal::ctrl_c().await {
            tracing::error!(error = %e, "failed to listen for Ctrl+C");
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match signal::unix::signal(signal::unix::SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(e) => {
                tracing::error!(error = %e, "failed to install SIGTERM handler");
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        () = ctrl_c => {},
        () = terminate => {},
    }

    tracing::info!("Shutdown signal received, starting graceful shutdown");
}
