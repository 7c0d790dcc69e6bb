//! The registration server for registro: one endpoint that validates a
//! multipart form submission and persists it.

/// A per-request database connection extractor
mod conn;

/// The API's error type and its wire format
mod error;

/// Request handlers
mod handlers;

/// Shared request state
mod state;

/// The persistence layer
mod store;

use axum::extract::DefaultBodyLimit;
use axum::http::{HeaderValue, Method};
use axum::routing::{get, post};
use axum::Router;
use clap::Parser;
use sqlx::postgres::PgPoolOptions;
use std::time::Duration;
use tokio::net::TcpListener;
use tower_http::{cors, limit, timeout, trace};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

#[derive(Debug, Parser)]
struct Config {
    #[clap(long, env, default_value = "127.0.0.1:3118")]
    address: String,

    /// Request body size limit, in bytes. Leaves headroom over the 10 MiB
    /// photo cap for the other multipart parts.
    #[clap(long, env, default_value = "11534336")]
    body_limit: usize,

    /// Request timeout, in seconds
    #[clap(long, env, default_value = "30", value_parser = duration_parser)]
    request_timeout: Duration,

    /// Postgres connection string
    #[clap(long, env)]
    database_url: String,

    /// Browser origin allowed to call the API
    #[clap(long, env, default_value = "http://localhost:3000")]
    allowed_origin: String,
}

fn duration_parser(s: &str) -> Result<Duration, std::num::ParseIntError> {
    s.parse().map(Duration::from_secs)
}

#[tokio::main]
async fn main() {
    let options = Config::parse();

    tracing_subscriber::registry()
        .with(tracing_subscriber::EnvFilter::from_default_env())
        .with(tracing_subscriber::fmt::layer())
        .init();

    let pool = PgPoolOptions::new()
        .max_connections(5)
        .connect(&options.database_url)
        .await
        .unwrap();

    sqlx::migrate!().run(&pool).await.unwrap();

    let allowed_origin: HeaderValue = options.allowed_origin.parse().unwrap();

    let app = Router::new()
        .route("/healthz", get(handlers::health::handler))
        .route("/api/usuarios", post(handlers::crear::handler))
        .layer(trace::TraceLayer::new_for_http())
        .layer(DefaultBodyLimit::max(options.body_limit))
        .layer(limit::RequestBodyLimitLayer::new(options.body_limit))
        .layer(timeout::TimeoutLayer::new(options.request_timeout))
        .layer(
            cors::CorsLayer::new()
                .allow_origin(allowed_origin)
                .allow_methods([Method::GET, Method::POST]),
        )
        .with_state(state::State::new(pool));

    let listener = TcpListener::bind(&options.address).await.unwrap();
    tracing::info!(address = ?listener.local_addr(), "listening");

    axum::serve(listener, app).await.unwrap();
}
