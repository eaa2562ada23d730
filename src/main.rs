mod api;
mod config;
mod engine;
mod error;
mod models;
mod observability;
mod provider;
mod state;
mod store;

use std::sync::Arc;

use tracing_subscriber::EnvFilter;

use crate::provider::geocode::HttpGeocoder;
use crate::provider::rides::SandboxRideProvider;

#[tokio::main]
async fn main() -> Result<(), error::AppError> {
    let config = config::Config::from_env()?;

    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::new(config.log_level.clone()))
        .with_target(false)
        .compact()
        .init();

    let http = reqwest::Client::new();
    let geocoder = Arc::new(HttpGeocoder::new(
        http.clone(),
        config.geocode_base_url.clone(),
    ));
    let rides = Arc::new(SandboxRideProvider::new(
        http,
        config.rides_base_url.clone(),
        config.rides_server_token.clone(),
        config.rides_access_token.clone(),
    ));

    let shared_state = Arc::new(state::AppState::new(geocoder, rides));
    let app = api::rest::router(shared_state);

    let bind_addr = format!("0.0.0.0:{}", config.http_port);
    let listener = tokio::net::TcpListener::bind(&bind_addr)
        .await
        .map_err(|err| error::AppError::Internal(format!("failed to bind {bind_addr}: {err}")))?;

    tracing::info!(http_port = config.http_port, "http server started");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await
        .map_err(|err| error::AppError::Internal(format!("server error: {err}")))?;

    Ok(())
}

async fn shutdown_signal() {
    if let Err(err) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %err, "failed to listen for shutdown signal");
    }
}
