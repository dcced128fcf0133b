use anyhow::Result;
use axum::extract::DefaultBodyLimit;
use axum::routing::{get, post};
use axum::Router;
use tokio::net::TcpListener;
use tower_http::cors::CorsLayer;
use tower_http::limit::RequestBodyLimitLayer;

use super::predict::predict;
use super::types::{ClassifierState, ServerConfig, VerifierState};
use super::verify::verify_license;

fn health_routes<S: Clone + Send + Sync + 'static>() -> Router<S> {
    Router::new()
        .route("/ping", get(|| async { "pong" }))
        .route("/health", get(|| async { "healthy" }))
}

pub fn verifier_router(state: VerifierState, config: &ServerConfig) -> Router {
    health_routes::<VerifierState>()
        .route("/verify-license", post(verify_license))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .with_state(state)
}

pub fn classifier_router(state: ClassifierState, config: &ServerConfig) -> Router {
    health_routes::<ClassifierState>()
        .route("/predict", post(predict))
        .layer(DefaultBodyLimit::disable())
        .layer(RequestBodyLimitLayer::new(config.max_upload_bytes))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

pub async fn serve(app: Router, config: &ServerConfig) -> Result<()> {
    let addr = config.socket_addr()?;
    log::info!("Attempting to bind to {}", addr);

    let listener = TcpListener::bind(addr)
        .await
        .map_err(|e| anyhow::anyhow!("Failed to bind {}: {}", addr, e))?;
    log::info!("Successfully bound to http://{}", addr);

    axum::serve(listener, app)
        .await
        .map_err(|e| anyhow::anyhow!("Server error: {}", e))
}
