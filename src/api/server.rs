//! HTTP server implementation

use std::sync::Arc;

use axum::Router;
use tower_http::cors::AllowHeaders;
use tower_http::cors::AllowMethods;
use tower_http::cors::AllowOrigin;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;
use tracing::info;
use tracing::warn;

use crate::api::handlers::AppState;
use crate::api::routes;
use crate::config::AppConfig;
use crate::index::IndexStorage;
use crate::Result;

/// Permissive CORS that still allows credentials
///
/// A wildcard cannot be combined with credentials, so origin, method and
/// headers are echoed back from the request instead.
pub fn cors_layer() -> CorsLayer {
    CorsLayer::new()
        .allow_origin(AllowOrigin::mirror_request())
        .allow_methods(AllowMethods::mirror_request())
        .allow_headers(AllowHeaders::mirror_request())
        .allow_credentials(true)
}

/// Assemble the application router with its middleware
pub fn build_router(state: AppState, enable_cors: bool) -> Router {
    let mut app = routes::api_routes(state).layer(TraceLayer::new_for_http());

    if enable_cors {
        info!("CORS enabled");
        app = app.layer(cors_layer());
    }

    app
}

/// Start the API server
pub async fn serve_api(
    config: &AppConfig,
    storage: Arc<IndexStorage>,
    host: String,
    port: u16,
) -> Result<()> {
    info!("Starting Playbook QA API server...");

    let state = AppState::new(storage, config.api_timeout());
    let app = build_router(state, config.server.enable_cors);

    let addr = format!("{}:{}", host, port);
    let listener = tokio::net::TcpListener::bind(&addr).await?;

    info!("API server listening on http://{}", addr);
    info!("Available endpoints:");
    info!("  GET  /health    - Health check");
    info!("  POST /qa/query  - Answer a question");

    axum::serve(listener, app)
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    info!("API server stopped");
    Ok(())
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        warn!("Failed to listen for shutdown signal: {}", e);
        std::future::pending::<()>().await;
    }
    info!("Shutdown signal received");
}
