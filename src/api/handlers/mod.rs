/// API request handlers
use std::sync::Arc;
use std::time::Duration;

use axum::Json;

use crate::api::types::HealthResponse;
use crate::index::IndexStorage;

pub mod qa;

pub use qa::*;

/// Shared application state
#[derive(Clone)]
pub struct AppState {
    pub storage: Arc<IndexStorage>,
    pub timeout: Duration,
}

impl AppState {
    pub fn new(storage: Arc<IndexStorage>, timeout: Duration) -> Self {
        Self { storage, timeout }
    }
}

/// Health check handler
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy".to_string(),
        version: env!("CARGO_PKG_VERSION").to_string(),
    })
}
