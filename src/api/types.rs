//! API request and response types

use std::time::Duration;

use axum::http::StatusCode;
use axum::response::IntoResponse;
use axum::response::Response;
use axum::Json;
use serde::Deserialize;
use serde::Serialize;

/// QA query request
#[derive(Debug, Deserialize)]
pub struct QuestionAnsweringRequest {
    pub question: String,
}

/// QA query response
#[derive(Debug, Serialize, Deserialize)]
pub struct QuestionAnsweringResponse {
    pub data: String,
}

/// Error body returned for every failed request
#[derive(Debug, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub detail: String,
}

/// Health check response
#[derive(Debug, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub version: String,
}

/// Failures surfaced at the HTTP boundary
#[derive(Debug)]
pub enum ApiError {
    /// Body could not be decoded into the request type
    MalformedRequest(String),
    /// Answering did not finish within the configured limit
    Timeout(Duration),
    /// Embedding, retrieval or generation failed
    Internal(String),
}

impl ApiError {
    pub const fn status(&self) -> StatusCode {
        match self {
            Self::MalformedRequest(_) => StatusCode::UNPROCESSABLE_ENTITY,
            Self::Timeout(_) => StatusCode::GATEWAY_TIMEOUT,
            Self::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    pub fn detail(&self) -> String {
        match self {
            Self::MalformedRequest(msg) => msg.clone(),
            Self::Timeout(limit) => format!("Request timed out after {} seconds", limit.as_secs()),
            Self::Internal(msg) => format!("Failed to answer question: {msg}"),
        }
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let body = ErrorResponse {
            detail: self.detail(),
        };
        (self.status(), Json(body)).into_response()
    }
}
