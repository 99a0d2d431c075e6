/// Question answering handler
use axum::extract::rejection::JsonRejection;
use axum::extract::State;
use axum::Json;
use tokio_util::sync::CancellationToken;
use tracing::error;
use tracing::info;
use tracing::warn;
use uuid::Uuid;

use super::AppState;
use crate::api::types::ApiError;
use crate::api::types::QuestionAnsweringRequest;
use crate::api::types::QuestionAnsweringResponse;
use crate::errors::QaError;

/// Answer a question (POST /qa/query)
pub async fn qa_query(
    State(state): State<AppState>,
    payload: Result<Json<QuestionAnsweringRequest>, JsonRejection>,
) -> Result<Json<QuestionAnsweringResponse>, ApiError> {
    let Json(req) = payload.map_err(|rejection| {
        warn!("Rejected malformed QA request: {}", rejection.body_text());
        ApiError::MalformedRequest(rejection.body_text())
    })?;

    let request_id = Uuid::new_v4();
    info!(%request_id, "POST /qa/query: {}", req.question);

    // Cancels in-flight work on timeout and when the client goes away
    let cancel = CancellationToken::new();
    let _guard = cancel.clone().drop_guard();

    match tokio::time::timeout(state.timeout, state.storage.answer(&req.question, &cancel)).await {
        Ok(Ok(answer)) => {
            info!(%request_id, "Answered in time");
            Ok(Json(QuestionAnsweringResponse { data: answer }))
        }
        Ok(Err(QaError::Cancelled)) => Err(ApiError::Timeout(state.timeout)),
        Ok(Err(e)) => {
            error!(%request_id, "Error processing QA query: {}", e);
            Err(ApiError::Internal(e.to_string()))
        }
        Err(_) => {
            cancel.cancel();
            warn!(%request_id, "QA query exceeded {:?}", state.timeout);
            Err(ApiError::Timeout(state.timeout))
        }
    }
}
