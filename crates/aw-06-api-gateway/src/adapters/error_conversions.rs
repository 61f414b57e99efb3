//! Mapping of pipeline failures onto HTTP responses.

use arxweave_telemetry::SUBSYSTEM_ERRORS;
use aw_05_publish_pipeline::PublishError;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use axum::Json;
use shared_types::DocumentIdError;
use tracing::warn;

use crate::domain::{ErrorResponse, STATUS_ERROR};

/// Error returned by a route handler.
#[derive(Debug)]
pub enum ApiError {
    /// The path or body carried an unusable document id.
    InvalidId(DocumentIdError),
    /// The request body could not be decoded.
    BadBody(String),
    /// The pipeline failed.
    Publish(PublishError),
    /// Metrics could not be rendered.
    Internal(String),
}

impl From<PublishError> for ApiError {
    fn from(e: PublishError) -> Self {
        ApiError::Publish(e)
    }
}

impl From<DocumentIdError> for ApiError {
    fn from(e: DocumentIdError) -> Self {
        ApiError::InvalidId(e)
    }
}

/// HTTP status for a pipeline failure.
pub fn status_for(error: &PublishError) -> StatusCode {
    if error.is_timeout() {
        return StatusCode::GATEWAY_TIMEOUT;
    }
    if error.is_not_found() {
        return StatusCode::NOT_FOUND;
    }
    match error {
        PublishError::FetchFailure(_)
        | PublishError::QuoteFailure(_)
        | PublishError::BroadcastFailure(_)
        | PublishError::BroadcastRejected { .. }
        | PublishError::PollFailure(_)
        | PublishError::TransactionFetchFailure(_) => StatusCode::BAD_GATEWAY,
        _ => StatusCode::INTERNAL_SERVER_ERROR,
    }
}

impl ApiError {
    fn error_type(&self) -> &'static str {
        match self {
            Self::InvalidId(_) => "invalid_id",
            Self::BadBody(_) => "bad_body",
            Self::Publish(e) => e.phase().as_str(),
            Self::Internal(_) => "internal",
        }
    }

    fn into_parts(self) -> (StatusCode, ErrorResponse) {
        match self {
            Self::InvalidId(e) => (StatusCode::BAD_REQUEST, body(None, false, e.to_string(), None)),
            Self::BadBody(msg) => (StatusCode::BAD_REQUEST, body(None, false, msg, None)),
            Self::Internal(msg) => (
                StatusCode::INTERNAL_SERVER_ERROR,
                body(None, true, msg, None),
            ),
            Self::Publish(e) => (
                status_for(&e),
                body(
                    Some(e.phase().as_str().to_string()),
                    e.is_retryable(),
                    e.to_string(),
                    e.tx_id().map(|tx| tx.as_str().to_string()),
                ),
            ),
        }
    }
}

fn body(phase: Option<String>, retryable: bool, msg: String, tx_id: Option<String>) -> ErrorResponse {
    ErrorResponse {
        status: STATUS_ERROR.to_string(),
        phase,
        retryable,
        msg,
        tx_id,
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        SUBSYSTEM_ERRORS
            .with_label_values(&["aw-06", self.error_type()])
            .inc();
        let (status, body) = self.into_parts();
        warn!(status = status.as_u16(), msg = %body.msg, "[aw-06] Request failed");
        (status, Json(body)).into_response()
    }
}
