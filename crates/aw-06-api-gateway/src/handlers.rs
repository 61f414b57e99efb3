//! Route handlers.

use std::sync::Arc;

use arxweave_telemetry::encode_metrics;
use aw_05_publish_pipeline::{PublishApi, PublishOutcome};
use axum::async_trait;
use axum::extract::{FromRequest, Path, Request, State};
use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use axum::{Form, Json};
use shared_types::{DocumentId, DocumentRecord};
use tracing::info;

use crate::adapters::ApiError;
use crate::domain::{
    ExistsResponse, HealthResponse, MessageResponse, PublishRequest, PublishResponse,
    TagResponse, TransactionResponse, MSG_ALREADY_UPLOADED, MSG_NOT_IN_INDEX, STATUS_SUCCESS,
};

/// Shared handler state.
#[derive(Clone)]
pub struct AppState {
    /// Publish pipeline
    pub api: Arc<dyn PublishApi>,
}

impl AppState {
    /// Wrap a pipeline.
    pub fn new(api: Arc<dyn PublishApi>) -> Self {
        Self { api }
    }
}

/// `POST /new` body, accepted as JSON or as a urlencoded form.
#[derive(Debug)]
pub struct PublishBody(pub PublishRequest);

#[async_trait]
impl<S> FromRequest<S> for PublishBody
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request(req: Request, state: &S) -> Result<Self, Self::Rejection> {
        let is_json = req
            .headers()
            .get(CONTENT_TYPE)
            .and_then(|v| v.to_str().ok())
            .is_some_and(|v| v.starts_with("application/json"));

        if is_json {
            let Json(body) = Json::<PublishRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadBody(e.body_text()))?;
            Ok(Self(body))
        } else {
            let Form(body) = Form::<PublishRequest>::from_request(req, state)
                .await
                .map_err(|e| ApiError::BadBody(e.body_text()))?;
            Ok(Self(body))
        }
    }
}

/// `GET /health`
pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "ok".to_string(),
        version: crate::VERSION.to_string(),
    })
}

/// `GET /metrics`
pub async fn metrics() -> Result<Response, ApiError> {
    let body = encode_metrics().map_err(|e| ApiError::Internal(e.to_string()))?;
    Ok(([(CONTENT_TYPE, "text/plain; version=0.0.4")], body).into_response())
}

/// `GET /exists/:id`
pub async fn exists(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<ExistsResponse>, ApiError> {
    let id = DocumentId::parse(&raw_id)?;
    let exists = state.api.check(&id).await?;
    Ok(Json(ExistsResponse {
        arxiv_id: id.as_str().to_string(),
        exists,
    }))
}

/// `POST /new`
pub async fn publish(
    State(state): State<AppState>,
    PublishBody(body): PublishBody,
) -> Result<Response, ApiError> {
    let id = DocumentId::parse(&body.arxiv_id)?;
    info!(document_id = %id, "[aw-06] Publish requested");

    match state.api.publish(&id).await? {
        PublishOutcome::Published(receipt) => Ok(Json(PublishResponse {
            status: STATUS_SUCCESS.to_string(),
            msg: receipt.message(),
            tx_id: receipt.tx_id.as_str().to_string(),
            tx_status: receipt.status,
        })
        .into_response()),
        PublishOutcome::AlreadyPublished(_) => {
            Ok(Json(MessageResponse::bad_request(MSG_ALREADY_UPLOADED)).into_response())
        }
    }
}

/// `GET /arXivID/:id`
pub async fn get_document(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Response, ApiError> {
    let id = DocumentId::parse(&raw_id)?;
    match state.api.get(&id).await? {
        Some(record) => Ok(Json(record).into_response()),
        None => Ok(Json(MessageResponse::bad_request(MSG_NOT_IN_INDEX)).into_response()),
    }
}

/// `GET /all`
pub async fn list_all(State(state): State<AppState>) -> Result<Json<Vec<DocumentRecord>>, ApiError> {
    Ok(Json(state.api.list().await?))
}

/// `POST /status/:id`
pub async fn refresh_status(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<DocumentRecord>, ApiError> {
    let id = DocumentId::parse(&raw_id)?;
    Ok(Json(state.api.refresh_status(&id).await?))
}

/// `GET /tx/:id`
pub async fn get_transaction(
    State(state): State<AppState>,
    Path(raw_id): Path<String>,
) -> Result<Json<TransactionResponse>, ApiError> {
    let id = DocumentId::parse(&raw_id)?;
    let tx = state.api.transaction(&id).await?;
    Ok(Json(TransactionResponse {
        arxiv_id: id.as_str().to_string(),
        tx_id: tx.id.as_str().to_string(),
        owner: tx.owner,
        data_size: tx.data_size,
        reward: tx.reward.to_string(),
        data_url: tx.data_url,
        tags: tx
            .tags
            .into_iter()
            .map(|tag| TagResponse {
                name: tag.name,
                value: tag.value,
            })
            .collect(),
    }))
}
