//! Route table.

use std::sync::Arc;

use axum::routing::{get, post};
use axum::{middleware, Router};
use tower_http::trace::TraceLayer;

use crate::domain::GatewayConfig;
use crate::handlers::{self, AppState};
use crate::middleware::{create_cors_layer, origin_filter, OriginPolicy};

/// Build the gateway router.
///
/// Document ids may contain `/` (old-style arXiv ids), so id routes use
/// wildcard captures.
pub fn create_router(state: AppState, config: &GatewayConfig) -> Router {
    let policy = Arc::new(OriginPolicy::from_config(config));

    Router::new()
        .route("/health", get(handlers::health))
        .route("/metrics", get(handlers::metrics))
        .route("/all", get(handlers::list_all))
        .route("/new", post(handlers::publish))
        .route("/exists/*id", get(handlers::exists))
        .route("/arXivID/*id", get(handlers::get_document))
        .route("/status/*id", post(handlers::refresh_status))
        .route("/tx/*id", get(handlers::get_transaction))
        .with_state(state)
        .layer(create_cors_layer(config))
        .layer(middleware::from_fn_with_state(policy, origin_filter))
        .layer(TraceLayer::new_for_http())
}
