//! Origin filtering.
//!
//! Two layers share one whitelist:
//!
//! - [`origin_filter`] runs first. A request with a non-whitelisted `Origin`
//!   is refused with 403. A request without `Origin` whose `Referer` matches
//!   no whitelisted origin gets the informational local-visit message and is
//!   not routed.
//! - [`create_cors_layer`] answers preflights and sets the CORS headers.

use std::sync::Arc;

use axum::extract::{Request, State};
use axum::http::header::{ACCEPT, CONTENT_TYPE, ORIGIN, REFERER};
use axum::http::{HeaderName, HeaderValue, Method, StatusCode};
use axum::middleware::Next;
use axum::response::{IntoResponse, Response};
use axum::Json;
use serde_json::json;
use tower_http::cors::{AllowOrigin, Any, CorsLayer};
use tracing::debug;

use crate::domain::{ErrorResponse, GatewayConfig, MSG_LOCAL_VISIT, STATUS_ERROR};

/// Whitelist shared by the origin filter.
#[derive(Debug, Clone)]
pub struct OriginPolicy {
    whitelist: Vec<String>,
    allow_any: bool,
}

impl OriginPolicy {
    /// Build from gateway configuration.
    pub fn from_config(config: &GatewayConfig) -> Self {
        Self {
            whitelist: config.whitelist(),
            allow_any: config.allows_any_origin(),
        }
    }

    /// Exact match against the whitelist.
    pub fn allows_origin(&self, origin: &str) -> bool {
        self.allow_any || self.whitelist.iter().any(|w| w == origin)
    }

    /// A referer is valid when it contains a whitelisted origin.
    pub fn allows_referer(&self, referer: &str) -> bool {
        self.allow_any || self.whitelist.iter().any(|w| referer.contains(w.as_str()))
    }
}

/// Origin and referer check applied before routing.
pub async fn origin_filter(
    State(policy): State<Arc<OriginPolicy>>,
    request: Request,
    next: Next,
) -> Response {
    let headers = request.headers();

    if let Some(origin) = headers.get(ORIGIN) {
        let origin = origin.to_str().unwrap_or_default();
        if !policy.allows_origin(origin) {
            debug!(origin, "[aw-06] Origin refused");
            let body = ErrorResponse {
                status: STATUS_ERROR.to_string(),
                phase: None,
                retryable: false,
                msg: format!("invalid origin: {origin}"),
                tx_id: None,
            };
            return (StatusCode::FORBIDDEN, Json(body)).into_response();
        }
        return next.run(request).await;
    }

    if let Some(referer) = headers.get(REFERER) {
        let referer = referer.to_str().unwrap_or_default();
        if !policy.allows_referer(referer) {
            debug!(referer, "[aw-06] Local visit without origin");
            return Json(json!({ "msg": MSG_LOCAL_VISIT })).into_response();
        }
    }

    next.run(request).await
}

/// CORS layer for the configured whitelist.
pub fn create_cors_layer(config: &GatewayConfig) -> CorsLayer {
    let cors = CorsLayer::new()
        .allow_methods([Method::GET, Method::POST, Method::OPTIONS])
        .allow_headers([
            ORIGIN,
            HeaderName::from_static("x-requested-with"),
            CONTENT_TYPE,
            ACCEPT,
        ]);

    if config.allows_any_origin() {
        return cors.allow_origin(Any);
    }

    let origins: Vec<HeaderValue> = config
        .whitelist()
        .iter()
        .filter_map(|o| o.parse().ok())
        .collect();
    cors.allow_origin(AllowOrigin::list(origins))
}
