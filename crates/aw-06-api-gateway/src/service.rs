//! Gateway service: binds the listener and serves the router until shutdown.

use std::future::Future;
use std::sync::Arc;

use aw_05_publish_pipeline::PublishApi;
use axum::Router;
use tokio::net::TcpListener;
use tracing::info;

use crate::domain::{GatewayConfig, GatewayError};
use crate::handlers::AppState;
use crate::router::create_router;

/// HTTP gateway in front of the publish pipeline.
pub struct GatewayService {
    config: GatewayConfig,
    state: AppState,
}

impl GatewayService {
    /// Create a gateway after validating `config`.
    pub fn new(config: GatewayConfig, api: Arc<dyn PublishApi>) -> Result<Self, GatewayError> {
        config.validate()?;
        Ok(Self {
            config,
            state: AppState::new(api),
        })
    }

    /// Gateway configuration.
    pub fn config(&self) -> &GatewayConfig {
        &self.config
    }

    /// Router with every route and layer installed.
    pub fn router(&self) -> Router {
        create_router(self.state.clone(), &self.config)
    }

    /// Bind the configured address and serve until `shutdown` resolves.
    pub async fn serve<F>(self, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let addr = self.config.http_addr();
        let listener = TcpListener::bind(addr)
            .await
            .map_err(|source| GatewayError::Bind { addr, source })?;
        self.serve_on(listener, shutdown).await
    }

    /// Serve on an already bound listener until `shutdown` resolves.
    pub async fn serve_on<F>(self, listener: TcpListener, shutdown: F) -> Result<(), GatewayError>
    where
        F: Future<Output = ()> + Send + 'static,
    {
        let local = listener.local_addr()?;
        info!(addr = %local, "[aw-06] HTTP server listening");
        axum::serve(listener, self.router())
            .with_graceful_shutdown(shutdown)
            .await?;
        info!("[aw-06] HTTP server stopped");
        Ok(())
    }
}
