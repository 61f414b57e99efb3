//! # Arxweave Node
//!
//! Publishes arXiv papers to the permanent ledger exactly once and serves the
//! lookup index over HTTP.
//!
//! ## Startup Sequence
//!
//! 1. Initialize telemetry (logs + metrics)
//! 2. Load configuration (defaults + `ARXWEAVE_*` environment)
//! 3. Load the signing identity from `ARXWEAVE_JWK` (fatal on error)
//! 4. Build subsystems in dependency order
//! 5. Report the wallet balance
//! 6. Serve HTTP until Ctrl+C, then stop confirmation watches

use std::sync::Arc;

use anyhow::{Context, Result};
use arxweave_telemetry::{init_telemetry, TelemetryConfig};
use aw_01_signing_identity::{load_identity, EnvKeySource};
use tracing::info;

use node_runtime::{load_config, NodeConfig, SubsystemContainer};

/// The node runtime orchestrating all subsystems.
struct NodeRuntime {
    container: Arc<SubsystemContainer>,
}

impl NodeRuntime {
    /// Load the identity and build every subsystem.
    fn new(config: NodeConfig) -> Result<Self> {
        let identity =
            load_identity(&EnvKeySource).context("Failed to load signing identity")?;
        let container =
            SubsystemContainer::new(config, identity).context("Failed to build subsystems")?;
        Ok(Self {
            container: Arc::new(container),
        })
    }

    /// Serve until Ctrl+C.
    async fn run(&self) -> Result<()> {
        info!("===========================================");
        info!("  Arxweave Node v{}", node_runtime::VERSION);
        info!("===========================================");
        info!(address = %self.container.identity.address(), "Signing address");

        if self.container.config.identity.check_balance {
            self.container.report_balance().await;
        }

        let gateway = self
            .container
            .gateway()
            .context("Failed to create API gateway")?;
        info!(addr = %gateway.config().http_addr(), "Node is running. Press Ctrl+C to stop.");

        gateway
            .serve(shutdown_signal())
            .await
            .context("HTTP server failed")?;

        self.shutdown();
        Ok(())
    }

    fn shutdown(&self) {
        info!("Initiating graceful shutdown...");
        self.container.shutdown();
        info!("Shutdown complete");
    }
}

async fn shutdown_signal() {
    if let Err(e) = tokio::signal::ctrl_c().await {
        tracing::error!(error = %e, "Failed to listen for Ctrl+C");
        std::future::pending::<()>().await;
    }
    info!("Received shutdown signal");
}

#[tokio::main]
async fn main() -> Result<()> {
    init_telemetry(&TelemetryConfig::from_env()).context("Failed to initialize telemetry")?;

    let config = load_config().context("Invalid configuration")?;

    let runtime = NodeRuntime::new(config)?;
    runtime.run().await
}
