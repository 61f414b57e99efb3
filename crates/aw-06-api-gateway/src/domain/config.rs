//! Gateway configuration.

use std::net::{IpAddr, Ipv4Addr, SocketAddr};

use super::GatewayError;

/// Origins the public deployment serves.
pub const DEFAULT_ALLOWED_ORIGINS: [&str; 7] = [
    "https://sw4rtz.it",
    "https://wwww.sw4rtz.it",
    "https://sw4rtz.netlify.com",
    "https://localhost:3000",
    "http://localhost:3000",
    "https://localhost:8000",
    "http://localhost:8000",
];

/// HTTP gateway configuration.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GatewayConfig {
    /// Bind address.
    pub host: IpAddr,
    /// Listen port.
    pub port: u16,
    /// Origin whitelist. `*` allows every origin.
    pub allowed_origins: Vec<String>,
    /// Deployment domain, whitelisted in addition to `allowed_origins`.
    pub app_domain: Option<String>,
}

impl Default for GatewayConfig {
    fn default() -> Self {
        Self {
            host: IpAddr::V4(Ipv4Addr::UNSPECIFIED),
            port: 8000,
            allowed_origins: DEFAULT_ALLOWED_ORIGINS.iter().map(|o| o.to_string()).collect(),
            app_domain: None,
        }
    }
}

impl GatewayConfig {
    /// Validate configuration.
    pub fn validate(&self) -> Result<(), GatewayError> {
        if self.port == 0 {
            return Err(GatewayError::Config("port must be non-zero".into()));
        }
        if self.whitelist().is_empty() {
            return Err(GatewayError::Config("origin whitelist is empty".into()));
        }
        if let Some(origin) = self.whitelist().iter().find(|o| o.trim().is_empty()) {
            return Err(GatewayError::Config(format!("blank origin '{origin}'")));
        }
        Ok(())
    }

    /// Listen address.
    pub fn http_addr(&self) -> SocketAddr {
        SocketAddr::new(self.host, self.port)
    }

    /// Effective whitelist: `APP_DOMAIN` first, then the configured origins.
    pub fn whitelist(&self) -> Vec<String> {
        self.app_domain
            .iter()
            .filter(|d| !d.is_empty())
            .cloned()
            .chain(self.allowed_origins.iter().cloned())
            .collect()
    }

    /// Whether every origin is allowed.
    pub fn allows_any_origin(&self) -> bool {
        self.allowed_origins.iter().any(|o| o == "*")
    }
}
