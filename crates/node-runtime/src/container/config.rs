//! # Node Configuration
//!
//! Unified configuration for all subsystems and runtime parameters.
//!
//! Defaults are usable for local development. `load_config` applies
//! `ARXWEAVE_*` environment overrides on top of them; `PORT` and `APP_DOMAIN`
//! are honoured for hosting platforms that inject them.
//!
//! | Variable | Section |
//! |----------|---------|
//! | `ARXWEAVE_LEDGER_URL` | ledger gateway base URL |
//! | `ARXWEAVE_LEDGER_TIMEOUT_MS` | every ledger call |
//! | `ARXWEAVE_ARXIV_URL` | arXiv API base URL |
//! | `ARXWEAVE_ARXIV_MAX_BYTES` | largest accepted PDF |
//! | `ARXWEAVE_FETCH_TIMEOUT_MS` | metadata and content retrieval |
//! | `ARXWEAVE_STORE_TIMEOUT_MS` | index reads and writes |
//! | `ARXWEAVE_STORAGE` | `memory` or `rocksdb` |
//! | `ARXWEAVE_DATA_DIR` | RocksDB directory |
//! | `ARXWEAVE_WATCH_CONFIRMATIONS` | spawn confirmation watches |
//! | `ARXWEAVE_POLL_MAX_ATTEMPTS` | watch bound |
//! | `ARXWEAVE_POLL_INITIAL_DELAY_MS` | first watch delay |
//! | `ARXWEAVE_POLL_MAX_DELAY_MS` | watch delay cap |
//! | `ARXWEAVE_HOST`, `PORT` / `ARXWEAVE_PORT` | HTTP listener |
//! | `ARXWEAVE_ALLOWED_ORIGINS` | comma-separated origin whitelist |
//! | `APP_DOMAIN` | deployment origin, always whitelisted |
//! | `ARXWEAVE_CHECK_BALANCE` | query the wallet balance at startup |

use std::path::PathBuf;
use std::str::FromStr;
use std::time::Duration;

use aw_02_ledger_client::LedgerConfig;
use aw_04_metadata_fetcher::ArxivConfig;
use aw_05_publish_pipeline::PipelineConfig;
use aw_06_api_gateway::GatewayConfig;
use thiserror::Error;

/// Complete node configuration.
#[derive(Debug, Clone, Default)]
pub struct NodeConfig {
    /// Ledger gateway.
    pub ledger: LedgerConfig,
    /// arXiv API.
    pub arxiv: ArxivConfig,
    /// Index storage.
    pub storage: StorageConfig,
    /// Publish pipeline timeouts and confirmation watch.
    pub pipeline: PipelineConfig,
    /// HTTP gateway.
    pub gateway: GatewayConfig,
    /// Signing identity.
    pub identity: IdentityConfig,
}

impl NodeConfig {
    /// Validate every section.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.ledger
            .validate()
            .map_err(|e| ConfigError::Invalid("ledger", e.to_string()))?;
        self.arxiv
            .validate()
            .map_err(|e| ConfigError::Invalid("arxiv", e.to_string()))?;
        self.pipeline
            .validate()
            .map_err(|e| ConfigError::Invalid("pipeline", e))?;
        self.gateway
            .validate()
            .map_err(|e| ConfigError::Invalid("gateway", e.to_string()))?;
        self.storage.validate()
    }
}

/// Configuration errors.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// An environment variable held an unparsable value.
    #[error("Invalid value for {key}: '{value}'")]
    InvalidValue {
        /// Variable name
        key: String,
        /// Raw value
        value: String,
    },

    /// A section failed validation.
    #[error("Invalid {0} configuration: {1}")]
    Invalid(&'static str, String),

    /// The requested storage backend is not compiled in.
    #[error("Storage backend '{0}' requires the `rocksdb` feature")]
    BackendUnavailable(String),
}

/// Index storage backend.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum StorageBackend {
    /// Process memory; records are lost on restart.
    #[default]
    Memory,
    /// RocksDB under `data_dir`.
    RocksDb,
}

impl FromStr for StorageBackend {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_lowercase().as_str() {
            "memory" | "mem" => Ok(Self::Memory),
            "rocksdb" => Ok(Self::RocksDb),
            other => Err(other.to_string()),
        }
    }
}

/// Storage configuration.
#[derive(Debug, Clone)]
pub struct StorageConfig {
    /// Selected backend.
    pub backend: StorageBackend,
    /// Data directory for persistent backends.
    pub data_dir: PathBuf,
}

impl Default for StorageConfig {
    fn default() -> Self {
        Self {
            backend: StorageBackend::Memory,
            data_dir: PathBuf::from("./data/index"),
        }
    }
}

impl StorageConfig {
    /// Reject backends this build cannot provide.
    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.backend == StorageBackend::RocksDb && !cfg!(feature = "rocksdb") {
            return Err(ConfigError::BackendUnavailable("rocksdb".into()));
        }
        if self.backend == StorageBackend::RocksDb && self.data_dir.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("storage", "data_dir is empty".into()));
        }
        Ok(())
    }
}

/// Identity configuration. Key material itself is read from `ARXWEAVE_JWK`.
#[derive(Debug, Clone)]
pub struct IdentityConfig {
    /// Query and log the wallet balance at startup.
    pub check_balance: bool,
}

impl Default for IdentityConfig {
    fn default() -> Self {
        Self {
            check_balance: true,
        }
    }
}

/// Load configuration from the process environment.
pub fn load_config() -> Result<NodeConfig, ConfigError> {
    load_config_from(|key| std::env::var(key).ok())
}

/// Load configuration from an arbitrary key lookup.
pub fn load_config_from<F>(lookup: F) -> Result<NodeConfig, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    let mut config = NodeConfig::default();

    // Ledger
    if let Some(url) = lookup("ARXWEAVE_LEDGER_URL") {
        config.ledger.gateway_url = url.trim_end_matches('/').to_string();
    }
    if let Some(timeout) = millis(&lookup, "ARXWEAVE_LEDGER_TIMEOUT_MS")? {
        config.ledger.request_timeout = timeout;
        config.pipeline.ledger_timeout = timeout;
    }

    // arXiv
    if let Some(url) = lookup("ARXWEAVE_ARXIV_URL") {
        config.arxiv.api_url = url.trim_end_matches('/').to_string();
    }
    if let Some(max) = parsed(&lookup, "ARXWEAVE_ARXIV_MAX_BYTES")? {
        config.arxiv.max_content_bytes = max;
    }
    if let Some(timeout) = millis(&lookup, "ARXWEAVE_FETCH_TIMEOUT_MS")? {
        config.pipeline.fetch_timeout = timeout;
    }

    // Storage
    if let Some(timeout) = millis(&lookup, "ARXWEAVE_STORE_TIMEOUT_MS")? {
        config.pipeline.store_timeout = timeout;
    }
    if let Some(backend) = parsed(&lookup, "ARXWEAVE_STORAGE")? {
        config.storage.backend = backend;
    }
    if let Some(dir) = lookup("ARXWEAVE_DATA_DIR") {
        config.storage.data_dir = PathBuf::from(dir);
    }

    // Confirmation watch
    if let Some(watch) = flag(&lookup, "ARXWEAVE_WATCH_CONFIRMATIONS")? {
        config.pipeline.watch_confirmations = watch;
    }
    if let Some(attempts) = parsed(&lookup, "ARXWEAVE_POLL_MAX_ATTEMPTS")? {
        config.pipeline.poll_policy.max_attempts = attempts;
    }
    if let Some(delay) = millis(&lookup, "ARXWEAVE_POLL_INITIAL_DELAY_MS")? {
        config.pipeline.poll_policy.initial_delay = delay;
    }
    if let Some(delay) = millis(&lookup, "ARXWEAVE_POLL_MAX_DELAY_MS")? {
        config.pipeline.poll_policy.max_delay = delay;
    }

    // Gateway
    if let Some(host) = parsed(&lookup, "ARXWEAVE_HOST")? {
        config.gateway.host = host;
    }
    if let Some(port) = parsed(&lookup, "ARXWEAVE_PORT")? {
        config.gateway.port = port;
    }
    if let Some(port) = parsed(&lookup, "PORT")? {
        config.gateway.port = port;
    }
    if let Some(origins) = lookup("ARXWEAVE_ALLOWED_ORIGINS") {
        config.gateway.allowed_origins = origins
            .split(',')
            .map(str::trim)
            .filter(|o| !o.is_empty())
            .map(str::to_string)
            .collect();
    }
    if let Some(domain) = lookup("APP_DOMAIN") {
        config.gateway.app_domain = Some(domain);
    }

    // Identity
    if let Some(check) = flag(&lookup, "ARXWEAVE_CHECK_BALANCE")? {
        config.identity.check_balance = check;
    }

    config.validate()?;
    Ok(config)
}

fn parsed<F, T>(lookup: &F, key: &str) -> Result<Option<T>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
    T: FromStr,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => raw
            .trim()
            .parse()
            .map(Some)
            .map_err(|_| ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
    }
}

fn millis<F>(lookup: &F, key: &str) -> Result<Option<Duration>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    Ok(parsed::<F, u64>(lookup, key)?.map(Duration::from_millis))
}

fn flag<F>(lookup: &F, key: &str) -> Result<Option<bool>, ConfigError>
where
    F: Fn(&str) -> Option<String>,
{
    match lookup(key) {
        None => Ok(None),
        Some(raw) => match raw.trim().to_lowercase().as_str() {
            "true" | "1" | "yes" => Ok(Some(true)),
            "false" | "0" | "no" => Ok(Some(false)),
            _ => Err(ConfigError::InvalidValue {
                key: key.to_string(),
                value: raw,
            }),
        },
    }
}
