//! Shared fixtures: local stand-ins for the arXiv API and the ledger gateway,
//! plus a harness that boots a full node against them.

use std::collections::{HashMap, VecDeque};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;
use std::time::Duration;

use aw_01_signing_identity::SigningIdentity;
use aw_02_ledger_client::{LedgerConfig, TransactionEnvelope};
use aw_04_metadata_fetcher::ArxivConfig;
use aw_06_api_gateway::GatewayError;
use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post},
    Json, Router,
};
use node_runtime::{NodeConfig, SubsystemContainer};
use parking_lot::Mutex;
use tokio::net::TcpListener;
use tokio::sync::oneshot;
use tokio::task::JoinHandle;

/// PDF bytes served for every known document.
pub const PDF: &[u8] = b"%PDF-1.4 arxweave fixture";

/// Seed of the signing identity every fixture node uses.
pub const IDENTITY_SEED: [u8; 32] = [7u8; 32];

const EMPTY_FEED: &str =
    r#"<feed xmlns="http://www.w3.org/2005/Atom"><title>ArXiv Query</title></feed>"#;

async fn bind() -> (TcpListener, String) {
    let listener = TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind loopback listener");
    let addr = listener.local_addr().expect("listener address");
    (listener, format!("http://{addr}"))
}

fn serve(listener: TcpListener, app: Router) {
    tokio::spawn(async move {
        let _ = axum::serve(listener, app).await;
    });
}

/// Signing identity shared by fixture nodes.
pub fn identity() -> Arc<SigningIdentity> {
    Arc::new(SigningIdentity::from_seed(&IDENTITY_SEED))
}

// =============================================================================
// STUB ARCHIVE
// =============================================================================

/// Minimal arXiv: `GET /api/query?id_list=` and `GET /pdf/{id}v1`.
#[derive(Clone, Default)]
pub struct StubArchive {
    inner: Arc<ArchiveState>,
}

#[derive(Default)]
struct ArchiveState {
    base: Mutex<String>,
    documents: Mutex<HashMap<String, Vec<u8>>>,
    queries: AtomicUsize,
    downloads: AtomicUsize,
}

impl StubArchive {
    /// Archive that knows no documents.
    pub fn new() -> Self {
        Self::default()
    }

    /// Serve `pdf` for `document_id`.
    pub fn with_document(self, document_id: &str, pdf: &[u8]) -> Self {
        self.inner
            .documents
            .lock()
            .insert(document_id.to_string(), pdf.to_vec());
        self
    }

    /// Start serving; returns the base URL.
    pub async fn spawn(&self) -> String {
        let (listener, base) = bind().await;
        *self.inner.base.lock() = base.clone();
        let app = Router::new()
            .route("/api/query", get(archive_query))
            .route("/pdf/*id", get(archive_pdf))
            .with_state(self.clone());
        serve(listener, app);
        base
    }

    /// Metadata queries received.
    pub fn query_count(&self) -> usize {
        self.inner.queries.load(Ordering::SeqCst)
    }

    /// PDF downloads received.
    pub fn download_count(&self) -> usize {
        self.inner.downloads.load(Ordering::SeqCst)
    }
}

async fn archive_query(
    State(archive): State<StubArchive>,
    Query(params): Query<HashMap<String, String>>,
) -> String {
    archive.inner.queries.fetch_add(1, Ordering::SeqCst);
    let id = params.get("id_list").cloned().unwrap_or_default();
    if !archive.inner.documents.lock().contains_key(&id) {
        return EMPTY_FEED.to_string();
    }
    let base = archive.inner.base.lock().clone();
    format!(
        r#"<feed xmlns="http://www.w3.org/2005/Atom"><entry>
            <id>{base}/abs/{id}v1</id>
            <updated>2021-01-02T00:00:00Z</updated>
            <published>2021-01-01T00:00:00Z</published>
            <title>On Graphs
              and Walks</title>
            <summary>We study walks.</summary>
            <author><name>Ada Lovelace</name></author>
            <author><name>Alan Turing</name></author>
        </entry></feed>"#
    )
}

async fn archive_pdf(State(archive): State<StubArchive>, Path(id): Path<String>) -> Response {
    archive.inner.downloads.fetch_add(1, Ordering::SeqCst);
    let id = id.trim_start_matches('/');
    let key = id.strip_suffix("v1").unwrap_or(id);
    match archive.inner.documents.lock().get(key) {
        Some(pdf) => (StatusCode::OK, pdf.clone()).into_response(),
        None => StatusCode::NOT_FOUND.into_response(),
    }
}

// =============================================================================
// STUB LEDGER
// =============================================================================

/// Minimal ledger gateway: price, broadcast, status and balance.
#[derive(Clone)]
pub struct StubLedger {
    inner: Arc<LedgerState>,
}

struct LedgerState {
    fee_per_byte: u128,
    balance: u128,
    broadcast_status: Mutex<u16>,
    status_codes: Mutex<VecDeque<u16>>,
    quoted: Mutex<Vec<u64>>,
    received: Mutex<Vec<TransactionEnvelope>>,
    polls: AtomicUsize,
}

impl Default for StubLedger {
    fn default() -> Self {
        Self {
            inner: Arc::new(LedgerState {
                fee_per_byte: 10,
                balance: 1_000_000_000,
                broadcast_status: Mutex::new(200),
                status_codes: Mutex::new(VecDeque::new()),
                quoted: Mutex::new(Vec::new()),
                received: Mutex::new(Vec::new()),
                polls: AtomicUsize::new(0),
            }),
        }
    }
}

impl StubLedger {
    /// Ledger accepting every broadcast with 200.
    pub fn new() -> Self {
        Self::default()
    }

    /// Fee charged per quoted byte.
    pub fn fee_per_byte(&self) -> u128 {
        self.inner.fee_per_byte
    }

    /// Status code answered to subsequent broadcasts.
    pub fn set_broadcast_status(&self, status: u16) {
        *self.inner.broadcast_status.lock() = status;
    }

    /// Codes answered to subsequent status reads (then 202 forever).
    pub fn queue_status_codes(&self, codes: impl IntoIterator<Item = u16>) {
        self.inner.status_codes.lock().extend(codes);
    }

    /// Byte sizes quoted, in call order.
    pub fn quoted_sizes(&self) -> Vec<u64> {
        self.inner.quoted.lock().clone()
    }

    /// Envelopes posted to `/tx`, in call order.
    pub fn received(&self) -> Vec<TransactionEnvelope> {
        self.inner.received.lock().clone()
    }

    /// Status reads served.
    pub fn poll_count(&self) -> usize {
        self.inner.polls.load(Ordering::SeqCst)
    }

    /// Start serving; returns the base URL.
    pub async fn spawn(&self) -> String {
        let (listener, base) = bind().await;
        let app = Router::new()
            .route("/price/:bytes", get(ledger_price))
            .route("/tx", post(ledger_broadcast))
            .route("/tx/:id/status", get(ledger_status))
            .route("/wallet/:address/balance", get(ledger_balance))
            .with_state(self.clone());
        serve(listener, app);
        base
    }
}

async fn ledger_price(State(ledger): State<StubLedger>, Path(bytes): Path<u64>) -> String {
    ledger.inner.quoted.lock().push(bytes);
    (bytes as u128 * ledger.inner.fee_per_byte).to_string()
}

async fn ledger_broadcast(
    State(ledger): State<StubLedger>,
    Json(envelope): Json<TransactionEnvelope>,
) -> StatusCode {
    ledger.inner.received.lock().push(envelope);
    let status = *ledger.inner.broadcast_status.lock();
    StatusCode::from_u16(status).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR)
}

async fn ledger_status(State(ledger): State<StubLedger>, Path(_id): Path<String>) -> Response {
    ledger.inner.polls.fetch_add(1, Ordering::SeqCst);
    let code = ledger.inner.status_codes.lock().pop_front().unwrap_or(202);
    if code == 200 {
        return Json(serde_json::json!({
            "block_height": 7,
            "block_indep_hash": "indep",
            "number_of_confirmations": 1
        }))
        .into_response();
    }
    let status = StatusCode::from_u16(code).unwrap_or(StatusCode::INTERNAL_SERVER_ERROR);
    (status, "Pending").into_response()
}

async fn ledger_balance(State(ledger): State<StubLedger>, Path(_address): Path<String>) -> String {
    ledger.inner.balance.to_string()
}

// =============================================================================
// NODE HARNESS
// =============================================================================

/// Node configuration pointing at the stubs.
pub fn node_config(archive_url: &str, ledger_url: &str) -> NodeConfig {
    NodeConfig {
        ledger: LedgerConfig {
            gateway_url: ledger_url.to_string(),
            request_timeout: Duration::from_secs(5),
        },
        arxiv: ArxivConfig {
            api_url: format!("{archive_url}/api"),
            request_timeout: Duration::from_secs(5),
            max_content_bytes: 1024 * 1024,
        },
        ..NodeConfig::default()
    }
}

/// Production subsystems wired against the stubs.
pub async fn container(
    archive: &StubArchive,
    ledger: &StubLedger,
    adjust: impl FnOnce(&mut NodeConfig),
) -> SubsystemContainer {
    let archive_url = archive.spawn().await;
    let ledger_url = ledger.spawn().await;
    let mut config = node_config(&archive_url, &ledger_url);
    adjust(&mut config);
    SubsystemContainer::new(config, identity()).expect("build subsystems")
}

/// A node serving HTTP on a loopback port.
pub struct TestNode {
    /// Base URL of the node's HTTP surface.
    pub base_url: String,
    /// Subsystems behind the gateway.
    pub container: Arc<SubsystemContainer>,
    shutdown: oneshot::Sender<()>,
    server: JoinHandle<Result<(), GatewayError>>,
}

impl TestNode {
    /// Boot a node with default configuration.
    pub async fn start(archive: &StubArchive, ledger: &StubLedger) -> Self {
        Self::start_with(archive, ledger, |_| {}).await
    }

    /// Boot a node after `adjust` tweaks its configuration.
    pub async fn start_with(
        archive: &StubArchive,
        ledger: &StubLedger,
        adjust: impl FnOnce(&mut NodeConfig),
    ) -> Self {
        let container = Arc::new(container(archive, ledger, adjust).await);
        let gateway = container.gateway().expect("build gateway");
        let (listener, base_url) = bind().await;
        let (shutdown, rx) = oneshot::channel::<()>();
        let server = tokio::spawn(gateway.serve_on(listener, async move {
            let _ = rx.await;
        }));
        Self {
            base_url,
            container,
            shutdown,
            server,
        }
    }

    /// Absolute URL for `path`.
    pub fn url(&self, path: &str) -> String {
        format!("{}{}", self.base_url, path)
    }

    /// Stop the HTTP server and every confirmation watch.
    pub async fn stop(self) -> Result<(), GatewayError> {
        self.container.shutdown();
        let _ = self.shutdown.send(());
        self.server.await.expect("server task panicked")
    }
}
