//! # AW-02 Ledger Client
//!
//! Fee quoting, transaction construction, signing, broadcast and status
//! reads against an append-only ledger gateway.
//!
//! **Subsystem ID:** 2  
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Invariants
//!
//! | Invariant | Enforcement |
//! |-----------|-------------|
//! | Fee matches signed payload | `FeeQuote::byte_size` checked in `build_and_sign` |
//! | Signed at most once | `SignedTransaction` has no mutators |
//! | Deterministic id | Ed25519 signature, `id = base64url(SHA-256(sig))` |
//! | Typed tags | Schema v1 `DocumentTags` with `Schema-Version` |
//!
//! ## Module Structure
//!
//! ```text
//! aw-02-ledger-client/
//! ├── domain/       # FeeQuote, SignedTransaction, DocumentTags, LedgerError
//! ├── algorithms/   # build_and_sign, signature_preimage
//! ├── ports/        # LedgerClient, MockLedgerClient
//! └── adapters/     # HttpLedgerClient (reqwest)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod algorithms;
pub mod domain;
pub mod ports;

pub use adapters::HttpLedgerClient;
pub use algorithms::{build_and_sign, signature_preimage, transaction_id, verify_transaction};
pub use domain::{
    BroadcastOutcome, BroadcastReceipt, Confirmation, DocumentTags, EnvelopeTag, FeeQuote,
    LedgerConfig, LedgerError, SignedTransaction, StoredTransaction, Tag, TagName,
    TransactionEnvelope, TxStatus, Winston, APP_NAME, BASE64_ENCODING, DEFAULT_GATEWAY_URL,
    DEFAULT_REQUEST_TIMEOUT, PDF_CONTENT_TYPE, TAG_SCHEMA_VERSION, TX_FORMAT,
};
pub use ports::{LedgerClient, MockLedgerClient};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
