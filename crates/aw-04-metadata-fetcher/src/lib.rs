//! # AW-04 Metadata Fetcher
//!
//! Retrieves a document's bibliographic record and binary content from the
//! source archive.
//!
//! **Subsystem ID:** 4  
//! **Architecture:** Hexagonal (Domain + Ports/Adapters)
//!
//! ## Module Structure
//!
//! ```text
//! aw-04-metadata-fetcher/
//! ├── domain/     # FetchedDocument, EncodedContent, ArxivConfig, FetchError
//! ├── ports/      # MetadataFetcher, MockMetadataFetcher
//! └── adapters/   # ArxivFetcher (reqwest), Atom parsing (quick-xml)
//! ```

#![warn(missing_docs)]
#![warn(clippy::all)]

pub mod adapters;
pub mod domain;
pub mod ports;

pub use adapters::{collapse_whitespace, parse_first_entry, ArxivFetcher, AtomEntry};
pub use domain::{
    ArxivConfig, EncodedContent, FetchError, FetchedDocument, DEFAULT_ARXIV_API_URL,
};
pub use ports::{MetadataFetcher, MockMetadataFetcher};

/// Crate version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
