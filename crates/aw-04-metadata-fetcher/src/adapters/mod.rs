//! # Adapters
//!
//! arXiv implementation of the `MetadataFetcher` port.

pub mod arxiv;
pub mod atom;

pub use arxiv::{ArxivFetcher, CONTENT_ENCODING, CONTENT_TYPE_PDF};
pub use atom::{collapse_whitespace, parse_first_entry, AtomEntry};
