//! Adapters between the pipeline and HTTP.

pub mod error_conversions;

pub use error_conversions::{status_for, ApiError};
