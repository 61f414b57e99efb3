//! HTTP middleware.

pub mod origin;

pub use origin::{create_cors_layer, origin_filter, OriginPolicy};
