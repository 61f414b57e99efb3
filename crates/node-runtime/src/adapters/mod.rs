//! # Runtime Adapters
//!
//! Port implementations that only the runtime provides.

pub mod storage;
