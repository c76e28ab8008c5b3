//! # sauti_core
//!
//! Core domain models and capability seams for the Sauti client.

pub mod models;
pub mod notify;
pub mod storage;
pub mod timefmt;

/// Returns the crate version.
pub fn version() -> &'static str {
    env!("CARGO_PKG_VERSION")
}
