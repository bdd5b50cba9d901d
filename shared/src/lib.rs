//! Shared types for the tip ledger
//!
//! Data models, error types and response structures used by tip-server
//! and its API clients.

pub mod error;
pub mod models;
pub mod util;

// Re-exports
pub use axum::Json;
pub use http;
pub use serde::{Deserialize, Serialize};
