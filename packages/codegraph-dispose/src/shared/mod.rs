//! Shared module - Common types and utilities
//!
//! Types shared across all features. Nothing here depends on a feature.

pub mod cancellation;
pub mod models;

pub use cancellation::CancellationToken;
pub use models::*;
