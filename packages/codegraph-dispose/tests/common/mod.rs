//! Common test utilities for codegraph-dispose
//!
//! Fixtures (a small compilation with disposable types) and builders for
//! procedures: operation ids, points-to bindings and CFG wiring.

#![allow(dead_code)]

pub mod builders;
pub mod fixtures;

pub use builders::*;
pub use fixtures::*;
