//! codegraph-dispose
//!
//! Resource-disposal dataflow analysis over typed operation trees and
//! control flow graphs.
//!
//! ## Layout
//! - `shared`: symbol, operation tree and CFG models consumed read-only
//! - `features::flow_analysis`: abstract domains and the forward worklist engine
//! - `features::points_to`: abstract locations and the points-to oracle port
//! - `features::dispose_analysis`: the dispose lattice, transfer functions,
//!   sessions and leak detection
//! - `config`: presets, validation, YAML

pub mod config;
pub mod errors;
pub mod features;
pub mod shared;

pub use config::{DisposeConfig, Preset};
pub use errors::{DisposeError, Result};
pub use features::dispose_analysis::{
    DisposeAbstractValue, DisposeAbstractValueKind, DisposeAnalysis, DisposeAnalysisContext,
    DisposeAnalysisResult, DisposeAnalysisSession, DisposeLeak, DisposeLeakDetector,
    DisposeSessionRegistry, LeakKind,
};
