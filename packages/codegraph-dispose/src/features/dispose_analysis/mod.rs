//! Dispose analysis
//!
//! Path-sensitive tracking of disposable objects. For every abstract
//! location holding a disposable object the analysis computes, per CFG
//! block, whether it is not disposed, disposed, or maybe disposed (disposed
//! on some paths only, or escaped out of view).
//!
//! ## Architecture
//! ```text
//! domain/          lattice value, lattice, analysis data, leak reports
//! application/     context, transfer functions, façade, session, leak detector
//! infrastructure/  well-known types, dispose method classification
//! ports/           callee body provider
//! ```
//!
//! ## Usage
//! ```rust,ignore
//! let session = DisposeAnalysisSession::new(compilation, DisposeConfig::default())?;
//! let result = session.analyze(&blocks, &method, points_to.clone())?;
//! let leaks = DisposeLeakDetector::find_leaks(&result, points_to.as_ref());
//! ```

pub mod application;
pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use application::{
    DisposeAnalysis, DisposeAnalysisContext, DisposeAnalysisResult, DisposeAnalysisSession,
    DisposeDataFlowOperationVisitor, DisposeLeakDetector, DisposeSessionRegistry, ProcedureRequest,
    SessionStats,
};
pub use domain::{
    DisposeAbstractValue, DisposeAbstractValueDomain, DisposeAbstractValueKind, DisposeAnalysisData,
    DisposeLeak, LeakKind,
};
pub use infrastructure::{DisposeMethodKind, WellKnownTypes};
pub use ports::{ProcedureBody, ProcedureBodyProvider};
