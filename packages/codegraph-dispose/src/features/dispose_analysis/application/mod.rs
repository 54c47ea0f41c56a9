pub mod analyzer;
pub mod context;
pub mod leak_detector;
pub mod session;
pub mod visitor;

pub use analyzer::{DisposeAnalysis, DisposeAnalysisResult};
pub use context::DisposeAnalysisContext;
pub use leak_detector::DisposeLeakDetector;
pub use session::{DisposeAnalysisSession, DisposeSessionRegistry, ProcedureRequest, SessionStats};
pub use visitor::DisposeDataFlowOperationVisitor;
