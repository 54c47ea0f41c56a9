pub mod worklist_engine;

pub use worklist_engine::{ForwardDataFlowEngine, DEFAULT_MAX_ITERATIONS};
