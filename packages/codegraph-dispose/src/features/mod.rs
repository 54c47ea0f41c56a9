//! Feature modules

pub mod dispose_analysis;
pub mod flow_analysis;
pub mod points_to;
