//! Points-to surface
//!
//! Abstract locations, points-to values and the read-only
//! [`PointsToResult`] oracle the dispose analysis resolves aliasing through.

pub mod domain;
pub mod infrastructure;
pub mod ports;

pub use domain::{AbstractLocation, LocationFactory, LocationId, LocationKind, LocationSet, PointsToValue};
pub use infrastructure::PointsToTable;
pub use ports::PointsToResult;
