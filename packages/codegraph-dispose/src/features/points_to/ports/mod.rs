//! Ports (Interfaces) for Points-to Results
//!
//! The dispose analysis consumes points-to information read-only. Any
//! alias analysis can back it by implementing [`PointsToResult`].

use crate::features::points_to::domain::{AbstractLocation, LocationId, PointsToValue};
use crate::shared::models::{OperationId, ParameterSymbol};

/// Read-only points-to oracle for one procedure
pub trait PointsToResult: Send + Sync {
    /// Locations the operation may evaluate to
    fn operation_value(&self, operation: OperationId) -> PointsToValue;

    /// Entry-time locations of a parameter
    fn parameter_value(&self, parameter: &ParameterSymbol) -> PointsToValue;

    fn location(&self, id: LocationId) -> Option<&AbstractLocation>;
}
