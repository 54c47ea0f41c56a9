//! In-memory points-to table
//!
//! Filled by whatever alias analysis ran upstream (or by hand in tests) and
//! served through the [`PointsToResult`] port.

use crate::features::points_to::domain::{
    AbstractLocation, LocationFactory, LocationId, LocationKind, PointsToValue,
};
use crate::features::points_to::ports::PointsToResult;
use crate::shared::models::{OperationId, ParameterSymbol, TypeRef};
use rustc_hash::FxHashMap;

#[derive(Debug, Default)]
pub struct PointsToTable {
    factory: LocationFactory,
    locations: FxHashMap<LocationId, AbstractLocation>,
    operations: FxHashMap<OperationId, PointsToValue>,
    parameters: FxHashMap<String, PointsToValue>,
}

impl PointsToTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Create and register a location
    pub fn add_location(&mut self, kind: LocationKind, ty: Option<TypeRef>) -> LocationId {
        let mut location = self.factory.create(kind);
        location.location_type = ty;
        let id = location.id;
        self.locations.insert(id, location);
        id
    }

    /// Register a location standing for many runtime objects
    pub fn add_summary_location(&mut self, kind: LocationKind, ty: Option<TypeRef>) -> LocationId {
        let mut location = self.factory.create(kind).as_summary();
        location.location_type = ty;
        let id = location.id;
        self.locations.insert(id, location);
        id
    }

    /// Allocation site for `operation`, bound as its value
    pub fn allocate(&mut self, operation: OperationId, ty: TypeRef) -> LocationId {
        let id = self.add_location(LocationKind::Allocation(operation), Some(ty));
        self.bind_operation(operation, PointsToValue::known([id]));
        id
    }

    pub fn bind_operation(&mut self, operation: OperationId, value: PointsToValue) {
        self.operations.insert(operation, value);
    }

    /// Alias `operation` to the given locations
    pub fn bind_operation_to(
        &mut self,
        operation: OperationId,
        locations: impl IntoIterator<Item = LocationId>,
    ) {
        self.bind_operation(operation, PointsToValue::known(locations));
    }

    pub fn bind_parameter(&mut self, name: impl Into<String>, value: PointsToValue) {
        self.parameters.insert(name.into(), value);
    }

    pub fn location_count(&self) -> usize {
        self.locations.len()
    }
}

impl PointsToResult for PointsToTable {
    fn operation_value(&self, operation: OperationId) -> PointsToValue {
        self.operations.get(&operation).cloned().unwrap_or_default()
    }

    fn parameter_value(&self, parameter: &ParameterSymbol) -> PointsToValue {
        self.parameters
            .get(&parameter.name)
            .cloned()
            .unwrap_or_default()
    }

    fn location(&self, id: LocationId) -> Option<&AbstractLocation> {
        self.locations.get(&id)
    }
}
