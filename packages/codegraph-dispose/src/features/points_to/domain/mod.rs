pub mod abstract_location;
pub mod points_to_value;

pub use abstract_location::{AbstractLocation, LocationFactory, LocationId, LocationKind};
pub use points_to_value::{LocationSet, PointsToValue};
