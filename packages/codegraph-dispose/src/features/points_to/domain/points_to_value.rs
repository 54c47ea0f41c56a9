//! Points-to value of an operation or parameter

use super::abstract_location::LocationId;
use rustc_hash::FxHashSet;

/// Set of abstract locations
pub type LocationSet = FxHashSet<LocationId>;

/// What an expression may evaluate to
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum PointsToValue {
    /// No information was computed
    #[default]
    Undefined,
    /// May point anywhere
    Unknown,
    /// Evaluates to a value with no heap identity (null, value types)
    NoLocation,
    Known(LocationSet),
}

impl PointsToValue {
    pub fn known(locations: impl IntoIterator<Item = LocationId>) -> Self {
        Self::Known(locations.into_iter().collect())
    }

    /// Locations this value may refer to; empty unless `Known`
    pub fn locations(&self) -> impl Iterator<Item = LocationId> + '_ {
        let set = match self {
            Self::Known(set) => Some(set),
            _ => None,
        };
        set.into_iter().flat_map(|s| s.iter().copied())
    }

    /// The only location, if exactly one is known
    pub fn single_location(&self) -> Option<LocationId> {
        match self {
            Self::Known(set) if set.len() == 1 => set.iter().next().copied(),
            _ => None,
        }
    }

    pub fn is_known(&self) -> bool {
        matches!(self, Self::Known(_))
    }
}
