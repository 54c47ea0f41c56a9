pub mod method_kinds;
pub mod well_known;

pub use method_kinds::{is_try_get_method, DisposeMethodKind};
pub use well_known::WellKnownTypes;
