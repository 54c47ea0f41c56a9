pub mod points_to_table;

pub use points_to_table::PointsToTable;
