//! Geospatial math used by the trackers

pub mod geodesy;
pub mod compass;

pub use geodesy::{haversine_distance_m, local_offset, place_distance_m, place_offset};
pub use compass::compute_compass_heading;
