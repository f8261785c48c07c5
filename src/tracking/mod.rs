//! Stateful trackers driven once per frame

pub mod position;
pub mod placement;

pub use position::{PositionTracker, PositionUpdate, TrackerState};
pub use placement::{Placement, PlacementTracker};
