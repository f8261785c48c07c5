//! GPS-anchored augmented reality tracking
//!
//! Turns GPS fixes and device orientation into a camera pose on a local
//! ground plane, and positions scene entities at given latitudes and
//! longitudes around that camera.

pub mod core;
pub mod algorithms;
pub mod processing;
pub mod sensors;
pub mod tracking;
pub mod scene;
pub mod advisory;
pub mod session;
pub mod utils;
pub mod api;

// Re-export commonly used types
pub use crate::core::{GeoCoordinate, LocalOffset, CameraRotation, EARTH_RADIUS_M, HIDDEN_PLACE_DISTANCE};
pub use algorithms::{compute_compass_heading, haversine_distance_m, local_offset, place_distance_m};
pub use processing::{circular_blend, linear_blend, Smoother};
pub use sensors::{
    FixSource, FixedFixSource, MockFixSource, MockOrientationSource, OrientationEvent,
    OrientationSource, SensorError, SensorResult,
};
pub use tracking::{Placement, PlacementTracker, PositionTracker, PositionUpdate, TrackerState};
pub use scene::{EntityId, EntityTransform, InMemoryScene, SceneSink};
pub use advisory::{Advisory, AdvisoryChannel, SensorKind};
pub use session::{ArSession, FrameSummary};
pub use utils::{ConfigError, ConfigurationManager, PlaceConfig, SceneConfig, TrackerConfig};
pub use api::{format_distance, placement_reports, render_reports, OutputFormat, PlacementReport};
