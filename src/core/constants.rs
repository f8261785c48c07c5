//! Physical constants and tracking parameters

/// Mean Earth radius used for great-circle distances (m)
pub const EARTH_RADIUS_M: f64 = 6_378_160.0;

/// Distance reported for places closer than the configured minimum distance.
/// Large enough that the renderer culls the entity.
pub const HIDDEN_PLACE_DISTANCE: f64 = 9_007_199_254_740_991.0;

/// Blend bias applied to raw latitude/longitude (heavy smoothing)
pub const COORDINATE_BLEND_BIAS: f64 = 0.01;

/// Blend bias applied to local offsets
pub const OFFSET_BLEND_BIAS: f64 = 0.1;

/// Native compass readings are trusted only below this accuracy (degrees)
pub const COMPASS_ACCURACY_LIMIT_DEG: f64 = 50.0;

/// Default fix accuracy threshold (m)
pub const DEFAULT_POSITION_MIN_ACCURACY_M: f64 = 100.0;

/// Fix acquisition timeout handed to the sensor layer (ms)
pub const DEFAULT_FIX_TIMEOUT_MS: u32 = 27_000;

/// Poll interval of a fixed override coordinate (ms)
pub const DEFAULT_FIXED_POLL_INTERVAL_MS: u32 = 1_000;

/// Coordinate value that pauses a fixed override
pub const FIXED_OVERRIDE_PAUSED: f64 = -1.0;
