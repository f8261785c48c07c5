use crate::core::{
    GeoCoordinate, DEFAULT_FIXED_POLL_INTERVAL_MS, DEFAULT_FIX_TIMEOUT_MS,
    DEFAULT_POSITION_MIN_ACCURACY_M,
};
use serde::{Deserialize, Serialize};
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;

/// Camera tracking parameters
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct TrackerConfig {
    /// Fixes with a worse accuracy (meters) do not move the camera
    pub position_min_accuracy: f64,
    /// Places nearer than this (meters) are hidden; 0 disables
    pub min_distance: f64,
    /// Smoothing factor; 0 disables all smoothing
    pub smooth_camera: f64,
    /// Forward advisories to user-facing callbacks
    pub alert: bool,
    /// Fixed override latitude, replaces live GPS when set with `longitude`
    #[serde(skip_serializing_if = "Option::is_none")]
    pub latitude: Option<f64>,
    /// Fixed override longitude
    #[serde(skip_serializing_if = "Option::is_none")]
    pub longitude: Option<f64>,
    /// Re-emission interval of the fixed override (milliseconds)
    pub fixed_poll_interval_ms: u32,
    /// Silence on the fix stream before it reports a timeout (milliseconds)
    pub fix_timeout_ms: u32,
}

impl Default for TrackerConfig {
    fn default() -> Self {
        Self {
            position_min_accuracy: DEFAULT_POSITION_MIN_ACCURACY_M,
            min_distance: 0.0,
            smooth_camera: 0.0,
            alert: false,
            latitude: None,
            longitude: None,
            fixed_poll_interval_ms: DEFAULT_FIXED_POLL_INTERVAL_MS,
            fix_timeout_ms: DEFAULT_FIX_TIMEOUT_MS,
        }
    }
}

impl TrackerConfig {
    /// Fixed override coordinate, if both halves are set and non-zero
    pub fn fixed_override(&self) -> Option<GeoCoordinate> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lon)) if lat != 0.0 && lon != 0.0 => Some(GeoCoordinate::new(lat, lon)),
            _ => None,
        }
    }

    pub fn fixed_poll_interval(&self) -> Duration {
        Duration::from_millis(self.fixed_poll_interval_ms as u64)
    }

    pub fn fix_timeout(&self) -> Duration {
        Duration::from_millis(self.fix_timeout_ms as u64)
    }

    pub fn with_fix_timeout_ms(mut self, millis: u32) -> Self {
        self.fix_timeout_ms = millis;
        self
    }

    pub fn with_smoothing(mut self, factor: f64) -> Self {
        self.smooth_camera = factor;
        self
    }

    pub fn with_min_distance(mut self, meters: f64) -> Self {
        self.min_distance = meters;
        self
    }

    pub fn with_fixed_override(mut self, latitude: f64, longitude: f64) -> Self {
        self.latitude = Some(latitude);
        self.longitude = Some(longitude);
        self
    }

    pub fn validate(&self) -> ConfigResult<()> {
        if !(self.position_min_accuracy >= 0.0) {
            return Err(ConfigError::invalid(
                "position_min_accuracy",
                self.position_min_accuracy,
                "must be a non-negative number of meters",
            ));
        }
        if !(self.min_distance >= 0.0) {
            return Err(ConfigError::invalid(
                "min_distance",
                self.min_distance,
                "must be a non-negative number of meters",
            ));
        }
        if !(self.smooth_camera >= 0.0) {
            return Err(ConfigError::invalid(
                "smooth_camera",
                self.smooth_camera,
                "must be zero (disabled) or positive",
            ));
        }
        if let Some(lat) = self.latitude {
            if !(-90.0..=90.0).contains(&lat) {
                return Err(ConfigError::invalid("latitude", lat, "must be within [-90, 90]"));
            }
        }
        if let Some(lon) = self.longitude {
            if !(-180.0..=180.0).contains(&lon) {
                return Err(ConfigError::invalid("longitude", lon, "must be within [-180, 180]"));
            }
        }
        if self.fixed_poll_interval_ms == 0 {
            return Err(ConfigError::invalid(
                "fixed_poll_interval_ms",
                0,
                "must be at least 1ms",
            ));
        }
        if self.fix_timeout_ms == 0 {
            return Err(ConfigError::invalid("fix_timeout_ms", 0, "must be at least 1ms"));
        }
        Ok(())
    }
}

/// A geo-anchored entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlaceConfig {
    pub latitude: f64,
    pub longitude: f64,
    /// Height above ground before scene scaling; applied only when positive
    #[serde(default)]
    pub offset_y: f64,
}

impl PlaceConfig {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            offset_y: 0.0,
        }
    }

    pub fn with_offset_y(mut self, offset_y: f64) -> Self {
        self.offset_y = offset_y;
        self
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        GeoCoordinate::new(self.latitude, self.longitude)
    }
}

/// Scene-wide placement parameters
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SceneConfig {
    /// Vertical scale of the scene, multiplies each place's `offset_y`
    pub vertical_scale: f64,
    /// Base height of every placed entity
    pub ground_clearance: f64,
}

impl Default for SceneConfig {
    fn default() -> Self {
        Self {
            vertical_scale: 1.0,
            ground_clearance: 0.0,
        }
    }
}

/// Everything a session needs, as stored on disk
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct SessionConfig {
    pub tracker: TrackerConfig,
    pub scene: SceneConfig,
    pub places: Vec<NamedPlace>,
}

/// Place with a display name
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NamedPlace {
    pub name: String,
    #[serde(flatten)]
    pub place: PlaceConfig,
}

/// Configuration errors
#[derive(Debug, thiserror::Error)]
pub enum ConfigError {
    #[error("invalid {parameter} = {value}: {reason}")]
    InvalidParameter {
        parameter: String,
        value: String,
        reason: String,
    },

    #[error("config I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("config serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

impl ConfigError {
    fn invalid(parameter: &str, value: impl ToString, reason: &str) -> Self {
        ConfigError::InvalidParameter {
            parameter: parameter.to_string(),
            value: value.to_string(),
            reason: reason.to_string(),
        }
    }
}

pub type ConfigResult<T> = Result<T, ConfigError>;

/// Loads, validates and persists a [`SessionConfig`]
#[derive(Debug, Default)]
pub struct ConfigurationManager {
    config: SessionConfig,
    config_file_path: Option<PathBuf>,
    is_modified: bool,
}

impl ConfigurationManager {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> ConfigResult<Self> {
        let mut manager = Self::new();
        manager.load_from_file(path)?;
        Ok(manager)
    }

    pub fn from_json_str(content: &str) -> ConfigResult<Self> {
        let config: SessionConfig = serde_json::from_str(content)?;
        config.tracker.validate()?;
        Ok(Self {
            config,
            config_file_path: None,
            is_modified: false,
        })
    }

    pub fn config(&self) -> &SessionConfig {
        &self.config
    }

    pub fn tracker(&self) -> &TrackerConfig {
        &self.config.tracker
    }

    pub fn update_tracker(&mut self, tracker: TrackerConfig) -> ConfigResult<()> {
        tracker.validate()?;
        self.config.tracker = tracker;
        self.is_modified = true;
        Ok(())
    }

    pub fn add_place(&mut self, name: &str, place: PlaceConfig) {
        self.config.places.push(NamedPlace {
            name: name.to_string(),
            place,
        });
        self.is_modified = true;
    }

    pub fn load_from_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let content = fs::read_to_string(path.as_ref())?;
        let config: SessionConfig = serde_json::from_str(&content)?;
        config.tracker.validate()?;

        tracing::info!(
            "loaded config from {} ({} places)",
            path.as_ref().display(),
            config.places.len()
        );

        self.config = config;
        self.config_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    pub fn save_to_file<P: AsRef<Path>>(&mut self, path: P) -> ConfigResult<()> {
        let content = serde_json::to_string_pretty(&self.config)?;
        fs::write(path.as_ref(), content)?;

        self.config_file_path = Some(path.as_ref().to_path_buf());
        self.is_modified = false;
        Ok(())
    }

    /// Save back to the file the config was loaded from
    pub fn save(&mut self) -> ConfigResult<()> {
        let path = self
            .config_file_path
            .clone()
            .ok_or_else(|| ConfigError::invalid("config_file_path", "None", "no file to save to"))?;
        self.save_to_file(path)
    }

    pub fn is_modified(&self) -> bool {
        self.is_modified
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_default_tracker_config() {
        let config = TrackerConfig::default();

        assert_eq!(config.position_min_accuracy, 100.0);
        assert_eq!(config.min_distance, 0.0);
        assert_eq!(config.smooth_camera, 0.0);
        assert!(!config.alert);
        assert!(config.fixed_override().is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_fixed_override_requires_both_nonzero() {
        let mut config = TrackerConfig::default();
        config.latitude = Some(45.0);
        assert!(config.fixed_override().is_none());

        config.longitude = Some(0.0);
        assert!(config.fixed_override().is_none());

        config.longitude = Some(7.5);
        assert_eq!(config.fixed_override(), Some(GeoCoordinate::new(45.0, 7.5)));
    }

    #[test]
    fn test_invalid_values_rejected() {
        let negative = TrackerConfig::default().with_min_distance(-5.0);
        assert!(matches!(
            negative.validate(),
            Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "min_distance"
        ));

        let bad_lat = TrackerConfig::default().with_fixed_override(91.0, 10.0);
        assert!(bad_lat.validate().is_err());

        let nan_smoothing = TrackerConfig::default().with_smoothing(f64::NAN);
        assert!(nan_smoothing.validate().is_err());

        let no_timeout = TrackerConfig::default().with_fix_timeout_ms(0);
        assert!(matches!(
            no_timeout.validate(),
            Err(ConfigError::InvalidParameter { ref parameter, .. }) if parameter == "fix_timeout_ms"
        ));
        assert_eq!(TrackerConfig::default().fix_timeout(), Duration::from_millis(27_000));
    }

    #[test]
    fn test_partial_json_uses_defaults() {
        let manager = ConfigurationManager::from_json_str(
            r#"{
                "tracker": { "smooth_camera": 5, "alert": true },
                "places": [ { "name": "fountain", "latitude": 45.1, "longitude": 7.2 } ]
            }"#,
        )
        .unwrap();

        let tracker = manager.tracker();
        assert_eq!(tracker.smooth_camera, 5.0);
        assert!(tracker.alert);
        assert_eq!(tracker.position_min_accuracy, 100.0);
        assert_eq!(manager.config().scene, SceneConfig::default());
        assert_eq!(manager.config().places[0].place.offset_y, 0.0);
    }

    #[test]
    fn test_invalid_json_config_rejected() {
        let result = ConfigurationManager::from_json_str(r#"{ "tracker": { "min_distance": -1 } }"#);
        assert!(matches!(result, Err(ConfigError::InvalidParameter { .. })));

        let result = ConfigurationManager::from_json_str("not json");
        assert!(matches!(result, Err(ConfigError::Serialization(_))));
    }

    #[test]
    fn test_config_file_round_trip() {
        let path = std::env::temp_dir().join(format!("geo-ar-config-{}.json", std::process::id()));

        let mut manager = ConfigurationManager::new();
        manager
            .update_tracker(TrackerConfig::default().with_min_distance(20.0))
            .unwrap();
        manager.add_place("tower", PlaceConfig::new(45.0, 7.0).with_offset_y(3.0));
        assert!(manager.is_modified());

        manager.save_to_file(&path).unwrap();
        assert!(!manager.is_modified());

        let loaded = ConfigurationManager::from_file(&path).unwrap();
        assert_eq!(loaded.config(), manager.config());

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn test_save_without_path_fails() {
        let mut manager = ConfigurationManager::new();
        assert!(manager.save().is_err());
    }
}
