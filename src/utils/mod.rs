//! Utility modules for configuration

pub mod config;

pub use config::{
    ConfigError, ConfigResult, ConfigurationManager, NamedPlace, PlaceConfig, SceneConfig,
    SessionConfig, TrackerConfig,
};
