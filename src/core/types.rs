//! Core data types for geo-anchored tracking

use nalgebra::Vector3;
use serde::{Deserialize, Serialize};

/// One GPS coordinate sample in degrees
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoCoordinate {
    pub latitude: f64,
    pub longitude: f64,
    /// Horizontal accuracy radius (meters), when the source reports one
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub accuracy: Option<f64>,
}

impl GeoCoordinate {
    pub fn new(latitude: f64, longitude: f64) -> Self {
        Self {
            latitude,
            longitude,
            accuracy: None,
        }
    }

    pub fn with_accuracy(mut self, accuracy: f64) -> Self {
        self.accuracy = Some(accuracy);
        self
    }

    /// Same point with the latitude replaced
    pub fn at_latitude(&self, latitude: f64) -> Self {
        Self::new(latitude, self.longitude)
    }

    /// Same point with the longitude replaced
    pub fn at_longitude(&self, longitude: f64) -> Self {
        Self::new(self.latitude, longitude)
    }
}

/// Planar displacement on the ground plane (meters).
///
/// `x` grows eastward, `z` grows southward (the camera looks down -z).
#[derive(Debug, Clone, Copy, Default, PartialEq, Serialize, Deserialize)]
pub struct LocalOffset {
    pub x: f64,
    pub z: f64,
}

impl LocalOffset {
    pub fn new(x: f64, z: f64) -> Self {
        Self { x, z }
    }

    /// Lift onto the scene's ground plane at height `y`
    pub fn to_vector(&self, y: f64) -> Vector3<f64> {
        Vector3::new(self.x, y, self.z)
    }
}

/// Smoothed camera rotation, degrees
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CameraRotation {
    pub pitch_deg: f64,
    /// Yaw written to the scene: `360 - heading`
    pub yaw_deg: f64,
}
