//! Placement of geo-anchored entities around the camera

use crate::algorithms::place_offset;
use crate::core::{GeoCoordinate, LocalOffset, OFFSET_BLEND_BIAS};
use crate::processing::Smoother;
use crate::tracking::PositionTracker;
use crate::utils::{PlaceConfig, SceneConfig, TrackerConfig};
use nalgebra::Vector3;
use std::f64::consts::PI;

/// Pose of a placed entity in the scene
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Placement {
    pub position: Vector3<f64>,
    /// Yaw (radians) turning the entity back toward the camera
    pub yaw: f64,
}

/// Tracks one entity anchored at a latitude/longitude
#[derive(Debug, Clone)]
pub struct PlacementTracker {
    place: PlaceConfig,
    min_distance: f64,
    smoother: Smoother,
    scene: SceneConfig,
    /// Camera coordinate seen at the last recompute
    last_camera: Option<GeoCoordinate>,
    offset: Option<LocalOffset>,
    /// Unsigned east-west distance from the last recompute
    debug_distance: f64,
}

impl PlacementTracker {
    pub fn new(place: PlaceConfig, tracker: &TrackerConfig, scene: SceneConfig) -> Self {
        Self {
            place,
            min_distance: tracker.min_distance,
            smoother: Smoother::new(tracker.smooth_camera),
            scene,
            last_camera: None,
            offset: None,
            debug_distance: 0.0,
        }
    }

    /// Recompute against the camera.
    ///
    /// Returns `None` until the camera has an origin, and whenever its
    /// current coordinate is exactly unchanged since the last recompute.
    pub fn update(&mut self, camera: &PositionTracker) -> Option<Placement> {
        camera.origin()?;
        let current = camera.current_coords()?;
        self.update_from(&current)
    }

    fn update_from(&mut self, camera: &GeoCoordinate) -> Option<Placement> {
        if let Some(last) = self.last_camera {
            if last.latitude == camera.latitude && last.longitude == camera.longitude {
                return None;
            }
        }
        self.last_camera = Some(*camera);

        let target = place_offset(camera, &self.place.coordinate(), self.min_distance);
        self.debug_distance = target.x.abs();

        let previous = self.offset;
        let offset = LocalOffset::new(
            self.smoother
                .linear(target.x, previous.map(|o| o.x), OFFSET_BLEND_BIAS),
            self.smoother
                .linear(target.z, previous.map(|o| o.z), OFFSET_BLEND_BIAS),
        );
        self.offset = Some(offset);

        Some(Placement {
            position: offset.to_vector(self.height()),
            yaw: offset.x.atan2(offset.z) + PI,
        })
    }

    fn height(&self) -> f64 {
        let mut y = self.scene.ground_clearance;
        if self.place.offset_y > 0.0 {
            y += self.place.offset_y * self.scene.vertical_scale;
        }
        y
    }

    pub fn place(&self) -> &PlaceConfig {
        &self.place
    }

    pub fn local_offset(&self) -> Option<LocalOffset> {
        self.offset
    }

    pub fn debug_distance(&self) -> f64 {
        self.debug_distance
    }
}
