//! Camera position and heading tracking
//!
//! Sensor callbacks only record the latest raw fix or heading. All state
//! changes happen in [`PositionTracker::update`] and
//! [`PositionTracker::update_heading`], which the host calls once per frame.

use crate::advisory::{Advisory, AdvisoryChannel, SensorKind};
use crate::algorithms::{compute_compass_heading, local_offset};
use crate::core::{
    CameraRotation, GeoCoordinate, LocalOffset, COMPASS_ACCURACY_LIMIT_DEG,
    COORDINATE_BLEND_BIAS, OFFSET_BLEND_BIAS,
};
use crate::processing::Smoother;
use crate::sensors::OrientationEvent;
use crate::utils::TrackerConfig;

/// Tracking lifecycle
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TrackerState {
    /// No fix has passed the accuracy gate yet
    Uninitialized,
    /// Origin is set; offsets are produced every frame
    Tracking,
}

/// Result of one position update
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum PositionUpdate {
    /// No fix has been received
    Idle,
    /// Fix too inaccurate; current coordinate moved, offset held
    LowAccuracy,
    /// New smoothed offset from the origin
    Moved(LocalOffset),
}

/// Turns raw GPS fixes and orientation events into a local camera pose
#[derive(Debug)]
pub struct PositionTracker {
    position_min_accuracy: f64,
    smoother: Smoother,
    advisories: AdvisoryChannel,

    /// Latest raw fix; re-blended every frame until replaced
    pending: Option<GeoCoordinate>,
    current: Option<GeoCoordinate>,
    origin: Option<GeoCoordinate>,
    offset: Option<LocalOffset>,
    accuracy_poor: bool,
    /// Inside a run of compass readings over the accuracy limit
    compass_inaccurate: bool,

    /// Latest raw heading from the orientation stream
    raw_heading: f64,
    heading: Option<f64>,
    pitch: Option<f64>,
}

impl PositionTracker {
    pub fn new(config: &TrackerConfig, advisories: AdvisoryChannel) -> Self {
        Self {
            position_min_accuracy: config.position_min_accuracy,
            smoother: Smoother::new(config.smooth_camera),
            advisories,
            pending: None,
            current: None,
            origin: None,
            offset: None,
            accuracy_poor: false,
            compass_inaccurate: false,
            raw_heading: 0.0,
            heading: None,
            pitch: None,
        }
    }

    /// Record a fix. Last write wins; nothing is recomputed until `update`.
    pub fn ingest_coordinate(&mut self, coord: GeoCoordinate) {
        self.pending = Some(coord);
    }

    /// Resolve a heading from an orientation event.
    ///
    /// A native compass reading is preferred when its accuracy is under
    /// the limit, then raw angles from an absolute (or unlabelled) event.
    /// Returns whether the raw heading changed.
    pub fn ingest_orientation(&mut self, event: &OrientationEvent) -> bool {
        if let Some(compass_heading) = event.compass_heading {
            return match event.compass_accuracy {
                Some(accuracy) if accuracy < COMPASS_ACCURACY_LIMIT_DEG => {
                    self.compass_inaccurate = false;
                    self.raw_heading = compass_heading;
                    true
                }
                Some(accuracy) => {
                    // Once per run of inaccurate readings
                    if !self.compass_inaccurate {
                        self.compass_inaccurate = true;
                        self.advisories.report(Advisory::LowAccuracy {
                            sensor: SensorKind::Compass,
                            accuracy,
                            limit: COMPASS_ACCURACY_LIMIT_DEG,
                        });
                    }
                    false
                }
                None => {
                    self.advisories.report(Advisory::OrientationUnavailable);
                    false
                }
            };
        }

        match event.alpha {
            Some(alpha) if event.absolute != Some(false) => {
                self.raw_heading = compute_compass_heading(alpha, event.beta, event.gamma);
                true
            }
            Some(_) => {
                self.advisories.report(Advisory::NonAbsoluteOrientation);
                false
            }
            None => {
                self.advisories.report(Advisory::OrientationUnavailable);
                false
            }
        }
    }

    /// Advance the position by one frame
    pub fn update(&mut self) -> PositionUpdate {
        let Some(fix) = self.pending else {
            return PositionUpdate::Idle;
        };

        let previous = self.current;
        let current = GeoCoordinate {
            latitude: self.smoother.linear(
                fix.latitude,
                previous.map(|c| c.latitude),
                COORDINATE_BLEND_BIAS,
            ),
            longitude: self.smoother.linear(
                fix.longitude,
                previous.map(|c| c.longitude),
                COORDINATE_BLEND_BIAS,
            ),
            accuracy: fix.accuracy,
        };
        self.current = Some(current);

        if let Some(accuracy) = current.accuracy {
            if accuracy > self.position_min_accuracy {
                if !self.accuracy_poor {
                    self.accuracy_poor = true;
                    self.advisories.report(Advisory::LowAccuracy {
                        sensor: SensorKind::Gps,
                        accuracy,
                        limit: self.position_min_accuracy,
                    });
                }
                return PositionUpdate::LowAccuracy;
            }
        }

        if self.accuracy_poor {
            self.accuracy_poor = false;
            self.advisories.report(Advisory::AccuracyRestored {
                limit: self.position_min_accuracy,
            });
        }

        let origin = match self.origin {
            Some(origin) => origin,
            None => {
                tracing::info!(
                    "origin set at {:.6}, {:.6}",
                    current.latitude,
                    current.longitude
                );
                self.origin = Some(current);
                current
            }
        };

        let target = local_offset(&origin, &current);
        let previous_offset = self.offset;
        let offset = LocalOffset::new(
            self.smoother
                .linear(target.x, previous_offset.map(|o| o.x), OFFSET_BLEND_BIAS),
            self.smoother
                .linear(target.z, previous_offset.map(|o| o.z), OFFSET_BLEND_BIAS),
        );
        self.offset = Some(offset);

        PositionUpdate::Moved(offset)
    }

    /// Advance heading and pitch by one frame.
    ///
    /// Returns `None` when smoothing is disabled; the host's own look
    /// controls then own the camera rotation.
    pub fn update_heading(&mut self, camera_pitch_deg: f64) -> Option<CameraRotation> {
        if !self.smoother.is_enabled() {
            return None;
        }

        let heading = self.smoother.circular(self.raw_heading, self.heading);
        let pitch = self.smoother.circular(camera_pitch_deg, self.pitch);
        self.heading = Some(heading);
        self.pitch = Some(pitch);

        Some(CameraRotation {
            pitch_deg: pitch,
            yaw_deg: 360.0 - heading,
        })
    }

    pub fn state(&self) -> TrackerState {
        if self.origin.is_some() {
            TrackerState::Tracking
        } else {
            TrackerState::Uninitialized
        }
    }

    /// Smoothed current coordinate
    pub fn current_coords(&self) -> Option<GeoCoordinate> {
        self.current
    }

    pub fn origin(&self) -> Option<GeoCoordinate> {
        self.origin
    }

    /// Last emitted offset from the origin
    pub fn local_offset(&self) -> Option<LocalOffset> {
        self.offset
    }

    /// Smoothed heading when smoothing is on, otherwise the latest raw one
    pub fn heading(&self) -> f64 {
        self.heading.unwrap_or(self.raw_heading)
    }

    pub fn is_accuracy_poor(&self) -> bool {
        self.accuracy_poor
    }

    pub fn smoother(&self) -> Smoother {
        self.smoother
    }

    pub fn advisories_mut(&mut self) -> &mut AdvisoryChannel {
        &mut self.advisories
    }
}
