//! Sensor stream traits and readings

use crate::core::GeoCoordinate;
use crate::sensors::SensorResult;
use std::time::Duration;

/// Source of GPS fixes.
///
/// Implementations buffer readings as they arrive; the session drains them
/// once per frame.
pub trait FixSource {
    /// Begin delivering fixes.
    ///
    /// A source that delivers nothing for `timeout` reports
    /// `SensorError::Timeout` from `next_fix` and keeps listening.
    /// A recoverable error from `start` leaves the source subscribed.
    fn start(&mut self, timeout: Duration) -> SensorResult<()>;

    /// Next buffered fix.
    /// Returns Ok(None) when nothing new has arrived since the last call.
    fn next_fix(&mut self) -> SensorResult<Option<GeoCoordinate>>;

    /// Stop delivering fixes. Safe to call repeatedly, and before `start`.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// Source of device orientation events
pub trait OrientationSource {
    /// Begin delivering events. `Err(Unsupported)` when the platform has no
    /// orientation sensor.
    fn start(&mut self) -> SensorResult<()>;

    /// Next buffered event, Ok(None) when idle
    fn next_event(&mut self) -> SensorResult<Option<OrientationEvent>>;

    /// Stop delivering events. Safe to call repeatedly, and before `start`.
    fn stop(&mut self);

    fn is_active(&self) -> bool;
}

/// One device orientation reading.
///
/// Either raw `alpha`/`beta`/`gamma` angles (degrees), a native compass
/// heading, or both.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct OrientationEvent {
    pub alpha: Option<f64>,
    pub beta: f64,
    pub gamma: f64,
    /// `None` when the platform does not say
    pub absolute: Option<bool>,
    pub compass_heading: Option<f64>,
    pub compass_accuracy: Option<f64>,
}

impl OrientationEvent {
    pub fn angles(alpha: f64, beta: f64, gamma: f64) -> Self {
        Self {
            alpha: Some(alpha),
            beta,
            gamma,
            ..Default::default()
        }
    }

    pub fn compass(heading: f64, accuracy: f64) -> Self {
        Self {
            compass_heading: Some(heading),
            compass_accuracy: Some(accuracy),
            ..Default::default()
        }
    }

    pub fn with_absolute(mut self, absolute: bool) -> Self {
        self.absolute = Some(absolute);
        self
    }
}
