//! Fixed override coordinate, re-emitted on a fixed interval

use crate::core::{GeoCoordinate, FIXED_OVERRIDE_PAUSED};
use crate::sensors::{FixSource, SensorResult};
use std::time::{Duration, Instant};

/// Fix source that replays one configured coordinate instead of live GPS.
///
/// Emits with zero accuracy so the accuracy gate always passes. Setting
/// either coordinate to -1 pauses emission.
#[derive(Debug, Clone)]
pub struct FixedFixSource {
    coordinate: GeoCoordinate,
    interval: Duration,
    last_emit: Option<Instant>,
    active: bool,
}

impl FixedFixSource {
    pub fn new(latitude: f64, longitude: f64, interval: Duration) -> Self {
        Self {
            coordinate: GeoCoordinate::new(latitude, longitude).with_accuracy(0.0),
            interval,
            last_emit: None,
            active: false,
        }
    }

    pub fn coordinate(&self) -> GeoCoordinate {
        self.coordinate
    }

    fn is_paused(&self) -> bool {
        self.coordinate.latitude == FIXED_OVERRIDE_PAUSED
            || self.coordinate.longitude == FIXED_OVERRIDE_PAUSED
    }

    /// Poll against an explicit clock reading
    pub fn poll_at(&mut self, now: Instant) -> Option<GeoCoordinate> {
        if !self.active {
            return None;
        }

        let due = match self.last_emit {
            Some(last) => now.saturating_duration_since(last) >= self.interval,
            None => true,
        };
        if !due {
            return None;
        }
        self.last_emit = Some(now);

        if self.is_paused() {
            return None;
        }
        Some(self.coordinate)
    }
}

impl FixSource for FixedFixSource {
    fn start(&mut self, _timeout: Duration) -> SensorResult<()> {
        tracing::debug!(
            "fixed override at {}, {} every {:?}",
            self.coordinate.latitude,
            self.coordinate.longitude,
            self.interval
        );
        self.active = true;
        Ok(())
    }

    fn next_fix(&mut self) -> SensorResult<Option<GeoCoordinate>> {
        Ok(self.poll_at(Instant::now()))
    }

    fn stop(&mut self) {
        self.active = false;
        self.last_emit = None;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}
