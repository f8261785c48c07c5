//! Scripted sensor streams for testing and demos

use crate::core::GeoCoordinate;
use crate::sensors::{FixSource, OrientationEvent, OrientationSource, SensorError, SensorResult};
use std::collections::VecDeque;
use std::time::{Duration, Instant};

/// Fix source replaying a queue of readings and errors.
///
/// Once started, an empty queue that stays empty for the start timeout
/// yields `SensorError::Timeout`.
#[derive(Debug, Default)]
pub struct MockFixSource {
    queue: VecDeque<SensorResult<GeoCoordinate>>,
    start_error: Option<SensorError>,
    timeout: Option<Duration>,
    last_activity: Option<Instant>,
    active: bool,
    stop_calls: u32,
}

impl MockFixSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// Make the first `start` fail with `error`. The subscription survives
    /// unless the error is `Unsupported`.
    pub fn failing_start(error: SensorError) -> Self {
        Self {
            start_error: Some(error),
            ..Default::default()
        }
    }

    pub fn push_fix(&mut self, fix: GeoCoordinate) {
        self.queue.push_back(Ok(fix));
    }

    pub fn push_error(&mut self, error: SensorError) {
        self.queue.push_back(Err(error));
    }

    pub fn stop_calls(&self) -> u32 {
        self.stop_calls
    }
}

impl FixSource for MockFixSource {
    fn start(&mut self, timeout: Duration) -> SensorResult<()> {
        self.timeout = Some(timeout);
        self.last_activity = Some(Instant::now());

        match self.start_error.take() {
            Some(error) => {
                self.active = error.is_recoverable();
                Err(error)
            }
            None => {
                self.active = true;
                Ok(())
            }
        }
    }

    fn next_fix(&mut self) -> SensorResult<Option<GeoCoordinate>> {
        if !self.active {
            return Ok(None);
        }

        let now = Instant::now();
        match self.queue.pop_front() {
            Some(reading) => {
                self.last_activity = Some(now);
                reading.map(Some)
            }
            None => match (self.timeout, self.last_activity) {
                (Some(timeout), Some(last)) if now.duration_since(last) >= timeout => {
                    self.last_activity = Some(now);
                    Err(SensorError::Timeout {
                        timeout_ms: timeout.as_millis() as u32,
                    })
                }
                _ => Ok(None),
            },
        }
    }

    fn stop(&mut self) {
        self.stop_calls += 1;
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

/// Orientation source replaying a queue of events
#[derive(Debug, Default)]
pub struct MockOrientationSource {
    queue: VecDeque<SensorResult<OrientationEvent>>,
    unsupported: bool,
    active: bool,
}

impl MockOrientationSource {
    pub fn new() -> Self {
        Self::default()
    }

    /// A device without orientation sensors
    pub fn unsupported() -> Self {
        Self {
            unsupported: true,
            ..Default::default()
        }
    }

    pub fn push_event(&mut self, event: OrientationEvent) {
        self.queue.push_back(Ok(event));
    }

    pub fn push_error(&mut self, error: SensorError) {
        self.queue.push_back(Err(error));
    }

}

impl OrientationSource for MockOrientationSource {
    fn start(&mut self) -> SensorResult<()> {
        if self.unsupported {
            return Err(SensorError::Unsupported);
        }
        self.active = true;
        Ok(())
    }

    fn next_event(&mut self) -> SensorResult<Option<OrientationEvent>> {
        if !self.active {
            return Ok(None);
        }
        self.queue.pop_front().transpose()
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mock_fix_source_replays_in_order() {
        let mut source = MockFixSource::new();
        source.push_fix(GeoCoordinate::new(1.0, 2.0));
        source.push_error(SensorError::SignalUnavailable);

        // Nothing until started
        assert_eq!(source.next_fix(), Ok(None));

        source.start(Duration::from_secs(27)).unwrap();
        assert_eq!(source.next_fix(), Ok(Some(GeoCoordinate::new(1.0, 2.0))));
        assert_eq!(source.next_fix(), Err(SensorError::SignalUnavailable));
        assert_eq!(source.next_fix(), Ok(None));
    }

    #[test]
    fn test_recoverable_start_error_keeps_subscription() {
        let mut source = MockFixSource::failing_start(SensorError::PermissionDenied);
        source.push_fix(GeoCoordinate::new(1.0, 2.0));

        assert_eq!(source.start(Duration::from_secs(27)), Err(SensorError::PermissionDenied));
        assert!(source.is_active());
        assert_eq!(source.next_fix(), Ok(Some(GeoCoordinate::new(1.0, 2.0))));

        // Only the first start fails
        assert_eq!(source.start(Duration::from_secs(27)), Ok(()));
    }

    #[test]
    fn test_unsupported_start_error_leaves_source_inactive() {
        let mut source = MockFixSource::failing_start(SensorError::Unsupported);
        source.push_fix(GeoCoordinate::new(1.0, 2.0));

        assert_eq!(source.start(Duration::from_secs(27)), Err(SensorError::Unsupported));
        assert!(!source.is_active());
        assert_eq!(source.next_fix(), Ok(None));
    }

    #[test]
    fn test_silence_past_timeout_reports_and_rearms() {
        let mut source = MockFixSource::new();
        source.start(Duration::from_millis(20)).unwrap();
        assert_eq!(source.next_fix(), Ok(None));
        std::thread::sleep(Duration::from_millis(40));

        assert_eq!(source.next_fix(), Err(SensorError::Timeout { timeout_ms: 20 }));
        // The timer restarts after reporting
        assert_eq!(source.next_fix(), Ok(None));
    }

    #[test]
    fn test_stop_counts_every_call() {
        let mut source = MockFixSource::new();
        source.stop();
        source.start(Duration::from_secs(27)).unwrap();
        source.stop();
        source.stop();

        assert_eq!(source.stop_calls(), 3);
        assert!(!source.is_active());
    }

    #[test]
    fn test_unsupported_orientation() {
        let mut source = MockOrientationSource::unsupported();
        assert_eq!(source.start(), Err(SensorError::Unsupported));
        assert!(!source.is_active());
    }
}
