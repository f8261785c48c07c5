//! Per-frame host glue
//!
//! [`ArSession`] owns the camera tracker, the placed entities and the sensor
//! sources, all handed in by the host. Each [`ArSession::tick`] drains the
//! sources, advances the trackers and writes poses to the scene.

use crate::advisory::{Advisory, AdvisoryCallback, AdvisoryChannel, AdvisoryHandle, SensorKind};
use crate::core::{GeoCoordinate, LocalOffset};
use crate::scene::{EntityId, EntityTransform, SceneSink};
use crate::sensors::{FixSource, FixedFixSource, OrientationSource, SensorError};
use crate::tracking::{PlacementTracker, PositionTracker, PositionUpdate};
use crate::utils::{ConfigResult, PlaceConfig, SceneConfig, TrackerConfig};

/// A geo-anchored entity owned by a session
#[derive(Debug, Clone)]
pub struct PlacedEntity {
    pub entity: EntityId,
    pub name: String,
    pub tracker: PlacementTracker,
}

/// What one frame did
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct FrameSummary {
    pub position: PositionUpdate,
    pub rotation_updated: bool,
    pub placements_updated: usize,
}

/// Subscription state of one sensor stream
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum StreamState {
    Idle,
    Active,
    /// Unsupported; never polled again
    Disabled,
}

pub struct ArSession<S: SceneSink> {
    tracker: PositionTracker,
    tracker_config: TrackerConfig,
    scene_config: SceneConfig,
    scene: S,
    camera: EntityId,
    fix_source: Option<Box<dyn FixSource>>,
    fix_state: StreamState,
    orientation_source: Option<Box<dyn OrientationSource>>,
    orientation_state: StreamState,
    places: Vec<PlacedEntity>,
}

impl<S: SceneSink> ArSession<S> {
    /// Build a session around `camera` in `scene`.
    ///
    /// A fixed override in `config` installs a [`FixedFixSource`]; otherwise
    /// supply a live source with [`ArSession::with_fix_source`].
    pub fn new(
        config: TrackerConfig,
        scene_config: SceneConfig,
        scene: S,
        camera: EntityId,
    ) -> ConfigResult<Self> {
        config.validate()?;

        let fix_source = config.fixed_override().map(|coord| {
            Box::new(FixedFixSource::new(
                coord.latitude,
                coord.longitude,
                config.fixed_poll_interval(),
            )) as Box<dyn FixSource>
        });

        Ok(Self {
            tracker: PositionTracker::new(&config, AdvisoryChannel::new(config.alert)),
            tracker_config: config,
            scene_config,
            scene,
            camera,
            fix_source,
            fix_state: StreamState::Idle,
            orientation_source: None,
            orientation_state: StreamState::Idle,
            places: Vec::new(),
        })
    }

    pub fn with_fix_source(mut self, source: Box<dyn FixSource>) -> Self {
        self.fix_source = Some(source);
        self
    }

    pub fn with_orientation_source(mut self, source: Box<dyn OrientationSource>) -> Self {
        self.orientation_source = Some(source);
        self
    }

    pub fn on_advisory(&mut self, callback: AdvisoryCallback) -> AdvisoryHandle {
        self.tracker.advisories_mut().register(callback)
    }

    /// Anchor `entity` at a coordinate. The entity starts at the scene origin.
    pub fn add_place(&mut self, entity: EntityId, name: &str, place: PlaceConfig) {
        self.scene.set_transform(entity, EntityTransform::default());
        self.places.push(PlacedEntity {
            entity,
            name: name.to_string(),
            tracker: PlacementTracker::new(place, &self.tracker_config, self.scene_config),
        });
    }

    /// Subscribe to the sensor streams.
    ///
    /// A stream already disabled by an earlier `start` is left alone, so its
    /// advisory is not repeated. A recoverable error is reported and the
    /// stream stays subscribed.
    pub fn start(&mut self) {
        if self.fix_state != StreamState::Disabled {
            let timeout = self.tracker_config.fix_timeout();
            self.fix_state = match self.fix_source.as_mut() {
                None => {
                    self.tracker
                        .advisories_mut()
                        .report(Advisory::SensorUnsupported(SensorKind::Gps));
                    StreamState::Disabled
                }
                Some(source) => match source.start(timeout) {
                    Ok(()) => StreamState::Active,
                    Err(error) => {
                        self.tracker
                            .advisories_mut()
                            .report(error.to_advisory(SensorKind::Gps));
                        state_after_error(&error)
                    }
                },
            };
        }

        if self.orientation_state != StreamState::Disabled {
            self.orientation_state = match self.orientation_source.as_mut() {
                None => {
                    self.tracker
                        .advisories_mut()
                        .report(Advisory::SensorUnsupported(SensorKind::Compass));
                    StreamState::Disabled
                }
                Some(source) => match source.start() {
                    Ok(()) => StreamState::Active,
                    Err(error) => {
                        self.tracker
                            .advisories_mut()
                            .report(error.to_advisory(SensorKind::Compass));
                        state_after_error(&error)
                    }
                },
            };
        }

        tracing::info!(
            "session started (fix: {:?}, orientation: {:?})",
            self.fix_state,
            self.orientation_state
        );
    }

    /// Unsubscribe. Safe to call repeatedly, or without a prior `start`.
    pub fn stop(&mut self) {
        if let Some(source) = self.fix_source.as_mut() {
            source.stop();
        }
        if let Some(source) = self.orientation_source.as_mut() {
            source.stop();
        }
        if self.fix_state == StreamState::Active {
            self.fix_state = StreamState::Idle;
        }
        if self.orientation_state == StreamState::Active {
            self.orientation_state = StreamState::Idle;
        }
        tracing::debug!("session stopped");
    }

    /// Advance one frame
    pub fn tick(&mut self) -> FrameSummary {
        self.drain_fixes();
        self.drain_orientation();

        let rotation_updated = self.update_rotation();
        let position = self.update_position();

        let mut placements_updated = 0;
        for placed in &mut self.places {
            if let Some(placement) = placed.tracker.update(&self.tracker) {
                let mut transform = self.scene.transform(placed.entity).unwrap_or_default();
                transform.position = placement.position;
                transform.rotation.y = placement.yaw;
                self.scene.set_transform(placed.entity, transform);
                placements_updated += 1;
            }
        }

        FrameSummary {
            position,
            rotation_updated,
            placements_updated,
        }
    }

    fn drain_fixes(&mut self) {
        if self.fix_state != StreamState::Active {
            return;
        }
        let Some(source) = self.fix_source.as_mut() else {
            return;
        };

        loop {
            match source.next_fix() {
                Ok(Some(fix)) => self.tracker.ingest_coordinate(fix),
                Ok(None) => break,
                Err(error) => {
                    self.tracker
                        .advisories_mut()
                        .report(error.to_advisory(SensorKind::Gps));
                    if !error.is_recoverable() {
                        source.stop();
                        self.fix_state = StreamState::Disabled;
                    }
                    break;
                }
            }
        }
    }

    fn drain_orientation(&mut self) {
        if self.orientation_state != StreamState::Active {
            return;
        }
        let Some(source) = self.orientation_source.as_mut() else {
            return;
        };

        loop {
            match source.next_event() {
                Ok(Some(event)) => {
                    self.tracker.ingest_orientation(&event);
                }
                Ok(None) => break,
                Err(error) => {
                    self.tracker
                        .advisories_mut()
                        .report(error.to_advisory(SensorKind::Compass));
                    if !error.is_recoverable() {
                        source.stop();
                        self.orientation_state = StreamState::Disabled;
                    }
                    break;
                }
            }
        }
    }

    fn update_rotation(&mut self) -> bool {
        let mut transform = self.scene.transform(self.camera).unwrap_or_default();
        let pitch_deg = transform.rotation.x.to_degrees();

        let Some(rotation) = self.tracker.update_heading(pitch_deg) else {
            return false;
        };

        transform.rotation.x = rotation.pitch_deg.to_radians();
        transform.rotation.y = rotation.yaw_deg.to_radians();
        self.scene.set_transform(self.camera, transform);
        true
    }

    fn update_position(&mut self) -> PositionUpdate {
        let update = self.tracker.update();
        if let PositionUpdate::Moved(offset) = update {
            let mut transform = self.scene.transform(self.camera).unwrap_or_default();
            transform.position.x = offset.x;
            transform.position.z = offset.z;
            self.scene.set_transform(self.camera, transform);
        }
        update
    }

    pub fn tracker(&self) -> &PositionTracker {
        &self.tracker
    }

    pub fn current_coords(&self) -> Option<GeoCoordinate> {
        self.tracker.current_coords()
    }

    pub fn local_offset(&self) -> Option<LocalOffset> {
        self.tracker.local_offset()
    }

    pub fn heading(&self) -> f64 {
        self.tracker.heading()
    }

    pub fn places(&self) -> &[PlacedEntity] {
        &self.places
    }

    pub fn scene(&self) -> &S {
        &self.scene
    }

    pub fn camera(&self) -> EntityId {
        self.camera
    }

    pub fn is_fix_stream_disabled(&self) -> bool {
        self.fix_state == StreamState::Disabled
    }

    pub fn is_orientation_stream_disabled(&self) -> bool {
        self.orientation_state == StreamState::Disabled
    }
}

fn state_after_error(error: &SensorError) -> StreamState {
    if error.is_recoverable() {
        StreamState::Active
    } else {
        StreamState::Disabled
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::InMemoryScene;
    use crate::sensors::{MockFixSource, MockOrientationSource, OrientationEvent};
    use std::cell::RefCell;
    use std::rc::Rc;

    const CAMERA: EntityId = EntityId(0);

    fn session(config: TrackerConfig) -> (ArSession<InMemoryScene>, Rc<RefCell<Vec<Advisory>>>) {
        let mut session =
            ArSession::new(config, SceneConfig::default(), InMemoryScene::new(), CAMERA).unwrap();
        let seen = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        session.on_advisory(Box::new(move |a| sink.borrow_mut().push(a.clone())));
        (session, seen)
    }

    fn alerting() -> TrackerConfig {
        TrackerConfig {
            alert: true,
            ..Default::default()
        }
    }

    #[test]
    fn test_invalid_config_rejected() {
        let config = TrackerConfig::default().with_min_distance(-1.0);
        assert!(ArSession::new(config, SceneConfig::default(), InMemoryScene::new(), CAMERA).is_err());
    }

    #[test]
    fn test_walk_moves_camera_and_places() {
        let mut fixes = MockFixSource::new();
        fixes.push_fix(GeoCoordinate::new(0.0, 0.0).with_accuracy(5.0));

        let (session, _) = session(TrackerConfig::default());
        let mut session = session.with_fix_source(Box::new(fixes));
        session.add_place(EntityId(1), "east", PlaceConfig::new(0.0, 0.001));
        session.start();

        let first = session.tick();
        assert!(matches!(first.position, PositionUpdate::Moved(_)));
        assert_eq!(first.placements_updated, 1);

        let place = session.scene().transform(EntityId(1)).unwrap();
        assert!((place.position.x - 111.3).abs() < 1.2);
        assert!(place.position.z.abs() < 1e-9);

        // Pending fix is held, so the next frame recomputes the camera but the
        // place sees an unchanged coordinate
        let second = session.tick();
        assert_eq!(second.placements_updated, 0);
    }

    #[test]
    fn test_missing_sources_reported_once() {
        let (mut session, seen) = session(alerting());
        session.start();

        assert!(session.is_fix_stream_disabled());
        assert!(session.is_orientation_stream_disabled());
        assert_eq!(
            seen.borrow().as_slice(),
            &[
                Advisory::SensorUnsupported(SensorKind::Gps),
                Advisory::SensorUnsupported(SensorKind::Compass),
            ]
        );

        session.tick();
        session.tick();
        assert_eq!(seen.borrow().len(), 2);
    }

    #[test]
    fn test_fix_errors_keep_stream_alive() {
        let mut fixes = MockFixSource::new();
        fixes.push_error(SensorError::PermissionDenied);
        fixes.push_error(SensorError::Timeout { timeout_ms: 27_000 });
        fixes.push_fix(GeoCoordinate::new(1.0, 1.0));

        let (session, seen) = session(alerting());
        let mut session = session
            .with_fix_source(Box::new(fixes))
            .with_orientation_source(Box::new(MockOrientationSource::new()));
        session.start();

        session.tick();
        session.tick();
        session.tick();

        assert!(!session.is_fix_stream_disabled());
        assert_eq!(session.current_coords(), Some(GeoCoordinate::new(1.0, 1.0)));
        assert_eq!(
            seen.borrow().as_slice(),
            &[
                Advisory::PermissionDenied(SensorKind::Gps),
                Advisory::SignalUnavailable,
            ]
        );
    }

    #[test]
    fn test_unsupported_orientation_disabled_after_start() {
        let (session, seen) = session(alerting());
        let mut session = session
            .with_fix_source(Box::new(MockFixSource::new()))
            .with_orientation_source(Box::new(MockOrientationSource::unsupported()));
        session.start();

        assert!(!session.is_fix_stream_disabled());
        assert!(session.is_orientation_stream_disabled());
        assert_eq!(
            seen.borrow().as_slice(),
            &[Advisory::SensorUnsupported(SensorKind::Compass)]
        );
    }

    #[test]
    fn test_unsupported_midstream_stops_polling() {
        let mut fixes = MockFixSource::new();
        fixes.push_error(SensorError::Unsupported);
        fixes.push_fix(GeoCoordinate::new(1.0, 1.0));

        let (session, _) = session(TrackerConfig::default());
        let mut session = session.with_fix_source(Box::new(fixes));
        session.start();
        session.tick();
        session.tick();

        assert!(session.is_fix_stream_disabled());
        assert!(session.current_coords().is_none());
    }

    #[test]
    fn test_heading_written_when_smoothing() {
        let mut orientation = MockOrientationSource::new();
        orientation.push_event(OrientationEvent::compass(90.0, 5.0));

        let (session, _) = session(TrackerConfig::default().with_smoothing(2.0));
        let mut session = session
            .with_fix_source(Box::new(MockFixSource::new()))
            .with_orientation_source(Box::new(orientation));
        session.start();

        let summary = session.tick();
        assert!(summary.rotation_updated);
        assert_eq!(summary.position, PositionUpdate::Idle);

        let camera = session.scene().transform(CAMERA).unwrap();
        assert!((camera.rotation.y - 270f64.to_radians()).abs() < 1e-9);
        assert_eq!(session.heading(), 90.0);
    }

    #[test]
    fn test_fixed_override_drives_camera() {
        let config = TrackerConfig::default().with_fixed_override(45.0, 7.0);
        let (mut session, _) = session(config);
        session.start();

        session.tick();
        assert_eq!(session.tracker().origin().map(|o| o.latitude), Some(45.0));
    }

    #[test]
    fn test_restart_does_not_repeat_unsupported() {
        let (mut session, seen) = session(alerting());
        session.start();
        session.start();

        assert_eq!(seen.borrow().len(), 2);
        assert!(session.is_fix_stream_disabled());
    }

    #[test]
    fn test_denied_at_start_still_receives_fixes() {
        let mut fixes = MockFixSource::failing_start(SensorError::PermissionDenied);
        fixes.push_fix(GeoCoordinate::new(1.0, 1.0).with_accuracy(5.0));

        let (session, seen) = session(alerting());
        let mut session = session
            .with_fix_source(Box::new(fixes))
            .with_orientation_source(Box::new(MockOrientationSource::new()));
        session.start();
        assert_eq!(
            seen.borrow().as_slice(),
            &[Advisory::PermissionDenied(SensorKind::Gps)]
        );

        let summary = session.tick();
        assert!(!session.is_fix_stream_disabled());
        assert!(matches!(summary.position, PositionUpdate::Moved(_)));
        assert_eq!(session.current_coords().map(|c| c.latitude), Some(1.0));
    }

    #[test]
    fn test_unsupported_at_start_disables_fix_stream() {
        let mut fixes = MockFixSource::failing_start(SensorError::Unsupported);
        fixes.push_fix(GeoCoordinate::new(1.0, 1.0));

        let (session, _) = session(TrackerConfig::default());
        let mut session = session.with_fix_source(Box::new(fixes));
        session.start();
        session.tick();

        assert!(session.is_fix_stream_disabled());
        assert!(session.current_coords().is_none());
    }

    #[test]
    fn test_silent_fix_stream_reports_timeout() {
        let config = TrackerConfig {
            alert: true,
            ..Default::default()
        }
        .with_fix_timeout_ms(20);
        let (session, seen) = session(config);
        let mut session = session
            .with_fix_source(Box::new(MockFixSource::new()))
            .with_orientation_source(Box::new(MockOrientationSource::new()));
        session.start();

        session.tick();
        assert!(seen.borrow().is_empty());

        std::thread::sleep(std::time::Duration::from_millis(40));
        session.tick();
        assert_eq!(seen.borrow().as_slice(), &[Advisory::SignalUnavailable]);
        assert!(!session.is_fix_stream_disabled());
    }

    #[test]
    fn test_stop_is_idempotent() {
        let (mut session, _) = session(TrackerConfig::default());
        session.stop();

        let mut session = session.with_fix_source(Box::new(MockFixSource::new()));
        session.start();
        session.stop();
        session.stop();
        assert!(!session.is_fix_stream_disabled());
    }
}
