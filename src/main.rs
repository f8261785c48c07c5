use geo_ar_tracking::{
    placement_reports, render_reports, ArSession, ConfigurationManager, EntityId, FixSource,
    GeoCoordinate, InMemoryScene, MockOrientationSource, OrientationEvent, OutputFormat,
    PlaceConfig, SensorResult,
};
use std::collections::VecDeque;
use std::error::Error;
use std::time::Duration;
use tracing_subscriber::EnvFilter;

const FRAMES: usize = 120;
const START: (f64, f64) = (45.070_312, 7.686_856);

/// Replays a walk, one fix per frame
struct ScriptedWalk {
    fixes: VecDeque<GeoCoordinate>,
    emitted_this_frame: bool,
    active: bool,
}

impl ScriptedWalk {
    fn east(start: (f64, f64), steps: usize, step_deg: f64) -> Self {
        let mut fixes: VecDeque<GeoCoordinate> = (0..steps)
            .map(|i| GeoCoordinate::new(start.0, start.1 + i as f64 * step_deg).with_accuracy(8.0))
            .collect();
        // One bad fix halfway through
        if let Some(fix) = fixes.get_mut(steps / 2) {
            fix.accuracy = Some(250.0);
        }
        Self {
            fixes,
            emitted_this_frame: false,
            active: false,
        }
    }
}

impl FixSource for ScriptedWalk {
    fn start(&mut self, _timeout: Duration) -> SensorResult<()> {
        self.active = true;
        Ok(())
    }

    fn next_fix(&mut self) -> SensorResult<Option<GeoCoordinate>> {
        if !self.active {
            return Ok(None);
        }
        if self.emitted_this_frame {
            self.emitted_this_frame = false;
            return Ok(None);
        }
        self.emitted_this_frame = true;
        Ok(self.fixes.pop_front())
    }

    fn stop(&mut self) {
        self.active = false;
    }

    fn is_active(&self) -> bool {
        self.active
    }
}

fn main() -> Result<(), Box<dyn Error>> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .init();

    let args: Vec<String> = std::env::args().collect();
    let format = if args.iter().any(|a| a == "--json") {
        OutputFormat::Json
    } else {
        OutputFormat::Text
    };

    let mut manager = match args.iter().skip(1).find(|a| !a.starts_with("--")) {
        Some(path) => ConfigurationManager::from_file(path)?,
        None => ConfigurationManager::new(),
    };
    if manager.config().places.is_empty() {
        manager.add_place("gate", PlaceConfig::new(START.0 + 0.0009, START.1 + 0.0004));
        manager.add_place("tower", PlaceConfig::new(START.0 - 0.002, START.1 + 0.003).with_offset_y(12.0));
        manager.add_place("kiosk", PlaceConfig::new(START.0, START.1 + 0.0001));
    }
    let config = manager.config().clone();

    let camera = EntityId(0);
    let mut session = ArSession::new(config.tracker.clone(), config.scene, InMemoryScene::new(), camera)?;

    if config.tracker.fixed_override().is_none() {
        session = session.with_fix_source(Box::new(ScriptedWalk::east(START, FRAMES, 0.000_01)));
    }

    let mut orientation = MockOrientationSource::new();
    for i in 0..FRAMES {
        orientation.push_event(OrientationEvent::compass(85.0 + (i % 10) as f64, 12.0));
    }
    session = session.with_orientation_source(Box::new(orientation));

    session.on_advisory(Box::new(|advisory| {
        if advisory.is_user_facing() {
            eprintln!("[alert] {}", advisory);
        }
    }));

    for (index, named) in config.places.iter().enumerate() {
        session.add_place(EntityId(index as u32 + 1), &named.name, named.place.clone());
    }

    session.start();
    for frame in 0..FRAMES {
        let summary = session.tick();
        tracing::debug!("frame {}: {:?}", frame, summary);
    }
    session.stop();

    if let (Some(coords), Some(offset)) = (session.current_coords(), session.local_offset()) {
        tracing::info!(
            "camera at {:.6}, {:.6} -> x={:.2} z={:.2}, heading {:.1}",
            coords.latitude,
            coords.longitude,
            offset.x,
            offset.z,
            session.heading()
        );
    }

    println!("{}", render_reports(&placement_reports(&session), format)?);
    Ok(())
}
