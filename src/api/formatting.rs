//! Human-readable and JSON output for placed entities

use crate::scene::SceneSink;
use crate::session::ArSession;
use serde::{Deserialize, Serialize};
use std::fmt;

/// Output format for placement reports
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum OutputFormat {
    Text,
    Json,
}

/// Distance rounded to whole meters, switching to kilometers from 1000 m
pub fn format_distance(meters: f64) -> String {
    let rounded = meters.round();
    if rounded >= 1000.0 {
        format!("{} kilometers", rounded / 1000.0)
    } else {
        format!("{} meters", rounded)
    }
}

/// Snapshot of one placed entity
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlacementReport {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// East-west distance from the camera at the last recompute (meters)
    pub distance_m: f64,
    /// Scene position, `None` before the camera has an origin
    pub local: Option<LocalCoordinates>,
}

#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LocalCoordinates {
    pub x: f64,
    pub y: f64,
    pub z: f64,
}

impl PlacementReport {
    /// Debug label, e.g. `"fountain: 120 meters far"`
    pub fn label(&self) -> String {
        format!("{}: {} far", self.name, format_distance(self.distance_m))
    }
}

impl fmt::Display for PlacementReport {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} ({:.6}, {:.6})",
            self.label(),
            self.latitude,
            self.longitude
        )?;
        if let Some(local) = &self.local {
            write!(f, " at x={:.2} y={:.2} z={:.2}", local.x, local.y, local.z)?;
        }
        Ok(())
    }
}

/// Collect a report for every place in the session
pub fn placement_reports<S: SceneSink>(session: &ArSession<S>) -> Vec<PlacementReport> {
    session
        .places()
        .iter()
        .map(|placed| {
            let place = placed.tracker.place();
            let local = placed.tracker.local_offset().and_then(|_| {
                session.scene().transform(placed.entity).map(|t| LocalCoordinates {
                    x: t.position.x,
                    y: t.position.y,
                    z: t.position.z,
                })
            });

            PlacementReport {
                name: placed.name.clone(),
                latitude: place.latitude,
                longitude: place.longitude,
                distance_m: placed.tracker.debug_distance(),
                local,
            }
        })
        .collect()
}

/// Render reports in the requested format
pub fn render_reports(reports: &[PlacementReport], format: OutputFormat) -> serde_json::Result<String> {
    match format {
        OutputFormat::Text => Ok(reports
            .iter()
            .map(|r| r.to_string())
            .collect::<Vec<_>>()
            .join("\n")),
        OutputFormat::Json => serde_json::to_string_pretty(reports),
    }
}
