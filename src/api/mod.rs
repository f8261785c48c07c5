//! Reporting interfaces for hosts and debug overlays

pub mod formatting;

pub use formatting::{
    format_distance, placement_reports, render_reports, LocalCoordinates, OutputFormat,
    PlacementReport,
};
