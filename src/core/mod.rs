//! Core types and constants for GPS-anchored scene tracking

pub mod types;
pub mod constants;

pub use types::*;
pub use constants::*;
