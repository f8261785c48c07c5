//! Signal processing modules

pub mod smoothing;

pub use smoothing::{circular_blend, linear_blend, Smoother};
