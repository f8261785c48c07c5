//! Deflicker filters for jittery sensor channels
//!
//! Two blends are provided: a fixed-bias linear blend for positions, and an
//! adaptive circular blend for angles that wrap at 360 degrees. The adaptive
//! bias approaches 1 for jumps that are large relative to the smoothing
//! factor and approaches 0 for small changes.

use std::f64::consts::FRAC_PI_2;

/// `new * bias + old * (1 - bias)`; passes `new` through on the first sample
/// or when `bias` is zero.
pub fn linear_blend(new_value: f64, old_value: Option<f64>, bias: f64) -> f64 {
    match old_value {
        Some(old) if bias != 0.0 => new_value * bias + old * (1.0 - bias),
        _ => new_value,
    }
}

/// Adaptive blend for wrapping angles (degrees). Result lies in `[0, 360)`.
///
/// A zero `smoothing_factor` disables the filter.
pub fn circular_blend(new_value: f64, old_value: Option<f64>, smoothing_factor: f64) -> f64 {
    let Some(mut old) = old_value else {
        return wrap_degrees(new_value);
    };
    if smoothing_factor == 0.0 {
        return wrap_degrees(new_value);
    }

    let mut new = new_value;
    let difference = new - old;
    if difference > 180.0 {
        old += 360.0;
    }
    if difference < -180.0 {
        new += 360.0;
    }

    let bias = ((new - old) / smoothing_factor).abs().atan() / FRAC_PI_2;
    wrap_degrees(new * bias + old * (1.0 - bias))
}

fn wrap_degrees(value: f64) -> f64 {
    let wrapped = value.rem_euclid(360.0);
    // rem_euclid can round up to the modulus for tiny negative inputs
    if wrapped >= 360.0 {
        0.0
    } else {
        wrapped
    }
}

/// Smoothing policy shared by a camera and the places attached to it.
///
/// Carries the configured smoothing factor; a factor of zero disables every
/// blend so values pass straight through.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Smoother {
    pub factor: f64,
}

impl Smoother {
    pub fn new(factor: f64) -> Self {
        Self { factor }
    }

    pub fn is_enabled(&self) -> bool {
        self.factor != 0.0
    }

    /// Linear blend with a fixed bias, gated on the smoothing factor
    pub fn linear(&self, new_value: f64, old_value: Option<f64>, bias: f64) -> f64 {
        if !self.is_enabled() {
            return new_value;
        }
        linear_blend(new_value, old_value, bias)
    }

    /// Circular blend using the smoothing factor
    pub fn circular(&self, new_value: f64, old_value: Option<f64>) -> f64 {
        circular_blend(new_value, old_value, self.factor)
    }
}
