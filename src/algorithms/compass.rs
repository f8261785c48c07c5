//! Compass heading from raw device orientation angles

use std::f64::consts::PI;

/// Compass heading (degrees clockwise from north, `[0, 360)`) from device
/// orientation `alpha`/`beta`/`gamma` in degrees.
///
/// A device lying flat leaves the rotation components at zero; that case
/// reports north.
pub fn compute_compass_heading(alpha: f64, beta: f64, gamma: f64) -> f64 {
    let (s_a, c_a) = alpha.to_radians().sin_cos();
    let s_b = beta.to_radians().sin();
    let (s_g, c_g) = gamma.to_radians().sin_cos();

    let r_a = -c_a * s_g - s_a * s_b * c_g;
    let r_b = -s_a * s_g + c_a * s_b * c_g;

    if r_a == 0.0 && r_b == 0.0 {
        return 0.0;
    }

    let mut heading = (r_a / r_b).atan();

    // Half circle to full circle; a -0.0 denominator flips atan like a negative one
    if r_b.is_sign_negative() {
        heading += PI;
    } else if r_a < 0.0 {
        heading += 2.0 * PI;
    }

    let degrees = heading.to_degrees();
    if degrees >= 360.0 {
        degrees - 360.0
    } else {
        degrees
    }
}
