//! Angle arithmetic shared by the chain geometry and its consumers.
//!
//! Angles are radians measured from the positive x-axis. Image space has y
//! pointing down, so increasing angles sweep clockwise on screen.

use std::f64::consts::{PI, TAU};

mod sweep;
pub use sweep::{OffsetSweep, SweepParams};

/// Radians in a degree.
pub const DEGREE: f64 = PI / 180.0;

/// Wraps an angle into `[0, 2π)`.
pub fn normalize(a: f64) -> f64 {
    let n = a.rem_euclid(TAU);
    // rem_euclid can round up to exactly TAU for tiny negative inputs.
    if n >= TAU {
        0.0
    } else {
        n
    }
}

/// Signed difference `a - b` wrapped into `[-π, π)`.
pub fn wrapped_diff(a: f64, b: f64) -> f64 {
    (a - b + PI).rem_euclid(TAU) - PI
}

/// Length of the shorter arc between two directions, in `[0, π]`.
///
/// Both angles are normalized first, so any multiple of a full turn
/// between them is ignored.
pub fn arc_distance(a: f64, b: f64) -> f64 {
    let d = (normalize(a) - normalize(b)).abs();
    if d > PI {
        TAU - d
    } else {
        d
    }
}

/// Direction of the vector from `(x0, y0)` to `(x1, y1)`.
pub fn heading(x0: f64, y0: f64, x1: f64, y1: f64) -> f64 {
    (y1 - y0).atan2(x1 - x0)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_range() {
        assert_eq!(normalize(0.0), 0.0);
        assert!((normalize(-PI / 2.0) - 3.0 * PI / 2.0).abs() < 1e-12);
        assert!((normalize(5.0 * PI) - PI).abs() < 1e-12);
        assert_eq!(normalize(TAU), 0.0);
        assert!(normalize(-1e-18) < TAU);
    }

    #[test]
    fn wrapped_diff_signs() {
        assert!((wrapped_diff(0.1, 0.0) - 0.1).abs() < 1e-12);
        assert!((wrapped_diff(0.0, 0.1) + 0.1).abs() < 1e-12);
        // across the seam
        assert!((wrapped_diff(0.05, TAU - 0.05) - 0.1).abs() < 1e-12);
        assert!((wrapped_diff(TAU - 0.05, 0.05) + 0.1).abs() < 1e-12);
    }

    #[test]
    fn arc_distance_shorter_way() {
        assert!((arc_distance(0.0, 3.0 * PI / 2.0) - PI / 2.0).abs() < 1e-12);
        assert!((arc_distance(7.0 * TAU + 0.2, -0.2) - 0.4).abs() < 1e-9);
        assert!((arc_distance(0.0, PI) - PI).abs() < 1e-12);
    }

    #[test]
    fn heading_axes() {
        assert_eq!(heading(0.0, 0.0, 5.0, 0.0), 0.0);
        assert!((heading(0.0, 0.0, 0.0, 5.0) - PI / 2.0).abs() < 1e-12);
        assert!((heading(1.0, 1.0, 2.0, 0.0) + PI / 4.0).abs() < 1e-12);
    }
}
