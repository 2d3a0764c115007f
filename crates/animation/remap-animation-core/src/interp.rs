//! Authoring-time curve helpers used to measure how far a keyframe sits from
//! the curve its neighbours would produce without it:
//! - lerp_f64 (linear)
//! - catmull_rom (uniform Catmull-Rom)

/// Linear interpolation of scalars.
#[inline]
pub fn lerp_f64(a: f64, b: f64, t: f64) -> f64 {
    a + (b - a) * t
}

/// Uniform Catmull-Rom between `p1` and `p2`, with `p0`/`p3` as the outer
/// control points.
#[inline]
pub fn catmull_rom(p0: f64, p1: f64, p2: f64, p3: f64, t: f64) -> f64 {
    let t2 = t * t;
    let t3 = t2 * t;
    0.5 * ((2.0 * p1)
        + (-p0 + p2) * t
        + (2.0 * p0 - 5.0 * p1 + 4.0 * p2 - p3) * t2
        + (-p0 + 3.0 * p1 - 3.0 * p2 + p3) * t3)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn catmull_rom_hits_its_end_points() {
        assert_eq!(catmull_rom(0.0, 1.0, 2.0, 3.0, 0.0), 1.0);
        assert_eq!(catmull_rom(0.0, 1.0, 2.0, 3.0, 1.0), 2.0);
        // Evenly spaced control points reduce to a straight line.
        assert!((catmull_rom(0.0, 1.0, 2.0, 3.0, 0.5) - 1.5).abs() < 1e-12);
    }

    #[test]
    fn lerp_extrapolates_past_the_end_points() {
        assert_eq!(lerp_f64(0.0, 2.0, 0.5), 1.0);
        assert_eq!(lerp_f64(10.0, 20.0, 1.5), 25.0);
    }
}
