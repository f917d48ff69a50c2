use crate::error::{Result, WheelError};
use std::f64::consts::{PI, TAU};

/// Angle of the fixed pointer: the top of the wheel in screen space
pub const POINTER_ANGLE: f64 = -PI / 2.0;

/// 2D point in pixel space
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Point {
    pub x: f64,
    pub y: f64,
}

impl Point {
    pub const ZERO: Point = Point { x: 0.0, y: 0.0 };

    pub fn new(x: f64, y: f64) -> Self {
        Point { x, y }
    }

    /// Point at `radius` along `angle` from `self`
    pub fn polar(&self, angle: f64, radius: f64) -> Point {
        let (sin, cos) = angle.sin_cos();
        Point::new(self.x + cos * radius, self.y + sin * radius)
    }
}

/// Angular width of one sector on a wheel of `n` sectors
pub fn sector_width(n: usize) -> Result<f64> {
    if n == 0 {
        return Err(WheelError::NoSectors);
    }
    Ok(TAU / n as f64)
}

/// Wraps an angle into `[0, 2π)`
pub fn normalize_angle(angle: f64) -> f64 {
    angle.rem_euclid(TAU)
}

/// Index of the sector whose unrotated span `[i·w, (i+1)·w)` sits under
/// `pointer_angle` when the wheel is rotated by `current_angle`.
///
/// `rem_euclid` can round up to exactly 2π for tiny negative inputs; the
/// final `% n` folds that back onto sector 0.
pub fn resolve_sector(
    current_angle: f64,
    pointer_angle: f64,
    sector_width: f64,
    n: usize,
) -> usize {
    let adjusted = normalize_angle(pointer_angle - current_angle);
    (adjusted / sector_width).floor() as usize % n
}

/// Fast-then-slow deceleration curve
pub fn ease_out_cubic(t: f64) -> f64 {
    1.0 - (1.0 - t).powi(3)
}

/// Single damped hump used after the spin stops: zero at both ends
pub fn bounce_offset(p: f64, overshoot: f64) -> f64 {
    (p * PI).sin() * overshoot * (1.0 - p)
}

/// Edge function used in rasterization
pub fn edge_function(a: &Point, b: &Point, c: &Point) -> f64 {
    (c.x - a.x) * (b.y - a.y) - (c.y - a.y) * (b.x - a.x)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sector_width_rejects_empty_wheel() {
        assert!(matches!(sector_width(0), Err(WheelError::NoSectors)));
        assert!((sector_width(4).unwrap() - PI / 2.0).abs() < 1e-12);
    }

    #[test]
    fn resolve_sector_stays_in_range() {
        for n in 1..=12 {
            let w = sector_width(n).unwrap();
            let mut angle = -50.0;
            while angle < 50.0 {
                let index = resolve_sector(angle, POINTER_ANGLE, w, n);
                assert!(index < n, "n={n} angle={angle} index={index}");
                angle += 0.173;
            }
        }
    }

    #[test]
    fn resolve_sector_is_periodic() {
        let n = 7;
        let w = sector_width(n).unwrap();
        for step in 0..100 {
            // keep away from boundaries so rounding cannot flip a floor
            let angle = (step as f64 + 0.5) * w / 3.0;
            let base = resolve_sector(angle, POINTER_ANGLE, w, n);
            for k in -4..=4 {
                let shifted = angle + TAU * k as f64;
                assert_eq!(resolve_sector(shifted, POINTER_ANGLE, w, n), base);
            }
        }
    }

    #[test]
    fn resolve_sector_spans_are_half_open() {
        let n = 4;
        let w = sector_width(n).unwrap();
        // pointer at 0, wheel unrotated: exact boundary belongs to the upper sector
        assert_eq!(resolve_sector(0.0, 0.0, w, n), 0);
        assert_eq!(resolve_sector(0.0, w, w, n), 1);
        assert_eq!(resolve_sector(0.0, w - 1e-9, w, n), 0);
        // just below a full turn wraps to the last sector
        assert_eq!(resolve_sector(1e-9, 0.0, w, n), 3);
    }

    #[test]
    fn resolve_sector_at_rest_with_top_pointer() {
        // five sectors, pointer at the top: 3π/2 lands 3.75 widths in
        let w = sector_width(5).unwrap();
        assert_eq!(resolve_sector(0.0, POINTER_ANGLE, w, 5), 3);
        assert_eq!(resolve_sector(0.0, POINTER_ANGLE, TAU, 1), 0);
    }

    #[test]
    fn ease_out_cubic_is_monotonic_with_exact_endpoints() {
        assert_eq!(ease_out_cubic(0.0), 0.0);
        assert_eq!(ease_out_cubic(1.0), 1.0);
        let mut previous = 0.0;
        for i in 0..=1000 {
            let value = ease_out_cubic(i as f64 / 1000.0);
            assert!(value >= previous);
            previous = value;
        }
    }

    #[test]
    fn bounce_offset_is_a_single_non_negative_hump() {
        for overshoot in [0.0, 0.02, 0.05, 0.08] {
            assert_eq!(bounce_offset(0.0, overshoot), 0.0);
            assert_eq!(bounce_offset(1.0, overshoot), 0.0);
            for i in 0..=100 {
                assert!(bounce_offset(i as f64 / 100.0, overshoot) >= 0.0);
            }
        }
        assert!(bounce_offset(0.3, 0.05) > bounce_offset(0.9, 0.05));
    }

    #[test]
    fn polar_walks_clockwise_in_screen_space() {
        let p = Point::new(10.0, 10.0).polar(PI / 2.0, 5.0);
        assert!((p.x - 10.0).abs() < 1e-9);
        assert!((p.y - 15.0).abs() < 1e-9);
    }
}
