//! Angle and distance helpers shared by the raycaster and the projectors.
//!
//! All angles are **degrees** on the trigonometric circle: 0° is +X and
//! 90° points toward row 0 of the grid.

use glam::Vec2;

/// Wrap `angle` into `[0, 360)`.
#[inline]
pub fn normalize_angle(angle: f32) -> f32 {
    let a = angle.rem_euclid(360.0);
    // rem_euclid can round a tiny negative input up to exactly 360
    if a >= 360.0 { 0.0 } else { a }
}

/// Unit vector `(cos θ, sin θ)` for an angle given in degrees.
#[inline]
pub fn direction_vector(angle: f32) -> Vec2 {
    let (s, c) = angle.to_radians().sin_cos();
    Vec2::new(c, s)
}

/// Euclidean distance between two points.
#[inline]
pub fn distance(a: Vec2, b: Vec2) -> f32 {
    a.distance(b)
}

/// Signed difference `to - from` folded into `[0, 360)`.
#[inline]
pub fn angle_delta(from: f32, to: f32) -> f32 {
    normalize_angle(to - from)
}

/// Integer `ceil(n / 2)`.
#[inline]
pub fn half_up(n: usize) -> usize {
    n.div_ceil(2)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn normalize_stays_in_range() {
        for a in [-1080.5, -360.0, -0.25, -1e-7, 0.0, 359.75, 360.0, 721.0, 1e6] {
            let n = normalize_angle(a);
            assert!((0.0..360.0).contains(&n), "{a} -> {n}");
        }
    }

    #[test]
    fn normalize_is_periodic() {
        for a in [0.0_f32, 45.5, 90.0, 181.25, 300.0] {
            for k in -3..=3 {
                let shifted = a + 360.0 * k as f32;
                assert_eq!(normalize_angle(a), normalize_angle(shifted), "a={a} k={k}");
            }
        }
    }

    #[test]
    fn direction_vector_cardinals() {
        let east = direction_vector(0.0);
        assert!((east - Vec2::X).length() < 1e-6);
        let north = direction_vector(90.0);
        assert!((north - Vec2::Y).length() < 1e-6);
        assert!((direction_vector(33.0).length() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn distance_is_euclidean() {
        assert!((distance(Vec2::new(1.0, 1.0), Vec2::new(4.0, 5.0)) - 5.0).abs() < 1e-6);
    }

    #[test]
    fn angle_delta_wraps() {
        assert!((angle_delta(350.0, 10.0) - 20.0).abs() < 1e-4);
        assert!((angle_delta(10.0, 350.0) - 340.0).abs() < 1e-4);
    }

    #[test]
    fn half_up_matches_ceil() {
        assert_eq!(half_up(505), 253);
        assert_eq!(half_up(1010), 505);
        assert_eq!(half_up(5), 3);
    }
}
