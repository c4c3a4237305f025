//! Grid raycaster.
//!
//! Two independent steppers walk the ray from the origin:
//!
//! ```text
//! vertical   : x ± 1,        y ∓ 1 / (cos/sin)   per step
//! horizontal : x ± cos/sin,  y ∓ 1               per step
//! ```
//!
//! Each stops on the first blocking tile or when it leaves the grid. The
//! nearer stopper that is still inside the grid is the hit. Steppers move in
//! grid space along `(cos θ, −sin θ)`, so 90° heads toward row 0.

use glam::Vec2;

use super::types::{RayHit, Side};
use crate::{
    math::{direction_vector, distance, normalize_angle},
    world::{MapGrid, ViewSnapshot},
};

/// Stand-in for `cos / sin` when the ray is exactly horizontal.
const FLAT_RATIO: f32 = 100_000.0;

/// Which boundary family a stepper crosses.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
enum Axis {
    Vertical,
    Horizontal,
}

/// Where one stepper stopped.
#[derive(Copy, Clone, Debug)]
struct Stop {
    pos: Vec2,
    distance: f32,
    inside: bool,
}

/// Walk from `start` by `step` while the tile underneath is passable.
#[inline]
fn walk(grid: &MapGrid, start: Vec2, step: Vec2) -> Vec2 {
    let mut p = start;
    while let Some(tile) = grid.sample(p) {
        if tile.is_blocking() {
            break;
        }
        p += step;
    }
    p
}

/// Texture side for the winning stepper.
///
/// Boundary angles fall through exactly as the comparisons below say:
/// 90° and 270° on a vertical hit report `West`, 180° on a horizontal hit
/// reports `South`.
fn side_for(axis: Axis, angle: f32) -> Side {
    if angle < 180.0 {
        match axis {
            Axis::Horizontal => Side::North,
            Axis::Vertical if angle < 90.0 => Side::East,
            Axis::Vertical => Side::West,
        }
    } else {
        match axis {
            Axis::Horizontal => Side::South,
            Axis::Vertical if angle > 270.0 => Side::East,
            Axis::Vertical => Side::West,
        }
    }
}

/// Cast one ray at `angle` degrees from `origin`.
pub fn cast_ray(angle: f32, grid: &MapGrid, origin: Vec2) -> RayHit {
    let angle = normalize_angle(angle);
    let dir = direction_vector(angle);
    let x_to_y = if dir.y != 0.0 { dir.x / dir.y } else { FLAT_RATIO };

    /*----------- 1. vertical-boundary stepper ---------------------------*/
    let v_step = if angle > 90.0 && angle < 270.0 {
        Vec2::new(-1.0, 1.0 / x_to_y)
    } else {
        Vec2::new(1.0, -1.0 / x_to_y)
    };
    let v_pos = walk(grid, origin, v_step);

    /*----------- 2. horizontal-boundary stepper -------------------------*/
    let h_step = if angle > 180.0 {
        Vec2::new(-x_to_y, 1.0)
    } else {
        Vec2::new(x_to_y, -1.0)
    };
    let h_pos = walk(grid, origin, h_step);

    let stop = |pos: Vec2| Stop {
        pos,
        distance: distance(origin, pos),
        inside: grid.contains(pos),
    };
    let v = stop(v_pos);
    let h = stop(h_pos);

    /*----------- 3. nearest stopper still inside the grid wins -----------*/
    let (axis, won) = match (v.inside, h.inside) {
        (true, true) if v.distance < h.distance => (Axis::Vertical, v),
        (true, true) => (Axis::Horizontal, h),
        (true, false) => (Axis::Vertical, v),
        (false, true) => (Axis::Horizontal, h),
        (false, false) => {
            // miss: report the boundary the nearer stepper reached
            let (axis, out) = if v.distance < h.distance {
                (Axis::Vertical, v)
            } else {
                (Axis::Horizontal, h)
            };
            return RayHit {
                distance: RayHit::NO_HIT,
                hit_point: out.pos,
                tile: None,
                side: side_for(axis, angle),
                angle,
            };
        }
    };

    RayHit {
        distance: won.distance,
        hit_point: won.pos,
        tile: grid.sample(won.pos),
        side: side_for(axis, angle),
        angle,
    }
}

/// Angle of ray `i` in an `n`-ray fan.
///
/// Angles grow counter-clockwise, so the leftmost column looks furthest
/// counter-clockwise: ray `i` sits at `center + fov/2 − fov·(i+1)/n` and the
/// fan sweeps clockwise across the screen, over `[center − fov/2, center + fov/2)`.
#[inline]
pub fn fan_angle(center: f32, fov: f32, i: usize, n: usize) -> f32 {
    normalize_angle(center + fov * 0.5 - fov * (i + 1) as f32 / n as f32)
}

/// Cast `ray_count` rays across `fov` degrees centred on `center`.
/// Element 0 is the leftmost screen column; angles decrease to the right.
pub fn cast_fan(center: f32, fov: f32, ray_count: usize, grid: &MapGrid, origin: Vec2) -> Vec<RayHit> {
    let mut out = Vec::with_capacity(ray_count);
    cast_fan_into(center, fov, ray_count, grid, origin, &mut out);
    out
}

/// [`cast_fan`] into a reused buffer.
pub fn cast_fan_into(
    center: f32,
    fov: f32,
    ray_count: usize,
    grid: &MapGrid,
    origin: Vec2,
    out: &mut Vec<RayHit>,
) {
    out.clear();
    out.extend((0..ray_count).map(|i| cast_ray(fan_angle(center, fov, i, ray_count), grid, origin)));
}

/// Single aiming ray along the turret.
pub fn cast_turret(view: &ViewSnapshot, grid: &MapGrid) -> RayHit {
    cast_ray(view.turret_angle, grid, view.base)
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        config::ViewConfig,
        world::{Player, TileKind},
    };

    const ORIGIN: Vec2 = Vec2::new(6.0, 6.0);

    fn open_field() -> MapGrid {
        MapGrid::new(11, 11, TileKind::Empty).unwrap()
    }

    fn with_wall(x: usize, y: usize) -> MapGrid {
        let mut g = open_field();
        g.set(x, y, TileKind::Wall).unwrap();
        g
    }

    /*------------------------------------------------------------------*/
    /* 1. Boundary angles                                                */
    /*------------------------------------------------------------------*/
    #[test]
    fn east_at_0_deg_samples_row_above() {
        // y drifts by -1/FLAT_RATIO per step, so the row below the origin
        // row is sampled
        let hit = cast_ray(0.0, &with_wall(9, 5), ORIGIN);
        assert!(hit.is_hit());
        assert_eq!(hit.tile, Some(TileKind::Wall));
        assert!((hit.distance - 3.0).abs() < 1e-3, "{}", hit.distance);
        assert_eq!(hit.side, Side::East);
        assert_eq!(hit.angle, 0.0);
    }

    #[test]
    fn north_at_90_deg() {
        let hit = cast_ray(90.0, &with_wall(6, 2), ORIGIN);
        assert_eq!(hit.tile, Some(TileKind::Wall));
        assert!((hit.distance - 4.0).abs() < 1e-3);
        assert_eq!(hit.side, Side::North);
    }

    #[test]
    fn west_at_180_deg() {
        let hit = cast_ray(180.0, &with_wall(3, 6), ORIGIN);
        assert_eq!(hit.tile, Some(TileKind::Wall));
        assert!((hit.distance - 3.0).abs() < 1e-3);
        assert_eq!(hit.side, Side::West);
    }

    #[test]
    fn south_at_270_deg() {
        let hit = cast_ray(270.0, &with_wall(6, 9), ORIGIN);
        assert_eq!(hit.tile, Some(TileKind::Wall));
        assert!((hit.distance - 3.0).abs() < 1e-3);
        assert_eq!(hit.side, Side::South);
    }

    #[test]
    fn side_table_at_exact_boundaries() {
        assert_eq!(side_for(Axis::Vertical, 0.0), Side::East);
        assert_eq!(side_for(Axis::Vertical, 90.0), Side::West);
        assert_eq!(side_for(Axis::Vertical, 180.0), Side::West);
        assert_eq!(side_for(Axis::Vertical, 270.0), Side::West);
        assert_eq!(side_for(Axis::Vertical, 300.0), Side::East);
        assert_eq!(side_for(Axis::Horizontal, 179.9), Side::North);
        assert_eq!(side_for(Axis::Horizontal, 180.0), Side::South);
    }

    /*------------------------------------------------------------------*/
    /* 2. Distances and misses                                           */
    /*------------------------------------------------------------------*/
    #[test]
    fn diagonal_hit_matches_analytic_distance() {
        // 30° heads up-right; the vertical stepper is the first to enter
        // column 9, at y = 6 - 3·tan 30°
        let y = 6.0 - 3.0 * 30f32.to_radians().tan();
        let mut g = open_field();
        for row in 0..11 {
            g.set(9, row, TileKind::Wall).unwrap();
        }
        let hit = cast_ray(30.0, &g, ORIGIN);
        let analytic = Vec2::new(3.0, 6.0 - y).length();
        assert_eq!(hit.tile, Some(TileKind::Wall));
        assert!((hit.distance - analytic).abs() < 1e-3, "{} vs {analytic}", hit.distance);
        assert!((hit.hit_point - Vec2::new(9.0, y)).length() < 1e-3);
    }

    #[test]
    fn open_field_never_hits() {
        let g = open_field();
        for a in [0.0, 17.0, 90.0, 133.0, 180.0, 250.0, 270.0, 359.0] {
            let hit = cast_ray(a, &g, ORIGIN);
            assert!(!hit.is_hit(), "angle {a}");
            assert_eq!(hit.distance, RayHit::NO_HIT);
            assert!(!g.contains(hit.hit_point));
        }
    }

    #[test]
    fn spawn_tiles_do_not_block() {
        let mut g = MapGrid::new(5, 5, TileKind::Empty).unwrap();
        for y in 1..4 {
            for x in 1..4 {
                g.set(x, y, TileKind::PlayerSpawn).unwrap();
            }
        }
        let hit = cast_ray(0.0, &g, g.center());
        assert!(!hit.is_hit());
        assert_eq!(hit.tile, None);
        assert_eq!(hit.distance, RayHit::NO_HIT);
    }

    #[test]
    fn trees_block() {
        let mut g = open_field();
        g.set(6, 4, TileKind::Tree).unwrap();
        let hit = cast_ray(90.0, &g, ORIGIN);
        assert_eq!(hit.tile, Some(TileKind::Tree));
        assert!((hit.distance - 2.0).abs() < 1e-3);
    }

    #[test]
    fn nearer_wall_wins() {
        let mut g = with_wall(6, 2);
        g.set(6, 4, TileKind::Wall).unwrap();
        assert!((cast_ray(90.0, &g, ORIGIN).distance - 2.0).abs() < 1e-3);
    }

    #[test]
    fn angle_is_normalised() {
        let hit = cast_ray(-270.0, &with_wall(6, 2), ORIGIN);
        assert!((hit.angle - 90.0).abs() < 1e-4);
        assert_eq!(hit.tile, Some(TileKind::Wall));
    }

    /*------------------------------------------------------------------*/
    /* 3. Fans                                                           */
    /*------------------------------------------------------------------*/
    #[test]
    fn fan_sweeps_clockwise_from_the_left_edge() {
        let g = open_field();
        let fan = cast_fan(90.0, 45.0, 9, &g, ORIGIN);
        assert_eq!(fan.len(), 9);
        // leftmost column looks furthest counter-clockwise
        assert!((fan[0].angle - 107.5).abs() < 1e-4);
        for pair in fan.windows(2) {
            assert!(pair[1].angle < pair[0].angle);
        }
        assert!((fan.last().unwrap().angle - 67.5).abs() < 1e-4);
    }

    #[test]
    fn fan_wraps_through_zero() {
        let g = open_field();
        let fan = cast_fan(0.0, 40.0, 8, &g, ORIGIN);
        assert!((fan[0].angle - 15.0).abs() < 1e-4);
        assert!((fan[7].angle - 340.0).abs() < 1e-4);
        let steps: Vec<f32> = fan
            .windows(2)
            .map(|p| crate::math::angle_delta(p[1].angle, p[0].angle))
            .collect();
        for s in steps {
            assert!((s - 5.0).abs() < 1e-3);
        }
    }

    #[test]
    fn turret_ray_follows_turret() {
        let g = with_wall(6, 2);
        let mut player = Player::new(ORIGIN, 11, ViewConfig::default());
        player.turn_turret(0.1, 15.0); // 60°/s · 0.1 s · 15 = 90°
        let hit = cast_turret(&player.snapshot(), &g);
        assert_eq!(hit.tile, Some(TileKind::Wall));
        assert!((hit.distance - 4.0).abs() < 1e-3);
    }
}
