// Top-down 2D view: one pixel per tile, plus the aiming ray and the edges of
// the commander view cone.

use glam::Vec2;

use super::{FrameBuffer, Rgba, WHITE, rgb};
use crate::{
    engine::cast_ray,
    math::direction_vector,
    world::{MapGrid, ViewSnapshot},
};

const TURRET_LINE: Rgba = WHITE;
const FOV_LINE: Rgba = rgb(255, 255, 0);

/// Render `grid` at one pixel per tile and scale it to `out_w × out_h`.
pub fn draw_minimap(grid: &MapGrid, view: &ViewSnapshot, out_w: usize, out_h: usize) -> FrameBuffer {
    let (w, h) = (grid.width(), grid.height());
    let mut fb = FrameBuffer {
        width: w,
        height: h,
        pixels: grid.tiles().iter().map(|t| t.render_info().minimap).collect(),
    };

    let half = view.active_fov * 0.5;
    for (angle, colour) in [
        (view.commander_angle - half, FOV_LINE),
        (view.commander_angle + half, FOV_LINE),
        (view.turret_angle, TURRET_LINE),
    ] {
        let end = ray_end(grid, view.base, angle);
        fb.draw_line(
            view.base.x.round() as i32,
            view.base.y.round() as i32,
            end.x.round() as i32,
            end.y.round() as i32,
            colour,
        );
    }

    if (out_w, out_h) == (w, h) {
        fb
    } else {
        fb.scaled(out_w, out_h)
    }
}

/// Where a ray from `base` stops: its hit, or the grid diagonal on a miss.
fn ray_end(grid: &MapGrid, base: Vec2, angle: f32) -> Vec2 {
    let hit = cast_ray(angle, grid, base);
    let diagonal = Vec2::new(grid.width() as f32, grid.height() as f32).length();
    let dir = direction_vector(angle);
    base + Vec2::new(dir.x, -dir.y) * hit.distance.min(diagonal)
}
