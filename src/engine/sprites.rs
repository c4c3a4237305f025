// Billboard sprite projection.
//
// Sprites are resolved per screen column against the ray fan: each sprite
// is reduced to a bearing, a distance and an angular half-width, and a
// column shows the nearest sprite whose angular footprint contains the
// column's ray angle.

use glam::Vec2;

use super::{
    projection::{ColumnSpan, Projection},
    types::RayHit,
};
use crate::{
    math::{angle_delta, distance, normalize_angle},
    world::Sprite,
};

/// Sprite position relative to the viewpoint.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpritePolar {
    /// Index into the sprite list.
    pub index: usize,
    /// Bearing in the raycaster's angle convention, degrees.
    pub bearing: f32,
    pub distance: f32,
    /// Half of the angular footprint, degrees.
    pub half_angle: f32,
}

impl SpritePolar {
    /// Where `angle` falls across the footprint, `0.0` (left) to `1.0`.
    /// `None` when the footprint does not contain `angle`.
    pub fn coverage(&self, angle: f32) -> Option<f32> {
        let width = self.half_angle * 2.0;
        if width.is_nan() || width <= 0.0 {
            return None;
        }
        let left = normalize_angle(self.bearing - self.half_angle);
        let offset = angle_delta(left, angle);
        // open interval, same as the column test at both edges
        (offset > 0.0 && offset < width).then_some(offset / width)
    }
}

/// One sprite strip to blit into a column.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteColumn {
    pub sprite: usize,
    pub texture_column: usize,
    pub distance: f32,
    pub span: ColumnSpan,
}

impl SpriteColumn {
    /// Sprites win only when strictly nearer than the wall; a miss counts
    /// as infinitely far.
    #[inline]
    pub fn occludes(&self, wall: &RayHit) -> bool {
        self.distance < wall.distance
    }
}

/// Bearing from `from` to `to` using the raycaster's convention
/// (0° = +X, 90° = toward row 0).
///
/// Built from `atan(|Δx| / |Δy|)`, the angle off the vertical axis, and
/// folded into the quadrant given by the signs of `Δx` and `Δy`.
pub fn bearing(from: Vec2, to: Vec2) -> f32 {
    let d = to - from;
    let off_vertical = (d.x.abs() / d.y.abs()).atan().to_degrees();
    let angle = match (d.y < 0.0, d.x < 0.0) {
        (true, false) => 90.0 - off_vertical,
        (true, true) => 90.0 + off_vertical,
        (false, true) => 270.0 - off_vertical,
        (false, false) => 270.0 + off_vertical,
    };
    normalize_angle(angle)
}

/// Polar form of every *visible* sprite. Untextured sprites are skipped:
/// they keep their map position but have no footprint.
pub fn polar_sprites(origin: Vec2, sprites: &[Sprite]) -> Vec<SpritePolar> {
    sprites
        .iter()
        .enumerate()
        .filter(|(_, s)| s.is_visible())
        .filter_map(|(index, s)| {
            let dist = distance(origin, s.pos);
            if dist <= 0.0 {
                return None;
            }
            Some(SpritePolar {
                index,
                bearing: bearing(origin, s.pos),
                distance: dist,
                half_angle: ((s.width_units * 0.5) / dist).atan().to_degrees(),
            })
        })
        .collect()
}

/// Nearest sprite covering `angle`, with its footprint fraction.
/// Equal distances keep the earlier sprite.
pub fn nearest_covering(polar: &[SpritePolar], angle: f32) -> Option<(&SpritePolar, f32)> {
    polar
        .iter()
        .filter_map(|p| p.coverage(angle).map(|u| (p, u)))
        .fold(None, |best: Option<(&SpritePolar, f32)>, cand| match best {
            Some(b) if b.0.distance <= cand.0.distance => Some(b),
            _ => Some(cand),
        })
}

/// Resolve sprite strips for every column of the fan.
pub fn project_columns(
    origin: Vec2,
    sprites: &[Sprite],
    hits: &[RayHit],
    proj: &Projection,
) -> Vec<Option<SpriteColumn>> {
    let polar = polar_sprites(origin, sprites);
    hits.iter()
        .map(|hit| {
            let (p, u) = nearest_covering(&polar, hit.angle)?;
            let sprite = &sprites[p.index];
            let tex_w = sprite.texture_width();
            let texture_column = ((u * tex_w as f32).floor() as usize).min(tex_w.saturating_sub(1));
            Some(SpriteColumn {
                sprite: p.index,
                texture_column,
                distance: p.distance,
                span: proj.column(p.distance, sprite.height_units, 1.0),
            })
        })
        .collect()
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
