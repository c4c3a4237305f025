//! Frame projection: turns one view snapshot into per-column draw calls.
//!
//! ```text
//!  ViewSnapshot ─► cast_fan ─► RayHit[i] ─┬─► wall strip  (Projection)
//!                                          └─► sprite strip (project_columns)
//!                         depth order per column ─► FramePlan ─► Renderer
//! ```

use smallvec::{SmallVec, smallvec};

use super::{
    projection::Projection,
    raycast::cast_fan_into,
    sprites::{SpriteColumn, project_columns},
    types::{RayHit, Screen},
};
use crate::{
    config::RenderConfig,
    renderer::{Backdrop, DrawCall, Rgba, SpriteSlice, WHITE, WallSlice, rgb},
    world::{MapGrid, Sprite, ViewMode, ViewSnapshot},
};

/// Texture coordinate band boundaries for the procedural tile texture.
const BAND_LO: f32 = 0.2;
const BAND_HI: f32 = 0.8;

/// Everything a back-end needs to rasterise one frame.
#[derive(Clone, Debug)]
pub struct FramePlan {
    pub screen: Screen,
    pub backdrop: Backdrop,
    /// Draw calls per ray, far first.
    pub columns: Vec<SmallVec<[DrawCall; 2]>>,
    /// Overlay the binocular lens mask.
    pub lens: bool,
}

/// Drives the ray fan and builds a [`FramePlan`].
///
/// Holds only reusable scratch; every input arrives as a parameter.
#[derive(Debug)]
pub struct FrameProjector {
    config: RenderConfig,
    hits: Vec<RayHit>,
}

impl FrameProjector {
    pub fn new(config: RenderConfig) -> Self {
        Self {
            hits: Vec::with_capacity(config.ray_count),
            config,
        }
    }

    #[inline]
    pub fn config(&self) -> &RenderConfig {
        &self.config
    }

    /// Hits of the last projected fan, leftmost column first.
    #[inline]
    pub fn hits(&self) -> &[RayHit] {
        &self.hits
    }

    /// Project the commander fan for `view` onto a `mapSize²` surface.
    pub fn project(&mut self, view: &ViewSnapshot, grid: &MapGrid, sprites: &[Sprite]) -> FramePlan {
        let screen = Screen::new(grid.width(), grid.height(), self.config.ray_count);
        let proj = Projection::new(view, &screen, self.config.epsilon);

        cast_fan_into(
            view.commander_angle,
            view.active_fov,
            self.config.ray_count,
            grid,
            view.base,
            &mut self.hits,
        );
        let sprite_cols = project_columns(view.base, sprites, &self.hits, &proj);

        let columns = self
            .hits
            .iter()
            .zip(&sprite_cols)
            .enumerate()
            .map(|(i, (hit, sprite))| {
                let (x_start, x_end) = screen.columns_of(i);
                column_calls(hit, sprite.as_ref(), &proj, x_start, x_end)
            })
            .collect();

        FramePlan {
            screen,
            backdrop: Backdrop {
                floor_line: proj.floor_line,
                sky: self.config.sky,
                ground: self.config.ground,
            },
            columns,
            lens: view.mode == ViewMode::Shooter,
        }
    }
}

/// Depth-order the wall and sprite strips of one column.
fn column_calls(
    hit: &RayHit,
    sprite: Option<&SpriteColumn>,
    proj: &Projection,
    x_start: usize,
    x_end: usize,
) -> SmallVec<[DrawCall; 2]> {
    let wall = hit.tile.filter(|_| hit.is_hit()).and_then(|tile| {
        let info = tile.render_info();
        if info.height_unit <= 0.0 {
            return None;
        }
        let span = proj.column(hit.distance, info.height_unit, info.baseline);
        Some(DrawCall::Wall(WallSlice {
            x_start,
            x_end,
            top: span.top,
            height: span.height,
            color: wall_color(hit),
        }))
    });

    let strip = sprite.map(|s| {
        (
            s.occludes(hit),
            DrawCall::Sprite(SpriteSlice {
                x_start,
                x_end,
                top: s.span.top,
                height: s.span.height,
                sprite: s.sprite,
                texture_column: s.texture_column,
            }),
        )
    });

    match (wall, strip) {
        (Some(w), Some((true, s))) => smallvec![w, s],
        (Some(w), Some((false, s))) => smallvec![s, w],
        (Some(w), None) => smallvec![w],
        (None, Some((_, s))) => smallvec![s],
        (None, None) => SmallVec::new(),
    }
}

/// Colour of the tile a ray struck.
///
/// Banded kinds use their edge shade near the cell border and their centre
/// shade in between; other kinds fade as `255 / √distance`. A miss is white.
pub fn wall_color(hit: &RayHit) -> Rgba {
    let Some(tile) = hit.tile.filter(|_| hit.is_hit()) else {
        return WHITE;
    };
    match tile.render_info().bands {
        Some([edge, centre]) => {
            let u = hit.side.texture_u(hit.hit_point);
            if !(BAND_LO..=BAND_HI).contains(&u) {
                edge
            } else {
                centre
            }
        }
        None => {
            let v = (255.0 / hit.distance.sqrt()).clamp(0.0, 255.0) as u8;
            rgb(v, v, v)
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
