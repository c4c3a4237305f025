//! Render session: owns the map, the sprites, the player's tank and the
//! frame pipeline, and exposes the per-tick input mutators.
//!
//! Each call to [`Session::render_frame`] takes a fresh [`ViewSnapshot`] of
//! the player, so no render stage ever sees a half-updated viewpoint.

use crate::{
    config::{RenderConfig, ViewConfig},
    engine::{FrameProjector, RayHit, cast_turret},
    renderer::{FrameBuffer, LensMask, Rgba, RendererExt, Software, draw_minimap},
    world::{MapGrid, Player, Sprite, ViewMode, ViewSnapshot},
};

pub struct Session {
    grid: MapGrid,
    sprites: Vec<Sprite>,
    player: Player,
    projector: FrameProjector,
    renderer: Software,
    lens: LensMask,
}

impl Session {
    /// Place the tank on the grid centre and size the pipeline to the map.
    pub fn new(grid: MapGrid, sprites: Vec<Sprite>, view: ViewConfig, render: RenderConfig) -> Self {
        let player = Player::new(grid.center(), grid.width(), view);
        let snap = player.snapshot();
        log::debug!(
            "session: map {}x{}, base {}, {} rays, screen distance {:.2}, {} sprites",
            grid.width(),
            grid.height(),
            snap.base,
            render.ray_count,
            snap.screen_distance(grid.width()),
            sprites.len(),
        );
        Self {
            lens: LensMask::new(grid.width(), grid.height()),
            renderer: Software::new(render.screen_width, render.screen_height),
            projector: FrameProjector::new(render),
            player,
            sprites,
            grid,
        }
    }

    #[inline]
    pub fn grid(&self) -> &MapGrid {
        &self.grid
    }

    #[inline]
    pub fn sprites(&self) -> &[Sprite] {
        &self.sprites
    }

    #[inline]
    pub fn player(&self) -> &Player {
        &self.player
    }

    #[inline]
    pub fn view(&self) -> ViewSnapshot {
        self.player.snapshot()
    }

    /* ---------------------------------------------------------------- */
    /* input mutators                                                    */
    /* ---------------------------------------------------------------- */

    pub fn turn_turret(&mut self, dt: f32, dir: f32) {
        self.player.turn_turret(dt, dir);
    }

    pub fn turn_commander_view(&mut self, dt: f32, dir: f32) {
        self.player.turn_commander_view(dt, dir);
    }

    pub fn raise_commander_view(&mut self, dt: f32, dir: f32) {
        self.player.raise_commander_view(dt, dir);
    }

    pub fn set_view(&mut self, mode: ViewMode) {
        self.player.set_view(mode);
    }

    /* ---------------------------------------------------------------- */
    /* rendering                                                         */
    /* ---------------------------------------------------------------- */

    /// Render the current view and loan the output buffer to `submit`.
    pub fn present<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        let snap = self.player.snapshot();
        let plan = self.projector.project(&snap, &self.grid, &self.sprites);
        self.renderer
            .draw_frame(&plan, &self.sprites, Some(&self.lens), submit);
    }

    /// Render the current view at the configured output size.
    pub fn render_frame(&mut self) -> &FrameBuffer {
        self.present(|_, _, _| {});
        self.renderer.output()
    }

    /// Top-down map with the aiming and view-cone rays.
    pub fn render_minimap(&self) -> FrameBuffer {
        let cfg = self.projector.config();
        draw_minimap(&self.grid, &self.player.snapshot(), cfg.screen_width, cfg.screen_height)
    }

    /// What the turret is currently aimed at.
    pub fn turret_hit(&self) -> RayHit {
        cast_turret(&self.player.snapshot(), &self.grid)
    }
}

/// One-shot render of `view` over `grid`, scaled to the configured output.
pub fn render(view: &ViewSnapshot, grid: &MapGrid, sprites: &[Sprite], config: RenderConfig) -> FrameBuffer {
    let mut projector = FrameProjector::new(config);
    let mut renderer = Software::new(config.screen_width, config.screen_height);
    let lens = LensMask::new(grid.width(), grid.height());
    let plan = projector.project(view, grid, sprites);
    renderer.draw_frame(&plan, sprites, Some(&lens), |_, _, _| {});
    renderer.output().clone()
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
