//! Rendering abstraction layer.
//!
//! *The engine never touches a pixel buffer directly.*
//! [`FrameProjector`](crate::engine::FrameProjector) produces, per screen
//! column, a short list of [`DrawCall`]s in painter's order (far first) and
//! hands them to a type that implements [`Renderer`].
//!
//! * Back-ends only rasterise: no raycasting, no depth decisions.
//! * A helper blanket-impl [`RendererExt`] adds `draw_frame` so call-sites
//!   stay short.

mod framebuffer;
mod mask;
mod minimap;
mod software;

pub use framebuffer::FrameBuffer;
pub use mask::LensMask;
pub use minimap::draw_minimap;
pub use software::Software;

use crate::{engine::FramePlan, world::Sprite};

/// Pixel format of the software frame-buffer (0x00RRGGBB).
/// Sprite texels additionally carry alpha in the top byte.
pub type Rgba = u32;

/// Pack an opaque colour.
#[inline]
pub const fn rgb(r: u8, g: u8, b: u8) -> Rgba {
    ((r as u32) << 16) | ((g as u32) << 8) | b as u32
}

pub const WHITE: Rgba = rgb(255, 255, 255);
pub const BLACK: Rgba = rgb(0, 0, 0);

/// Sky above the floor line, ground below it.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Backdrop {
    pub floor_line: f32,
    pub sky: Rgba,
    pub ground: Rgba,
}

/// Solid-colour wall or tree strip. `x_start .. x_end` maps to surface
/// columns (end exclusive).
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct WallSlice {
    pub x_start: usize,
    pub x_end: usize,
    pub top: f32,
    pub height: f32,
    pub color: Rgba,
}

/// One texture strip of a sprite stretched to `height` pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct SpriteSlice {
    pub x_start: usize,
    pub x_end: usize,
    pub top: f32,
    pub height: f32,
    pub sprite: usize,
    pub texture_column: usize,
}

#[derive(Clone, Copy, Debug, PartialEq)]
pub enum DrawCall {
    Wall(WallSlice),
    Sprite(SpriteSlice),
}

/// A renderer that owns an internal scratch surface for the whole frame.
///
/// `end_frame` hands the finished (output-sized) buffer to a user-supplied
/// closure; the minifb viewer forwards it to `update_with_buffer`.
pub trait Renderer {
    /// (Re)allocate scratch for a `width × height` surface and paint the
    /// backdrop.
    fn begin_frame(&mut self, width: usize, height: usize, backdrop: &Backdrop);

    fn draw_wall(&mut self, slice: &WallSlice);

    fn draw_sprite(&mut self, slice: &SpriteSlice, sprites: &[Sprite]);

    /// Black out everything the lens mask covers.
    fn apply_mask(&mut self, mask: &LensMask);

    /// Finish the frame and **loan** the finished buffer to `submit`.
    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize);
}

/// Convenience blanket-impl with a one-liner `draw_frame` adaptor.
pub trait RendererExt: Renderer {
    fn draw_frame<F>(&mut self, plan: &FramePlan, sprites: &[Sprite], mask: Option<&LensMask>, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.begin_frame(plan.screen.w, plan.screen.h, &plan.backdrop);
        for call in plan.columns.iter().flatten() {
            match call {
                DrawCall::Wall(w) => self.draw_wall(w),
                DrawCall::Sprite(s) => self.draw_sprite(s, sprites),
            }
        }
        if plan.lens {
            if let Some(mask) = mask {
                self.apply_mask(mask);
            }
        }
        self.end_frame(submit);
    }
}
impl<T: Renderer + ?Sized> RendererExt for T {}
