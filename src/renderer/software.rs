//! ---------------------------------------------------------------------------
//! Software (CPU) column renderer
//!
//! * Rasterises into an internal scratch [`FrameBuffer`] sized to the map
//!   (`mapSize × mapSize`), in **0x00RRGGBB** format.
//! * Draw calls arrive per column in painter's order, so no depth buffer is
//!   kept; the last call to touch a pixel wins.
//! * `end_frame` rescales the scratch surface to the output resolution.
//! ---------------------------------------------------------------------------

use super::{Backdrop, FrameBuffer, LensMask, Renderer, Rgba, SpriteSlice, WallSlice, BLACK};
use crate::world::Sprite;

/*───────────────────────────────────────────────────────────────────────*/
/*                              Backend                                 */
/*───────────────────────────────────────────────────────────────────────*/

pub struct Software {
    scratch: FrameBuffer,
    output: FrameBuffer,
}

impl Software {
    /// Backend presenting `out_w × out_h` frames.
    pub fn new(out_w: usize, out_h: usize) -> Self {
        Self {
            scratch: FrameBuffer::default(),
            output: FrameBuffer::new(out_w, out_h, 0),
        }
    }

    /// Internal surface of the last frame.
    pub fn scratch(&self) -> &FrameBuffer {
        &self.scratch
    }

    /// Scaled surface handed out by the last `end_frame`.
    pub fn output(&self) -> &FrameBuffer {
        &self.output
    }

    /// Clipped, integer row range of a strip.
    fn rows(&self, top: f32, height: f32) -> (usize, usize) {
        let h = self.scratch.height as f32;
        let y0 = top.floor().clamp(0.0, h) as usize;
        let y1 = (top + height).floor().clamp(0.0, h) as usize;
        (y0, y1)
    }
}

impl Default for Software {
    fn default() -> Self {
        Self::new(0, 0)
    }
}

/*──────────────────────── Renderer trait impl ────────────────────────*/
impl Renderer for Software {
    fn begin_frame(&mut self, w: usize, h: usize, backdrop: &Backdrop) {
        if w != self.scratch.width || h != self.scratch.height {
            self.scratch.resize(w, h);
        }

        /* sky above the floor line, ground below */
        let split = backdrop.floor_line.floor().clamp(0.0, h as f32) as usize;
        self.scratch.fill_rect(0, w, 0, split, backdrop.sky);
        self.scratch.fill_rect(0, w, split, h, backdrop.ground);
    }

    fn draw_wall(&mut self, slice: &WallSlice) {
        let (y0, y1) = self.rows(slice.top, slice.height);
        self.scratch
            .fill_rect(slice.x_start, slice.x_end, y0, y1, slice.color);
    }

    fn draw_sprite(&mut self, slice: &SpriteSlice, sprites: &[Sprite]) {
        let Some(texels) = sprites
            .get(slice.sprite)
            .and_then(|s| s.texture_column(slice.texture_column))
        else {
            return;
        };
        if texels.is_empty() || slice.height <= 0.0 {
            return;
        }

        let (y0, y1) = self.rows(slice.top, slice.height);
        let x1 = slice.x_end.min(self.scratch.width);
        let tex_h = texels.len();
        let v_step = tex_h as f32 / slice.height;

        for y in y0..y1 {
            let v = (((y as f32 - slice.top) * v_step).max(0.0) as usize).min(tex_h - 1);
            let texel = texels[v];
            let row = y * self.scratch.width;
            for px in &mut self.scratch.pixels[row + slice.x_start.min(x1)..row + x1] {
                *px = blend(texel, *px);
            }
        }
    }

    fn apply_mask(&mut self, mask: &LensMask) {
        let w = self.scratch.width;
        for (i, px) in self.scratch.pixels.iter_mut().enumerate() {
            if mask.is_opaque(i % w, i / w) {
                *px = BLACK;
            }
        }
    }

    fn end_frame<F>(&mut self, submit: F)
    where
        F: FnOnce(&[Rgba], usize, usize),
    {
        self.scratch.scale_into(&mut self.output);
        submit(&self.output.pixels, self.output.width, self.output.height);
    }
}

/*──────────────────────── helpers ────────────────────────────────────*/

/// Composite an ARGB texel over an opaque pixel.
#[inline]
fn blend(src: Rgba, dst: Rgba) -> Rgba {
    let a = src >> 24;
    match a {
        0 => dst,
        255 => src & 0x00FF_FFFF,
        _ => {
            let mix = |shift: u32| {
                let s = (src >> shift) & 0xFF;
                let d = (dst >> shift) & 0xFF;
                ((s * a + d * (255 - a)) / 255) << shift
            };
            mix(16) | mix(8) | mix(0)
        }
    }
}

/*──────────────────────────────── Tests ───────────────────────────────*/
#[cfg(test)]
mod tests {
    use super::*;
    use crate::{
        renderer::rgb,
        world::SpriteTexture,
    };
    use glam::Vec2;

    const SKY: Rgba = rgb(0, 0, 255);
    const GROUND: Rgba = rgb(0, 255, 0);

    fn backdrop(floor_line: f32) -> Backdrop {
        Backdrop {
            floor_line,
            sky: SKY,
            ground: GROUND,
        }
    }

    fn sprite(rgba: [u8; 4]) -> Sprite {
        // 1 × 2 texture, both texels the same
        let bytes = [rgba, rgba].concat();
        let tex = SpriteTexture::from_rgba8(1, 2, &bytes).unwrap();
        Sprite::new(Vec2::ZERO, 1.0, 1.0).with_texture(tex)
    }

    #[test]
    fn backdrop_splits_at_floor_line() {
        let mut sw = Software::new(4, 4);
        sw.begin_frame(4, 4, &backdrop(2.0));
        let fb = sw.scratch();
        assert_eq!(fb.get(0, 1), Some(SKY));
        assert_eq!(fb.get(3, 2), Some(GROUND));
    }

    #[test]
    fn wall_fills_its_columns() {
        let mut sw = Software::new(8, 8);
        sw.begin_frame(8, 8, &backdrop(4.0));
        sw.draw_wall(&WallSlice {
            x_start: 2,
            x_end: 4,
            top: 1.0,
            height: 3.0,
            color: rgb(9, 9, 9),
        });
        let fb = sw.scratch();
        assert_eq!(fb.get(2, 1), Some(rgb(9, 9, 9)));
        assert_eq!(fb.get(3, 3), Some(rgb(9, 9, 9)));
        assert_eq!(fb.get(3, 4), Some(GROUND));
        assert_eq!(fb.get(4, 2), Some(SKY));
    }

    #[test]
    fn offscreen_wall_is_clipped() {
        let mut sw = Software::new(4, 4);
        sw.begin_frame(4, 4, &backdrop(2.0));
        sw.draw_wall(&WallSlice {
            x_start: 0,
            x_end: 9,
            top: -50.0,
            height: 500.0,
            color: 1,
        });
        assert!(sw.scratch().pixels.iter().all(|&p| p == 1));
    }

    #[test]
    fn sprite_alpha_rules() {
        let sprites = [
            sprite([200, 100, 50, 255]),
            sprite([200, 100, 50, 0]),
            sprite([255, 255, 255, 128]),
        ];
        let mut sw = Software::new(3, 2);
        sw.begin_frame(3, 2, &backdrop(0.0));
        for i in 0..3 {
            sw.draw_sprite(
                &SpriteSlice {
                    x_start: i,
                    x_end: i + 1,
                    top: 0.0,
                    height: 2.0,
                    sprite: i,
                    texture_column: 0,
                },
                &sprites,
            );
        }
        let fb = sw.scratch();
        assert_eq!(fb.get(0, 0), Some(rgb(200, 100, 50)));
        assert_eq!(fb.get(1, 1), Some(GROUND));
        assert_eq!(fb.get(2, 0), Some(rgb(128, 255, 128)));
    }

    #[test]
    fn mask_blacks_out_and_output_is_scaled() {
        let mut sw = Software::new(20, 10);
        sw.begin_frame(9, 9, &backdrop(9.0));
        sw.apply_mask(&LensMask::new(9, 9));
        let mut seen = None;
        sw.end_frame(|px, w, h| seen = Some((px.len(), w, h, px[0])));
        assert_eq!(seen, Some((200, 20, 10, BLACK)));
        // lens centre stays sky
        assert_eq!(sw.scratch().get(3, 4), Some(SKY));
    }
}
