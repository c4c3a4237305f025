// Billboard sprites and their column-sliced textures.
// Textures are decoded once at load time; the projector only ever asks for
// one 1-pixel-wide strip at a time.

use std::path::Path;

use glam::Vec2;

use crate::renderer::Rgba;

/// Things that can go wrong while building a sprite texture.
#[derive(Debug, thiserror::Error)]
pub enum TextureError {
    #[error("image decode failed: {0}")]
    Image(#[from] image::ImageError),

    /// Pixel buffer length does not match `width × height × 4`.
    #[error("{len} bytes cannot hold a {width}x{height} RGBA image")]
    BadDimensions {
        width: usize,
        height: usize,
        len: usize,
    },
}

/// RGBA texture stored as vertical strips (`columns[x][y]`), **0xAARRGGBB**.
#[derive(Clone, Debug, PartialEq)]
pub struct SpriteTexture {
    pub w: usize,
    pub h: usize,
    columns: Vec<Vec<Rgba>>,
}

impl SpriteTexture {
    /// Slice a tightly packed, row-major RGBA8 buffer into columns.
    pub fn from_rgba8(width: usize, height: usize, bytes: &[u8]) -> Result<Self, TextureError> {
        if bytes.len() != width * height * 4 {
            return Err(TextureError::BadDimensions {
                width,
                height,
                len: bytes.len(),
            });
        }
        let columns = (0..width)
            .map(|x| {
                (0..height)
                    .map(|y| {
                        let i = (y * width + x) * 4;
                        let [r, g, b, a] = [bytes[i], bytes[i + 1], bytes[i + 2], bytes[i + 3]];
                        u32::from_be_bytes([a, r, g, b])
                    })
                    .collect()
            })
            .collect();
        Ok(Self {
            w: width,
            h: height,
            columns,
        })
    }

    /// Decode any image format the `image` crate was built with.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, TextureError> {
        let img = image::open(path)?.to_rgba8();
        let (w, h) = img.dimensions();
        Self::from_rgba8(w as usize, h as usize, img.as_raw())
    }

    /// Strip `x`, top to bottom.
    #[inline]
    pub fn column(&self, x: usize) -> Option<&[Rgba]> {
        self.columns.get(x).map(Vec::as_slice)
    }
}

/// A billboard placed on the map.
#[derive(Clone, Debug)]
pub struct Sprite {
    pub pos: Vec2,
    /// Projected height multiplier (world units).
    pub height_units: f32,
    /// Footprint width used for the angular extent (world units).
    pub width_units: f32,
    texture: Option<SpriteTexture>,
}

impl Sprite {
    /// Untextured sprite: it keeps its map position but draws nothing.
    pub fn new(pos: Vec2, height_units: f32, width_units: f32) -> Self {
        Self {
            pos,
            height_units,
            width_units,
            texture: None,
        }
    }

    pub fn with_texture(mut self, texture: SpriteTexture) -> Self {
        self.texture = Some(texture);
        self
    }

    /// Load the texture at `path`; failure is logged and leaves the sprite
    /// invisible rather than aborting the session.
    pub fn load<P: AsRef<Path>>(pos: Vec2, height_units: f32, width_units: f32, path: P) -> Self {
        let path = path.as_ref();
        let sprite = Self::new(pos, height_units, width_units);
        match SpriteTexture::from_file(path) {
            Ok(tex) => {
                log::info!("sprite texture {} ({}x{})", path.display(), tex.w, tex.h);
                sprite.with_texture(tex)
            }
            Err(e) => {
                log::warn!("sprite at {pos} has no texture ({}): {e}", path.display());
                sprite
            }
        }
    }

    /// True when there is at least one column to draw.
    #[inline]
    pub fn is_visible(&self) -> bool {
        self.texture.as_ref().is_some_and(|t| t.w > 0 && t.h > 0)
    }

    /// Number of texture strips (zero when untextured).
    #[inline]
    pub fn texture_width(&self) -> usize {
        self.texture.as_ref().map_or(0, |t| t.w)
    }

    #[inline]
    pub fn texture_column(&self, x: usize) -> Option<&[Rgba]> {
        self.texture.as_ref().and_then(|t| t.column(x))
    }
}

impl Default for Sprite {
    /// Height 1, width 10 at the origin, untextured.
    fn default() -> Self {
        Self::new(Vec2::ZERO, 1.0, 10.0)
    }
}

/*======================================================================*/
/*                               Tests                                  */
/*======================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn two_by_two() -> Vec<u8> {
        // row 0: red, green   row 1: blue, transparent white
        vec![
            255, 0, 0, 255, 0, 255, 0, 255, //
            0, 0, 255, 255, 255, 255, 255, 0,
        ]
    }

    #[test]
    fn rgba_is_sliced_into_columns() {
        let tex = SpriteTexture::from_rgba8(2, 2, &two_by_two()).unwrap();
        assert_eq!(tex.column(0), Some(&[0xFF_FF0000, 0xFF_0000FF][..]));
        assert_eq!(tex.column(1), Some(&[0xFF_00FF00, 0x00_FFFFFF][..]));
        assert_eq!(tex.column(2), None);
    }

    #[test]
    fn short_buffer_rejected() {
        let err = SpriteTexture::from_rgba8(2, 2, &[0; 15]).unwrap_err();
        assert!(matches!(err, TextureError::BadDimensions { len: 15, .. }));
    }

    #[test]
    fn missing_file_leaves_sprite_invisible() {
        let s = Sprite::load(Vec2::new(3.0, 4.0), 1.0, 10.0, "/definitely/not/here.png");
        assert!(!s.is_visible());
        assert_eq!(s.texture_width(), 0);
        assert_eq!(s.pos, Vec2::new(3.0, 4.0));
    }

    #[test]
    fn png_round_trip_through_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("tank.png");
        image::RgbaImage::from_raw(2, 2, two_by_two())
            .unwrap()
            .save(&path)
            .unwrap();

        let s = Sprite::load(Vec2::ZERO, 1.0, 10.0, &path);
        assert!(s.is_visible());
        assert_eq!(s.texture_width(), 2);
        assert_eq!(s.texture_column(1).unwrap()[0], 0xFF_00FF00);
    }
}
