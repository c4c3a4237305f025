use glam::Vec2;
use thiserror::Error;

use super::tile::TileKind;

/// Things that can go wrong when building or querying a grid.
#[derive(Error, Debug, PartialEq, Eq)]
pub enum GridError {
    /// Programmer error: tile query outside `[0,w) × [0,h)`.
    #[error("tile ({x}, {y}) outside {width}x{height} grid")]
    OutOfBounds {
        x: usize,
        y: usize,
        width: usize,
        height: usize,
    },

    #[error("grid dimensions must be non-zero (got {width}x{height})")]
    EmptyDimensions { width: usize, height: usize },

    #[error("{len} tiles cannot fill a {width}x{height} grid")]
    SizeMismatch {
        len: usize,
        width: usize,
        height: usize,
    },
}

/// Square-ish tile map, row-major (`row = y`, `col = x`).
///
/// Immutable for the lifetime of a render session; only the generator and
/// test code call [`set`](Self::set).
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct MapGrid {
    width: usize,
    height: usize,
    tiles: Vec<TileKind>,
}

impl MapGrid {
    /// Grid of `width × height` cells all set to `fill`.
    pub fn new(width: usize, height: usize, fill: TileKind) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        Ok(Self {
            width,
            height,
            tiles: vec![fill; width * height],
        })
    }

    /// Wrap an already row-major tile vector.
    pub fn from_tiles(width: usize, height: usize, tiles: Vec<TileKind>) -> Result<Self, GridError> {
        if width == 0 || height == 0 {
            return Err(GridError::EmptyDimensions { width, height });
        }
        if tiles.len() != width * height {
            return Err(GridError::SizeMismatch {
                len: tiles.len(),
                width,
                height,
            });
        }
        Ok(Self {
            width,
            height,
            tiles,
        })
    }

    #[inline]
    pub fn width(&self) -> usize {
        self.width
    }

    #[inline]
    pub fn height(&self) -> usize {
        self.height
    }

    /// Row-major tile slice.
    #[inline]
    pub fn tiles(&self) -> &[TileKind] {
        &self.tiles
    }

    /// Iterate rows top to bottom.
    pub fn rows(&self) -> impl Iterator<Item = &[TileKind]> {
        self.tiles.chunks_exact(self.width)
    }

    /// Bounds-checked lookup.
    pub fn get(&self, x: usize, y: usize) -> Result<TileKind, GridError> {
        self.index(x, y).map(|i| self.tiles[i])
    }

    pub fn set(&mut self, x: usize, y: usize, kind: TileKind) -> Result<(), GridError> {
        let i = self.index(x, y)?;
        self.tiles[i] = kind;
        Ok(())
    }

    /// Tile under a continuous point, `None` once the point leaves the grid.
    ///
    /// This is the raycaster's sampler: leaving the grid is the loop's stop
    /// condition, not an error.
    #[inline]
    pub fn sample(&self, p: Vec2) -> Option<TileKind> {
        if !self.contains(p) {
            return None;
        }
        let i = p.y as usize * self.width + p.x as usize;
        Some(self.tiles[i])
    }

    /// True when `p` lies in `[0,w) × [0,h)`.
    #[inline]
    pub fn contains(&self, p: Vec2) -> bool {
        p.x >= 0.0 && p.y >= 0.0 && p.x < self.width as f32 && p.y < self.height as f32
    }

    /// Fixed player base: `(ceil(W/2), ceil(H/2))`.
    pub fn center(&self) -> Vec2 {
        Vec2::new(
            crate::math::half_up(self.width) as f32,
            crate::math::half_up(self.height) as f32,
        )
    }

    fn index(&self, x: usize, y: usize) -> Result<usize, GridError> {
        if x >= self.width || y >= self.height {
            return Err(GridError::OutOfBounds {
                x,
                y,
                width: self.width,
                height: self.height,
            });
        }
        Ok(y * self.width + x)
    }
}
