// Closed set of tile kinds plus the static table the projector reads.
// Integer codes only appear at the map-file boundary (`code`/`from_code`).

use crate::renderer::{Rgba, rgb};

/// What occupies one grid cell.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash)]
pub enum TileKind {
    Empty,
    Tree,
    Wall,
    PlayerSpawn,
}

impl TileKind {
    /// Every kind, in table order.
    pub const ALL: [TileKind; 4] = [
        TileKind::Empty,
        TileKind::Tree,
        TileKind::Wall,
        TileKind::PlayerSpawn,
    ];

    /// On-disk code. `0` is reserved for "no tile" and never produced here.
    #[inline]
    pub fn code(self) -> i8 {
        match self {
            TileKind::Empty => 1,
            TileKind::Tree => 2,
            TileKind::Wall => 4,
            TileKind::PlayerSpawn => 7,
        }
    }

    /// Inverse of [`code`](Self::code); anything else is corruption.
    #[inline]
    pub fn from_code(code: i8) -> Option<Self> {
        match code {
            1 => Some(TileKind::Empty),
            2 => Some(TileKind::Tree),
            4 => Some(TileKind::Wall),
            7 => Some(TileKind::PlayerSpawn),
            _ => None,
        }
    }

    /// Rays pass through empty ground and the spawn footprint.
    #[inline]
    pub fn is_blocking(self) -> bool {
        matches!(self, TileKind::Tree | TileKind::Wall)
    }

    /// Static render data for this kind.
    #[inline]
    pub fn render_info(self) -> &'static TileRenderInfo {
        &TILE_RENDER[self as usize]
    }
}

/// How a struck tile is projected and shaded.
#[derive(Clone, Copy, Debug)]
pub struct TileRenderInfo {
    /// Column height multiplier (world units).
    pub height_unit: f32,
    /// Vertical baseline multiplier applied to the floor drop.
    pub baseline: f32,
    /// Edge / centre shades for the banded procedural texture.
    /// `None` falls back to distance-attenuated grey.
    pub bands: Option<[Rgba; 2]>,
    /// Pixel colour on the minimap.
    pub minimap: Rgba,
}

/// Indexed by `TileKind as usize`.
pub const TILE_RENDER: [TileRenderInfo; 4] = [
    // Empty
    TileRenderInfo {
        height_unit: 0.0,
        baseline: 1.0,
        bands: None,
        minimap: rgb(0, 255, 0),
    },
    // Tree
    TileRenderInfo {
        height_unit: 10.0,
        baseline: 1.0,
        bands: Some([rgb(51, 25, 0), rgb(102, 51, 0)]),
        minimap: rgb(25, 51, 0),
    },
    // Wall
    TileRenderInfo {
        height_unit: 5.0,
        baseline: 1.0,
        bands: Some([rgb(255, 51, 51), rgb(128, 128, 128)]),
        minimap: rgb(255, 51, 51),
    },
    // PlayerSpawn
    TileRenderInfo {
        height_unit: 0.0,
        baseline: 1.0,
        bands: None,
        minimap: rgb(255, 0, 0),
    },
];
