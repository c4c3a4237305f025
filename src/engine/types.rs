use glam::Vec2;

use crate::world::TileKind;

/// Compass heading of the ray when it crossed the struck cell edge.
///
/// Only used to pick which fractional coordinate of the hit point drives the
/// texture's horizontal axis.
#[derive(Copy, Clone, Debug, PartialEq, Eq)]
pub enum Side {
    /// Crossed a horizontal boundary heading toward larger rows.
    South,
    /// Crossed a vertical boundary heading toward larger columns.
    East,
    /// Crossed a horizontal boundary heading toward row 0.
    North,
    /// Crossed a vertical boundary heading toward column 0.
    West,
}

impl Side {
    /// Fractional part of the hit coordinate running along the struck edge.
    #[inline]
    pub fn texture_u(self, hit: Vec2) -> f32 {
        match self {
            Side::South | Side::North => hit.x - hit.x.floor(),
            Side::East | Side::West => hit.y - hit.y.floor(),
        }
    }
}

/// Outcome of one ray. Produced fresh per ray, never retained.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct RayHit {
    /// Euclidean distance to the hit; `f32::INFINITY` when the ray left the
    /// grid without striking anything.
    pub distance: f32,
    /// Final stepper position (the grid boundary on a miss).
    pub hit_point: Vec2,
    pub tile: Option<TileKind>,
    pub side: Side,
    /// Normalised ray angle, degrees.
    pub angle: f32,
}

impl RayHit {
    /// Distance sentinel for "no hit".
    pub const NO_HIT: f32 = f32::INFINITY;

    #[inline]
    pub fn is_hit(&self) -> bool {
        self.tile.is_some() && self.distance.is_finite()
    }
}

/// Constants that depend on the internal frame surface, not on the map.
#[derive(Clone, Copy, Debug)]
pub struct Screen {
    pub w: usize,
    pub h: usize,
    /// Pixel columns owned by each ray.
    pub column_w: usize,
}

impl Screen {
    pub fn new(w: usize, h: usize, ray_count: usize) -> Self {
        Self {
            w,
            h,
            column_w: w.div_ceil(ray_count.max(1)),
        }
    }

    /// Pixel columns `[x0, x1)` covered by ray `i`, clipped to the surface.
    #[inline]
    pub fn columns_of(&self, i: usize) -> (usize, usize) {
        let x0 = (i * self.column_w).min(self.w);
        let x1 = (x0 + self.column_w).min(self.w);
        (x0, x1)
    }
}
