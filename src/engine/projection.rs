use super::types::Screen;
use crate::world::ViewSnapshot;

/// Vertical extent of one projected strip, in surface pixels.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ColumnSpan {
    /// First row (may be negative or past the bottom; the rasteriser clips).
    pub top: f32,
    pub height: f32,
}

/// Per-frame perspective constants, derived once from the view snapshot.
///
/// ```text
/// h      = screen_distance / (distance + ε)
/// height = h · height_unit · zoom
/// drop   = h · baseline · zoom · (floor_offset / (H/2))
/// bottom = floor_line + drop
/// top    = bottom − ⌊height⌋
/// ```
#[derive(Clone, Copy, Debug)]
pub struct Projection {
    pub screen_distance: f32,
    pub zoom: f32,
    /// Row where the ground starts.
    pub floor_line: f32,
    /// `floor_offset / (H/2)`: stretches the floor drop as the eye rises.
    drop_scale: f32,
    epsilon: f32,
}

impl Projection {
    pub fn new(view: &ViewSnapshot, screen: &Screen, epsilon: f32) -> Self {
        let half_h = (screen.h / 2).max(1) as f32;
        Self {
            screen_distance: view.screen_distance(screen.w),
            zoom: view.zoom(),
            floor_line: view.floor_line(screen.h),
            drop_scale: view.floor_offset(screen.h) / half_h,
            epsilon,
        }
    }

    /// Unscaled projected size of one world unit at `distance`.
    #[inline]
    pub fn scale_at(&self, distance: f32) -> f32 {
        self.screen_distance / (distance + self.epsilon)
    }

    /// Project a strip `height_unit` tall whose foot sits at `distance`.
    pub fn column(&self, distance: f32, height_unit: f32, baseline: f32) -> ColumnSpan {
        let h = self.scale_at(distance);
        let height = h * height_unit * self.zoom;
        let drop = h * baseline * self.zoom * self.drop_scale;
        let bottom = self.floor_line + drop;
        ColumnSpan {
            top: bottom - height.floor(),
            height,
        }
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
