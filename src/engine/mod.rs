mod frame;
mod projection;
mod raycast;
mod sprites;
mod types;

pub use frame::{FramePlan, FrameProjector, wall_color};
pub use projection::{ColumnSpan, Projection};
pub use raycast::{cast_fan, cast_fan_into, cast_ray, cast_turret, fan_angle};
pub use sprites::{SpriteColumn, SpritePolar, bearing, nearest_covering, polar_sprites, project_columns};
pub use types::{RayHit, Screen, Side};
