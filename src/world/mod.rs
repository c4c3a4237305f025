mod grid;
mod sprite;
mod tile;
mod view;

pub use grid::{GridError, MapGrid};
pub use sprite::{Sprite, SpriteTexture, TextureError};
pub use tile::{TILE_RENDER, TileKind, TileRenderInfo};
pub use view::{Player, ViewMode, ViewSnapshot};
