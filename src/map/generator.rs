// Procedural map generation.
//
// Cells are decided in row-major order and streamed straight into the
// run-length encoder, so the encoded output always satisfies the decoder's
// run-total invariant.

use std::path::Path;

use rand::{Rng, SeedableRng, rngs::StdRng};

use super::format::{MapError, RunEncoder, decode};
use crate::world::{MapGrid, TileKind};

/// Placement rules for [`MapGenerator`].
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct GeneratorConfig {
    pub width: usize,
    pub height: usize,
    /// Side of the centred spawn square.
    pub player_tank_size: usize,
    /// A cell becomes a tree when a uniform draw in `0..=tree_odds` is 0.
    pub tree_odds: u32,
    /// Fixed scenery wall `(x, y)`; ignored when outside the grid.
    pub landmark: Option<(usize, usize)>,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            width: 505,
            height: 505,
            player_tank_size: 5,
            tree_odds: 250,
            landmark: Some((252, 199)),
        }
    }
}

impl GeneratorConfig {
    /// True when row `y`, column `x` lies in the centred spawn square.
    fn in_spawn(&self, x: usize, y: usize) -> bool {
        let tank = self.player_tank_size as f32;
        let inside = |i: usize, size: usize| {
            let i = i as f32;
            let size = size as f32;
            i >= (size - tank) / 2.0 && i < (size + tank) / 2.0
        };
        inside(y, self.height) && inside(x, self.width)
    }

    fn is_landmark(&self, x: usize, y: usize) -> bool {
        self.landmark == Some((x, y))
    }
}

/// Fills a grid with trees, the spawn square and one landmark wall.
pub struct MapGenerator<R: Rng = StdRng> {
    config: GeneratorConfig,
    rng: R,
}

impl MapGenerator<StdRng> {
    /// Reproducible generator.
    pub fn seeded(config: GeneratorConfig, seed: u64) -> Self {
        Self::with_rng(config, StdRng::seed_from_u64(seed))
    }

    /// Generator seeded from the OS.
    pub fn from_entropy(config: GeneratorConfig) -> Self {
        Self::with_rng(config, StdRng::from_entropy())
    }
}

impl<R: Rng> MapGenerator<R> {
    pub fn with_rng(config: GeneratorConfig, rng: R) -> Self {
        Self { config, rng }
    }

    /// Decide one cell.
    fn tile_at(&mut self, x: usize, y: usize) -> TileKind {
        if self.config.in_spawn(x, y) {
            TileKind::PlayerSpawn
        } else if self.config.is_landmark(x, y) {
            TileKind::Wall
        } else if self.rng.gen_range(0..=self.config.tree_odds) == 0 {
            TileKind::Tree
        } else {
            TileKind::Empty
        }
    }

    /// Produce the encoded `.agmff` byte stream.
    pub fn generate_encoded(&mut self) -> Result<Vec<u8>, MapError> {
        let GeneratorConfig { width, height, .. } = self.config;
        let mut enc = RunEncoder::new(width, height)?;
        let mut trees = 0usize;
        for y in 0..height {
            for x in 0..width {
                let kind = self.tile_at(x, y);
                trees += usize::from(kind == TileKind::Tree);
                enc.push_kind(kind)?;
            }
        }
        let bytes = enc.finish()?;
        log::info!(
            "generated {width}x{height} map: {trees} trees, {} bytes",
            bytes.len()
        );
        Ok(bytes)
    }

    /// Generate and decode in one go.
    pub fn generate(&mut self) -> Result<MapGrid, MapError> {
        decode(&self.generate_encoded()?)
    }

    /// Generate straight to disk.
    pub fn generate_to_file<P: AsRef<Path>>(&mut self, path: P) -> Result<MapGrid, MapError> {
        let bytes = self.generate_encoded()?;
        std::fs::write(path.as_ref(), &bytes)?;
        log::info!("wrote {}", path.as_ref().display());
        decode(&bytes)
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
