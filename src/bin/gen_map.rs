//! gen_map.rs - write a procedurally generated `.agmff` map.
//!
//! USAGE:
//! ```bash
//! cargo run --bin gen_map -- --size 505 --tank 5 --seed 42 -o map.agmff
//! ```

use clap::Parser;
use std::path::PathBuf;

use periscope_rs::map::{DEFAULT_MAP_PATH, GeneratorConfig, MapGenerator};

/// CLI options handled via `clap` derive.
#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Opts {
    /// Map side length in tiles (maps are square)
    #[arg(long, default_value_t = 505)]
    size: usize,

    /// Side of the spawn square around the tank
    #[arg(long, default_value_t = 5)]
    tank: usize,

    /// RNG seed; omit for a fresh random map
    #[arg(long)]
    seed: Option<u64>,

    /// Output file
    #[arg(short, long, value_name = "FILE", default_value = DEFAULT_MAP_PATH)]
    output: PathBuf,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let opts = Opts::parse();

    let config = GeneratorConfig {
        width: opts.size,
        height: opts.size,
        player_tank_size: opts.tank,
        ..GeneratorConfig::default()
    };
    let mut generator = match opts.seed {
        Some(seed) => MapGenerator::seeded(config, seed),
        None => MapGenerator::from_entropy(config),
    };

    let grid = generator.generate_to_file(&opts.output)?;
    println!(
        "{}: {}x{} tiles",
        opts.output.display(),
        grid.width(),
        grid.height()
    );
    Ok(())
}
