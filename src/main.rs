//! Interactive periscope viewer.
//!
//! ```bash
//! cargo run --release -- [map.agmff] [--generate] [--sprite 260,240,tank.png]
//! ```
//!
//! Keys: ←/→ commander view, A/D turret, W/S raise/lower the periscope,
//! 1/2 commander/shooter optic, Tab minimap, Esc quit.

use anyhow::{Context, bail};
use clap::Parser;
use glam::Vec2;
use minifb::{Key, KeyRepeat, Window, WindowOptions};
use std::{
    path::PathBuf,
    time::{Duration, Instant},
};

use periscope_rs::{
    Session,
    config::{RenderConfig, ViewConfig},
    map::{self, DEFAULT_MAP_PATH, GeneratorConfig, MapGenerator},
    world::{Sprite, ViewMode},
};

/// Sprite placement given on the command line as `x,y,texture`.
#[derive(Clone, Debug)]
struct SpriteArg {
    pos: Vec2,
    texture: PathBuf,
}

fn parse_sprite(s: &str) -> Result<SpriteArg, String> {
    let mut parts = s.splitn(3, ',');
    let (Some(x), Some(y), Some(texture)) = (parts.next(), parts.next(), parts.next()) else {
        return Err(format!("expected x,y,texture, got `{s}`"));
    };
    let coord = |v: &str| v.trim().parse::<f32>().map_err(|e| format!("`{v}`: {e}"));
    Ok(SpriteArg {
        pos: Vec2::new(coord(x)?, coord(y)?),
        texture: PathBuf::from(texture),
    })
}

#[derive(Parser, Debug)]
#[command(author, version, about)]
struct Args {
    /// Map file to load
    #[arg(default_value = DEFAULT_MAP_PATH)]
    map: PathBuf,

    /// Generate the map first when the file does not exist
    #[arg(long)]
    generate: bool,

    /// Seed for `--generate`
    #[arg(long)]
    seed: Option<u64>,

    /// Window width
    #[arg(long, default_value_t = 800)]
    width: usize,

    /// Window height
    #[arg(long, default_value_t = 600)]
    height: usize,

    /// Rays per frame
    #[arg(long, default_value_t = 255)]
    rays: usize,

    /// Billboard sprite, `x,y,texture.png` (repeatable)
    #[arg(long = "sprite", value_parser = parse_sprite)]
    sprites: Vec<SpriteArg>,
}

fn main() -> anyhow::Result<()> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();
    let args = Args::parse();

    // ─────────── load or generate the map ───────
    let grid = if args.map.exists() {
        map::load(&args.map).with_context(|| format!("loading {}", args.map.display()))?
    } else if args.generate {
        let config = GeneratorConfig::default();
        let mut generator = match args.seed {
            Some(seed) => MapGenerator::seeded(config, seed),
            None => MapGenerator::from_entropy(config),
        };
        generator.generate_to_file(&args.map)?
    } else {
        bail!(
            "{} not found (pass --generate to create it)",
            args.map.display()
        );
    };

    let sprites = args
        .sprites
        .iter()
        .map(|s| Sprite::load(s.pos, 1.0, 10.0, &s.texture))
        .collect();

    let render = RenderConfig {
        screen_width: args.width,
        screen_height: args.height,
        ray_count: args.rays,
        ..RenderConfig::default()
    };
    let mut session = Session::new(grid, sprites, ViewConfig::default(), render);

    let mut win = Window::new("Periscope", args.width, args.height, WindowOptions::default())?;
    win.set_target_fps(60);

    let mut show_minimap = false;

    // ────────────────── benchmarking state ──────────────────────────────
    let mut acc_time = Duration::ZERO;
    let mut acc_frames = 0usize;
    let mut last_print = Instant::now();
    let mut last_frame = Instant::now();

    while win.is_open() && !win.is_key_down(Key::Escape) {
        let t0 = Instant::now();
        let dt = t0.duration_since(last_frame).as_secs_f32();
        last_frame = t0;

        /* --------------- input --------------------------------------- */
        let axis = |pos: Key, neg: Key| {
            f32::from(u8::from(win.is_key_down(pos))) - f32::from(u8::from(win.is_key_down(neg)))
        };
        let commander = axis(Key::Left, Key::Right);
        let turret = axis(Key::A, Key::D);
        let raise = axis(Key::W, Key::S);

        if commander != 0.0 {
            session.turn_commander_view(dt, commander);
        }
        if turret != 0.0 {
            session.turn_turret(dt, turret);
        }
        if raise != 0.0 {
            session.raise_commander_view(dt, raise);
        }
        if win.is_key_pressed(Key::Key1, KeyRepeat::No) {
            session.set_view(ViewMode::Commander);
        }
        if win.is_key_pressed(Key::Key2, KeyRepeat::No) {
            session.set_view(ViewMode::Shooter);
        }
        if win.is_key_pressed(Key::Tab, KeyRepeat::No) {
            show_minimap = !show_minimap;
        }

        /* --------------- draw ---------------------------------------- */
        if show_minimap {
            let fb = session.render_minimap();
            acc_time += t0.elapsed();
            acc_frames += 1;
            win.update_with_buffer(&fb.pixels, fb.width, fb.height)?;
        } else {
            let mut shown = Ok(());
            session.present(|fb, w, h| {
                acc_time += t0.elapsed();
                acc_frames += 1;
                shown = win.update_with_buffer(fb, w, h);
            });
            shown?;
        }

        if last_print.elapsed() >= Duration::from_secs(3) {
            let avg_ms = acc_time.as_secs_f64() * 1000.0 / acc_frames.max(1) as f64;
            let fps = 1000.0 / avg_ms;
            println!("avg render: {:.2} ms  ({:.1} FPS)", avg_ms, fps);
            acc_time = Duration::ZERO;
            acc_frames = 0;
            last_print = Instant::now();
        }
    }
    Ok(())
}
