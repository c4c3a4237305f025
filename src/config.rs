//! Tunables for the viewpoint and the frame pipeline.
//!
//! The binaries map their `clap` arguments onto these structs; library code
//! only ever sees the structs.

use crate::renderer::{Rgba, rgb};

/// Field-of-view, rotation and elevation limits of the player's tank.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewConfig {
    /// Commander (periscope) horizontal FOV, degrees.
    pub commander_fov: f32,
    /// Shooter (gun sight) horizontal FOV, degrees.
    pub shooter_fov: f32,
    /// Turret traverse, degrees per second.
    pub turret_speed: f32,
    /// Commander view traverse, degrees per second.
    pub commander_speed: f32,
    /// Commander view elevation, pixels per second.
    pub elevation_speed: f32,
    pub elevation_min: f32,
    /// `None` derives the ceiling from the map width (`floor(W / 2.2)`).
    pub elevation_max: Option<f32>,
    /// Upper bound on one integration step, seconds.
    pub max_dt: f32,
}

impl Default for ViewConfig {
    fn default() -> Self {
        Self {
            commander_fov: 45.0,
            shooter_fov: 10.0,
            turret_speed: 60.0,
            commander_speed: 180.0,
            elevation_speed: 100.0,
            elevation_min: -100.0,
            elevation_max: None,
            max_dt: 0.1,
        }
    }
}

impl ViewConfig {
    /// Elevation ceiling for a map `map_width` tiles wide.
    pub fn elevation_max_for(&self, map_width: usize) -> f32 {
        self.elevation_max
            .unwrap_or_else(|| (map_width as f32 / 2.2).floor())
    }
}

/// Output surface and projection constants.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct RenderConfig {
    pub screen_width: usize,
    pub screen_height: usize,
    /// Rays per commander-view fan.
    pub ray_count: usize,
    /// Added to every distance before the perspective divide.
    pub epsilon: f32,
    pub sky: Rgba,
    pub ground: Rgba,
}

impl Default for RenderConfig {
    fn default() -> Self {
        Self {
            screen_width: 800,
            screen_height: 600,
            ray_count: 255,
            epsilon: 1e-6,
            sky: rgb(0, 0, 255),
            ground: rgb(0, 255, 0),
        }
    }
}
