use glam::Vec2;

use crate::{config::ViewConfig, math::normalize_angle};

/// Which optic the player is looking through.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Default)]
pub enum ViewMode {
    /// Wide periscope view.
    #[default]
    Commander,
    /// Narrow gun sight, drawn through the binocular mask.
    Shooter,
}

/// Player tank: fixed base, rotating turret and commander periscope.
///
/// * The base never moves; it sits on the grid centre.
/// * Angles are degrees, normalised after every turn.
/// * Render stages never read this directly, they get a [`ViewSnapshot`].
#[derive(Clone, Debug)]
pub struct Player {
    base: Vec2,
    turret_angle: f32,
    commander_angle: f32,
    commander_elevation: f32,
    elevation_max: f32,
    mode: ViewMode,
    config: ViewConfig,
}

/// Immutable copy of everything one render pass reads.
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct ViewSnapshot {
    pub base: Vec2,
    pub turret_angle: f32,
    pub commander_angle: f32,
    pub commander_elevation: f32,
    pub mode: ViewMode,
    /// FOV of the current mode, degrees.
    pub active_fov: f32,
    /// Reference FOV the zoom factor is measured against.
    pub commander_fov: f32,
}

impl Player {
    /// Tank on `base` of a map `map_width` tiles wide.
    pub fn new(base: Vec2, map_width: usize, config: ViewConfig) -> Self {
        Self {
            base,
            turret_angle: 0.0,
            commander_angle: 0.0,
            commander_elevation: 0.0,
            elevation_max: config.elevation_max_for(map_width),
            mode: ViewMode::Commander,
            config,
        }
    }

    #[inline]
    pub fn base(&self) -> Vec2 {
        self.base
    }

    #[inline]
    pub fn turret_angle(&self) -> f32 {
        self.turret_angle
    }

    #[inline]
    pub fn commander_angle(&self) -> f32 {
        self.commander_angle
    }

    #[inline]
    pub fn commander_elevation(&self) -> f32 {
        self.commander_elevation
    }

    #[inline]
    pub fn mode(&self) -> ViewMode {
        self.mode
    }

    /// FOV of the current mode.
    pub fn active_fov(&self) -> f32 {
        match self.mode {
            ViewMode::Commander => self.config.commander_fov,
            ViewMode::Shooter => self.config.shooter_fov,
        }
    }

    /*──────────────────────── input mutators ────────────────────────*/

    /// Traverse the turret; `dir` is the signed input (+1 / −1).
    pub fn turn_turret(&mut self, dt: f32, dir: f32) {
        let dt = self.clamp_dt(dt);
        self.turret_angle = normalize_angle(self.turret_angle + self.config.turret_speed * dt * dir);
    }

    /// Traverse the commander periscope.
    pub fn turn_commander_view(&mut self, dt: f32, dir: f32) {
        let dt = self.clamp_dt(dt);
        self.commander_angle =
            normalize_angle(self.commander_angle + self.config.commander_speed * dt * dir);
    }

    /// Raise (`dir > 0`) or lower the periscope, clamped to the limits.
    pub fn raise_commander_view(&mut self, dt: f32, dir: f32) {
        let dt = self.clamp_dt(dt);
        let next = self.commander_elevation + self.config.elevation_speed * dt * dir;
        self.commander_elevation = next.clamp(self.config.elevation_min, self.elevation_max);
    }

    /// Switch optic. The only transition of the view state machine.
    pub fn set_view(&mut self, mode: ViewMode) {
        if self.mode != mode {
            log::debug!("view {:?} -> {:?}", self.mode, mode);
        }
        self.mode = mode;
    }

    /*───────────────────────── snapshots ─────────────────────────────*/

    pub fn snapshot(&self) -> ViewSnapshot {
        ViewSnapshot {
            base: self.base,
            turret_angle: self.turret_angle,
            commander_angle: self.commander_angle,
            commander_elevation: self.commander_elevation,
            mode: self.mode,
            active_fov: self.active_fov(),
            commander_fov: self.config.commander_fov,
        }
    }

    fn clamp_dt(&self, dt: f32) -> f32 {
        if dt.is_finite() {
            dt.clamp(0.0, self.config.max_dt)
        } else {
            0.0
        }
    }
}

impl ViewSnapshot {
    /// Distance from the eye to the projection plane for a surface `size`
    /// pixels wide: `ceil(size / 2) / tan(fov / 2)`.
    #[inline]
    pub fn screen_distance(&self, size: usize) -> f32 {
        crate::math::half_up(size) as f32 / (self.active_fov * 0.5).to_radians().tan()
    }

    /// Magnification relative to the commander optic.
    #[inline]
    pub fn zoom(&self) -> f32 {
        self.commander_fov / self.active_fov
    }

    /// Row where the ground starts on a `size`-pixel tall surface.
    #[inline]
    pub fn floor_line(&self, size: usize) -> f32 {
        size as f32 - self.floor_offset(size)
    }

    /// Eye height above the bottom edge: `size / 2 + elevation`.
    #[inline]
    pub fn floor_offset(&self, size: usize) -> f32 {
        (size / 2) as f32 + self.commander_elevation
    }
}

/*====================================================================*/
/*                                Tests                                */
/*====================================================================*/
#[cfg(test)]
mod tests {
    use super::*;

    fn player() -> Player {
        Player::new(Vec2::new(253.0, 253.0), 505, ViewConfig::default())
    }

    #[test]
    fn turret_turns_at_configured_rate() {
        let mut p = player();
        p.turn_turret(0.05, 1.0);
        assert!((p.turret_angle() - 3.0).abs() < 1e-4);
        p.turn_turret(0.05, -2.0);
        assert!((p.turret_angle() - 357.0).abs() < 1e-3);
    }

    #[test]
    fn spikes_in_dt_are_clamped() {
        let mut p = player();
        p.turn_commander_view(10.0, 1.0);
        // 180 °/s capped at 0.1 s
        assert!((p.commander_angle() - 18.0).abs() < 1e-4);
        p.turn_commander_view(f32::NAN, 1.0);
        assert!((p.commander_angle() - 18.0).abs() < 1e-4);
    }

    #[test]
    fn elevation_is_clamped() {
        let mut p = player();
        for _ in 0..100 {
            p.raise_commander_view(0.1, 1.0);
        }
        assert_eq!(p.commander_elevation(), 229.0);
        for _ in 0..100 {
            p.raise_commander_view(0.1, -1.0);
        }
        assert_eq!(p.commander_elevation(), -100.0);
    }

    #[test]
    fn set_view_switches_fov_and_screen_distance() {
        let mut p = player();
        let wide = p.snapshot();
        p.set_view(ViewMode::Shooter);
        let narrow = p.snapshot();

        assert_eq!(wide.active_fov, 45.0);
        assert_eq!(narrow.active_fov, 10.0);
        assert!(narrow.screen_distance(505) > wide.screen_distance(505));
        assert!((narrow.zoom() - 4.5).abs() < 1e-6);

        let expected = 253.0 / 5f32.to_radians().tan();
        assert!((narrow.screen_distance(505) - expected).abs() < 1e-2);

        p.set_view(ViewMode::Commander);
        assert_eq!(p.snapshot(), wide);
    }

    #[test]
    fn floor_line_follows_elevation() {
        let mut p = player();
        assert_eq!(p.snapshot().floor_line(505), 253.0);
        p.raise_commander_view(0.1, 1.0);
        assert_eq!(p.snapshot().floor_line(505), 243.0);
    }
}
