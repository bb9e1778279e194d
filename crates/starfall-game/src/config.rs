//! Game configuration loaded from TOML
//!
//! Every section and field is optional; missing values fall back to the
//! stock tuning.

use serde::{Deserialize, Serialize};
use starfall_core::{Result, StarfallError, Vec3};
use starfall_runtime::InputBindings;
use std::path::Path;

#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct GameConfig {
    pub renderer: RendererConfig,
    pub ship: ShipConfig,
    pub level: LevelConfig,
    pub input: InputBindings,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RendererConfig {
    /// Longest frame delta fed to the simulation, in seconds
    pub max_tick: f64,
    /// Width / height of the logical screen
    pub aspect_ratio: f32,
    /// Logical screen height in world units
    pub logical_height: f32,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            max_tick: 0.1,
            aspect_ratio: 1.0,
            logical_height: 100.0,
        }
    }
}

impl RendererConfig {
    pub fn logical_width(&self) -> f32 {
        self.logical_height * self.aspect_ratio
    }

    /// Visible area, centered on the origin
    pub fn bounds(&self) -> ScreenBounds {
        let half_w = self.logical_width() / 2.0;
        let half_h = self.logical_height / 2.0;
        ScreenBounds {
            left: -half_w,
            right: half_w,
            top: -half_h,
            bottom: half_h,
        }
    }
}

/// Visible area in world units. `top` is the smaller y.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ScreenBounds {
    pub left: f32,
    pub right: f32,
    pub top: f32,
    pub bottom: f32,
}

impl ScreenBounds {
    /// Whether `pos` is on screen, with the area grown by `margin`
    pub fn contains(&self, pos: &Vec3, margin: f32) -> bool {
        pos.x() >= self.left - margin
            && pos.x() <= self.right + margin
            && pos.y() >= self.top - margin
            && pos.y() <= self.bottom + margin
    }
}

/// Spaceship movement model and weapon tuning
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct ShipConfig {
    /// Passive deceleration, also the base of the thrust values
    pub acc_slow: f32,
    pub acc_forward: f32,
    pub acc_backward: f32,
    pub speed_max: f32,
    /// Passive rotational deceleration
    pub rot_acc_slow: f32,
    /// Rotational acceleration while turning
    pub rot_acc_turn: f32,
    pub rot_speed_max: f32,
    /// Seconds between shots
    pub fire_interval: f32,
    /// Seconds between thruster bubbles
    pub emit_interval: f32,
    pub bullet_speed: f32,
    /// Speed the ship loses per shot
    pub bullet_recoil: f32,
    /// Bullets older than this are retired even on screen
    pub bullet_lifetime: f32,
    pub bubble_speed: f32,
    /// How far past the screen edge the ship may go (negative keeps it inside)
    pub screen_margin: f32,
    pub explosion_fragments: u32,
    pub explosion_speed: f32,
}

impl Default for ShipConfig {
    fn default() -> Self {
        let acc_slow = 5.0;
        let rot_acc_slow = 10.0;
        Self {
            acc_slow,
            acc_forward: acc_slow + 20.0,
            acc_backward: -(acc_slow + 10.0),
            speed_max: 30.0,
            rot_acc_slow,
            rot_acc_turn: rot_acc_slow + 20.0,
            rot_speed_max: 4.0,
            fire_interval: 0.1,
            emit_interval: 0.03,
            bullet_speed: 50.0,
            bullet_recoil: 1.0,
            bullet_lifetime: 10000.0,
            bubble_speed: 35.0,
            screen_margin: -2.0,
            explosion_fragments: 8,
            explosion_speed: 15.0,
        }
    }
}

/// Wave settings
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LevelConfig {
    /// Enemies in the first wave; each later wave adds one
    pub wave_size: u32,
    pub max_enemies: u32,
    /// Pause between a cleared wave and the next, in seconds
    pub wave_interval: f32,
    /// Pause before the player respawns, in seconds
    pub respawn_delay: f32,
    /// Enemies hold fire until this much level time has passed
    pub enemy_fire_delay: f32,
    /// Per-frame probability that an enemy thrusts
    pub enemy_thrust_chance: f32,
    /// Per-frame probability that an enemy fires
    pub enemy_fire_chance: f32,
    /// Random seed; fixed runs are reproducible
    pub seed: u64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            wave_size: 3,
            max_enemies: 8,
            wave_interval: 2.0,
            respawn_delay: 2.0,
            enemy_fire_delay: 3.0,
            enemy_thrust_chance: 0.2,
            enemy_fire_chance: 0.1,
            seed: 0,
        }
    }
}

impl GameConfig {
    /// Check value ranges that would break the simulation
    pub fn validate(&self) -> Result<()> {
        let r = &self.renderer;
        if !(r.max_tick > 0.0) {
            return Err(config_error(format!(
                "renderer.max_tick must be positive, got {}",
                r.max_tick
            )));
        }
        if !(r.aspect_ratio > 0.0) || !(r.logical_height > 0.0) {
            return Err(config_error(format!(
                "renderer size must be positive, got aspect_ratio {} and logical_height {}",
                r.aspect_ratio, r.logical_height
            )));
        }

        let s = &self.ship;
        for (name, value) in [
            ("ship.fire_interval", s.fire_interval),
            ("ship.emit_interval", s.emit_interval),
            ("ship.bullet_lifetime", s.bullet_lifetime),
            ("ship.speed_max", s.speed_max),
            ("ship.rot_speed_max", s.rot_speed_max),
        ] {
            if !(value > 0.0) {
                return Err(config_error(format!("{} must be positive, got {}", name, value)));
            }
        }

        let l = &self.level;
        if l.wave_size == 0 || l.wave_size > l.max_enemies {
            return Err(config_error(format!(
                "level.wave_size must be in 1..={}, got {}",
                l.max_enemies, l.wave_size
            )));
        }
        for (name, value) in [
            ("level.enemy_thrust_chance", l.enemy_thrust_chance),
            ("level.enemy_fire_chance", l.enemy_fire_chance),
        ] {
            if !(0.0..=1.0).contains(&value) {
                return Err(config_error(format!("{} must be within [0, 1], got {}", name, value)));
            }
        }
        Ok(())
    }
}

fn config_error(msg: String) -> StarfallError {
    StarfallError::ConfigError(msg)
}

/// Parse and validate a config from a TOML string
pub fn parse_config(content: &str) -> Result<GameConfig> {
    let mut config: GameConfig = toml::from_str(content)
        .map_err(|e| StarfallError::ConfigError(format!("Failed to parse config: {}", e)))?;
    // An [input] table only overrides the actions it names
    for (action, keys) in InputBindings::default().0 {
        config.input.0.entry(action).or_insert(keys);
    }
    config.validate()?;
    Ok(config)
}

/// Load and validate a config file
pub fn load_config(path: &Path) -> Result<GameConfig> {
    let content = std::fs::read_to_string(path)?;
    parse_config(&content).map_err(|e| match e {
        StarfallError::ConfigError(msg) => {
            StarfallError::ConfigError(format!("{}: {}", path.display(), msg))
        }
        other => other,
    })
}
