//! Starfall Game - a small space shooter on the Starfall engine
//!
//! - `GameConfig`: renderer, ship tuning, level and input settings from TOML
//! - `Spaceship`: movement model plus bullet, thruster-bubble and explosion pools
//! - `EnemyAi`: random thrust, aiming and delayed fire
//! - `Level` / `GameLogic`: wave state machine and the per-frame pipeline
//!   (move, update particles, check particles, collision pass)

mod ai;
mod config;
mod layer;
mod level;
mod spaceship;

pub use ai::EnemyAi;
pub use config::{
    load_config, parse_config, GameConfig, LevelConfig, RendererConfig, ScreenBounds, ShipConfig,
};
pub use layer::{Layer, LayerNodes};
pub use level::{GameLogic, Level, LevelPhase, LevelStats};
pub use spaceship::{BulletShot, ShipControls, Spaceship, SpaceshipOwner};
