//! Enemy steering

use crate::config::LevelConfig;
use crate::spaceship::{ShipControls, Spaceship};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starfall_scene::SceneGraph;
use std::f32::consts::{PI, TAU};

/// Headings closer than this count as aimed
const AIM_TOLERANCE: f32 = 0.1;

/// Drives one enemy ship: turn toward the player, thrust and fire at random.
pub struct EnemyAi {
    rng: StdRng,
}

impl EnemyAi {
    pub fn new(seed: u64) -> Self {
        Self {
            rng: StdRng::seed_from_u64(seed),
        }
    }

    /// Controls for this frame
    pub fn decide(
        &mut self,
        game_time: f32,
        enemy: &Spaceship,
        player: &Spaceship,
        config: &LevelConfig,
    ) -> ShipControls {
        if !enemy.enabled() || !player.enabled() {
            return ShipControls::default();
        }

        let to_player = player.position - enemy.position;
        let diff = heading_difference(heading_to(to_player.x(), to_player.y()), enemy.rot);

        ShipControls {
            forward: self.rng.random::<f32>() < config.enemy_thrust_chance,
            backward: false,
            left: diff < -AIM_TOLERANCE,
            right: diff > AIM_TOLERANCE,
            fire: game_time > config.enemy_fire_delay
                && self.rng.random::<f32>() < config.enemy_fire_chance,
        }
    }

    /// Decide, then move and maybe fire
    pub fn update_move(
        &mut self,
        scene: &mut SceneGraph,
        dt: f32,
        game_time: f32,
        enemy: &mut Spaceship,
        player: &Spaceship,
        config: &LevelConfig,
    ) {
        let controls = self.decide(game_time, enemy, player, config);
        enemy.player_move(scene, dt, controls);
        if controls.fire {
            enemy.try_fire(scene, dt);
        }
    }
}

/// Heading that points along `(dx, dy)`; 0 faces +y
fn heading_to(dx: f32, dy: f32) -> f32 {
    dx.atan2(dy)
}

/// `target - current`, wrapped into `[-PI, PI)`
fn heading_difference(target: f32, current: f32) -> f32 {
    (target - current + PI).rem_euclid(TAU) - PI
}
