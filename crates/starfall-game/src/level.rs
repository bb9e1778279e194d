//! Level state machine and the per-frame pipeline

use crate::ai::EnemyAi;
use crate::config::GameConfig;
use crate::layer::LayerNodes;
use crate::spaceship::{ShipControls, Spaceship, SpaceshipOwner};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starfall_collision::{Collision2d, Point2d, Shape2d};
use starfall_core::{NodeId, Result, Vec3};
use starfall_runtime::{InputState, RuntimeSystem};
use starfall_scene::SceneGraph;
use std::f32::consts::PI;

#[derive(Debug, Clone, Copy, PartialEq)]
pub enum LevelPhase {
    /// Loaded, first wave not yet spawned
    Loading,
    Playing,
    PlayerDead { since: f32 },
    WaveCleared { since: f32 },
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct LevelStats {
    pub enemies_destroyed: u32,
    pub player_deaths: u32,
    pub waves_cleared: u32,
    pub shots_fired: u32,
    pub frames: u64,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Shooter {
    Player,
    Enemy(usize),
}

/// Collision payload: the bullet a segment belongs to, `None` for hulls
type HitTag = Option<(Shooter, NodeId)>;

pub struct Level {
    config: GameConfig,
    node: NodeId,
    player: Spaceship,
    enemies: Vec<(Spaceship, EnemyAi)>,
    layers: LayerNodes,
    phase: LevelPhase,
    game_time: f32,
    wave: u32,
    rng: StdRng,
    stats: LevelStats,
}

impl Level {
    /// Build the level under `parent`. Enemies arrive on the first update.
    pub fn load(scene: &mut SceneGraph, parent: NodeId, config: &GameConfig) -> Result<Self> {
        let mut rng = StdRng::seed_from_u64(config.level.seed);
        let node = scene.spawn_child(parent, "level", None)?;
        let layers = LayerNodes::create(scene, node)?;

        let mut player = Spaceship::new(
            scene,
            node,
            SpaceshipOwner::Player,
            &config.ship,
            config.renderer.bounds(),
            &layers,
            rng.random(),
        )?;
        let bounds = config.renderer.bounds();
        player.respawn(scene, Vec3::new(0.0, bounds.bottom * 0.6, 0.0), PI);

        log::info!("level loaded (seed {})", config.level.seed);
        Ok(Self {
            config: config.clone(),
            node,
            player,
            enemies: Vec::new(),
            layers,
            phase: LevelPhase::Loading,
            game_time: 0.0,
            wave: 0,
            rng,
            stats: LevelStats::default(),
        })
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn phase(&self) -> LevelPhase {
        self.phase
    }

    /// Zero-based index of the current wave
    pub fn wave(&self) -> u32 {
        self.wave
    }

    pub fn game_time(&self) -> f32 {
        self.game_time
    }

    pub fn player(&self) -> &Spaceship {
        &self.player
    }

    pub fn enemies(&self) -> impl Iterator<Item = &Spaceship> {
        self.enemies.iter().map(|(ship, _)| ship)
    }

    pub fn enemies_alive(&self) -> usize {
        self.enemies().filter(|ship| ship.enabled()).count()
    }

    pub fn stats(&self) -> LevelStats {
        LevelStats {
            shots_fired: self.player.shots_fired(),
            ..self.stats
        }
    }

    /// One simulation step.
    ///
    /// Order matters: ships move, every pool advances and retires its dead
    /// particles, then collisions are resolved against the surviving set.
    pub fn update(
        &mut self,
        scene: &mut SceneGraph,
        controls: ShipControls,
        dt: f32,
    ) -> Result<()> {
        self.game_time += dt;
        self.stats.frames += 1;

        if self.phase == LevelPhase::Loading {
            self.spawn_wave(scene)?;
            self.phase = LevelPhase::Playing;
        }

        self.player.player_move(scene, dt, controls);
        if controls.fire {
            self.player.try_fire(scene, dt);
        }
        for (enemy, ai) in &mut self.enemies {
            ai.update_move(scene, dt, self.game_time, enemy, &self.player, &self.config.level);
        }

        self.player.update_particles(scene, dt);
        for (enemy, _) in &mut self.enemies {
            enemy.update_particles(scene, dt);
        }
        self.player.check_particles(scene);
        for (enemy, _) in &mut self.enemies {
            enemy.check_particles(scene);
        }

        self.collision_pass(scene);
        self.advance_phase(scene)
    }

    fn advance_phase(&mut self, scene: &mut SceneGraph) -> Result<()> {
        let level = &self.config.level;
        match self.phase {
            LevelPhase::Loading => {}
            LevelPhase::Playing => {
                if !self.player.enabled() {
                    self.stats.player_deaths += 1;
                    self.phase = LevelPhase::PlayerDead {
                        since: self.game_time,
                    };
                    log::info!("player destroyed in wave {}", self.wave + 1);
                } else if self.enemies_alive() == 0 {
                    self.stats.waves_cleared += 1;
                    self.phase = LevelPhase::WaveCleared {
                        since: self.game_time,
                    };
                    log::info!("wave {} cleared", self.wave + 1);
                }
            }
            LevelPhase::PlayerDead { since } => {
                if self.game_time - since >= level.respawn_delay {
                    let bounds = self.config.renderer.bounds();
                    self.player
                        .respawn(scene, Vec3::new(0.0, bounds.bottom * 0.6, 0.0), PI);
                    self.phase = LevelPhase::Playing;
                }
            }
            LevelPhase::WaveCleared { since } => {
                if self.game_time - since >= level.wave_interval {
                    self.wave += 1;
                    self.spawn_wave(scene)?;
                    self.phase = LevelPhase::Playing;
                }
            }
        }
        Ok(())
    }

    /// Bring in the current wave, reusing ships from earlier waves
    fn spawn_wave(&mut self, scene: &mut SceneGraph) -> Result<()> {
        let level = &self.config.level;
        let count = (level.wave_size + self.wave).min(level.max_enemies) as usize;
        let bounds = self.config.renderer.bounds();

        while self.enemies.len() < count {
            let ship = Spaceship::new(
                scene,
                self.node,
                SpaceshipOwner::Enemy,
                &self.config.ship,
                bounds,
                &self.layers,
                self.rng.random(),
            )?;
            self.enemies.push((ship, EnemyAi::new(self.rng.random())));
        }

        let width = bounds.right - bounds.left;
        let spacing = width / (count as f32 + 1.0);
        for (i, (enemy, _)) in self.enemies.iter_mut().take(count).enumerate() {
            let x = bounds.left + spacing * (i as f32 + 1.0);
            enemy.respawn(scene, Vec3::new(x, bounds.top * 0.6, 0.0), 0.0);
        }
        log::info!("wave {}: {} enemies", self.wave + 1, count);
        Ok(())
    }

    /// Bullets against hulls of the opposing side.
    ///
    /// A ship is hit when a bullet crosses its hull outline or lies wholly
    /// inside it. The bullet is consumed.
    fn collision_pass(&mut self, scene: &mut SceneGraph) {
        let mut player_bullets: Vec<Shape2d<HitTag>> = self
            .player
            .bullet_segments(scene)
            .into_iter()
            .map(|(node, a, b)| Shape2d::linesegment(a, b, Some((Shooter::Player, node))))
            .collect();

        let mut hits = Vec::new();
        for (i, (enemy, _)) in self.enemies.iter().enumerate() {
            if !enemy.enabled() {
                continue;
            }
            if let Some(bullet) = first_hit(&enemy.hull(), &player_bullets) {
                player_bullets.retain(|shape| shape.data != Some(bullet));
                hits.push((i, bullet.1));
            }
        }
        for (i, bullet) in hits {
            self.player.retire_bullet(scene, bullet);
            self.enemies[i].0.explode(scene);
            self.stats.enemies_destroyed += 1;
        }

        if !self.player.enabled() {
            return;
        }
        let view: &SceneGraph = scene;
        let enemy_bullets: Vec<Shape2d<HitTag>> = self
            .enemies
            .iter()
            .enumerate()
            .flat_map(|(i, (enemy, _))| {
                enemy.bullet_segments(view).into_iter().map(move |(node, a, b)| {
                    Shape2d::linesegment(a, b, Some((Shooter::Enemy(i), node)))
                })
            })
            .collect();
        if let Some((shooter, bullet)) = first_hit(&self.player.hull(), &enemy_bullets) {
            if let Shooter::Enemy(i) = shooter {
                self.enemies[i].0.retire_bullet(scene, bullet);
            }
            self.player.explode(scene);
        }
    }

    /// Retire every effect and hide all ships
    pub fn unload(&mut self, scene: &mut SceneGraph) {
        self.player.unload(scene);
        for (enemy, _) in &mut self.enemies {
            enemy.unload(scene);
        }
        log::info!(
            "level unloaded after {} frames, {} enemies destroyed",
            self.stats.frames,
            self.stats.enemies_destroyed
        );
    }
}

/// The first bullet touching `hull`, if any
fn first_hit(hull: &[Point2d], bullets: &[Shape2d<HitTag>]) -> Option<(Shooter, NodeId)> {
    if bullets.is_empty() {
        return None;
    }
    let hull = Shape2d::polygon(hull.to_vec(), None);

    if let Some(hit) = Collision2d::test(&hull, bullets).first() {
        return hit.shape2.data;
    }
    Collision2d::inside(&hull, bullets)
        .iter()
        .position(|&inside| inside)
        .and_then(|i| bullets[i].data)
}

/// Runs the level as a frame-loop system, steering the player from input
pub struct GameLogic {
    config: GameConfig,
    level: Option<Level>,
}

impl GameLogic {
    pub fn new(config: GameConfig) -> Self {
        Self {
            config,
            level: None,
        }
    }

    pub fn level(&self) -> Option<&Level> {
        self.level.as_ref()
    }

    /// Replace the running level with a fresh one
    pub fn load_level(&mut self, scene: &mut SceneGraph) -> Result<()> {
        if let Some(mut old) = self.level.take() {
            old.unload(scene);
        }
        let root = scene.root();
        self.level = Some(Level::load(scene, root, &self.config)?);
        Ok(())
    }
}

impl RuntimeSystem for GameLogic {
    fn initialize(&mut self, scene: &mut SceneGraph) -> Result<()> {
        self.load_level(scene)
    }

    fn update(&mut self, scene: &mut SceneGraph, input: &InputState, dt: f64) -> Result<()> {
        match self.level.as_mut() {
            Some(level) => level.update(scene, ShipControls::from_input(input), dt as f32),
            None => Ok(()),
        }
    }

    fn shutdown(&mut self, scene: &mut SceneGraph) -> Result<()> {
        if let Some(mut level) = self.level.take() {
            level.unload(scene);
        }
        Ok(())
    }

    fn name(&self) -> &str {
        "game_logic"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::LevelConfig;
    use starfall_runtime::{FrameRunner, GameClock};

    const DT: f32 = 1.0 / 60.0;

    fn quiet_config(wave_size: u32, max_enemies: u32) -> GameConfig {
        GameConfig {
            level: LevelConfig {
                wave_size,
                max_enemies,
                enemy_thrust_chance: 0.0,
                enemy_fire_chance: 0.0,
                ..LevelConfig::default()
            },
            ..GameConfig::default()
        }
    }

    fn load(config: &GameConfig) -> (SceneGraph, Level) {
        let mut scene = SceneGraph::new();
        let root = scene.root();
        let level = Level::load(&mut scene, root, config).unwrap();
        (scene, level)
    }

    #[test]
    fn first_update_spawns_wave() {
        let (mut scene, mut level) = load(&GameConfig::default());
        assert_eq!(level.phase(), LevelPhase::Loading);
        assert_eq!(level.enemies().count(), 0);

        level.update(&mut scene, ShipControls::default(), DT).unwrap();
        assert_eq!(level.phase(), LevelPhase::Playing);
        assert_eq!(level.enemies_alive(), 3);
        for enemy in level.enemies() {
            assert!(enemy.position.y() < 0.0);
        }
        assert!(level.player().position.y() > 0.0);
    }

    #[test]
    fn player_bullet_destroys_enemy() {
        let (mut scene, mut level) = load(&quiet_config(1, 1));
        level.update(&mut scene, ShipControls::default(), DT).unwrap();
        level.enemies[0]
            .0
            .respawn(&mut scene, Vec3::new(1.0, 10.0, 0.0), 0.0);

        let fire = ShipControls {
            fire: true,
            ..ShipControls::default()
        };
        for _ in 0..60 {
            level.update(&mut scene, fire, DT).unwrap();
        }

        let stats = level.stats();
        assert_eq!(stats.enemies_destroyed, 1);
        assert_eq!(stats.waves_cleared, 1);
        assert!(stats.shots_fired > 0);
        assert!(matches!(level.phase(), LevelPhase::WaveCleared { .. }));
        assert!(level.enemies[0].0.explosion_fragments() > 0);
    }

    #[test]
    fn enemy_bullet_destroys_player() {
        let (mut scene, mut level) = load(&quiet_config(1, 1));
        level.update(&mut scene, ShipControls::default(), DT).unwrap();
        // Enemy straight above the player, facing it
        level.enemies[0]
            .0
            .respawn(&mut scene, Vec3::new(-1.0, 10.0, 0.0), 0.0);
        level.enemies[0].0.try_fire(&mut scene, 1.0);

        for _ in 0..60 {
            level.update(&mut scene, ShipControls::default(), DT).unwrap();
        }
        assert!(!level.player().enabled());
        assert_eq!(level.stats().player_deaths, 1);
        assert!(matches!(level.phase(), LevelPhase::PlayerDead { .. }));
    }

    #[test]
    fn player_respawns_after_delay() {
        let (mut scene, mut level) = load(&quiet_config(3, 8));
        level.update(&mut scene, ShipControls::default(), DT).unwrap();
        level.player.explode(&mut scene);
        level.update(&mut scene, ShipControls::default(), DT).unwrap();
        assert!(matches!(level.phase(), LevelPhase::PlayerDead { .. }));

        for _ in 0..130 {
            level.update(&mut scene, ShipControls::default(), DT).unwrap();
        }
        assert_eq!(level.phase(), LevelPhase::Playing);
        assert!(level.player().enabled());
        assert_eq!(level.stats().player_deaths, 1);
    }

    #[test]
    fn cleared_wave_brings_a_bigger_one() {
        let (mut scene, mut level) = load(&quiet_config(1, 2));
        level.update(&mut scene, ShipControls::default(), DT).unwrap();
        level.enemies[0].0.explode(&mut scene);
        level.update(&mut scene, ShipControls::default(), DT).unwrap();
        assert!(matches!(level.phase(), LevelPhase::WaveCleared { .. }));

        for _ in 0..130 {
            level.update(&mut scene, ShipControls::default(), DT).unwrap();
        }
        assert_eq!(level.phase(), LevelPhase::Playing);
        assert_eq!(level.wave(), 1);
        assert_eq!(level.enemies_alive(), 2);
        assert_eq!(level.stats().waves_cleared, 1);
    }

    #[test]
    fn runs_as_runtime_system() {
        let mut scene = SceneGraph::new();
        let mut runner = FrameRunner::new(GameClock::new());
        runner
            .add_system(&mut scene, Box::new(GameLogic::new(quiet_config(2, 4))))
            .unwrap();
        assert_eq!(runner.system_names(), vec!["game_logic"]);

        let mut input = InputState::new();
        input.process_key_down(" ");
        for _ in 0..30 {
            runner.frame(&mut scene, &mut input, DT as f64);
        }
        runner.shutdown(&mut scene);
        assert!(runner.system_names().is_empty());
    }

    #[test]
    fn unload_hides_everything() {
        let mut scene = SceneGraph::new();
        let mut logic = GameLogic::new(quiet_config(2, 4));
        logic.initialize(&mut scene).unwrap();
        let input = InputState::new();
        logic.update(&mut scene, &input, DT as f64).unwrap();
        let ship = logic.level().unwrap().player().ship_node();

        logic.shutdown(&mut scene).unwrap();
        assert!(logic.level().is_none());
        assert!(!scene.node(ship).unwrap().drawable.visible());
    }
}
