//! Spaceships: movement model, weapons and effects

use crate::config::{ScreenBounds, ShipConfig};
use crate::layer::{Layer, LayerNodes};
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};
use starfall_animation::{find_animation, AnimationAsset, AnimateField, FieldValue};
use starfall_collision::Point2d;
use starfall_core::{NodeId, Result, Vec3};
use starfall_particles::{Particle, ParticleParam, ParticleSystem};
use starfall_runtime::{actions, InputState};
use starfall_scene::{DrawableAsset, Node, SceneGraph};
use std::f32::consts::{FRAC_PI_2, TAU};

/// Hull outline in ship-local coordinates, nose along +y
const HULL: [[f32; 3]; 4] = [
    [0.0, -1.0, 0.0],
    [-2.0, -2.0, 0.0],
    [0.0, 3.0, 0.0],
    [2.0, -2.0, 0.0],
];

const BULLET_OFFSET: Vec3 = Vec3::new(0.0, 3.0, 0.0);
const BULLET_LENGTH: f32 = 1.5;
/// Bullets may leave the screen by this much before retiring
const BULLET_SCREEN_MARGIN: f32 = 2.0;
const BUBBLE_DURATION: f32 = 0.5;
const EXPLOSION_DURATION: f32 = 1.0;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SpaceshipOwner {
    Player,
    Enemy,
}

impl SpaceshipOwner {
    pub fn color(self) -> &'static str {
        match self {
            SpaceshipOwner::Player => "#e63",
            SpaceshipOwner::Enemy => "#2e3",
        }
    }

    pub fn name(self) -> &'static str {
        match self {
            SpaceshipOwner::Player => "player",
            SpaceshipOwner::Enemy => "enemy",
        }
    }

    fn layers(self) -> [Layer; 4] {
        match self {
            SpaceshipOwner::Player => [
                Layer::Player,
                Layer::PlayerBullet,
                Layer::PlayerBubble,
                Layer::PlayerExplosion,
            ],
            SpaceshipOwner::Enemy => [
                Layer::Enemy,
                Layer::EnemyBullet,
                Layer::EnemyBubble,
                Layer::EnemyExplosion,
            ],
        }
    }
}

/// Spawn payload and back-reference of a bullet
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BulletShot {
    pub origin: Vec3,
    /// Heading of the firing ship
    pub rot: f32,
    pub velocity: Vec3,
    pub owner: SpaceshipOwner,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct BubbleSpawn {
    position: Vec3,
    size: f32,
    rot: f32,
    velocity: Vec3,
}

#[derive(Debug, Clone, Copy)]
pub(crate) struct Fragment {
    position: Vec3,
    velocity: Vec3,
    spin: f32,
}

/// Held controls for one frame
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ShipControls {
    pub forward: bool,
    pub backward: bool,
    pub left: bool,
    pub right: bool,
    pub fire: bool,
}

impl ShipControls {
    pub fn from_input(input: &InputState) -> Self {
        Self {
            forward: input.is_action_pressed(actions::FORWARD),
            backward: input.is_action_pressed(actions::BACKWARD),
            left: input.is_action_pressed(actions::LEFT),
            right: input.is_action_pressed(actions::RIGHT),
            fire: input.is_action_pressed(actions::FIRE),
        }
    }
}

pub struct Spaceship {
    owner: SpaceshipOwner,
    node: NodeId,
    ship_node: NodeId,
    bullets: ParticleSystem<BulletShot>,
    bubbles: ParticleSystem<BubbleSpawn>,
    explosion: ParticleSystem<Fragment>,

    pub position: Vec3,
    pub speed: Vec3,
    /// Heading in radians; 0 faces +y
    pub rot: f32,
    pub rot_speed: f32,

    tuning: ShipConfig,
    bounds: ScreenBounds,
    since_last_fire: f32,
    since_last_emit: f32,
    enabled: bool,
    shots_fired: u32,
    rng: StdRng,
}

impl Spaceship {
    pub fn new(
        scene: &mut SceneGraph,
        parent: NodeId,
        owner: SpaceshipOwner,
        tuning: &ShipConfig,
        bounds: ScreenBounds,
        layers: &LayerNodes,
        seed: u64,
    ) -> Result<Self> {
        let [ship_layer, bullet_layer, bubble_layer, explosion_layer] = owner.layers();
        let color = owner.color();

        let node = scene.spawn_child(parent, "spaceship", None)?;
        let ship_node =
            scene.spawn_child(layers.node(ship_layer), "ship", Some(hull_shape(color)))?;

        let bullets = ParticleSystem::new(
            scene,
            node,
            ParticleParam {
                particle_name: "bullet".to_string(),
                drawable: DrawableAsset::Rect {
                    width: 0.0,
                    height: BULLET_LENGTH,
                    stroke: 1.0,
                    color: color.to_string(),
                    fill: true,
                },
                spawn_parent: Some(layers.node(bullet_layer)),
                animations: vec![AnimationAsset::add(
                    "fire",
                    AnimateField::Position,
                    tuning.bullet_lifetime,
                    FieldValue::Vec3(Vec3::ZERO),
                )],
            },
            Box::new(init_bullet),
            Box::new(move |_: &Particle<BulletShot>, node: &Node| {
                bounds.contains(&node.position, BULLET_SCREEN_MARGIN)
            }),
        )?;

        let bubbles = ParticleSystem::new(
            scene,
            node,
            ParticleParam {
                particle_name: "bubble".to_string(),
                drawable: DrawableAsset::Cone {
                    diameter: 0.8,
                    length: 1.0,
                    color: "rgba(255, 0, 0, 0.6)".to_string(),
                    backface: Some("rgba(255, 0, 0, 0)".to_string()),
                },
                spawn_parent: Some(layers.node(bubble_layer)),
                animations: vec![
                    AnimationAsset::lerp(
                        "scale",
                        AnimateField::Scale,
                        BUBBLE_DURATION,
                        FieldValue::Vec3(Vec3::ZERO),
                    ),
                    AnimationAsset::add(
                        "move",
                        AnimateField::Position,
                        BUBBLE_DURATION,
                        FieldValue::Vec3(Vec3::ZERO),
                    ),
                ],
            },
            Box::new(init_bubble),
            Box::new(|_: &Particle<BubbleSpawn>, _: &Node| true),
        )?;

        let explosion = ParticleSystem::new(
            scene,
            node,
            ParticleParam {
                particle_name: "fragment".to_string(),
                drawable: DrawableAsset::Polyline {
                    path: vec![[-0.5, 0.0, 0.0], [0.5, 0.0, 0.0]],
                    closed: false,
                    stroke: 0.5,
                    color: color.to_string(),
                },
                spawn_parent: Some(layers.node(explosion_layer)),
                animations: vec![
                    AnimationAsset::add(
                        "move",
                        AnimateField::Position,
                        EXPLOSION_DURATION,
                        FieldValue::Vec3(Vec3::ZERO),
                    ),
                    AnimationAsset::add(
                        "spin",
                        AnimateField::Rotation,
                        EXPLOSION_DURATION,
                        FieldValue::Vec3(Vec3::ZERO),
                    ),
                    AnimationAsset::lerp(
                        "fade",
                        AnimateField::Opacity,
                        EXPLOSION_DURATION,
                        FieldValue::Scalar(0.0),
                    ),
                ],
            },
            Box::new(init_fragment),
            Box::new(|_: &Particle<Fragment>, _: &Node| true),
        )?;

        Ok(Self {
            owner,
            node,
            ship_node,
            bullets,
            bubbles,
            explosion,
            position: Vec3::ZERO,
            speed: Vec3::ZERO,
            rot: 0.0,
            rot_speed: 0.0,
            tuning: tuning.clone(),
            bounds,
            since_last_fire: 0.0,
            since_last_emit: 0.0,
            enabled: true,
            shots_fired: 0,
            rng: StdRng::seed_from_u64(seed),
        })
    }

    pub fn owner(&self) -> SpaceshipOwner {
        self.owner
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    pub fn ship_node(&self) -> NodeId {
        self.ship_node
    }

    /// Alive and steerable
    pub fn enabled(&self) -> bool {
        self.enabled
    }

    pub fn shots_fired(&self) -> u32 {
        self.shots_fired
    }

    pub fn bullets(&self) -> &ParticleSystem<BulletShot> {
        &self.bullets
    }

    pub fn explosion_fragments(&self) -> usize {
        self.explosion.live_count()
    }

    /// Ship-local offset to world offset
    pub fn transform(&self, local: Vec3) -> Vec3 {
        local.rotate_z(self.rot)
    }

    /// Advance the movement model by `dt` and steer from `controls`.
    ///
    /// Thrust accelerates along the heading, a constant drag slows both
    /// speed and spin, and the ship is kept on screen. Thrusting emits
    /// bubbles; firing is separate, see [`Spaceship::try_fire`].
    pub fn player_move(&mut self, scene: &mut SceneGraph, dt: f32, controls: ShipControls) {
        if !self.enabled {
            return;
        }
        let t = &self.tuning;

        let mut acc = 0.0;
        if controls.forward {
            acc += t.acc_forward;
        }
        if controls.backward {
            acc += t.acc_backward;
        }

        let mut rot_acc = 0.0;
        if controls.left {
            rot_acc -= t.rot_acc_turn;
        }
        if controls.right {
            rot_acc += t.rot_acc_turn;
        }

        self.rot_speed += rot_acc * dt;
        let rot_drag = t.rot_acc_slow * dt;
        if self.rot_speed.abs() < rot_drag {
            self.rot_speed = 0.0;
        } else {
            self.rot_speed -= self.rot_speed.signum() * rot_drag;
        }
        self.rot_speed = self.rot_speed.clamp(-t.rot_speed_max, t.rot_speed_max);
        self.rot = (self.rot + self.rot_speed * dt) % TAU;

        let mut thrust = Vec3::new(0.0, acc * dt, 0.0);
        thrust.rotate_z_set(self.rot);
        self.speed.set_vec3(&(self.speed + thrust));

        let drag = t.acc_slow * dt;
        let mut speed_len = self.speed.length();
        speed_len = if speed_len < drag { 0.0 } else { speed_len - drag };
        self.speed.set_length(speed_len.min(t.speed_max));

        self.position.set_vec3(&(self.position + self.speed * dt));
        self.clamp_to_screen();
        self.apply_to_scene(scene);

        if controls.forward {
            self.try_emit(scene, dt);
        }
    }

    fn clamp_to_screen(&mut self) {
        let margin = self.tuning.screen_margin;
        let b = self.bounds;
        if self.position.x() < b.left - margin {
            self.position.set_x(b.left - margin);
            self.speed.set_x(0.0);
        }
        if self.position.x() > b.right + margin {
            self.position.set_x(b.right + margin);
            self.speed.set_x(0.0);
        }
        if self.position.y() < b.top - margin {
            self.position.set_y(b.top - margin);
            self.speed.set_y(0.0);
        }
        if self.position.y() > b.bottom + margin {
            self.position.set_y(b.bottom + margin);
            self.speed.set_y(0.0);
        }
    }

    fn apply_to_scene(&self, scene: &mut SceneGraph) {
        if let Some(ship) = scene.node_mut(self.ship_node) {
            ship.position.set_vec3(&self.position);
            // Screen y is flipped, so the drawn rotation mirrors the heading
            ship.rotation.set_z(-self.rot);
        }
    }

    /// Fire if the weapon has cooled down
    pub fn try_fire(&mut self, scene: &mut SceneGraph, dt: f32) {
        if !self.enabled {
            return;
        }
        self.since_last_fire += dt;
        if self.since_last_fire >= self.tuning.fire_interval {
            self.since_last_fire = 0.0;
            self.fire(scene);
        }
    }

    fn fire(&mut self, scene: &mut SceneGraph) {
        let origin = self.position + self.transform(BULLET_OFFSET);

        let recoil = self.transform(Vec3::new(0.0, -self.tuning.bullet_recoil, 0.0));
        self.speed.set_vec3(&(self.speed + recoil));

        let velocity = self.transform(Vec3::new(0.0, self.tuning.bullet_speed, 0.0)) + self.speed;
        let shot = BulletShot {
            origin,
            rot: self.rot,
            velocity,
            owner: self.owner,
        };
        if self.bullets.spawn(scene, Some(shot)).is_some() {
            self.shots_fired += 1;
        }
    }

    fn try_emit(&mut self, scene: &mut SceneGraph, dt: f32) {
        self.since_last_emit += dt;
        if self.since_last_emit >= self.tuning.emit_interval {
            self.since_last_emit = 0.0;
            self.emit_bubble(scene);
        }
    }

    fn emit_bubble(&mut self, scene: &mut SceneGraph) {
        let size = 1.0 + self.rng.random::<f32>();
        let offset_x = self.rng.random::<f32>() + self.rng.random::<f32>() - 1.0;
        let offset_y = (self.rng.random::<f32>() * 2.0 - 1.0) * 0.2;

        let spawn = BubbleSpawn {
            position: self.position + self.transform(Vec3::new(offset_x, -1.5 + offset_y, 0.0)),
            size,
            rot: self.rot,
            velocity: self.transform(Vec3::new(0.0, -self.tuning.bubble_speed, 0.0)) + self.speed,
        };
        self.bubbles.spawn(scene, Some(spawn));
    }

    /// World-space hull polygon
    pub fn hull(&self) -> Vec<Point2d> {
        HULL.iter()
            .map(|&p| Point2d::from(self.position + self.transform(Vec3::from(p))))
            .collect()
    }

    /// World-space body segment of every live bullet, with its node
    pub fn bullet_segments(&self, scene: &SceneGraph) -> Vec<(NodeId, Point2d, Point2d)> {
        self.bullets
            .particles()
            .iter()
            .filter_map(|p| {
                let node = scene.node(p.node())?;
                let rot = p.data.map(|shot| shot.rot).unwrap_or(0.0);
                let half = Vec3::new(0.0, BULLET_LENGTH / 2.0, 0.0).rotate_z(rot);
                let center = node.position;
                Some((p.node(), (center - half).into(), (center + half).into()))
            })
            .collect()
    }

    /// Consume a bullet that hit something
    pub fn retire_bullet(&mut self, scene: &mut SceneGraph, node: NodeId) -> bool {
        self.bullets.retire(scene, node)
    }

    /// Blow up: hide the hull, scatter fragments, stop steering
    pub fn explode(&mut self, scene: &mut SceneGraph) {
        if !self.enabled {
            return;
        }
        self.enabled = false;
        if let Some(ship) = scene.node_mut(self.ship_node) {
            ship.drawable.set_visible(false);
        }

        let n = self.tuning.explosion_fragments.max(1);
        for i in 0..n {
            let jitter = self.rng.random_range(-0.2..0.2);
            let angle = TAU * i as f32 / n as f32 + jitter;
            let dir = Vec3::new(0.0, 1.0, 0.0).rotate_z(angle);
            let fragment = Fragment {
                position: self.position,
                velocity: self.speed + dir * self.tuning.explosion_speed,
                spin: self.rng.random_range(-5.0..5.0),
            };
            self.explosion.spawn(scene, Some(fragment));
        }
        log::debug!("{} ship exploded at {:?}", self.owner.name(), self.position.to_array());

        self.speed = Vec3::ZERO;
        self.rot_speed = 0.0;
    }

    /// Put the ship back in play at `position` facing `rot`
    pub fn respawn(&mut self, scene: &mut SceneGraph, position: Vec3, rot: f32) {
        self.enabled = true;
        self.position.set_vec3(&position);
        self.speed = Vec3::ZERO;
        self.rot = rot;
        self.rot_speed = 0.0;
        self.since_last_fire = 0.0;
        self.since_last_emit = 0.0;
        self.explosion.clear(scene);
        if let Some(ship) = scene.node_mut(self.ship_node) {
            ship.drawable.set_visible(true);
        }
        self.apply_to_scene(scene);
    }

    /// Advance every effect pool
    pub fn update_particles(&mut self, scene: &mut SceneGraph, dt: f32) {
        self.bullets.update(scene, dt);
        self.bubbles.update(scene, dt);
        self.explosion.update(scene, dt);
    }

    /// Retire finished or off-screen effects
    pub fn check_particles(&mut self, scene: &mut SceneGraph) {
        self.bullets.check(scene);
        self.bubbles.check(scene);
        self.explosion.check(scene);
    }

    /// Retire every effect and hide the hull
    pub fn unload(&mut self, scene: &mut SceneGraph) {
        self.bullets.clear(scene);
        self.bubbles.clear(scene);
        self.explosion.clear(scene);
        self.enabled = false;
        if let Some(ship) = scene.node_mut(self.ship_node) {
            ship.drawable.set_visible(false);
        }
    }
}

fn hull_shape(color: &str) -> DrawableAsset {
    DrawableAsset::Polyline {
        path: HULL.to_vec(),
        closed: true,
        stroke: 0.5,
        color: color.to_string(),
    }
}

fn init_bullet(p: &mut Particle<BulletShot>, node: &mut Node, shot: Option<BulletShot>) {
    let Some(shot) = shot else {
        log::warn!("bullet spawned without a shot");
        return;
    };
    node.position.set_vec3(&shot.origin);
    node.rotation.set(0.0, 0.0, -shot.rot);
    if let Some(speed) = find_animation(&mut p.animations, "fire").and_then(|a| a.speed_mut()) {
        *speed = FieldValue::Vec3(shot.velocity);
    }
    p.data = Some(shot);
}

fn init_bubble(p: &mut Particle<BubbleSpawn>, node: &mut Node, spawn: Option<BubbleSpawn>) {
    let Some(spawn) = spawn else {
        return;
    };
    node.position.set_vec3(&spawn.position);
    node.scale.set(spawn.size, spawn.size, spawn.size);
    node.rotation.set(FRAC_PI_2, spawn.rot, 0.0);
    if let Some(speed) = find_animation(&mut p.animations, "move").and_then(|a| a.speed_mut()) {
        *speed = FieldValue::Vec3(spawn.velocity);
    }
}

fn init_fragment(p: &mut Particle<Fragment>, node: &mut Node, fragment: Option<Fragment>) {
    let Some(fragment) = fragment else {
        return;
    };
    node.position.set_vec3(&fragment.position);
    node.rotation.set(0.0, 0.0, 0.0);
    // Recycled fragments finished fully faded
    node.opacity.set(1.0);
    if let Some(speed) = find_animation(&mut p.animations, "move").and_then(|a| a.speed_mut()) {
        *speed = FieldValue::Vec3(fragment.velocity);
    }
    if let Some(speed) = find_animation(&mut p.animations, "spin").and_then(|a| a.speed_mut()) {
        *speed = FieldValue::Vec3(Vec3::new(0.0, 0.0, fragment.spin));
    }
}
