//! A single pooled particle

use starfall_animation::{animation_update, Animation};
use starfall_core::NodeId;
use starfall_scene::Node;

/// One particle: a scene node plus the animations driving it.
///
/// `data` is a typed slot for consumer state such as "fired by this ship".
/// It is cleared on every spawn.
#[derive(Debug, Clone)]
pub struct Particle<P> {
    node: NodeId,
    pub animations: Vec<Animation>,
    time: f32,
    keep_alive: bool,
    pub data: Option<P>,
}

impl<P> Particle<P> {
    pub(crate) fn new(node: NodeId) -> Self {
        Self {
            node,
            animations: Vec::new(),
            time: 0.0,
            keep_alive: false,
            data: None,
        }
    }

    pub fn node(&self) -> NodeId {
        self.node
    }

    /// Seconds since spawn
    pub fn time(&self) -> f32 {
        self.time
    }

    /// Whether any animation was still running on the last update
    pub fn keep_alive(&self) -> bool {
        self.keep_alive
    }

    pub(crate) fn reset(&mut self, animations: Vec<Animation>) {
        self.animations = animations;
        self.time = 0.0;
        self.keep_alive = false;
        self.data = None;
    }

    /// Advance the clock and apply animations to `node`
    pub(crate) fn update(&mut self, node: &mut Node, dt: f32) {
        self.time += dt;
        self.keep_alive = animation_update(node, &self.animations, self.time);
    }

    /// Mark as not progressed, for particles whose node went missing
    pub(crate) fn stall(&mut self, dt: f32) {
        self.time += dt;
        self.keep_alive = false;
    }
}
