//! Draw layers

use starfall_core::{NodeId, Result};
use starfall_scene::SceneGraph;

/// Draw layers, back to front by value
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Layer {
    Background = 0,
    EnemyBubble = 80,
    PlayerBubble = 90,
    Enemy = 180,
    Player = 190,
    EnemyBullet = 280,
    PlayerBullet = 290,
    EnemyExplosion = 380,
    PlayerExplosion = 390,
}

impl Layer {
    pub const ALL: [Layer; 9] = [
        Layer::Background,
        Layer::EnemyBubble,
        Layer::PlayerBubble,
        Layer::Enemy,
        Layer::Player,
        Layer::EnemyBullet,
        Layer::PlayerBullet,
        Layer::EnemyExplosion,
        Layer::PlayerExplosion,
    ];

    pub fn name(self) -> &'static str {
        match self {
            Layer::Background => "background",
            Layer::EnemyBubble => "enemy_bubble",
            Layer::PlayerBubble => "player_bubble",
            Layer::Enemy => "enemy",
            Layer::Player => "player",
            Layer::EnemyBullet => "enemy_bullet",
            Layer::PlayerBullet => "player_bullet",
            Layer::EnemyExplosion => "enemy_explosion",
            Layer::PlayerExplosion => "player_explosion",
        }
    }

    /// Z offset of the layer's node; higher draws in front
    pub fn depth(self) -> f32 {
        self as i32 as f32 * 0.01
    }
}

/// One scene node per layer, children of a common parent
#[derive(Debug, Clone)]
pub struct LayerNodes {
    nodes: Vec<(Layer, NodeId)>,
}

impl LayerNodes {
    pub fn create(scene: &mut SceneGraph, parent: NodeId) -> Result<Self> {
        let mut nodes = Vec::with_capacity(Layer::ALL.len());
        for layer in Layer::ALL {
            let id = scene.spawn_child(parent, layer.name(), None)?;
            scene.get_node_mut(id)?.position.set_z(layer.depth());
            nodes.push((layer, id));
        }
        Ok(Self { nodes })
    }

    pub fn node(&self, layer: Layer) -> NodeId {
        self.nodes
            .iter()
            .find(|(l, _)| *l == layer)
            .map(|(_, id)| *id)
            .unwrap_or(self.nodes[0].1)
    }
}
