//! Scene nodes

use crate::drawable::{Drawable, DrawableAsset};
use crate::transform::{Mat4, IDENTITY};
use starfall_core::{NodeId, Scalar, Vec3};

/// One node of the scene graph.
///
/// Transform and appearance fields are public and individually
/// dirty-tracked; game code and animations write them directly.
#[derive(Debug, Clone)]
pub struct Node {
    id: NodeId,
    name: String,
    pub(crate) parent: Option<NodeId>,
    pub(crate) children: Vec<NodeId>,

    pub position: Vec3,
    /// Euler angles in radians
    pub rotation: Vec3,
    pub scale: Vec3,
    /// RGB, components in [0, 1]
    pub color: Vec3,
    pub opacity: Scalar,

    pub drawable: Drawable,

    /// World matrix from the last propagation pass
    pub(crate) world: Mat4,
}

impl Node {
    pub(crate) fn new(id: NodeId, name: impl Into<String>, asset: Option<DrawableAsset>) -> Self {
        let mut color = Vec3::new(1.0, 1.0, 1.0);
        let mut opacity = Scalar::new(1.0);
        color.clear_dirty();
        opacity.clear_dirty();

        Self {
            id,
            name: name.into(),
            parent: None,
            children: Vec::new(),
            position: Vec3::new(0.0, 0.0, 0.0),
            rotation: Vec3::new(0.0, 0.0, 0.0),
            scale: Vec3::new(1.0, 1.0, 1.0),
            color,
            opacity,
            drawable: Drawable::new(asset.unwrap_or_default()),
            world: IDENTITY,
        }
    }

    pub fn id(&self) -> NodeId {
        self.id
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn parent(&self) -> Option<NodeId> {
        self.parent
    }

    pub fn children(&self) -> &[NodeId] {
        &self.children
    }

    /// Get the nth direct child's id
    pub fn nth_child(&self, n: usize) -> Option<NodeId> {
        self.children.get(n).copied()
    }

    pub fn world_matrix(&self) -> &Mat4 {
        &self.world
    }

    /// World-space position as of the last propagation pass
    pub fn world_position(&self) -> Vec3 {
        Vec3::new(self.world[3][0], self.world[3][1], self.world[3][2])
    }

    /// Whether any transform field changed since the last clear
    pub fn transform_dirty(&self) -> bool {
        self.position.is_dirty() || self.rotation.is_dirty() || self.scale.is_dirty()
    }

    /// Push dirty fields into the drawable and clear their flags.
    ///
    /// Returns whether the transform changed (or `force` was set).
    pub fn update_drawable_self(&mut self, force: bool) -> bool {
        let moved = self.position.clear_dirty();
        let rotated = self.rotation.clear_dirty();
        let scaled = self.scale.clear_dirty();
        let transform_changed = force || moved || rotated || scaled;
        if transform_changed {
            self.drawable
                .update_transform(&self.position, &self.rotation, &self.scale);
        }

        let recolored = self.color.clear_dirty();
        let faded = self.opacity.clear_dirty();
        if force || recolored || faded {
            self.drawable.update_color(&self.color, &self.opacity);
        }

        transform_changed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn new_node_has_clean_appearance() {
        let node = Node::new(NodeId(0), "n", None);
        assert!(!node.color.is_dirty());
        assert!(!node.opacity.is_dirty());
        assert!(node.position.is_dirty());
        assert_eq!(node.scale, Vec3::ONE);
    }

    #[test]
    fn update_drawable_self_clears_flags() {
        let mut node = Node::new(NodeId(0), "n", None);
        assert!(node.update_drawable_self(false));
        assert!(!node.transform_dirty());
        assert!(!node.update_drawable_self(false));

        node.position.set(1.0, 2.0, 3.0);
        node.opacity.set(0.5);
        assert!(node.update_drawable_self(false));
        assert_eq!(node.drawable.translate, [1.0, 2.0, 3.0]);
        assert!((node.drawable.color[3] - 0.5).abs() < 1e-6);
    }

    #[test]
    fn forced_update_refreshes_drawable() {
        let mut node = Node::new(NodeId(0), "n", None);
        node.update_drawable_self(false);
        node.drawable.translate = [9.0; 3];
        assert!(node.update_drawable_self(true));
        assert_eq!(node.drawable.translate, [0.0; 3]);
    }
}
