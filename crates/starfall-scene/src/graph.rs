//! SceneGraph - arena of nodes with parent/child links

use crate::drawable::DrawableAsset;
use crate::node::Node;
use crate::transform::{local_matrix, mat4_mul, IDENTITY};
use starfall_core::{NodeId, Result, StarfallError};
use std::fmt::Write;

/// The retained scene graph.
///
/// Nodes are never freed; ids stay valid for the lifetime of the graph.
/// Particle pools rely on this to recycle nodes by handle.
pub struct SceneGraph {
    nodes: Vec<Node>,
    root: NodeId,
    /// Scratch stack for traversal, kept to avoid per-frame allocation
    search_stack: Vec<(NodeId, bool)>,
}

impl Default for SceneGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl SceneGraph {
    /// Create a graph holding only the root node
    pub fn new() -> Self {
        let root = NodeId(0);
        Self {
            nodes: vec![Node::new(root, "root", None)],
            root,
            search_stack: Vec::new(),
        }
    }

    pub fn root(&self) -> NodeId {
        self.root
    }

    /// Number of nodes ever created, including the root
    pub fn node_count(&self) -> usize {
        self.nodes.len()
    }

    /// Create a detached node. Attach it with [`SceneGraph::add_child`].
    pub fn create_node(&mut self, name: impl Into<String>, asset: Option<DrawableAsset>) -> NodeId {
        let id = NodeId(self.nodes.len() as u32);
        self.nodes.push(Node::new(id, name, asset));
        id
    }

    /// Create a node and attach it under `parent` in one step
    pub fn spawn_child(
        &mut self,
        parent: NodeId,
        name: impl Into<String>,
        asset: Option<DrawableAsset>,
    ) -> Result<NodeId> {
        let id = self.create_node(name, asset);
        self.add_child(parent, id)?;
        Ok(id)
    }

    pub fn node(&self, id: NodeId) -> Option<&Node> {
        self.nodes.get(id.index())
    }

    pub fn node_mut(&mut self, id: NodeId) -> Option<&mut Node> {
        self.nodes.get_mut(id.index())
    }

    pub fn get_node(&self, id: NodeId) -> Result<&Node> {
        self.node(id)
            .ok_or_else(|| StarfallError::NodeNotFound(id.to_string()))
    }

    pub fn get_node_mut(&mut self, id: NodeId) -> Result<&mut Node> {
        self.node_mut(id)
            .ok_or_else(|| StarfallError::NodeNotFound(id.to_string()))
    }

    pub fn contains(&self, id: NodeId) -> bool {
        id.index() < self.nodes.len()
    }

    /// Attach `child` under `parent`, detaching it from any previous parent.
    pub fn add_child(&mut self, parent: NodeId, child: NodeId) -> Result<()> {
        if !self.contains(parent) {
            return Err(StarfallError::NodeNotFound(parent.to_string()));
        }
        if !self.contains(child) {
            return Err(StarfallError::NodeNotFound(child.to_string()));
        }
        if self.is_ancestor_or_self(child, parent) {
            return Err(StarfallError::SceneError(format!(
                "cannot attach {} under its own descendant {}",
                child, parent
            )));
        }

        if let Some(old_parent) = self.nodes[child.index()].parent.take() {
            self.nodes[old_parent.index()]
                .children
                .retain(|&c| c != child);
        }

        self.nodes[child.index()].parent = Some(parent);
        self.nodes[parent.index()].children.push(child);
        // A re-parented subtree needs its world matrices refreshed
        let position = self.nodes[child.index()].position;
        self.nodes[child.index()].position.set_vec3(&position);
        Ok(())
    }

    /// Walk up from `node` looking for `ancestor`
    fn is_ancestor_or_self(&self, ancestor: NodeId, node: NodeId) -> bool {
        let mut current = Some(node);
        while let Some(id) = current {
            if id == ancestor {
                return true;
            }
            current = self.nodes[id.index()].parent;
        }
        false
    }

    pub fn parent(&self, id: NodeId) -> Option<NodeId> {
        self.node(id).and_then(|n| n.parent)
    }

    pub fn children(&self, id: NodeId) -> &[NodeId] {
        self.node(id).map(|n| n.children()).unwrap_or(&[])
    }

    /// Presentation pass, run once per frame after game logic.
    ///
    /// Walks the tree from the root, pushes dirty fields into drawables and
    /// recomputes world matrices for every node whose own transform or any
    /// ancestor's transform changed. Hidden drawables are parked off screen.
    pub fn propagate(&mut self) {
        let mut stack = std::mem::take(&mut self.search_stack);
        stack.clear();
        stack.push((self.root, false));

        while let Some((id, parent_changed)) = stack.pop() {
            let parent_world = self.nodes[id.index()]
                .parent
                .map(|p| self.nodes[p.index()].world)
                .unwrap_or(IDENTITY);

            let node = &mut self.nodes[id.index()];
            let changed = node.update_drawable_self(false) || parent_changed;
            if changed {
                let local = local_matrix(&node.position, &node.rotation, &node.scale);
                node.world = mat4_mul(&parent_world, &local);
            }
            node.drawable.update_visibility();

            stack.extend(node.children.iter().rev().map(|&c| (c, changed)));
        }

        self.search_stack = stack;
    }

    /// Render the tree as indented text, one node per line.
    pub fn print_tree(&self) -> String {
        let id_width = self.nodes.len().to_string().len();
        let mut out = String::new();
        self.print_node(self.root, "", id_width, &mut out);
        out
    }

    fn print_node(&self, id: NodeId, prefix: &str, id_width: usize, out: &mut String) {
        let Some(node) = self.node(id) else {
            return;
        };
        let _ = writeln!(out, "{}[{:>width$}] {}", prefix, id.raw(), node.name(), width = id_width);
        let child_prefix = format!("{}  ", prefix);
        for &child in node.children() {
            self.print_node(child, &child_prefix, id_width, out);
        }
    }
}
