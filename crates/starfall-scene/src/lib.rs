//! Starfall Scene - Retained scene graph
//!
//! Nodes live in an arena owned by [`SceneGraph`] and are addressed by
//! [`NodeId`](starfall_core::NodeId). Each node carries tracked
//! position/rotation/scale/color/opacity fields and a [`Drawable`]. Once per
//! frame [`SceneGraph::propagate`] pushes dirty fields into drawables and
//! recomputes world transforms for changed subtrees.

mod drawable;
mod graph;
mod node;
mod transform;

pub use drawable::{Drawable, DrawableAsset, HIDDEN_POSITION};
pub use graph::SceneGraph;
pub use node::Node;
pub use transform::{local_matrix, mat4_mul, Mat4, IDENTITY};
