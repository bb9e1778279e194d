//! Scene node handles

use serde::{Deserialize, Serialize};
use std::fmt;

/// Handle to a node stored in a scene graph arena.
///
/// Ids are assigned by the owning graph in allocation order and never reused,
/// so comparing two handles is an identity comparison of the underlying node.
#[derive(Clone, Copy, Hash, Eq, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(transparent)]
pub struct NodeId(pub u32);

impl NodeId {
    /// Create a NodeId from a raw value
    pub fn from_raw(id: u32) -> Self {
        Self(id)
    }

    /// Get the raw value
    pub fn raw(&self) -> u32 {
        self.0
    }

    /// Position of the node inside its arena
    pub fn index(&self) -> usize {
        self.0 as usize
    }
}

impl fmt::Debug for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "NodeId({})", self.0)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_raw() {
        let id = NodeId::from_raw(42);
        assert_eq!(id.raw(), 42);
        assert_eq!(id.index(), 42);
    }

    #[test]
    fn test_display() {
        assert_eq!(NodeId(3).to_string(), "#3");
        assert_eq!(format!("{:?}", NodeId(3)), "NodeId(3)");
    }
}
