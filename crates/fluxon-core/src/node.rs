//! Node identifiers for circuit graphs.

use std::fmt;

use crate::error::{Error, Result};

/// Identifier of a circuit node.
///
/// Dynamical nodes are numbered `0..N`. Ground is a sentinel outside that
/// range and never carries a phase variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct NodeId(u32);

impl NodeId {
    /// The ground node.
    pub const GROUND: NodeId = NodeId(u32::MAX);

    /// Create a node id from its 0-based index.
    pub fn new(index: u32) -> Self {
        NodeId(index)
    }

    /// Get the raw node id value.
    pub fn as_u32(self) -> u32 {
        self.0
    }

    /// Check if this is the ground node.
    pub fn is_ground(self) -> bool {
        self == Self::GROUND
    }

    /// Index into per-node vectors (`None` for ground).
    pub fn index(self) -> Option<usize> {
        if self.is_ground() {
            None
        } else {
            Some(self.0 as usize)
        }
    }

    /// Check that this node exists in a circuit with `num_nodes` nodes.
    pub fn check(self, num_nodes: usize) -> Result<()> {
        match self.index() {
            Some(i) if i >= num_nodes => Err(Error::NodeOutOfRange {
                node: self.0,
                num_nodes,
            }),
            _ => Ok(()),
        }
    }
}

impl From<Option<u32>> for NodeId {
    /// `None` maps to ground, matching the "second terminal defaults to ground" rule.
    fn from(node: Option<u32>) -> Self {
        node.map_or(NodeId::GROUND, NodeId::new)
    }
}

impl fmt::Display for NodeId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.is_ground() {
            write!(f, "GND")
        } else {
            write!(f, "{}", self.0)
        }
    }
}
