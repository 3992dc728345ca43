//! Relationship (edge) in the property graph.

use serde::{Deserialize, Serialize};
use super::NodeId;

/// Opaque relationship identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RelId(pub u64);

impl std::fmt::Display for RelId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

/// Traversal direction, always relative to the node being expanded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Direction {
    Outgoing,
    Incoming,
    Both,
}

impl Direction {
    /// Whether a relationship seen in direction `actual` satisfies `self`.
    pub fn admits(self, actual: Direction) -> bool {
        self == Direction::Both || self == actual
    }

    /// The narrowest direction covering both `self` and `other`.
    pub fn union(self, other: Direction) -> Direction {
        if self == other { self } else { Direction::Both }
    }
}

/// A relationship (directed edge) in the property graph.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Relationship {
    pub id: RelId,
    pub src: NodeId,
    pub dst: NodeId,
    pub rel_type: String,
}

impl Relationship {
    pub fn new(id: RelId, src: NodeId, dst: NodeId, rel_type: impl Into<String>) -> Self {
        Self {
            id,
            src,
            dst,
            rel_type: rel_type.into(),
        }
    }

    /// The "other" end of the relationship from the given node.
    pub fn other_node(&self, from: NodeId) -> Option<NodeId> {
        if from == self.src { Some(self.dst) }
        else if from == self.dst { Some(self.src) }
        else { None }
    }

    /// Direction of this relationship as seen from `from`.
    ///
    /// Self loops read as outgoing.
    pub fn direction_from(&self, from: NodeId) -> Option<Direction> {
        if from == self.src { Some(Direction::Outgoing) }
        else if from == self.dst { Some(Direction::Incoming) }
        else { None }
    }
}
