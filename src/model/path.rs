//! Paths: alternating nodes and relationships.

use serde::Serialize;
use super::{NodeId, Relationship};

/// A path in the graph: node -[rel]- node -[rel]- node ...
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct Path {
    /// Nodes along the path. Always has one more element than `relationships`.
    nodes: Vec<NodeId>,
    /// Relationships connecting consecutive nodes.
    relationships: Vec<Relationship>,
}

impl Path {
    pub fn single(node: NodeId) -> Self {
        Self { nodes: vec![node], relationships: Vec::new() }
    }

    pub fn len(&self) -> usize {
        self.relationships.len()
    }

    pub fn is_empty(&self) -> bool {
        self.relationships.is_empty()
    }

    pub fn start(&self) -> NodeId {
        self.nodes[0]
    }

    pub fn end(&self) -> NodeId {
        self.nodes[self.nodes.len() - 1]
    }

    pub fn nodes(&self) -> &[NodeId] {
        &self.nodes
    }

    pub fn relationships(&self) -> &[Relationship] {
        &self.relationships
    }

    /// Extend path with a relationship and the node it leads to.
    pub fn append(&mut self, rel: Relationship, node: NodeId) {
        self.relationships.push(rel);
        self.nodes.push(node);
    }
}
