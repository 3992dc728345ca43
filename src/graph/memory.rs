//! In-memory graph host.
//!
//! This is the reference implementation of `GraphAccess`.
//! It uses simple HashMaps protected by RwLock.
//!
//! ## Limitations
//!
//! - **No transactions**: writes are applied immediately and are visible to
//!   traversals that start afterwards. Mutating the graph while a traversal
//!   is running is allowed but the traversal may observe either state.
//! - **No property indexes**: `nodes_by_property()` does a label scan.
//!
//! Use this host for:
//! - Testing the filter compiler and traversal engine
//! - Embedding the path expander in applications that don't need persistence

use std::collections::HashMap;
use std::sync::atomic::{AtomicU64, Ordering};

use parking_lot::RwLock;

use crate::model::*;
use crate::{Error, Result};
use super::GraphAccess;

// ============================================================================
// MemoryGraph
// ============================================================================

/// In-memory property graph.
pub struct MemoryGraph {
    nodes: RwLock<HashMap<NodeId, Node>>,
    relationships: RwLock<HashMap<RelId, Relationship>>,
    /// node_id → relationship IDs in creation order
    adjacency: RwLock<HashMap<NodeId, Vec<RelId>>>,
    /// label → node IDs in creation order (poor man's label index)
    label_index: RwLock<HashMap<String, Vec<NodeId>>>,
    next_node_id: AtomicU64,
    next_rel_id: AtomicU64,
}

impl Default for MemoryGraph {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryGraph {
    pub fn new() -> Self {
        Self {
            nodes: RwLock::new(HashMap::new()),
            relationships: RwLock::new(HashMap::new()),
            adjacency: RwLock::new(HashMap::new()),
            label_index: RwLock::new(HashMap::new()),
            next_node_id: AtomicU64::new(1),
            next_rel_id: AtomicU64::new(1),
        }
    }

    // ========================================================================
    // Nodes
    // ========================================================================

    /// Create a node with the given labels and properties.
    pub fn create_node(&self, labels: &[&str], props: PropertyMap) -> NodeId {
        let id = NodeId(self.next_node_id.fetch_add(1, Ordering::Relaxed));
        let node = Node {
            id,
            labels: labels.iter().map(|l| l.to_string()).collect(),
            properties: props,
        };

        {
            let mut idx = self.label_index.write();
            for label in &node.labels {
                idx.entry(label.clone()).or_default().push(id);
            }
        }

        self.nodes.write().insert(id, node);
        self.adjacency.write().insert(id, Vec::new());

        id
    }

    /// Get a node by ID. Returns None if not found.
    pub fn node(&self, id: NodeId) -> Option<Node> {
        self.nodes.read().get(&id).cloned()
    }

    /// Add a label to a node.
    pub fn add_label(&self, id: NodeId, label: &str) -> Result<()> {
        let mut nodes = self.nodes.write();
        let node = nodes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        if !node.has_label(label) {
            node.labels.push(label.to_string());
            drop(nodes);
            self.label_index.write().entry(label.to_string()).or_default().push(id);
        }
        Ok(())
    }

    /// Remove a label from a node.
    pub fn remove_label(&self, id: NodeId, label: &str) -> Result<()> {
        let mut nodes = self.nodes.write();
        let node = nodes.get_mut(&id).ok_or_else(|| Error::NotFound(format!("Node {id}")))?;
        node.labels.retain(|l| l != label);
        drop(nodes);
        if let Some(ids) = self.label_index.write().get_mut(label) {
            ids.retain(|nid| *nid != id);
        }
        Ok(())
    }

    // ========================================================================
    // Relationships
    // ========================================================================

    /// Create a relationship between two existing nodes.
    pub fn create_relationship(&self, src: NodeId, dst: NodeId, rel_type: &str) -> Result<RelId> {
        {
            let nodes = self.nodes.read();
            if !nodes.contains_key(&src) {
                return Err(Error::NotFound(format!("Source node {src}")));
            }
            if !nodes.contains_key(&dst) {
                return Err(Error::NotFound(format!("Target node {dst}")));
            }
        }

        let id = RelId(self.next_rel_id.fetch_add(1, Ordering::Relaxed));
        self.relationships.write().insert(id, Relationship::new(id, src, dst, rel_type));

        let mut adj = self.adjacency.write();
        adj.entry(src).or_default().push(id);
        if src != dst {
            adj.entry(dst).or_default().push(id);
        }

        Ok(id)
    }

    // ========================================================================
    // Lookup
    // ========================================================================

    /// Node IDs carrying `label`, in creation order.
    pub fn nodes_by_label(&self, label: &str) -> Vec<NodeId> {
        self.label_index.read().get(label).cloned().unwrap_or_default()
    }

    /// Node IDs with `label` whose property `key` equals `value`.
    pub fn nodes_by_property(&self, label: &str, key: &str, value: &Value) -> Vec<NodeId> {
        let idx = self.label_index.read();
        let nodes = self.nodes.read();

        idx.get(label)
            .map(|ids| {
                ids.iter()
                    .filter(|id| nodes.get(id).and_then(|n| n.get(key)) == Some(value))
                    .copied()
                    .collect()
            })
            .unwrap_or_default()
    }
}

// ============================================================================
// GraphAccess impl
// ============================================================================

impl GraphAccess for MemoryGraph {
    fn contains_node(&self, node: NodeId) -> bool {
        self.nodes.read().contains_key(&node)
    }

    fn labels_of(&self, node: NodeId) -> Vec<String> {
        self.nodes.read().get(&node).map(|n| n.labels.clone()).unwrap_or_default()
    }

    fn relationships_of(&self, node: NodeId, dir: Direction) -> Vec<Relationship> {
        let adj = self.adjacency.read();
        let rels = self.relationships.read();

        let Some(rel_ids) = adj.get(&node) else {
            return Vec::new();
        };

        rel_ids
            .iter()
            .filter_map(|rid| rels.get(rid))
            .filter(|rel| match dir {
                Direction::Outgoing => rel.src == node,
                Direction::Incoming => rel.dst == node,
                Direction::Both => true,
            })
            .cloned()
            .collect()
    }
}

// ============================================================================
// Tests
// ============================================================================
