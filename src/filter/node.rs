//! Node filter registry: caller-supplied node id sets.

use hashbrown::HashSet;
use serde::Serialize;

use crate::model::NodeId;

/// Membership of one node in the caller's node sets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct NodeClass {
    pub is_blacklisted: bool,
    /// Admitted by the whitelist. Always true when no whitelist is given.
    pub is_whitelisted: bool,
    pub is_end: bool,
    pub is_terminator: bool,
}

/// The four caller-supplied node sets, bundled and immutable.
///
/// A non-empty whitelist implicitly admits every end and terminator node.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct NodeFilterSets {
    whitelist: HashSet<NodeId>,
    blacklist: HashSet<NodeId>,
    end_nodes: HashSet<NodeId>,
    terminator_nodes: HashSet<NodeId>,
}

impl NodeFilterSets {
    pub fn new<W, B, E, T>(whitelist: W, blacklist: B, end_nodes: E, terminator_nodes: T) -> Self
    where
        W: IntoIterator<Item = NodeId>,
        B: IntoIterator<Item = NodeId>,
        E: IntoIterator<Item = NodeId>,
        T: IntoIterator<Item = NodeId>,
    {
        let mut whitelist: HashSet<NodeId> = whitelist.into_iter().collect();
        let end_nodes: HashSet<NodeId> = end_nodes.into_iter().collect();
        let terminator_nodes: HashSet<NodeId> = terminator_nodes.into_iter().collect();

        if !whitelist.is_empty() {
            whitelist.extend(end_nodes.iter().copied());
            whitelist.extend(terminator_nodes.iter().copied());
        }

        Self {
            whitelist,
            blacklist: blacklist.into_iter().collect(),
            end_nodes,
            terminator_nodes,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.whitelist.is_empty()
            && self.blacklist.is_empty()
            && self.end_nodes.is_empty()
            && self.terminator_nodes.is_empty()
    }

    /// End or terminator nodes were supplied, so only they are returned.
    pub fn has_end_roles(&self) -> bool {
        !self.end_nodes.is_empty() || !self.terminator_nodes.is_empty()
    }

    pub fn classify(&self, node: NodeId) -> NodeClass {
        NodeClass {
            is_blacklisted: self.blacklist.contains(&node),
            is_whitelisted: self.whitelist.is_empty() || self.whitelist.contains(&node),
            is_end: self.end_nodes.contains(&node),
            is_terminator: self.terminator_nodes.contains(&node),
        }
    }
}
