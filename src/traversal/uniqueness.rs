//! Revisit bookkeeping for the configured `Uniqueness` policy.

use hashbrown::HashSet;

use crate::config::Uniqueness;
use crate::model::{NodeId, RelId, Relationship};
use super::Branch;

/// Decides whether a new branch may be created, recording what it needs to.
///
/// Global and level policies mark an entity when its branch is created, so
/// the first discovery wins. Path policies walk the parent chain.
#[derive(Debug)]
pub(crate) struct UniquenessTracker {
    policy: Uniqueness,
    nodes: HashSet<NodeId>,
    rels: HashSet<RelId>,
    nodes_at_level: HashSet<(usize, NodeId)>,
    rels_at_level: HashSet<(usize, RelId)>,
}

impl UniquenessTracker {
    pub(crate) fn new(policy: Uniqueness) -> Self {
        Self {
            policy,
            nodes: HashSet::new(),
            rels: HashSet::new(),
            nodes_at_level: HashSet::new(),
            rels_at_level: HashSet::new(),
        }
    }

    /// Register a start node. Returns false for a repeated start under a
    /// node-global or node-level policy.
    pub(crate) fn admit_start(&mut self, node: NodeId) -> bool {
        match self.policy {
            Uniqueness::NodeGlobal => self.nodes.insert(node),
            Uniqueness::NodeLevel => self.nodes_at_level.insert((0, node)),
            _ => true,
        }
    }

    /// Whether following `rel` from branch `parent` to `next` is allowed.
    pub(crate) fn admit(
        &mut self,
        arena: &[Branch],
        parent: usize,
        rel: &Relationship,
        next: NodeId,
    ) -> bool {
        let depth = arena[parent].depth + 1;
        match self.policy {
            Uniqueness::None => true,
            Uniqueness::NodeGlobal => self.nodes.insert(next),
            Uniqueness::NodeLevel => self.nodes_at_level.insert((depth, next)),
            Uniqueness::NodePath => !ancestors(arena, parent).any(|b| b.node == next),
            Uniqueness::RelationshipGlobal => self.rels.insert(rel.id),
            Uniqueness::RelationshipLevel => self.rels_at_level.insert((depth, rel.id)),
            Uniqueness::RelationshipPath => !ancestors(arena, parent)
                .filter_map(|b| b.via.as_ref())
                .any(|via| via.id == rel.id),
        }
    }
}

/// `index` and every branch above it, up to the root.
pub(crate) fn ancestors(arena: &[Branch], index: usize) -> impl Iterator<Item = &Branch> {
    std::iter::successors(Some(&arena[index]), move |b| b.parent.map(|p| &arena[p]))
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::traversal::Evaluation;

    fn branch(node: u64, depth: usize, parent: Option<usize>, via: Option<&Relationship>) -> Branch {
        Branch {
            node: NodeId(node),
            depth,
            parent,
            via: via.cloned(),
            verdict: Evaluation::INCLUDE_AND_CONTINUE,
        }
    }

    fn chain() -> (Vec<Branch>, Vec<Relationship>) {
        // 1 -r1-> 2 -r2-> 3
        let r1 = Relationship::new(RelId(1), NodeId(1), NodeId(2), "NEXT");
        let r2 = Relationship::new(RelId(2), NodeId(2), NodeId(3), "NEXT");
        let arena = vec![
            branch(1, 0, None, None),
            branch(2, 1, Some(0), Some(&r1)),
            branch(3, 2, Some(1), Some(&r2)),
        ];
        (arena, vec![r1, r2])
    }

    #[test]
    fn test_node_path_rejects_cycle() {
        let (arena, _) = chain();
        let back = Relationship::new(RelId(9), NodeId(3), NodeId(1), "NEXT");
        let mut t = UniquenessTracker::new(Uniqueness::NodePath);

        assert!(!t.admit(&arena, 2, &back, NodeId(1)));
        assert!(t.admit(&arena, 2, &back, NodeId(4)));
        // path checks keep no state
        assert!(t.admit(&arena, 2, &back, NodeId(4)));
    }

    #[test]
    fn test_relationship_path_rejects_reused_edge() {
        let (arena, rels) = chain();
        let mut t = UniquenessTracker::new(Uniqueness::RelationshipPath);

        assert!(!t.admit(&arena, 2, &rels[1], NodeId(2)));
        let fresh = Relationship::new(RelId(7), NodeId(3), NodeId(2), "BACK");
        assert!(t.admit(&arena, 2, &fresh, NodeId(2)));
    }

    #[test]
    fn test_global_first_discovery_wins() {
        let (arena, rels) = chain();
        let mut t = UniquenessTracker::new(Uniqueness::NodeGlobal);

        assert!(t.admit_start(NodeId(1)));
        assert!(!t.admit(&arena, 0, &rels[0], NodeId(1)));
        assert!(t.admit(&arena, 0, &rels[0], NodeId(2)));
        assert!(!t.admit(&arena, 1, &rels[1], NodeId(2)));
    }

    #[test]
    fn test_level_policy_is_per_depth() {
        let (arena, rels) = chain();
        let mut t = UniquenessTracker::new(Uniqueness::NodeLevel);

        assert!(t.admit(&arena, 0, &rels[0], NodeId(5)));
        assert!(!t.admit(&arena, 0, &rels[1], NodeId(5)));
        assert!(t.admit(&arena, 1, &rels[1], NodeId(5)));

        let mut t = UniquenessTracker::new(Uniqueness::RelationshipLevel);
        assert!(t.admit(&arena, 0, &rels[0], NodeId(2)));
        assert!(!t.admit(&arena, 0, &rels[0], NodeId(2)));
        assert!(t.admit(&arena, 1, &rels[0], NodeId(2)));
    }

    #[test]
    fn test_none_admits_everything() {
        let (arena, rels) = chain();
        let mut t = UniquenessTracker::new(Uniqueness::None);
        assert!(t.admit(&arena, 2, &rels[0], NodeId(1)));
        assert!(t.admit_start(NodeId(1)));
        assert!(t.admit_start(NodeId(1)));
    }

    #[test]
    fn test_ancestors_walks_to_root() {
        let (arena, _) = chain();
        let nodes: Vec<_> = ancestors(&arena, 2).map(|b| b.node).collect();
        assert_eq!(nodes, vec![NodeId(3), NodeId(2), NodeId(1)]);
    }
}
