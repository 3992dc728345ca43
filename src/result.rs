//! Result Builder: reducers from the traversal's path stream to the public
//! result shapes.

use hashbrown::HashSet;
use serde::Serialize;

use crate::graph::GraphAccess;
use crate::model::{Direction, NodeId, Path, Relationship};

/// Nodes plus every relationship directly connecting two of them.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct Subgraph {
    pub nodes: Vec<NodeId>,
    pub relationships: Vec<Relationship>,
}

/// Output of one procedure call.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "mode", content = "rows")]
pub enum PathResult {
    RawPaths(Vec<Option<Path>>),
    DistinctNodes(Vec<Option<NodeId>>),
    DistinctNodesAndRels(Subgraph),
    SpanningTree(Vec<Option<Path>>),
}

impl PathResult {
    /// Number of rows. A subgraph is always one row.
    pub fn len(&self) -> usize {
        match self {
            Self::RawPaths(rows) | Self::SpanningTree(rows) => rows.len(),
            Self::DistinctNodes(rows) => rows.len(),
            Self::DistinctNodesAndRels(_) => 1,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Every accepted path, duplicates included.
pub fn to_raw_paths(paths: impl IntoIterator<Item = Path>) -> Vec<Path> {
    paths.into_iter().collect()
}

/// End nodes of the paths, first discovery first.
pub fn to_distinct_nodes(paths: impl IntoIterator<Item = Path>) -> Vec<NodeId> {
    let mut seen = HashSet::new();
    paths
        .into_iter()
        .map(|p| p.end())
        .filter(|n| seen.insert(*n))
        .collect()
}

/// At most one path per end node; the first one discovered wins.
pub fn to_spanning_tree(paths: impl IntoIterator<Item = Path>) -> Vec<Path> {
    let mut seen = HashSet::new();
    paths.into_iter().filter(|p| seen.insert(p.end())).collect()
}

/// Distinct end nodes and their cover closure.
///
/// Relationships are listed per node in node order, each once (from its
/// source node), in the host's adjacency order.
pub fn to_distinct_all<G>(graph: &G, paths: impl IntoIterator<Item = Path>) -> Subgraph
where
    G: GraphAccess + ?Sized,
{
    let nodes = to_distinct_nodes(paths);
    let members: HashSet<NodeId> = nodes.iter().copied().collect();

    let relationships = nodes
        .iter()
        .flat_map(|&n| graph.relationships_of(n, Direction::Outgoing))
        .filter(|rel| members.contains(&rel.dst))
        .collect();

    Subgraph { nodes, relationships }
}

/// `[None]` for an empty optional result, otherwise every row wrapped.
pub fn optional_rows<T>(rows: Vec<T>, optional: bool) -> Vec<Option<T>> {
    if optional && rows.is_empty() {
        vec![None]
    } else {
        rows.into_iter().map(Some).collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::MemoryGraph;
    use crate::model::{PropertyMap, RelId};
    use pretty_assertions::assert_eq;

    fn path(nodes: &[u64]) -> Path {
        let mut p = Path::single(NodeId(nodes[0]));
        for (i, w) in nodes.windows(2).enumerate() {
            let rel = Relationship::new(RelId(i as u64 + 1), NodeId(w[0]), NodeId(w[1]), "R");
            p.append(rel, NodeId(w[1]));
        }
        p
    }

    #[test]
    fn test_distinct_nodes_keeps_first_discovery_order() {
        let paths = vec![path(&[1]), path(&[1, 3]), path(&[1, 2]), path(&[1, 2, 3])];
        assert_eq!(to_distinct_nodes(paths), vec![NodeId(1), NodeId(3), NodeId(2)]);
    }

    #[test]
    fn test_spanning_tree_one_path_per_end() {
        let paths = vec![path(&[1]), path(&[1, 3]), path(&[1, 2]), path(&[1, 2, 3])];
        let tree = to_spanning_tree(paths.clone());
        assert_eq!(tree, vec![path(&[1]), path(&[1, 3]), path(&[1, 2])]);
        assert_eq!(tree.len(), to_distinct_nodes(paths).len());
    }

    #[test]
    fn test_raw_then_distinct_equals_distinct() {
        let paths = vec![path(&[1, 2]), path(&[1, 2]), path(&[1, 3])];
        assert_eq!(
            to_distinct_nodes(to_raw_paths(paths.clone())),
            to_distinct_nodes(paths)
        );
    }

    #[test]
    fn test_cover_closure_includes_non_traversal_edges() {
        let g = MemoryGraph::new();
        let a = g.create_node(&["N"], PropertyMap::new());
        let b = g.create_node(&["N"], PropertyMap::new());
        let c = g.create_node(&["N"], PropertyMap::new());
        let d = g.create_node(&["N"], PropertyMap::new());
        let ab = g.create_relationship(a, b, "R").unwrap();
        let ac = g.create_relationship(a, c, "R").unwrap();
        let cb = g.create_relationship(c, b, "R").unwrap();
        g.create_relationship(c, d, "R").unwrap();
        let bb = g.create_relationship(b, b, "SELF").unwrap();

        // traversal reached b and c straight from a
        let paths = vec![path(&[a.0]), path(&[a.0, b.0]), path(&[a.0, c.0])];
        let sub = to_distinct_all(&g, paths);

        assert_eq!(sub.nodes, vec![a, b, c]);
        let ids: Vec<_> = sub.relationships.iter().map(|r| r.id).collect();
        assert_eq!(ids, vec![ab, ac, bb, cb]);
    }

    #[test]
    fn test_optional_rows() {
        assert_eq!(optional_rows(Vec::<u8>::new(), true), vec![None]);
        assert_eq!(optional_rows(Vec::<u8>::new(), false), Vec::<Option<u8>>::new());
        assert_eq!(optional_rows(vec![1], true), vec![Some(1)]);
    }

    #[test]
    fn test_path_result_len() {
        assert_eq!(PathResult::DistinctNodesAndRels(Subgraph::default()).len(), 1);
        assert!(PathResult::RawPaths(vec![]).is_empty());
    }
}
