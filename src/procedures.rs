//! apoc.path.* procedure handlers.
//!
//! Each handler compiles the caller's option map once, runs one traversal
//! and reduces the path stream to its result shape.

use crate::config::{PathConfig, TraversalConfig, Uniqueness};
use crate::graph::GraphAccess;
use crate::model::{NodeId, Path};
use crate::result::{self, PathResult, Subgraph};
use crate::traversal::traverse;
use crate::{Error, Result};

// ============================================================================
// Procedure registry
// ============================================================================

/// All registered apoc.path.* procedures that take an option map.
pub static PROCEDURE_NAMES: &[&str] = &[
    "apoc.path.expandConfig",  // Raw paths
    "apoc.path.subgraphNodes", // Distinct reachable nodes
    "apoc.path.subgraphAll",   // Reachable nodes plus their cover closure
    "apoc.path.spanningTree",  // One path per reachable node
];

/// Dispatch a procedure call to the appropriate handler.
pub fn dispatch<G>(name: &str, graph: &G, starts: &[NodeId], config: &PathConfig) -> Result<PathResult>
where
    G: GraphAccess + ?Sized,
{
    match name {
        "apoc.path.expandConfig" => expand_config(graph, starts, config).map(PathResult::RawPaths),
        "apoc.path.subgraphNodes" => subgraph_nodes(graph, starts, config).map(PathResult::DistinctNodes),
        "apoc.path.subgraphAll" => subgraph_all(graph, starts, config).map(PathResult::DistinctNodesAndRels),
        "apoc.path.spanningTree" => spanning_tree(graph, starts, config).map(PathResult::SpanningTree),
        _ => Err(Error::UnknownProcedure(name.to_string())),
    }
}

// ============================================================================
// Handlers
// ============================================================================

/// Positional form of `expand_config`. `None` filters match everything.
pub fn expand<G>(
    graph: &G,
    starts: &[NodeId],
    relationship_filter: Option<&str>,
    label_filter: Option<&str>,
    min_level: i64,
    max_level: i64,
) -> Result<Vec<Path>>
where
    G: GraphAccess + ?Sized,
{
    let config = PathConfig {
        relationship_filter: relationship_filter.map(str::to_string),
        label_filter: label_filter.map(str::to_string),
        ..PathConfig::default().with_levels(min_level, max_level)
    };
    Ok(expand_config(graph, starts, &config)?.into_iter().flatten().collect())
}

/// Every accepted path.
pub fn expand_config<G>(graph: &G, starts: &[NodeId], config: &PathConfig) -> Result<Vec<Option<Path>>>
where
    G: GraphAccess + ?Sized,
{
    tracing::debug!(procedure = "expandConfig", starts = starts.len(), "procedure invoked");
    check_starts(graph, starts)?;
    let compiled = TraversalConfig::compile(config)?;
    let paths = result::to_raw_paths(traverse(graph, starts, &compiled));
    Ok(result::optional_rows(paths, compiled.optional))
}

/// Distinct nodes reachable under the filters.
pub fn subgraph_nodes<G>(graph: &G, starts: &[NodeId], config: &PathConfig) -> Result<Vec<Option<NodeId>>>
where
    G: GraphAccess + ?Sized,
{
    tracing::debug!(procedure = "subgraphNodes", starts = starts.len(), "procedure invoked");
    check_starts(graph, starts)?;
    let compiled = subgraph_config(config, "subgraphNodes")?;
    let nodes = result::to_distinct_nodes(traverse(graph, starts, &compiled));
    Ok(result::optional_rows(nodes, compiled.optional))
}

/// Reachable nodes plus every relationship between them.
pub fn subgraph_all<G>(graph: &G, starts: &[NodeId], config: &PathConfig) -> Result<Subgraph>
where
    G: GraphAccess + ?Sized,
{
    tracing::debug!(procedure = "subgraphAll", starts = starts.len(), "procedure invoked");
    check_starts(graph, starts)?;
    let compiled = subgraph_config(config, "subgraphAll")?;
    Ok(result::to_distinct_all(graph, traverse(graph, starts, &compiled)))
}

/// One path per reachable node.
pub fn spanning_tree<G>(graph: &G, starts: &[NodeId], config: &PathConfig) -> Result<Vec<Option<Path>>>
where
    G: GraphAccess + ?Sized,
{
    tracing::debug!(procedure = "spanningTree", starts = starts.len(), "procedure invoked");
    check_starts(graph, starts)?;
    let compiled = subgraph_config(config, "spanningTree")?;
    let tree = result::to_spanning_tree(traverse(graph, starts, &compiled));
    Ok(result::optional_rows(tree, compiled.optional))
}

// ============================================================================
// Helpers
// ============================================================================

fn check_starts<G: GraphAccess + ?Sized>(graph: &G, starts: &[NodeId]) -> Result<()> {
    match starts.iter().find(|n| !graph.contains_node(**n)) {
        Some(missing) => Err(Error::NotFound(format!("Start node {missing}"))),
        None => Ok(()),
    }
}

/// Subgraph procedures always run breadth-first with node-global uniqueness
/// and only accept minLevel 0 or 1.
fn subgraph_config(config: &PathConfig, procedure: &str) -> Result<TraversalConfig> {
    if !matches!(config.min_level, -1..=1) {
        return Err(Error::IllegalArgument(format!(
            "minLevel can only be 0 or 1 in {procedure}()"
        )));
    }
    let forced = PathConfig {
        bfs: true,
        ..config.clone().with_uniqueness(Uniqueness::NodeGlobal)
    };
    TraversalConfig::compile(&forced)
}
