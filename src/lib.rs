//! # path-expander: Configurable Path Expansion over Property Graphs
//!
//! Explores outward from start nodes under relationship type/direction
//! sequences, per-level label predicates, caller-supplied node sets, level
//! bounds and a uniqueness policy, and returns paths, nodes, subgraphs or
//! spanning trees.
//!
//! ## Design Principles
//!
//! 1. **Trait-first**: `GraphAccess` is the contract between the engine and the host graph
//! 2. **Clean DTOs**: `NodeId`, `Relationship`, `Path` cross all boundaries
//! 3. **Compile once**: filter strings become tagged predicates before traversal starts
//! 4. **Lazy**: the traversal is an iterator; limits and cancellation stop it early
//!
//! ## Quick Start
//!
//! ```rust
//! use path_expander::{procedures, MemoryGraph, PathConfig, PropertyMap};
//!
//! # fn example() -> path_expander::Result<()> {
//! let graph = MemoryGraph::new();
//! let keanu = graph.create_node(&["Person"], PropertyMap::new());
//! let matrix = graph.create_node(&["Movie"], PropertyMap::new());
//! graph.create_relationship(keanu, matrix, "ACTED_IN")?;
//!
//! let config = PathConfig::from_json(serde_json::json!({
//!     "relationshipFilter": "ACTED_IN>",
//!     "labelFilter": ">Movie",
//! }))?;
//! let movies = procedures::subgraph_nodes(&graph, &[keanu], &config)?;
//! assert_eq!(movies, vec![Some(matrix)]);
//! # Ok(())
//! # }
//! # example().unwrap();
//! ```
//!
//! ## Procedures
//!
//! | Procedure | Function | Result |
//! |-----------|----------|--------|
//! | `apoc.path.expandConfig` | `expand_config` | every accepted path |
//! | `apoc.path.subgraphNodes` | `subgraph_nodes` | distinct end nodes |
//! | `apoc.path.subgraphAll` | `subgraph_all` | end nodes plus their cover closure |
//! | `apoc.path.spanningTree` | `spanning_tree` | one path per end node |

// ============================================================================
// Modules
// ============================================================================

pub mod model;
pub mod graph;
pub mod filter;
pub mod config;
pub mod traversal;
pub mod result;
pub mod procedures;

// ============================================================================
// Re-exports: Model (the DTOs)
// ============================================================================

pub use model::{
    Node, Relationship, Path, Value, PropertyMap,
    NodeId, RelId, Direction, props,
};

// ============================================================================
// Re-exports: Host graph, configuration, engine
// ============================================================================

pub use graph::{GraphAccess, MemoryGraph, CancellationToken, CancellableGraph};
pub use config::{PathConfig, TraversalConfig, Uniqueness};
pub use traversal::{traverse, Traverser, Evaluation};
pub use result::{PathResult, Subgraph};

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, thiserror::Error)]
pub enum Error {
    #[error("Invalid filter syntax in '{filter}': {message}")]
    InvalidFilterSyntax { filter: String, message: String },

    #[error("Illegal argument: {0}")]
    IllegalArgument(String),

    #[error("Not found: {0}")]
    NotFound(String),

    #[error("Unknown procedure: {0}")]
    UnknownProcedure(String),

    #[error("Invalid configuration: {0}")]
    Config(#[from] serde_json::Error),
}

impl Error {
    /// Grammar, validation and option-map failures.
    pub fn is_illegal_argument(&self) -> bool {
        matches!(
            self,
            Self::InvalidFilterSyntax { .. } | Self::IllegalArgument(_) | Self::Config(_)
        )
    }
}

pub type Result<T> = std::result::Result<T, Error>;
