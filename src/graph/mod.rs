//! # Graph Access Trait
//!
//! This is the contract between the path expander and whatever graph store
//! hosts the data. The engine only ever needs four things from a host:
//! node existence, label sets, incident relationships, and a polled
//! cancellation signal.
//!
//! ## Implementations
//!
//! | Host | Module | Description |
//! |------|--------|-------------|
//! | `MemoryGraph` | `memory` | In-memory property graph for testing/embedding |
//! | `CancellableGraph` | here | Wraps any host with a `CancellationToken` |

pub mod memory;

use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::model::*;

pub use memory::MemoryGraph;

// ============================================================================
// GraphAccess Trait
// ============================================================================

/// Read-only graph capability consumed by the traversal engine.
///
/// Implementations must be safe for concurrent reads: several traversals may
/// run against one host from different threads.
pub trait GraphAccess: Sync {
    /// Whether the host knows this node.
    fn contains_node(&self, node: NodeId) -> bool;

    /// Labels of a node. Unknown nodes have no labels.
    fn labels_of(&self, node: NodeId) -> Vec<String>;

    /// Relationships incident to `node` in the given direction.
    ///
    /// Each relationship is reported once, self loops included, in a stable
    /// order. Traversal output order follows this order.
    fn relationships_of(&self, node: NodeId, dir: Direction) -> Vec<Relationship>;

    /// Polled cooperative cancellation. Checked before every branch expansion.
    fn is_cancelled(&self) -> bool {
        false
    }
}

impl<G: GraphAccess + ?Sized> GraphAccess for &G {
    fn contains_node(&self, node: NodeId) -> bool {
        (**self).contains_node(node)
    }

    fn labels_of(&self, node: NodeId) -> Vec<String> {
        (**self).labels_of(node)
    }

    fn relationships_of(&self, node: NodeId, dir: Direction) -> Vec<Relationship> {
        (**self).relationships_of(node, dir)
    }

    fn is_cancelled(&self) -> bool {
        (**self).is_cancelled()
    }
}

// ============================================================================
// Cancellation
// ============================================================================

/// Shared cancellation flag. Clones observe the same flag.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Release);
    }

    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Acquire)
    }
}

/// A host whose `is_cancelled` reports a `CancellationToken`.
pub struct CancellableGraph<G> {
    inner: G,
    token: CancellationToken,
}

impl<G: GraphAccess> CancellableGraph<G> {
    pub fn new(inner: G, token: CancellationToken) -> Self {
        Self { inner, token }
    }
}

impl<G: GraphAccess> GraphAccess for CancellableGraph<G> {
    fn contains_node(&self, node: NodeId) -> bool {
        self.inner.contains_node(node)
    }

    fn labels_of(&self, node: NodeId) -> Vec<String> {
        self.inner.labels_of(node)
    }

    fn relationships_of(&self, node: NodeId, dir: Direction) -> Vec<Relationship> {
        self.inner.relationships_of(node, dir)
    }

    fn is_cancelled(&self) -> bool {
        self.token.is_cancelled() || self.inner.is_cancelled()
    }
}
