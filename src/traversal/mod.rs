//! # Traversal Engine
//!
//! Lazy expansion from a set of start nodes under a compiled
//! `TraversalConfig`.
//!
//! ```text
//!  frontier (FIFO for bfs, LIFO otherwise)
//!      │ pop
//!      ▼
//!  cancelled? ──yes──▶ stop
//!      │
//!  continues? ──yes──▶ expand: rel filter group for this depth,
//!      │                        uniqueness check, evaluate child,
//!      │                        push unless excluded and pruned
//!  includes? ──yes──▶ yield path (rebuilt from parent pointers)
//! ```
//!
//! Branches live in an arena and only store their parent's index, the
//! relationship that led to them and their verdict; paths are materialized
//! on yield. A branch that is neither included nor continued is dropped
//! before it reaches the arena.

pub mod evaluate;
mod uniqueness;

use std::collections::VecDeque;
use std::iter::FusedIterator;

use crate::config::TraversalConfig;
use crate::graph::GraphAccess;
use crate::model::{NodeId, Path, Relationship};

pub use evaluate::{Candidate, CombinedEvaluator, Evaluation, Evaluator};
use uniqueness::{ancestors, UniquenessTracker};

/// One explored branch: the path from a start node to `node`.
#[derive(Debug, Clone)]
pub(crate) struct Branch {
    pub(crate) node: NodeId,
    pub(crate) depth: usize,
    pub(crate) parent: Option<usize>,
    pub(crate) via: Option<Relationship>,
    pub(crate) verdict: Evaluation,
}

/// Start a traversal. Nothing is explored until the iterator is polled.
///
/// Start nodes the host does not know simply have no relationships; callers
/// that want an error check existence first.
pub fn traverse<'a, G>(graph: &'a G, starts: &[NodeId], config: &'a TraversalConfig) -> Traverser<'a, G>
where
    G: GraphAccess + ?Sized,
{
    Traverser::new(graph, starts, config)
}

/// Lazy sequence of accepted paths.
pub struct Traverser<'a, G: GraphAccess + ?Sized> {
    graph: &'a G,
    config: &'a TraversalConfig,
    evaluator: CombinedEvaluator<'a>,
    arena: Vec<Branch>,
    frontier: VecDeque<usize>,
    uniqueness: UniquenessTracker,
    level: usize,
    yielded: usize,
    done: bool,
}

impl<'a, G: GraphAccess + ?Sized> Traverser<'a, G> {
    fn new(graph: &'a G, starts: &[NodeId], config: &'a TraversalConfig) -> Self {
        let mut traverser = Self {
            graph,
            config,
            evaluator: CombinedEvaluator::new(config),
            arena: Vec::new(),
            frontier: VecDeque::new(),
            uniqueness: UniquenessTracker::new(config.uniqueness),
            level: 0,
            yielded: 0,
            done: false,
        };

        for &node in starts {
            if !traverser.uniqueness.admit_start(node) {
                continue;
            }
            let verdict = traverser.evaluate(node, 0);
            if verdict != Evaluation::EXCLUDE_AND_PRUNE {
                traverser.frontier.push_back(traverser.arena.len());
                traverser.arena.push(Branch { node, depth: 0, parent: None, via: None, verdict });
            }
        }

        tracing::debug!(
            starts = traverser.arena.len(),
            min_level = config.min_level,
            max_level = ?config.max_level,
            uniqueness = %config.uniqueness,
            bfs = config.bfs,
            "traversal started"
        );
        traverser
    }

    /// Branches kept so far, start branches included. Branches that are
    /// neither included nor continued are never kept.
    pub fn branches_created(&self) -> usize {
        self.arena.len()
    }

    /// Paths yielded so far.
    pub fn results(&self) -> usize {
        self.yielded
    }

    fn finish(&mut self) {
        if !self.done {
            self.done = true;
            tracing::debug!(branches = self.arena.len(), results = self.yielded, "traversal finished");
        }
    }

    fn evaluate(&self, node: NodeId, depth: usize) -> Evaluation {
        let labels = self.graph.labels_of(node);
        self.evaluator.evaluate(&Candidate { node, depth, labels: &labels })
    }

    fn pop(&mut self) -> Option<usize> {
        if self.config.bfs {
            self.frontier.pop_front()
        } else {
            self.frontier.pop_back()
        }
    }

    fn expand(&mut self, index: usize) {
        let Branch { node, depth, .. } = self.arena[index];
        let group = self.config.rel_filter.group_for_depth(depth);

        let first_child = self.arena.len();
        for rel in self.graph.relationships_of(node, group.direction()) {
            if !group.admits(&rel, node) {
                continue;
            }
            let Some(next) = rel.other_node(node) else {
                continue;
            };
            if !self.uniqueness.admit(&self.arena, index, &rel, next) {
                continue;
            }
            let verdict = self.evaluate(next, depth + 1);
            if verdict == Evaluation::EXCLUDE_AND_PRUNE {
                continue;
            }
            self.arena.push(Branch {
                node: next,
                depth: depth + 1,
                parent: Some(index),
                via: Some(rel),
                verdict,
            });
        }

        let children = first_child..self.arena.len();
        if self.config.bfs {
            self.frontier.extend(children);
        } else {
            // first child on top, so depth-first keeps adjacency order
            self.frontier.extend(children.rev());
        }
    }

    fn path_to(&self, index: usize) -> Path {
        let mut steps: Vec<&Branch> = ancestors(&self.arena, index).collect();
        steps.reverse();

        let mut path = Path::single(steps[0].node);
        for step in &steps[1..] {
            if let Some(rel) = &step.via {
                path.append(rel.clone(), step.node);
            }
        }
        path
    }
}

impl<G: GraphAccess + ?Sized> Iterator for Traverser<'_, G> {
    type Item = Path;

    fn next(&mut self) -> Option<Path> {
        loop {
            if self.done {
                return None;
            }
            if self.config.limit.is_some_and(|limit| self.yielded >= limit) {
                self.finish();
                return None;
            }
            let Some(index) = self.pop() else {
                self.finish();
                return None;
            };
            if self.graph.is_cancelled() {
                tracing::debug!(results = self.yielded, "traversal cancelled");
                self.finish();
                return None;
            }

            let Branch { depth, verdict, .. } = self.arena[index];
            if depth != self.level {
                tracing::trace!(depth, frontier = self.frontier.len(), "entering level");
                self.level = depth;
            }

            if verdict.continues {
                self.expand(index);
            }
            if verdict.includes {
                self.yielded += 1;
                return Some(self.path_to(index));
            }
        }
    }
}

impl<G: GraphAccess + ?Sized> FusedIterator for Traverser<'_, G> {}
