//! Branch evaluators.
//!
//! Each evaluator answers two questions about a branch: is its path part
//! of the result, and may the traversal continue past its end node. The
//! answers of all active evaluators are AND-ed together.

use crate::config::TraversalConfig;
use crate::filter::{LabelFilterSeq, LabelMatch, NodeFilterSets};
use crate::model::NodeId;

/// Verdict for one branch.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Evaluation {
    pub includes: bool,
    pub continues: bool,
}

impl Evaluation {
    pub const INCLUDE_AND_CONTINUE: Self = Self { includes: true, continues: true };
    pub const INCLUDE_AND_PRUNE: Self = Self { includes: true, continues: false };
    pub const EXCLUDE_AND_CONTINUE: Self = Self { includes: false, continues: true };
    pub const EXCLUDE_AND_PRUNE: Self = Self { includes: false, continues: false };

    pub fn of(includes: bool, continues: bool) -> Self {
        Self { includes, continues }
    }

    /// Both verdicts must agree.
    pub fn and(self, other: Self) -> Self {
        Self::of(self.includes && other.includes, self.continues && other.continues)
    }
}

/// The end node of a branch, as the evaluators see it.
#[derive(Debug, Clone, Copy)]
pub struct Candidate<'a> {
    pub node: NodeId,
    pub depth: usize,
    pub labels: &'a [String],
}

pub trait Evaluator {
    fn evaluate(&self, candidate: &Candidate<'_>) -> Evaluation;
}

// ============================================================================
// Level bounds
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct LevelEvaluator {
    pub min_level: usize,
    pub max_level: Option<usize>,
}

impl Evaluator for LevelEvaluator {
    fn evaluate(&self, candidate: &Candidate<'_>) -> Evaluation {
        Evaluation::of(
            candidate.depth >= self.min_level,
            self.max_level.is_none_or(|max| candidate.depth < max),
        )
    }
}

// ============================================================================
// Label sequence
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct LabelSequenceEvaluator<'c> {
    pub filter: &'c LabelFilterSeq,
    pub begin_sequence_at_start: bool,
    pub filter_start_node: bool,
    pub min_level: usize,
}

impl LabelSequenceEvaluator<'_> {
    fn admitted(&self) -> Evaluation {
        if self.filter.end_nodes_only() {
            Evaluation::EXCLUDE_AND_CONTINUE
        } else {
            Evaluation::INCLUDE_AND_CONTINUE
        }
    }
}

impl Evaluator for LabelSequenceEvaluator<'_> {
    fn evaluate(&self, candidate: &Candidate<'_>) -> Evaluation {
        let depth = candidate.depth;
        if depth == 0 && (!self.filter_start_node || !self.begin_sequence_at_start) {
            return self.admitted();
        }

        let index = if self.begin_sequence_at_start { depth } else { depth - 1 };
        let below_min = depth < self.min_level;

        match self.filter.group(index).classify(candidate.labels) {
            LabelMatch::Blacklisted | LabelMatch::Rejected => Evaluation::EXCLUDE_AND_PRUNE,
            LabelMatch::Terminator if below_min => Evaluation::EXCLUDE_AND_CONTINUE,
            LabelMatch::Terminator => Evaluation::INCLUDE_AND_PRUNE,
            LabelMatch::EndNode if below_min => Evaluation::EXCLUDE_AND_CONTINUE,
            LabelMatch::EndNode => Evaluation::INCLUDE_AND_CONTINUE,
            LabelMatch::Allowed => self.admitted(),
        }
    }
}

// ============================================================================
// Node sets
// ============================================================================

#[derive(Debug, Clone, Copy)]
pub struct NodeFilterEvaluator<'c> {
    pub sets: &'c NodeFilterSets,
    pub filter_start_node: bool,
    pub min_level: usize,
}

impl Evaluator for NodeFilterEvaluator<'_> {
    fn evaluate(&self, candidate: &Candidate<'_>) -> Evaluation {
        let end_roles = self.sets.has_end_roles();
        if candidate.depth == 0 && !self.filter_start_node {
            return if end_roles {
                Evaluation::EXCLUDE_AND_CONTINUE
            } else {
                Evaluation::INCLUDE_AND_CONTINUE
            };
        }

        let class = self.sets.classify(candidate.node);
        if class.is_blacklisted || !class.is_whitelisted {
            return Evaluation::EXCLUDE_AND_PRUNE;
        }
        if !end_roles {
            return Evaluation::INCLUDE_AND_CONTINUE;
        }

        if candidate.depth < self.min_level {
            Evaluation::EXCLUDE_AND_CONTINUE
        } else if class.is_terminator {
            Evaluation::INCLUDE_AND_PRUNE
        } else if class.is_end {
            Evaluation::INCLUDE_AND_CONTINUE
        } else {
            Evaluation::EXCLUDE_AND_CONTINUE
        }
    }
}

// ============================================================================
// All of the above
// ============================================================================

/// Every evaluator a `TraversalConfig` activates, AND-ed.
#[derive(Debug, Clone, Copy)]
pub struct CombinedEvaluator<'c> {
    levels: LevelEvaluator,
    labels: LabelSequenceEvaluator<'c>,
    nodes: NodeFilterEvaluator<'c>,
}

impl<'c> CombinedEvaluator<'c> {
    pub fn new(config: &'c TraversalConfig) -> Self {
        Self {
            levels: LevelEvaluator {
                min_level: config.min_level,
                max_level: config.max_level,
            },
            labels: LabelSequenceEvaluator {
                filter: &config.label_filter,
                begin_sequence_at_start: config.begin_sequence_at_start,
                filter_start_node: config.filter_start_node,
                min_level: config.min_level,
            },
            nodes: NodeFilterEvaluator {
                sets: &config.node_filters,
                filter_start_node: config.filter_start_node,
                min_level: config.min_level,
            },
        }
    }
}

impl Evaluator for CombinedEvaluator<'_> {
    fn evaluate(&self, candidate: &Candidate<'_>) -> Evaluation {
        let verdict = self.levels.evaluate(candidate).and(self.nodes.evaluate(candidate));
        if !verdict.includes && !verdict.continues {
            return verdict;
        }
        verdict.and(self.labels.evaluate(candidate))
    }
}
