//! Label filter grammar.
//!
//! ```text
//! filter      := position ("," position)*
//! position    := clause ("|" clause)*
//! clause      := ["+" | "-" | "/" | ">"] label (":" label)*
//! ```
//!
//! | Prefix | Kind | Effect on a matching node |
//! |--------|------|---------------------------|
//! | `+` | whitelist | admitted |
//! | `-` | blacklist | excluded, branch pruned |
//! | `/` | terminator | returned, branch pruned |
//! | `>` | end node | returned, branch continues |
//! | none | plain | same as whitelist |
//!
//! `A:B` requires both labels. `*` matches any node.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use smallvec::{smallvec, SmallVec};

use crate::Result;
use super::{split_alternatives, split_positions, syntax_error};

const WILDCARD: &str = "*";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
pub enum LabelKind {
    Whitelist,
    Blacklist,
    Terminator,
    EndNode,
    Plain,
}

impl LabelKind {
    fn from_prefix(c: char) -> Option<Self> {
        match c {
            '+' => Some(Self::Whitelist),
            '-' => Some(Self::Blacklist),
            '/' => Some(Self::Terminator),
            '>' => Some(Self::EndNode),
            _ => None,
        }
    }

    fn prefix(self) -> &'static str {
        match self {
            Self::Whitelist => "+",
            Self::Blacklist => "-",
            Self::Terminator => "/",
            Self::EndNode => ">",
            Self::Plain => "",
        }
    }

    /// Terminator and end-node clauses decide which nodes get returned.
    pub fn is_end_role(self) -> bool {
        matches!(self, Self::Terminator | Self::EndNode)
    }
}

/// One label alternative: a kind plus the labels a node must all carry.
///
/// An empty label list is the `*` wildcard.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct LabelClause {
    pub kind: LabelKind,
    labels: SmallVec<[String; 2]>,
}

impl LabelClause {
    pub fn new<I, S>(kind: LabelKind, labels: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let labels = labels
            .into_iter()
            .map(Into::into)
            .filter(|l: &String| l != WILDCARD)
            .collect();
        Self { kind, labels }
    }

    pub fn labels(&self) -> &[String] {
        &self.labels
    }

    pub fn is_wildcard(&self) -> bool {
        self.labels.is_empty()
    }

    /// Whether a node carrying `node_labels` matches every label of the clause.
    pub fn matches(&self, node_labels: &[String]) -> bool {
        self.labels.iter().all(|l| node_labels.contains(l))
    }

    pub(crate) fn parse(filter: &str, token: &str) -> Result<Self> {
        let (kind, rest) = match token.chars().next().and_then(LabelKind::from_prefix) {
            Some(kind) => (kind, token[1..].trim_start()),
            None => (LabelKind::Plain, token),
        };

        if rest.is_empty() {
            return Err(syntax_error(filter, format!("'{token}' has a prefix but no label")));
        }
        if rest.chars().next().and_then(LabelKind::from_prefix).is_some() {
            return Err(syntax_error(filter, format!("'{token}' has more than one prefix")));
        }

        let mut labels: SmallVec<[&str; 2]> = SmallVec::new();
        for part in rest.split(':').map(str::trim) {
            if part.is_empty() {
                return Err(syntax_error(filter, format!("'{token}' has an empty label")));
            }
            labels.push(part);
        }

        Ok(Self::new(kind, labels))
    }
}

impl fmt::Display for LabelClause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.labels.is_empty() {
            write!(f, "{}{WILDCARD}", self.kind.prefix())
        } else {
            write!(f, "{}{}", self.kind.prefix(), self.labels.join(":"))
        }
    }
}

/// Outcome of matching a node's labels against one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelMatch {
    Blacklisted,
    Terminator,
    EndNode,
    /// Whitelisted, or the group has no whitelist to fail.
    Allowed,
    /// The group has whitelist clauses and none matched.
    Rejected,
}

/// OR'd label clauses valid for one depth.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelFilterGroup {
    clauses: SmallVec<[LabelClause; 4]>,
}

impl LabelFilterGroup {
    /// Admits every node.
    pub fn any() -> Self {
        Self { clauses: smallvec![LabelClause::new(LabelKind::Plain, [WILDCARD])] }
    }

    pub(crate) fn parse(filter: &str, position: &str) -> Result<Self> {
        let clauses = split_alternatives(filter, position)?
            .into_iter()
            .map(|token| LabelClause::parse(filter, token))
            .collect::<Result<_>>()?;
        Ok(Self { clauses })
    }

    pub fn clauses(&self) -> &[LabelClause] {
        &self.clauses
    }

    fn any_of(&self, kind: LabelKind, labels: &[String]) -> bool {
        self.clauses.iter().any(|c| c.kind == kind && c.matches(labels))
    }

    /// Match with fixed precedence: blacklist, terminator, end node, whitelist.
    pub fn classify(&self, labels: &[String]) -> LabelMatch {
        if self.any_of(LabelKind::Blacklist, labels) {
            return LabelMatch::Blacklisted;
        }
        if self.any_of(LabelKind::Terminator, labels) {
            return LabelMatch::Terminator;
        }
        if self.any_of(LabelKind::EndNode, labels) {
            return LabelMatch::EndNode;
        }

        let mut whitelist = self
            .clauses
            .iter()
            .filter(|c| matches!(c.kind, LabelKind::Whitelist | LabelKind::Plain))
            .peekable();
        if whitelist.peek().is_none() || whitelist.any(|c| c.matches(labels)) {
            LabelMatch::Allowed
        } else {
            LabelMatch::Rejected
        }
    }
}

/// Compiled label filter: one group per sequence position.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LabelFilterSeq {
    groups: Vec<LabelFilterGroup>,
    end_nodes_only: bool,
}

impl Default for LabelFilterSeq {
    fn default() -> Self {
        Self::from_groups(Vec::new())
    }
}

impl LabelFilterSeq {
    pub(crate) fn from_groups(groups: Vec<LabelFilterGroup>) -> Self {
        let groups = if groups.is_empty() { vec![LabelFilterGroup::any()] } else { groups };
        let end_nodes_only = groups
            .iter()
            .flat_map(|g| g.clauses.iter())
            .any(|c| c.kind.is_end_role());
        Self { groups, end_nodes_only }
    }

    pub fn groups(&self) -> &[LabelFilterGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    pub fn is_sequence(&self) -> bool {
        self.groups.len() > 1
    }

    /// Any terminator or end-node clause anywhere in the filter.
    ///
    /// When set, only nodes matched by those clauses are returned.
    pub fn end_nodes_only(&self) -> bool {
        self.end_nodes_only
    }

    /// Group at sequence position `index`, wrapping around.
    pub fn group(&self, index: usize) -> &LabelFilterGroup {
        &self.groups[index % self.groups.len()]
    }
}

impl FromStr for LabelFilterSeq {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        compile_label_filter(s)
    }
}

/// Compile a label filter string. Blank input admits everything.
pub fn compile_label_filter(filter: &str) -> Result<LabelFilterSeq> {
    let seq = match split_positions(filter)? {
        None => LabelFilterSeq::default(),
        Some(positions) => LabelFilterSeq::from_groups(
            positions
                .into_iter()
                .map(|pos| LabelFilterGroup::parse(filter, pos))
                .collect::<Result<_>>()?,
        ),
    };
    tracing::trace!(filter, groups = seq.len(), end_nodes_only = seq.end_nodes_only, "compiled label filter");
    Ok(seq)
}
