//! Relationship filter grammar.
//!
//! ```text
//! filter      := position ("," position)*
//! position    := alternative ("|" alternative)*
//! alternative := ["<" | ">"] TYPE? | TYPE ["<" | ">"]
//! ```
//!
//! `<` marks INCOMING, `>` marks OUTGOING, no marker means BOTH. A marker
//! on its own (`>`) matches any type in that direction.

use std::fmt;
use std::str::FromStr;

use serde::Serialize;
use smallvec::{smallvec, SmallVec};

use crate::model::{Direction, NodeId, Relationship};
use crate::Result;
use super::{split_alternatives, split_positions, syntax_error};

/// One relationship alternative: optional type plus direction.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize)]
pub struct RelDirPair {
    pub rel_type: Option<String>,
    pub direction: Direction,
}

impl RelDirPair {
    /// Any type, either direction.
    pub fn any() -> Self {
        Self { rel_type: None, direction: Direction::Both }
    }

    pub fn new(rel_type: Option<&str>, direction: Direction) -> Self {
        Self { rel_type: rel_type.map(str::to_string), direction }
    }

    /// Whether `rel`, seen in direction `actual` from the expanded node, fits.
    pub fn matches(&self, rel: &Relationship, actual: Direction) -> bool {
        let type_ok = self.rel_type.as_deref().is_none_or(|t| t == rel.rel_type);
        let dir_ok = rel.src == rel.dst || self.direction.admits(actual);
        type_ok && dir_ok
    }

    pub(crate) fn parse(filter: &str, token: &str) -> Result<Self> {
        let (lead, rest) = match token.chars().next() {
            Some(c @ ('<' | '>')) => (Some(c), &token[1..]),
            _ => (None, token),
        };
        let (trail, name) = match rest.chars().last() {
            Some(c @ ('<' | '>')) => (Some(c), &rest[..rest.len() - 1]),
            _ => (None, rest),
        };

        if lead.is_some() && trail.is_some() {
            return Err(syntax_error(filter, format!("'{token}' has direction markers on both sides")));
        }
        let name = name.trim();
        if name.contains(['<', '>']) {
            return Err(syntax_error(filter, format!("'{token}' has a misplaced direction marker")));
        }

        let direction = match lead.or(trail) {
            Some('<') => Direction::Incoming,
            Some(_) => Direction::Outgoing,
            None => Direction::Both,
        };
        let rel_type = (!name.is_empty()).then_some(name);

        Ok(Self::new(rel_type, direction))
    }
}

impl fmt::Display for RelDirPair {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = self.rel_type.as_deref().unwrap_or("");
        match self.direction {
            Direction::Outgoing => write!(f, "{name}>"),
            Direction::Incoming => write!(f, "<{name}"),
            Direction::Both => write!(f, "{name}"),
        }
    }
}

/// OR'd relationship alternatives valid for one hop.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelFilterGroup {
    alternatives: SmallVec<[RelDirPair; 4]>,
}

impl RelFilterGroup {
    pub fn any() -> Self {
        Self { alternatives: smallvec![RelDirPair::any()] }
    }

    pub(crate) fn parse(filter: &str, position: &str) -> Result<Self> {
        let mut alternatives = SmallVec::new();
        for token in split_alternatives(filter, position)? {
            let pair = RelDirPair::parse(filter, token)?;
            if !alternatives.contains(&pair) {
                alternatives.push(pair);
            }
        }
        Ok(Self { alternatives })
    }

    pub fn alternatives(&self) -> &[RelDirPair] {
        &self.alternatives
    }

    /// The direction to ask the host for: the union over all alternatives.
    pub fn direction(&self) -> Direction {
        self.alternatives
            .iter()
            .map(|p| p.direction)
            .reduce(Direction::union)
            .unwrap_or(Direction::Both)
    }

    /// Whether `rel`, expanded from `from`, satisfies any alternative.
    pub fn admits(&self, rel: &Relationship, from: NodeId) -> bool {
        match rel.direction_from(from) {
            Some(actual) => self.alternatives.iter().any(|p| p.matches(rel, actual)),
            None => false,
        }
    }
}

/// Compiled relationship filter: one group per sequence position.
///
/// A filter without commas has a single group, which then applies at every
/// hop. Longer sequences repeat from the start once exhausted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct RelFilterSeq {
    groups: Vec<RelFilterGroup>,
}

impl Default for RelFilterSeq {
    fn default() -> Self {
        Self { groups: vec![RelFilterGroup::any()] }
    }
}

impl RelFilterSeq {
    pub(crate) fn from_groups(groups: Vec<RelFilterGroup>) -> Self {
        if groups.is_empty() { Self::default() } else { Self { groups } }
    }

    pub fn groups(&self) -> &[RelFilterGroup] {
        &self.groups
    }

    pub fn len(&self) -> usize {
        self.groups.len()
    }

    pub fn is_empty(&self) -> bool {
        self.groups.is_empty()
    }

    /// Sequence mode: more than one position.
    pub fn is_sequence(&self) -> bool {
        self.groups.len() > 1
    }

    /// Group governing the hop that leaves a node at `depth`.
    pub fn group_for_depth(&self, depth: usize) -> &RelFilterGroup {
        &self.groups[depth % self.groups.len()]
    }
}

impl FromStr for RelFilterSeq {
    type Err = crate::Error;

    fn from_str(s: &str) -> Result<Self> {
        compile_rel_filter(s)
    }
}

/// Compile a relationship filter string. Blank input matches everything.
pub fn compile_rel_filter(filter: &str) -> Result<RelFilterSeq> {
    let seq = match split_positions(filter)? {
        None => RelFilterSeq::default(),
        Some(positions) => RelFilterSeq::from_groups(
            positions
                .into_iter()
                .map(|pos| RelFilterGroup::parse(filter, pos))
                .collect::<Result<_>>()?,
        ),
    };
    tracing::trace!(filter, groups = seq.len(), "compiled relationship filter");
    Ok(seq)
}
