//! Caller options and the compiled traversal configuration.
//!
//! `PathConfig` is the option map exactly as callers spell it (camelCase
//! keys, everything optional). `TraversalConfig::compile` validates it and
//! compiles the filter strings once; the result is never mutated.

use std::fmt;
use std::str::FromStr;

use serde::{de, Deserialize, Deserializer, Serialize};

use crate::filter::{
    compile_label_filter, compile_rel_filter, compile_sequence, LabelFilterSeq, NodeFilterSets,
    RelFilterSeq,
};
use crate::model::NodeId;
use crate::{Error, Result};

// ============================================================================
// Uniqueness
// ============================================================================

/// Revisit policy for nodes and relationships.
///
/// Option maps spell it in any case (`"node_global"`); unknown names fail
/// while the map is read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum Uniqueness {
    /// Anything may be revisited, bounded only by `maxLevel`.
    None,
    /// A node is entered at most once per traversal.
    NodeGlobal,
    /// A node appears at most once per path.
    #[default]
    NodePath,
    /// A node is entered at most once per depth.
    NodeLevel,
    /// A relationship is followed at most once per traversal.
    RelationshipGlobal,
    /// A relationship appears at most once per path.
    RelationshipPath,
    /// A relationship is followed at most once per depth.
    RelationshipLevel,
}

impl Uniqueness {
    pub const ALL: [Uniqueness; 7] = [
        Self::None,
        Self::NodeGlobal,
        Self::NodePath,
        Self::NodeLevel,
        Self::RelationshipGlobal,
        Self::RelationshipPath,
        Self::RelationshipLevel,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            Self::None => "NONE",
            Self::NodeGlobal => "NODE_GLOBAL",
            Self::NodePath => "NODE_PATH",
            Self::NodeLevel => "NODE_LEVEL",
            Self::RelationshipGlobal => "RELATIONSHIP_GLOBAL",
            Self::RelationshipPath => "RELATIONSHIP_PATH",
            Self::RelationshipLevel => "RELATIONSHIP_LEVEL",
        }
    }
}

impl fmt::Display for Uniqueness {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Uniqueness {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        let wanted = s.trim();
        Self::ALL
            .into_iter()
            .find(|u| u.as_str().eq_ignore_ascii_case(wanted))
            .ok_or_else(|| Error::IllegalArgument(format!("Unknown uniqueness '{s}'")))
    }
}

impl<'de> Deserialize<'de> for Uniqueness {
    fn deserialize<D: Deserializer<'de>>(deserializer: D) -> std::result::Result<Self, D::Error> {
        let name = String::deserialize(deserializer)?;
        name.parse().map_err(de::Error::custom)
    }
}

// ============================================================================
// PathConfig
// ============================================================================

/// Caller-facing option map.
///
/// ```rust
/// use path_expander::PathConfig;
///
/// let config = PathConfig::from_json(serde_json::json!({
///     "relationshipFilter": "ACTED_IN>",
///     "labelFilter": "+Movie",
///     "maxLevel": 2,
/// })).unwrap();
/// assert_eq!(config.max_level, 2);
/// assert!(config.bfs);
/// ```
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PathConfig {
    #[serde(default)]
    pub relationship_filter: Option<String>,

    #[serde(default)]
    pub label_filter: Option<String>,

    /// Alternating label/relationship steps. Overrides both filters when set.
    #[serde(default)]
    pub sequence: Option<String>,

    #[serde(default)]
    pub min_level: i64,

    /// Negative means unbounded.
    #[serde(default = "default_unbounded")]
    pub max_level: i64,

    #[serde(default)]
    pub uniqueness: Uniqueness,

    #[serde(default = "default_true")]
    pub bfs: bool,

    #[serde(default = "default_true")]
    pub begin_sequence_at_start: bool,

    #[serde(default)]
    pub filter_start_node: bool,

    /// Return a single empty row instead of no rows.
    #[serde(default)]
    pub optional: bool,

    /// Negative means unbounded.
    #[serde(default = "default_unbounded")]
    pub limit: i64,

    #[serde(default)]
    pub whitelist_nodes: Vec<NodeId>,

    #[serde(default)]
    pub blacklist_nodes: Vec<NodeId>,

    #[serde(default)]
    pub end_nodes: Vec<NodeId>,

    #[serde(default)]
    pub terminator_nodes: Vec<NodeId>,
}

fn default_unbounded() -> i64 {
    -1
}

fn default_true() -> bool {
    true
}

impl Default for PathConfig {
    fn default() -> Self {
        Self {
            relationship_filter: None,
            label_filter: None,
            sequence: None,
            min_level: 0,
            max_level: default_unbounded(),
            uniqueness: Uniqueness::default(),
            bfs: true,
            begin_sequence_at_start: true,
            filter_start_node: false,
            optional: false,
            limit: default_unbounded(),
            whitelist_nodes: Vec::new(),
            blacklist_nodes: Vec::new(),
            end_nodes: Vec::new(),
            terminator_nodes: Vec::new(),
        }
    }
}

impl PathConfig {
    /// Build from a JSON object. Unknown keys are ignored.
    pub fn from_json(value: serde_json::Value) -> Result<Self> {
        Ok(serde_json::from_value(value)?)
    }

    pub fn with_relationship_filter(mut self, filter: impl Into<String>) -> Self {
        self.relationship_filter = Some(filter.into());
        self
    }

    pub fn with_label_filter(mut self, filter: impl Into<String>) -> Self {
        self.label_filter = Some(filter.into());
        self
    }

    pub fn with_levels(mut self, min_level: i64, max_level: i64) -> Self {
        self.min_level = min_level;
        self.max_level = max_level;
        self
    }

    pub fn with_uniqueness(mut self, uniqueness: Uniqueness) -> Self {
        self.uniqueness = uniqueness;
        self
    }
}

// ============================================================================
// TraversalConfig
// ============================================================================

/// Validated, compiled traversal configuration.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct TraversalConfig {
    pub rel_filter: RelFilterSeq,
    pub label_filter: LabelFilterSeq,
    pub node_filters: NodeFilterSets,
    pub min_level: usize,
    /// `None` is unbounded.
    pub max_level: Option<usize>,
    pub uniqueness: Uniqueness,
    pub bfs: bool,
    pub begin_sequence_at_start: bool,
    pub filter_start_node: bool,
    pub optional: bool,
    /// `None` is unbounded.
    pub limit: Option<usize>,
}

impl Default for TraversalConfig {
    fn default() -> Self {
        Self {
            rel_filter: RelFilterSeq::default(),
            label_filter: LabelFilterSeq::default(),
            node_filters: NodeFilterSets::default(),
            min_level: 0,
            max_level: None,
            uniqueness: Uniqueness::default(),
            bfs: true,
            begin_sequence_at_start: true,
            filter_start_node: false,
            optional: false,
            limit: None,
        }
    }
}

impl TraversalConfig {
    /// Validate the option map and compile its filters.
    pub fn compile(config: &PathConfig) -> Result<Self> {
        let min_level = match config.min_level {
            -1 => 0,
            n if n < 0 => {
                return Err(Error::IllegalArgument(format!("minLevel must not be negative, got {n}")));
            }
            n => n as usize,
        };
        let max_level = usize::try_from(config.max_level).ok();
        if let Some(max) = max_level.filter(|max| *max < min_level) {
            return Err(Error::IllegalArgument(format!(
                "maxLevel ({max}) must not be below minLevel ({min_level})"
            )));
        }

        let sequence = config.sequence.as_deref().filter(|s| !s.trim().is_empty());
        let (rel_filter, label_filter) = match sequence {
            Some(seq) => compile_sequence(seq, config.begin_sequence_at_start)?,
            None => (
                compile_rel_filter(config.relationship_filter.as_deref().unwrap_or(""))?,
                compile_label_filter(config.label_filter.as_deref().unwrap_or(""))?,
            ),
        };

        let node_filters = NodeFilterSets::new(
            config.whitelist_nodes.iter().copied(),
            config.blacklist_nodes.iter().copied(),
            config.end_nodes.iter().copied(),
            config.terminator_nodes.iter().copied(),
        );

        Ok(Self {
            rel_filter,
            label_filter,
            node_filters,
            min_level,
            max_level,
            uniqueness: config.uniqueness,
            bfs: config.bfs,
            begin_sequence_at_start: config.begin_sequence_at_start,
            filter_start_node: config.filter_start_node,
            optional: config.optional,
            limit: usize::try_from(config.limit).ok(),
        })
    }
}
