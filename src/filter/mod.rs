//! # Filter Compilers
//!
//! Turns the caller's free-form filter strings into structured predicates,
//! once per invocation, so the traversal never re-parses text.
//!
//! ```text
//! "ACTED_IN>|<DIRECTED,FOLLOWS"  →  RelFilterSeq   [ {ACTED_IN out, DIRECTED in}, {FOLLOWS both} ]
//! "+Person|-Robot,/Movie"        →  LabelFilterSeq [ {+Person, -Robot}, {/Movie} ]
//! whitelistNodes / blacklistNodes / endNodes / terminatorNodes  →  NodeFilterSets
//! ```
//!
//! Top-level commas separate sequence positions, pipes separate the OR'd
//! alternatives inside one position.

pub mod label;
pub mod node;
pub mod rel;
pub mod sequence;

pub use label::{compile_label_filter, LabelClause, LabelFilterGroup, LabelFilterSeq, LabelKind, LabelMatch};
pub use node::{NodeClass, NodeFilterSets};
pub use rel::{compile_rel_filter, RelDirPair, RelFilterGroup, RelFilterSeq};
pub use sequence::compile_sequence;

use crate::Error;

/// Separator between sequence positions.
pub(crate) const POSITION_SEP: char = ',';
/// Separator between alternatives inside one position.
pub(crate) const ALTERNATIVE_SEP: char = '|';

pub(crate) fn syntax_error(filter: &str, message: impl Into<String>) -> Error {
    Error::InvalidFilterSyntax {
        filter: filter.to_string(),
        message: message.into(),
    }
}

/// Split one sequence position into trimmed alternatives.
///
/// Empty alternatives (`A||B`, a trailing `|`) are rejected.
pub(crate) fn split_alternatives<'a>(filter: &str, position: &'a str) -> crate::Result<Vec<&'a str>> {
    position
        .split(ALTERNATIVE_SEP)
        .map(str::trim)
        .map(|alt| {
            if alt.is_empty() {
                Err(syntax_error(filter, "empty alternative"))
            } else {
                Ok(alt)
            }
        })
        .collect()
}

/// Split a filter into trimmed sequence positions.
///
/// Returns `None` for a blank filter. Empty positions inside a non-blank
/// filter are rejected.
pub(crate) fn split_positions(filter: &str) -> crate::Result<Option<Vec<&str>>> {
    if filter.trim().is_empty() {
        return Ok(None);
    }
    filter
        .split(POSITION_SEP)
        .map(str::trim)
        .map(|pos| {
            if pos.is_empty() {
                Err(syntax_error(filter, "empty sequence position"))
            } else {
                Ok(pos)
            }
        })
        .collect::<crate::Result<Vec<_>>>()
        .map(Some)
}
