//! The combined `sequence` option.
//!
//! One comma-separated string alternates label and relationship steps:
//! `Person, ACTED_IN>, Movie, <DIRECTED`. With `beginSequenceAtStart` the
//! first step is a label step (matched against the start node), otherwise
//! the first step is a relationship step.

use crate::Result;
use super::label::{LabelFilterGroup, LabelFilterSeq};
use super::rel::{RelFilterGroup, RelFilterSeq};
use super::{split_positions, syntax_error};

/// Split a `sequence` string into its relationship and label halves.
pub fn compile_sequence(sequence: &str, begin_at_start: bool) -> Result<(RelFilterSeq, LabelFilterSeq)> {
    let Some(steps) = split_positions(sequence)? else {
        return Err(syntax_error(sequence, "sequence is blank"));
    };

    let mut rel_groups = Vec::new();
    let mut label_groups = Vec::new();
    for (i, step) in steps.into_iter().enumerate() {
        let is_label_step = (i % 2 == 0) == begin_at_start;
        if is_label_step {
            label_groups.push(LabelFilterGroup::parse(sequence, step)?);
        } else {
            rel_groups.push(RelFilterGroup::parse(sequence, step)?);
        }
    }

    let rels = RelFilterSeq::from_groups(rel_groups);
    let labels = LabelFilterSeq::from_groups(label_groups);
    tracing::trace!(sequence, rel_steps = rels.len(), label_steps = labels.len(), "compiled sequence");
    Ok((rels, labels))
}
