use thiserror::Error;

use crate::model::{Node, NodeType, Pos};

/// Why a step could not be applied. A failed step leaves the document
/// untouched.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum TransformError {
    #[error("position {pos} does not exist in the document")]
    InvalidPosition { pos: Pos },

    #[error("range start {from} is after its end {to}")]
    InvertedRange { from: Pos, to: Pos },

    #[error("cannot insert inline content at {pos}: {node_type} does not hold inline content")]
    InlineNotAllowed { pos: Pos, node_type: NodeType },

    #[error("position depth {depth} exceeds the limit of {max}")]
    TooDeep { depth: usize, max: usize },
}

/// Reject positions deeper than `max_depth` or not present in `doc`.
pub(crate) fn check_position(
    doc: &Node,
    pos: &Pos,
    max_depth: usize,
) -> Result<(), TransformError> {
    if pos.depth() > max_depth {
        return Err(TransformError::TooDeep {
            depth: pos.depth(),
            max: max_depth,
        });
    }
    if !pos.is_valid_in(doc) {
        return Err(TransformError::InvalidPosition { pos: pos.clone() });
    }
    Ok(())
}

/// Both ends checked, and in order.
pub(crate) fn check_range(
    doc: &Node,
    from: &Pos,
    to: &Pos,
    max_depth: usize,
) -> Result<(), TransformError> {
    check_position(doc, from, max_depth)?;
    check_position(doc, to, max_depth)?;
    if from > to {
        return Err(TransformError::InvertedRange {
            from: from.clone(),
            to: to.clone(),
        });
    }
    Ok(())
}
