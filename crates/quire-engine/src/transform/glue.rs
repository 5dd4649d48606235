//! Merging a right-hand fragment onto the right edge of a left-hand one.
//!
//! The right fragment's left spine is walked from `border.depth()` up to its
//! root. Each node on it is merged into the deepest still-unused node of the
//! left fragment's right spine that can hold its content, or, when there is
//! none, left in place to be carried along by the next ancestor that does
//! merge.

use log::trace;
use quire_config::Compatibility;

use crate::addressing::{
    node_at, node_at_mut, right_spine_path, spine_left_at, spine_left_mut, spine_right_at,
};
use crate::model::{ContentKind, Node, NodeType, Pos, StyleSet};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlueOptions {
    pub compatibility: Compatibility,
    /// Give merged inline content the styles found at the end of its target.
    pub inherit_styles: bool,
}

/// Where a piece of right-hand content ended up.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Landing {
    /// Start of the piece in the document the right fragment was cut from.
    pub old: Pos,
    pub size: usize,
    pub new: Pos,
}

/// Depths of the nodes joined by one merge.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Merge {
    pub right_depth: usize,
    pub left_depth: usize,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct GlueSummary {
    /// The shallowest merge, if anything merged.
    pub last_merge: Option<Merge>,
    /// Right-spine nodes left unmerged since the last merge.
    pub cut_depth: usize,
}

/// Whether a node of type `b` at depth `b_depth` of the right fragment may
/// be merged into a node of type `a` at depth `a_depth` of the left one.
pub fn compatible(
    a: NodeType,
    a_depth: usize,
    b: NodeType,
    b_depth: usize,
    mode: Compatibility,
) -> bool {
    let kind = a.contains();
    if kind != b.contains() || kind == ContentKind::Nothing {
        return false;
    }
    match mode {
        Compatibility::Liberal => {
            matches!(kind, ContentKind::Block | ContentKind::Inline) || a == b
        }
        Compatibility::Strict => kind == ContentKind::Inline || (a == b && a_depth == b_depth),
    }
}

/// Merge `right` onto `left`.
///
/// `left_depth` is the deepest node of `left`'s right spine that may take
/// content, and `border` is the position `right` was cut at in its source
/// document. Every non-empty piece of content that moves is reported to
/// `on_landing`, in the order the pieces are appended.
pub fn glue<F>(
    left: &mut Node,
    left_depth: usize,
    mut right: Node,
    border: &Pos,
    options: &GlueOptions,
    mut on_landing: F,
) -> GlueSummary
where
    F: FnMut(Landing),
{
    let mut summary = GlueSummary::default();
    let mut candidate = Some(left_depth);

    for i_right in (0..=border.depth()).rev() {
        let node = spine_left_at(&right, i_right);
        if node.content.is_empty() {
            if i_right > 0 {
                spine_left_mut(&mut right, i_right - 1).content.remove(0);
            }
            continue;
        }

        let node_type = node.node_type();
        let found = candidate.and_then(|top| {
            (0..=top).rev().find(|&i| {
                (i == 0) == (i_right == 0)
                    && compatible(
                        spine_right_at(left, i).node_type(),
                        i,
                        node_type,
                        i_right,
                        options.compatibility,
                    )
            })
        });
        let Some(found) = found else {
            trace!("glue: no target for {node_type} at depth {i_right}, carrying it");
            summary.cut_depth += 1;
            continue;
        };

        let target_path = right_spine_path(left, found);
        let base = node_at(left, &target_path).size();

        for d in (1..=summary.cut_depth).rev() {
            let mut path = target_path.clone();
            path.push(base);
            path.extend(std::iter::repeat_n(0, d - 1));
            let landing = landing_for(
                &right,
                border,
                i_right + d,
                d < summary.cut_depth,
                Pos::new(path, 0),
            );
            if landing.size > 0 {
                on_landing(landing);
            }
        }
        let landing = landing_for(
            &right,
            border,
            i_right,
            summary.cut_depth > 0,
            Pos::new(target_path.clone(), base),
        );
        if landing.size > 0 {
            on_landing(landing);
        }

        let mut content = std::mem::take(&mut spine_left_mut(&mut right, i_right).content);
        if i_right > 0 {
            spine_left_mut(&mut right, i_right - 1).content.remove(0);
        }
        let target = node_at_mut(left, &target_path);
        if target.node_type().is_textblock() {
            let styles = if target.node_type().is_plain_text() {
                Some(StyleSet::new())
            } else if options.inherit_styles {
                Some(target.styles_at_end())
            } else {
                None
            };
            if let Some(styles) = styles {
                for inline in &mut content {
                    inline.styles = styles.clone();
                }
            }
            target.content.extend(content);
            target.coalesce_inline();
        } else {
            target.content.extend(content);
        }

        trace!(
            "glue: merged {node_type} at depth {i_right} into {} at depth {found}",
            target.node_type()
        );
        summary.last_merge = Some(Merge {
            right_depth: i_right,
            left_depth: found,
        });
        summary.cut_depth = 0;
        candidate = found.checked_sub(1);
    }

    summary
}

/// The landing of the content of the right-spine node at `depth`, placed at
/// `new`. With `first_kept`, its first child is a carried node reported by
/// its own landing, so it is left out here.
fn landing_for(right: &Node, border: &Pos, depth: usize, first_kept: bool, new: Pos) -> Landing {
    let size = spine_left_at(right, depth).size();
    let old = if depth == border.depth() {
        border.clone()
    } else {
        Pos::new(border.path[..depth].to_vec(), border.path[depth] + 1)
    };
    if first_kept {
        Landing {
            old,
            size: size - 1,
            new: Pos::new(new.path, new.offset + 1),
        }
    } else {
        Landing { old, size, new }
    }
}
