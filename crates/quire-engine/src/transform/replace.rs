//! The replace step: delete a range and splice in content copied from
//! another document.

use log::trace;
use quire_config::EngineConfig;
use serde::{Deserialize, Serialize};

use super::error::{TransformError, check_range};
use super::glue::{GlueOptions, Landing, glue};
use super::result::{Chunk, ReplacedRange, StepResult};
use crate::addressing::{node_at, right_spine_depth, right_spine_pos};
use crate::model::{Bias, Node, Pos, after, before, between};

/// The content spliced in by a replace: `doc` between `from` and `to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ReplaceSource {
    pub doc: Node,
    pub from: Pos,
    pub to: Pos,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct ReplaceStep {
    pub from: Pos,
    pub to: Pos,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub source: Option<ReplaceSource>,
    /// Inserted inline content takes the styles at the insertion point.
    #[serde(default)]
    pub inherit_styles: bool,
}

impl ReplaceStep {
    pub fn delete(from: Pos, to: Pos) -> Self {
        Self {
            from,
            to,
            source: None,
            inherit_styles: false,
        }
    }

    pub fn new(from: Pos, to: Pos, source: ReplaceSource) -> Self {
        Self {
            from,
            to,
            source: Some(source),
            inherit_styles: false,
        }
    }

    pub fn apply(&self, doc: &Node, config: &EngineConfig) -> Result<StepResult, TransformError> {
        let max_depth = config.limits.max_depth;
        check_range(doc, &self.from, &self.to, max_depth)?;
        if let Some(source) = &self.source {
            check_range(&source.doc, &source.from, &source.to, max_depth)?;
        }

        let mut output = before(doc, &self.from);
        let right = after(doc, &self.to);
        let mut landings = Vec::new();
        let mut depth_after = self.from.depth();

        if let Some(source) = &self.source {
            let middle = between(&source.doc, &source.from, &source.to);
            let options = GlueOptions {
                compatibility: config.glue.compatibility,
                inherit_styles: self.inherit_styles,
            };
            let summary = glue(
                &mut output,
                self.from.depth(),
                middle,
                &source.from,
                &options,
                |landing| landings.push(landing),
            );
            if let Some(merge) = summary.last_merge {
                // A source ending above the depth it merged at ends at the root.
                depth_after =
                    (source.to.depth() + merge.left_depth).saturating_sub(merge.right_depth);
            }
        }

        let depth_after = depth_after.min(right_spine_depth(&output));
        let join = right_spine_pos(&output, depth_after);
        trace!("replace {}..{}: join at {join}", self.from, self.to);

        let mut chunks = inserted_chunks(&self.from, landings, &join);
        chunks.extend(
            deleted_pieces(doc, &self.from, &self.to)
                .into_iter()
                .map(|(pos, size)| Chunk::deleted(pos, size, join.clone())),
        );

        let options = GlueOptions {
            compatibility: config.glue.compatibility,
            inherit_styles: false,
        };
        glue(&mut output, depth_after, right, &self.to, &options, |landing| {
            chunks.push(Chunk::moved(landing.old, landing.new, landing.size))
        });

        Ok(StepResult::new(
            output,
            chunks,
            Some(ReplacedRange {
                from: self.from.clone(),
                to: self.to.clone(),
                join,
            }),
        ))
    }

    /// The step that undoes this one, given the document it was applied to
    /// and its result.
    ///
    /// The old content goes back between `from` and the point where the
    /// content after `to` now starts. When the forward glue flattened or
    /// split containers that this would not rebuild, the inverse swaps the
    /// top-level blocks the step touched instead.
    pub fn invert(&self, old_doc: &Node, result: &StepResult, config: &EngineConfig) -> ReplaceStep {
        let inverse = ReplaceStep::new(
            self.from.clone(),
            result.map_biased(&self.to, Bias::Right).pos,
            ReplaceSource {
                doc: old_doc.clone(),
                from: self.from.clone(),
                to: self.to.clone(),
            },
        );
        match inverse.apply(result.doc(), config) {
            Ok(restored) if restored.doc() == old_doc => inverse,
            _ => {
                trace!(
                    "invert {}..{}: content does not fit back, swapping top-level blocks",
                    self.from, self.to
                );
                self.invert_blocks(old_doc, result.doc())
            }
        }
    }

    /// Replace the top-level blocks of `new_doc` that hold changed content
    /// with the matching blocks of `old_doc`. Blocks before `from` and after
    /// `to` are never touched by a replace, so they line up in both.
    fn invert_blocks(&self, old_doc: &Node, new_doc: &Node) -> ReplaceStep {
        let start = self.from.path.first().copied().unwrap_or(self.from.offset);
        let end = self.to.path.first().map_or(self.to.offset, |index| index + 1);
        let kept_after = old_doc.size() - end;
        ReplaceStep::new(
            Pos::new(Vec::new(), start),
            Pos::new(Vec::new(), new_doc.size() - kept_after),
            ReplaceSource {
                doc: old_doc.clone(),
                from: Pos::new(Vec::new(), start),
                to: Pos::new(Vec::new(), end),
            },
        )
    }
}

/// Inserted chunks for the landings of spliced content.
///
/// The content after the replaced range is appended along the right spine
/// down to `join`, so the landing holding the spine node only claims the
/// nodes before it, and the spine node is claimed level by level down to
/// the join point.
fn inserted_chunks(at: &Pos, landings: Vec<Landing>, join: &Pos) -> Vec<Chunk> {
    let mut chunks = Vec::new();
    let mut claim = |pos: Pos, size: usize| {
        if size > 0 {
            chunks.push(Chunk::inserted(at.clone(), pos, size));
        }
    };
    for landing in landings {
        let depth = landing.new.depth();
        let span = landing.new.offset..landing.new.offset + landing.size;
        if depth >= join.depth()
            || !join.path.starts_with(&landing.new.path)
            || !span.contains(&join.path[depth])
        {
            claim(landing.new, landing.size);
            continue;
        }
        let whole = join.path[depth] - landing.new.offset;
        claim(landing.new, whole);
        for k in depth + 1..join.depth() {
            claim(Pos::new(join.path[..k].to_vec(), 0), join.path[k]);
        }
        claim(Pos::new(join.path.clone(), 0), join.offset);
    }
    chunks
}

/// The content removed between `from` and `to`, one piece per container,
/// in document order. Empty pieces are left out.
fn deleted_pieces(doc: &Node, from: &Pos, to: &Pos) -> Vec<(Pos, usize)> {
    let mut pieces = Vec::new();
    let mut depth = 0;
    while depth < from.depth() && depth < to.depth() && from.path[depth] == to.path[depth] {
        depth += 1;
    }

    if depth == from.depth() && depth == to.depth() {
        pieces.push((from.clone(), to.offset - from.offset));
    } else {
        let start = if depth == from.depth() {
            from.offset
        } else {
            let end_of_from = node_at(doc, &from.path).size();
            pieces.push((from.clone(), end_of_from - from.offset));
            for k in (depth + 1..from.depth()).rev() {
                let parent = node_at(doc, &from.path[..k]);
                let index = from.path[k];
                pieces.push((
                    Pos::new(from.path[..k].to_vec(), index + 1),
                    parent.size() - index - 1,
                ));
            }
            from.path[depth] + 1
        };
        let end = if depth == to.depth() {
            to.offset
        } else {
            to.path[depth]
        };
        pieces.push((Pos::new(from.path[..depth].to_vec(), start), end - start));
        if depth < to.depth() {
            for k in depth + 1..to.depth() {
                pieces.push((Pos::new(to.path[..k].to_vec(), 0), to.path[k]));
            }
            pieces.push((Pos::new(to.path.clone(), 0), to.offset));
        }
    }

    pieces.retain(|(_, size)| *size > 0);
    pieces
}
