//! Edits as sequences of invertible steps.
//!
//! A [`Transform`] starts from a document and applies [`Step`]s one at a
//! time, keeping every intermediate result so that positions can be mapped
//! through the whole sequence and the sequence can be undone.

mod error;
pub mod glue;
mod replace;
mod result;
mod step;
mod style;

pub use error::TransformError;
pub use glue::{GlueOptions, GlueSummary, Landing, Merge};
pub use replace::{ReplaceSource, ReplaceStep};
pub use result::{Chunk, ChunkKind, Mapped, ReplacedRange, StepResult};
pub use step::Step;
pub use style::{StyleSpec, StyleStep};

use log::{debug, warn};
use quire_config::EngineConfig;

use crate::addressing::node_at;
use crate::model::build;
use crate::model::{Bias, Node, Pos, Style, StyleSet, resolve};
use error::{check_position, check_range};
use style::{non_text_spans, plan_add_style, plan_remove_style};

#[derive(Debug, Clone)]
pub struct Transform {
    before: Node,
    config: EngineConfig,
    steps: Vec<Step>,
    results: Vec<StepResult>,
}

impl Transform {
    pub fn new(doc: Node) -> Self {
        Self::with_config(doc, &EngineConfig::default())
    }

    pub fn with_config(doc: Node, config: &EngineConfig) -> Self {
        Self {
            before: doc,
            config: config.clone(),
            steps: Vec::new(),
            results: Vec::new(),
        }
    }

    /// The document after every step applied so far.
    pub fn doc(&self) -> &Node {
        self.results.last().map_or(&self.before, StepResult::doc)
    }

    /// The document the transform started from.
    pub fn before(&self) -> &Node {
        &self.before
    }

    pub fn steps(&self) -> &[Step] {
        &self.steps
    }

    pub fn results(&self) -> &[StepResult] {
        &self.results
    }

    pub fn into_doc(mut self) -> Node {
        match self.results.pop() {
            Some(result) => result.into_doc(),
            None => self.before,
        }
    }

    /// Apply `step` to the current document. A failing step changes
    /// nothing; steps applied before it stay applied.
    pub fn step(&mut self, step: Step) -> Result<&mut Self, TransformError> {
        let (from, to) = step.range();
        debug!("applying {} step {from}..{to}", step.name());
        let result = step.apply(self.doc(), &self.config)?;
        self.steps.push(step);
        self.results.push(result);
        Ok(self)
    }

    /// Map a position in [`before`](Self::before) through every step.
    pub fn map(&self, pos: &Pos) -> Mapped {
        self.results.iter().fold(
            Mapped {
                pos: pos.clone(),
                deleted: false,
            },
            |mapped, result| {
                let next = result.map(&mapped.pos);
                Mapped {
                    pos: next.pos,
                    deleted: mapped.deleted || next.deleted,
                }
            },
        )
    }

    /// The steps that undo this transform, in the order they must be
    /// applied to [`doc`](Self::doc).
    pub fn invert(&self) -> Vec<Step> {
        (0..self.steps.len())
            .rev()
            .map(|i| {
                let old_doc = if i == 0 {
                    &self.before
                } else {
                    self.results[i - 1].doc()
                };
                self.steps[i].invert(old_doc, &self.results[i], &self.config)
            })
            .collect()
    }

    /// Apply [`invert`](Self::invert) to the current document.
    pub fn undo(&self) -> Result<Node, TransformError> {
        let mut undo = Transform::with_config(self.doc().clone(), &self.config);
        for step in self.invert() {
            undo.step(step)?;
        }
        Ok(undo.into_doc())
    }

    pub fn replace(
        &mut self,
        from: Pos,
        to: Pos,
        source: Option<ReplaceSource>,
    ) -> Result<&mut Self, TransformError> {
        self.step(Step::Replace(ReplaceStep {
            from,
            to,
            source,
            inherit_styles: false,
        }))
    }

    /// Delete `from..to`. An empty range is a no-op.
    pub fn delete(&mut self, from: Pos, to: Pos) -> Result<&mut Self, TransformError> {
        if from == to {
            return Ok(self);
        }
        self.replace(from, to, None)
    }

    /// Insert the blocks of the document `fragment` at `pos`.
    pub fn insert(&mut self, pos: Pos, fragment: Node) -> Result<&mut Self, TransformError> {
        let size = fragment.size();
        let source = ReplaceSource {
            doc: fragment,
            from: Pos::start(),
            to: Pos::new(Vec::new(), size),
        };
        self.replace(pos.clone(), pos, Some(source))
    }

    /// Insert plain text at `pos`. Whether it picks up the styles at the
    /// insertion point follows the configuration.
    pub fn insert_text(&mut self, pos: Pos, text: &str) -> Result<&mut Self, TransformError> {
        let inherit = self.config.glue.inherit_styles;
        self.insert_inline_node(pos, Node::text(text, StyleSet::new()), inherit)
    }

    pub fn insert_styled_text(
        &mut self,
        pos: Pos,
        text: &str,
        styles: StyleSet,
    ) -> Result<&mut Self, TransformError> {
        self.insert_inline_node(pos, Node::text(text, styles), false)
    }

    /// Insert an inline node such as an image or hard break.
    pub fn insert_inline(&mut self, pos: Pos, node: Node) -> Result<&mut Self, TransformError> {
        self.insert_inline_node(pos, node, false)
    }

    fn insert_inline_node(
        &mut self,
        pos: Pos,
        node: Node,
        inherit_styles: bool,
    ) -> Result<&mut Self, TransformError> {
        check_position(self.doc(), &pos, self.config.limits.max_depth)?;
        let container = node_at(self.doc(), &pos.path).node_type();
        if !container.is_textblock() {
            return Err(TransformError::InlineNotAllowed {
                pos,
                node_type: container,
            });
        }
        let width = node.width();
        if width == 0 {
            return Ok(self);
        }
        let source = ReplaceSource {
            doc: build::doc(vec![build::p_with(vec![node])]),
            from: Pos::new(vec![0], 0),
            to: Pos::new(vec![0], width),
        };
        self.step(Step::Replace(ReplaceStep {
            from: pos.clone(),
            to: pos,
            source: Some(source),
            inherit_styles,
        }))
    }

    /// Delete the block at `path`.
    pub fn remove_node(&mut self, path: &[usize]) -> Result<&mut Self, TransformError> {
        let Some((&index, parent_path)) = path.split_last() else {
            return Err(TransformError::InvalidPosition { pos: Pos::start() });
        };
        let (from, to) = Pos::around(path);
        let removable = from.is_valid_in(self.doc()) && {
            let parent = node_at(self.doc(), parent_path);
            !parent.node_type().is_textblock() && index < parent.child_count()
        };
        if !removable {
            return Err(TransformError::InvalidPosition { pos: to });
        }
        self.delete(from, to)
    }

    /// Delete between two flat character offsets. Offsets that do not
    /// resolve to a position make this a no-op.
    pub fn delete_flat(&mut self, from: usize, to: usize) -> Result<&mut Self, TransformError> {
        let resolved = (
            resolve(self.doc(), from, Bias::Right),
            resolve(self.doc(), to, Bias::Left),
        );
        let (Some(from_pos), Some(to_pos)) = resolved else {
            warn!("cannot resolve flat range {from}..{to}, nothing deleted");
            return Ok(self);
        };
        if from_pos >= to_pos {
            return Ok(self);
        }
        self.delete(from_pos, to_pos)
    }

    /// Add `style` over `from..to`, replacing other values of its type.
    pub fn add_style(
        &mut self,
        from: &Pos,
        to: &Pos,
        style: &Style,
    ) -> Result<&mut Self, TransformError> {
        check_range(self.doc(), from, to, self.config.limits.max_depth)?;
        for step in plan_add_style(self.doc(), from, to, style) {
            self.step(step)?;
        }
        Ok(self)
    }

    pub fn remove_style(
        &mut self,
        from: &Pos,
        to: &Pos,
        spec: &StyleSpec,
    ) -> Result<&mut Self, TransformError> {
        check_range(self.doc(), from, to, self.config.limits.max_depth)?;
        for step in plan_remove_style(self.doc(), from, to, spec) {
            self.step(step)?;
        }
        Ok(self)
    }

    /// Strip every style and every non-text inline node from `from..to`.
    pub fn clear_markup(&mut self, from: &Pos, to: &Pos) -> Result<&mut Self, TransformError> {
        check_range(self.doc(), from, to, self.config.limits.max_depth)?;
        let non_text = non_text_spans(self.doc(), from, to);
        self.remove_style(from, to, &StyleSpec::All)?;
        for (start, end) in non_text {
            self.delete(start, end)?;
        }
        Ok(self)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;
    use crate::model::build::{blockquote, doc, em, hard_break, hr, image, p, p_with, strong, text};
    use pretty_assertions::assert_eq;

    #[test]
    fn test_insert_text_inherits_styles_by_default() {
        let mut tr = Transform::new(doc(vec![p_with(vec![em("ab")])]));

        tr.insert_text(Pos::new(vec![0], 1), "X").unwrap();

        assert_eq!(tr.doc(), &doc(vec![p_with(vec![em("aXb")])]));
    }

    #[test]
    fn test_insert_text_without_inheritance() {
        let mut config = EngineConfig::default();
        config.glue.inherit_styles = false;
        let mut tr = Transform::with_config(doc(vec![p_with(vec![em("ab")])]), &config);

        tr.insert_text(Pos::new(vec![0], 1), "X").unwrap();

        assert_eq!(tr.doc(), &doc(vec![p_with(vec![em("a"), text("X"), em("b")])]));
    }

    #[test]
    fn test_inline_insert_outside_textblock_fails_untouched() {
        let original = doc(vec![p("ab"), blockquote(vec![p("c")])]);
        let mut tr = Transform::new(original.clone());

        let err = tr.insert_inline(Pos::new(vec![1], 0), hard_break()).unwrap_err();

        assert_eq!(
            err,
            TransformError::InlineNotAllowed {
                pos: Pos::new(vec![1], 0),
                node_type: NodeType::Blockquote,
            }
        );
        assert_eq!(tr.doc(), &original);
        assert!(tr.steps().is_empty());
    }

    #[test]
    fn test_insert_blocks() {
        let mut tr = Transform::new(doc(vec![p("ab")]));

        tr.insert(Pos::new(vec![], 1), doc(vec![hr(), p("c")])).unwrap();

        assert_eq!(tr.doc(), &doc(vec![p("ab"), hr(), p("c")]));
        assert_eq!(tr.undo().unwrap(), doc(vec![p("ab")]));
    }

    #[test]
    fn test_remove_node() {
        let mut tr = Transform::new(doc(vec![p("a"), blockquote(vec![p("b"), p("c")])]));

        tr.remove_node(&[1, 0]).unwrap();

        assert_eq!(tr.doc(), &doc(vec![p("a"), blockquote(vec![p("c")])]));
        assert!(matches!(
            tr.remove_node(&[0, 0]),
            Err(TransformError::InvalidPosition { .. })
        ));
        assert!(matches!(
            tr.remove_node(&[]),
            Err(TransformError::InvalidPosition { .. })
        ));
    }

    #[test]
    fn test_delete_flat() {
        let mut tr = Transform::new(doc(vec![p("ab"), p("cd")]));

        tr.delete_flat(1, 3).unwrap();
        assert_eq!(tr.doc(), &doc(vec![p("ad")]));

        tr.delete_flat(1, 40).unwrap();
        assert_eq!(tr.doc(), &doc(vec![p("ad")]));
        assert_eq!(tr.steps().len(), 1);
    }

    #[test]
    fn test_map_through_several_steps() {
        let mut tr = Transform::new(doc(vec![p("abcd")]));

        tr.delete(Pos::new(vec![0], 0), Pos::new(vec![0], 1)).unwrap();
        tr.insert_text(Pos::new(vec![0], 3), "!").unwrap();

        assert_eq!(tr.doc(), &doc(vec![p("bcd!")]));
        assert_eq!(
            tr.map(&Pos::new(vec![0], 2)),
            Mapped { pos: Pos::new(vec![0], 1), deleted: false }
        );
        assert_eq!(
            tr.map(&Pos::new(vec![0], 0)),
            Mapped { pos: Pos::new(vec![0], 0), deleted: false }
        );
        assert_eq!(tr.undo().unwrap(), doc(vec![p("abcd")]));
    }

    #[test]
    fn test_clear_markup() {
        let mut tr = Transform::new(doc(vec![p_with(vec![
            strong("ab"),
            image("i.png"),
            em("cd"),
        ])]));

        tr.clear_markup(&Pos::new(vec![0], 1), &Pos::new(vec![0], 4)).unwrap();

        assert_eq!(tr.doc(), &doc(vec![p_with(vec![strong("a"), text("bc"), em("d")])]));
        assert_eq!(tr.undo().unwrap(), tr.before().clone());
    }
}
