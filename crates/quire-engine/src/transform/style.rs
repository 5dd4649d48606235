//! Style steps and the planning that splits a style edit into them.

use quire_config::EngineConfig;
use serde::{Deserialize, Serialize};

use super::error::{TransformError, check_range};
use super::result::StepResult;
use super::step::Step;
use crate::addressing::{node_at, node_at_mut};
use crate::model::spans::map_inline_range;
use crate::model::{
    Node, NodeType, Pos, Style, StyleSet, StyleType, for_spans_between, textblocks_between,
};

/// Add or remove one style over `from..to`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StyleStep {
    pub from: Pos,
    pub to: Pos,
    pub style: Style,
}

/// Which styles a removal targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StyleSpec {
    All,
    Type(StyleType),
    Value(Style),
}

impl StyleStep {
    pub fn new(from: Pos, to: Pos, style: Style) -> Self {
        Self { from, to, style }
    }

    /// Plain-text blocks are left alone.
    pub(crate) fn apply_add(
        &self,
        doc: &Node,
        config: &EngineConfig,
    ) -> Result<StepResult, TransformError> {
        self.restyle(doc, config, true, |styles| styles.add(&self.style))
    }

    pub(crate) fn apply_remove(
        &self,
        doc: &Node,
        config: &EngineConfig,
    ) -> Result<StepResult, TransformError> {
        self.restyle(doc, config, false, |styles| styles.remove(&self.style))
    }

    fn restyle<F>(
        &self,
        doc: &Node,
        config: &EngineConfig,
        skip_plain_text: bool,
        change: F,
    ) -> Result<StepResult, TransformError>
    where
        F: Fn(&StyleSet) -> StyleSet,
    {
        check_range(doc, &self.from, &self.to, config.limits.max_depth)?;

        let mut output = doc.clone();
        for range in textblocks_between(doc, &self.from, &self.to) {
            let block = node_at(doc, &range.path);
            if skip_plain_text && block.node_type().is_plain_text() {
                continue;
            }
            *node_at_mut(&mut output, &range.path) =
                map_inline_range(block, range.start, range.end, |node| {
                    node.with_styles(change(node.styles()))
                });
        }
        Ok(StepResult::identity(output))
    }
}

/// A run of spans gathered into one step.
struct Run {
    from: Pos,
    to: Pos,
    style: Style,
}

impl Run {
    fn into_step(self) -> StyleStep {
        StyleStep::new(self.from, self.to, self.style)
    }
}

/// The steps that add `style` over `from..to`.
///
/// Spans that already carry the style, and spans in plain-text blocks, are
/// skipped and break runs. A same-type style with another value is removed
/// first, one step per run of spans carrying that same value.
pub(crate) fn plan_add_style(doc: &Node, from: &Pos, to: &Pos, style: &Style) -> Vec<Step> {
    let mut removals: Vec<Run> = Vec::new();
    let mut additions: Vec<Run> = Vec::new();
    let mut removing = false;
    let mut adding = false;

    for_spans_between(doc, from, to, |span, path, start, end| {
        let plain_text = node_at(doc, path).node_type().is_plain_text();
        if plain_text || span.styles().contains(style) {
            removing = false;
            adding = false;
            return;
        }
        let start = Pos::new(path.to_vec(), start);
        let end = Pos::new(path.to_vec(), end);

        match span.styles().of_type(style.style_type()) {
            Some(conflict) => {
                let extends =
                    removing && removals.last().is_some_and(|run| run.style == *conflict);
                if extends && let Some(run) = removals.last_mut() {
                    run.to = end.clone();
                } else {
                    removals.push(Run {
                        from: start.clone(),
                        to: end.clone(),
                        style: conflict.clone(),
                    });
                }
                removing = true;
            }
            None => removing = false,
        }

        if adding && let Some(run) = additions.last_mut() {
            run.to = end;
        } else {
            additions.push(Run {
                from: start,
                to: end,
                style: style.clone(),
            });
        }
        adding = true;
    });

    removals
        .into_iter()
        .rev()
        .map(|run| Step::RemoveStyle(run.into_step()))
        .chain(additions.into_iter().map(|run| Step::AddStyle(run.into_step())))
        .collect()
}

/// The steps that remove the styles matching `spec` over `from..to`, one
/// per style and run of adjacent spans carrying it, last run first.
pub(crate) fn plan_remove_style(
    doc: &Node,
    from: &Pos,
    to: &Pos,
    spec: &StyleSpec,
) -> Vec<Step> {
    struct Entry {
        run: Run,
        last_span: usize,
    }

    let mut entries: Vec<Entry> = Vec::new();
    let mut span_index = 0;

    for_spans_between(doc, from, to, |span, path, start, end| {
        span_index += 1;
        let matched: Vec<Style> = match spec {
            StyleSpec::All => span.styles().iter().cloned().collect(),
            StyleSpec::Type(style_type) => {
                span.styles().of_type(*style_type).cloned().into_iter().collect()
            }
            StyleSpec::Value(style) if span.styles().contains(style) => vec![style.clone()],
            StyleSpec::Value(_) => Vec::new(),
        };
        for style in matched {
            let previous = entries
                .iter()
                .position(|entry| entry.last_span + 1 == span_index && entry.run.style == style);
            match previous {
                Some(index) => {
                    entries[index].run.to = Pos::new(path.to_vec(), end);
                    entries[index].last_span = span_index;
                }
                None => entries.push(Entry {
                    run: Run {
                        from: Pos::new(path.to_vec(), start),
                        to: Pos::new(path.to_vec(), end),
                        style,
                    },
                    last_span: span_index,
                }),
            }
        }
    });

    entries
        .into_iter()
        .rev()
        .map(|entry| Step::RemoveStyle(entry.run.into_step()))
        .collect()
}

/// Ranges of the non-text inline nodes over `from..to`, last first.
pub(crate) fn non_text_spans(doc: &Node, from: &Pos, to: &Pos) -> Vec<(Pos, Pos)> {
    let mut ranges = Vec::new();
    for_spans_between(doc, from, to, |span, path, start, end| {
        if span.node_type() != NodeType::Text {
            ranges.push((Pos::new(path.to_vec(), start), Pos::new(path.to_vec(), end)));
        }
    });
    ranges.reverse();
    ranges
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build::{code_block, doc, em, image, link, p, p_with, strong, styled, text};
    use pretty_assertions::assert_eq;

    fn pos(path: &[usize], offset: usize) -> Pos {
        Pos::new(path.to_vec(), offset)
    }

    fn add(from: Pos, to: Pos, style: Style) -> Step {
        Step::AddStyle(StyleStep::new(from, to, style))
    }

    fn remove(from: Pos, to: Pos, style: Style) -> Step {
        Step::RemoveStyle(StyleStep::new(from, to, style))
    }

    #[test]
    fn test_add_over_mixed_spans_is_one_step() {
        let d = doc(vec![p_with(vec![em("ab"), text("cd"), em("ef")])]);

        let steps = plan_add_style(&d, &pos(&[0], 0), &pos(&[0], 6), &Style::Strong);

        assert_eq!(steps, vec![add(pos(&[0], 0), pos(&[0], 6), Style::Strong)]);
    }

    #[test]
    fn test_conflicting_link_removed_only_where_present() {
        let d = doc(vec![p_with(vec![link("ab", "a"), text("cd"), link("ef", "a")])]);
        let target = Style::link("b");

        let steps = plan_add_style(&d, &pos(&[0], 0), &pos(&[0], 6), &target);

        assert_eq!(
            steps,
            vec![
                remove(pos(&[0], 4), pos(&[0], 6), Style::link("a")),
                remove(pos(&[0], 0), pos(&[0], 2), Style::link("a")),
                add(pos(&[0], 0), pos(&[0], 6), target),
            ]
        );
    }

    #[test]
    fn test_spans_already_styled_break_the_run() {
        let d = doc(vec![p_with(vec![text("ab"), strong("cd"), text("ef")])]);

        let steps = plan_add_style(&d, &pos(&[0], 1), &pos(&[0], 5), &Style::Strong);

        assert_eq!(
            steps,
            vec![
                add(pos(&[0], 1), pos(&[0], 2), Style::Strong),
                add(pos(&[0], 4), pos(&[0], 5), Style::Strong),
            ]
        );
    }

    #[test]
    fn test_add_runs_across_blocks_and_skips_plain_text() {
        let d = doc(vec![p("ab"), p("cd"), code_block("x"), p("ef")]);

        let steps = plan_add_style(&d, &pos(&[0], 1), &pos(&[3], 1), &Style::Em);

        assert_eq!(
            steps,
            vec![
                add(pos(&[0], 1), pos(&[1], 2), Style::Em),
                add(pos(&[3], 0), pos(&[3], 1), Style::Em),
            ]
        );
    }

    #[test]
    fn test_remove_all_groups_by_style() {
        let d = doc(vec![p_with(vec![
            em("a"),
            styled("b", &[Style::Em, Style::Strong]),
            strong("c"),
            text("d"),
            em("e"),
        ])]);

        let steps = plan_remove_style(&d, &pos(&[0], 0), &pos(&[0], 5), &StyleSpec::All);

        assert_eq!(
            steps,
            vec![
                remove(pos(&[0], 4), pos(&[0], 5), Style::Em),
                remove(pos(&[0], 1), pos(&[0], 3), Style::Strong),
                remove(pos(&[0], 0), pos(&[0], 2), Style::Em),
            ]
        );
    }

    #[test]
    fn test_remove_by_type_and_value() {
        let d = doc(vec![p_with(vec![link("ab", "x"), link("cd", "y")])]);
        let (from, to) = (pos(&[0], 0), pos(&[0], 4));

        let by_type = plan_remove_style(&d, &from, &to, &StyleSpec::Type(StyleType::Link));
        let by_value = plan_remove_style(&d, &from, &to, &StyleSpec::Value(Style::link("y")));

        assert_eq!(
            by_type,
            vec![
                remove(pos(&[0], 2), pos(&[0], 4), Style::link("y")),
                remove(pos(&[0], 0), pos(&[0], 2), Style::link("x")),
            ]
        );
        assert_eq!(by_value, vec![remove(pos(&[0], 2), pos(&[0], 4), Style::link("y"))]);
    }

    #[test]
    fn test_apply_add_splits_text() {
        let d = doc(vec![p("abcd"), code_block("xy")]);
        let step = StyleStep::new(pos(&[0], 1), pos(&[1], 2), Style::Em);

        let result = step.apply_add(&d, &EngineConfig::default()).unwrap();

        insta::assert_snapshot!(
            result.doc().to_string(),
            @r#"doc(paragraph("a", em("bcd")), code_block("xy"))"#
        );
    }

    #[test]
    fn test_apply_remove_recoalesces() {
        let d = doc(vec![p_with(vec![text("a"), em("bc"), text("d")])]);
        let step = StyleStep::new(pos(&[0], 0), pos(&[0], 4), Style::Em);

        let result = step.apply_remove(&d, &EngineConfig::default()).unwrap();

        assert_eq!(result.doc(), &doc(vec![p("abcd")]));
    }

    #[test]
    fn test_non_text_spans_last_first() {
        let d = doc(vec![p_with(vec![image("a.png"), text("b"), image("c.png")])]);

        let ranges = non_text_spans(&d, &pos(&[0], 0), &pos(&[0], 3));

        assert_eq!(ranges, vec![(pos(&[0], 2), pos(&[0], 3)), (pos(&[0], 0), pos(&[0], 1))]);
    }
}
