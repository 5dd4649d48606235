//! Walking the textblocks and inline spans of a document.

use super::node::{Node, slice_inline};
use super::pos::Pos;

/// The part `start..end` of the textblock at `path` that lies in a range.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TextblockRange {
    pub path: Vec<usize>,
    pub start: usize,
    pub end: usize,
}

/// Every textblock of `doc` with its path, in document order.
pub fn textblocks(doc: &Node) -> Vec<(Vec<usize>, &Node)> {
    let mut out = Vec::new();
    let mut stack = vec![(Vec::new(), doc)];
    while let Some((path, node)) = stack.pop() {
        if node.node_type().is_textblock() {
            out.push((path, node));
            continue;
        }
        for (index, child) in node.content.iter().enumerate().rev() {
            let mut child_path = path.clone();
            child_path.push(index);
            stack.push((child_path, child));
        }
    }
    out
}

/// The non-empty parts of textblocks that fall between `from` and `to`.
pub fn textblocks_between(doc: &Node, from: &Pos, to: &Pos) -> Vec<TextblockRange> {
    let mut out = Vec::new();
    let mut stack = vec![(Vec::new(), doc)];
    while let Some((path, node)) = stack.pop() {
        if node.node_type().is_textblock() {
            let size = node.size();
            let start = if from.path == path {
                from.offset
            } else if *from < Pos::new(path.clone(), 0) {
                0
            } else {
                continue;
            };
            let end = if to.path == path {
                to.offset
            } else if *to > Pos::new(path.clone(), size) {
                size
            } else {
                continue;
            };
            if start < end {
                out.push(TextblockRange { path, start, end });
            }
            continue;
        }

        for (index, child) in node.content.iter().enumerate().rev() {
            if child.node_type().is_leaf()
                || Pos::new(path.clone(), index + 1) <= *from
                || Pos::new(path.clone(), index) >= *to
            {
                continue;
            }
            let mut child_path = path.clone();
            child_path.push(index);
            stack.push((child_path, child));
        }
    }
    out
}

/// Call `f(span, path, start, end)` for every inline node between `from`
/// and `to`, with `start..end` clipped to the range and counted in the
/// offsets of the textblock at `path`.
pub fn for_spans_between<F>(doc: &Node, from: &Pos, to: &Pos, mut f: F)
where
    F: FnMut(&Node, &[usize], usize, usize),
{
    for range in textblocks_between(doc, from, to) {
        let block = crate::addressing::node_at(doc, &range.path);
        let mut offset = 0;
        for span in &block.content {
            let span_start = offset;
            let span_end = offset + span.width();
            offset = span_end;
            if span_end <= range.start {
                continue;
            }
            if span_start >= range.end {
                break;
            }
            f(
                span,
                &range.path,
                span_start.max(range.start),
                span_end.min(range.end),
            );
        }
    }
}

/// A copy of the textblock `block` with every inline node in `start..end`
/// passed through `f`, text split at the range edges and re-coalesced.
pub(crate) fn map_inline_range<F>(block: &Node, start: usize, end: usize, mut f: F) -> Node
where
    F: FnMut(&Node) -> Node,
{
    let mut content = slice_inline(&block.content, 0, start);
    content.extend(slice_inline(&block.content, start, end).iter().map(&mut f));
    content.extend(slice_inline(&block.content, end, block.size()));
    let mut node = block.copy_with(content);
    node.coalesce_inline();
    node
}
