//! Owned fragments cut out of a document.
//!
//! Every fragment keeps the ancestors of the positions it was cut at, so a
//! fragment cut at a position of depth `n` has a spine at least `n` deep,
//! even when the nodes along it end up empty.

use super::node::{Node, slice_inline};
use super::pos::Pos;

/// Everything in `doc` before `pos`.
pub fn before(doc: &Node, pos: &Pos) -> Node {
    cut_before(doc, pos, 0)
}

/// Everything in `doc` after `pos`.
pub fn after(doc: &Node, pos: &Pos) -> Node {
    cut_after(doc, pos, 0)
}

/// The content of `doc` between `from` and `to`, which must be in order.
pub fn between(doc: &Node, from: &Pos, to: &Pos) -> Node {
    let mut ancestors = Vec::new();
    let mut node = doc;
    let mut depth = 0;
    while depth < from.depth() && depth < to.depth() && from.path[depth] == to.path[depth] {
        ancestors.push(node);
        node = &node.content[from.path[depth]];
        depth += 1;
    }

    let mut built = if depth == from.depth() && depth == to.depth() {
        slice_content(node, from.offset, to.offset)
    } else {
        let mut content = Vec::new();
        let start = if depth == from.depth() {
            from.offset
        } else {
            let index = from.path[depth];
            content.push(cut_after(&node.content[index], from, depth + 1));
            index + 1
        };
        let end = if depth == to.depth() {
            to.offset
        } else {
            to.path[depth]
        };
        content.extend_from_slice(&node.content[start..end]);
        if depth < to.depth() {
            content.push(cut_before(&node.content[to.path[depth]], to, depth + 1));
        }
        node.copy_with(content)
    };

    for parent in ancestors.into_iter().rev() {
        built = parent.copy_with(vec![built]);
    }
    built
}

/// `node` sits at `pos.path[..depth]`.
fn cut_before(node: &Node, pos: &Pos, depth: usize) -> Node {
    let (chain, deepest) = descend(node, &pos.path[depth..]);
    let mut built = slice_content(deepest, 0, pos.offset);
    for (parent, &index) in chain.into_iter().zip(&pos.path[depth..]).rev() {
        let mut content = parent.content[..index].to_vec();
        content.push(built);
        built = parent.copy_with(content);
    }
    built
}

/// `node` sits at `pos.path[..depth]`.
fn cut_after(node: &Node, pos: &Pos, depth: usize) -> Node {
    let (chain, deepest) = descend(node, &pos.path[depth..]);
    let mut built = slice_content(deepest, pos.offset, deepest.size());
    for (parent, &index) in chain.into_iter().zip(&pos.path[depth..]).rev() {
        let mut content = Vec::with_capacity(parent.content.len() - index);
        content.push(built);
        content.extend_from_slice(&parent.content[index + 1..]);
        built = parent.copy_with(content);
    }
    built
}

/// The nodes passed through while following `path`, and the node it ends at.
fn descend<'a>(node: &'a Node, path: &[usize]) -> (Vec<&'a Node>, &'a Node) {
    let mut chain = Vec::with_capacity(path.len());
    let mut current = node;
    for &index in path {
        chain.push(current);
        current = &current.content[index];
    }
    (chain, current)
}

fn slice_content(node: &Node, from: usize, to: usize) -> Node {
    if node.node_type().is_textblock() {
        node.copy_with(slice_inline(&node.content, from, to))
    } else {
        node.copy_with(node.content[from..to].to_vec())
    }
}
