//! Path-based tree addressing.
//!
//! All walks here expect paths and depths that fit the tree; a path that
//! runs off the tree is a programming error and panics. Transforms validate
//! caller-supplied positions before reaching these functions.

use crate::model::{Node, Pos};

/// The node reached by following `path` from `node`.
pub fn node_at<'a>(node: &'a Node, path: &[usize]) -> &'a Node {
    path.iter().fold(node, |node, &index| &node.content[index])
}

pub fn node_at_mut<'a>(mut node: &'a mut Node, path: &[usize]) -> &'a mut Node {
    for &index in path {
        node = &mut node.content[index];
    }
    node
}

/// The `depth + 1` nodes found by repeatedly descending into the first child.
pub fn spine_left(node: &Node, depth: usize) -> Vec<&Node> {
    let mut nodes = Vec::with_capacity(depth + 1);
    let mut current = node;
    nodes.push(current);
    for _ in 0..depth {
        current = &current.content[0];
        nodes.push(current);
    }
    nodes
}

/// The `depth + 1` nodes found by repeatedly descending into the last child.
pub fn spine_right(node: &Node, depth: usize) -> Vec<&Node> {
    let mut nodes = Vec::with_capacity(depth + 1);
    let mut current = node;
    nodes.push(current);
    for _ in 0..depth {
        current = &current.content[current.content.len() - 1];
        nodes.push(current);
    }
    nodes
}

pub(crate) fn spine_left_at(node: &Node, depth: usize) -> &Node {
    (0..depth).fold(node, |node, _| &node.content[0])
}

pub(crate) fn spine_right_at(node: &Node, depth: usize) -> &Node {
    (0..depth).fold(node, |node, _| &node.content[node.content.len() - 1])
}

pub(crate) fn spine_left_mut(mut node: &mut Node, depth: usize) -> &mut Node {
    for _ in 0..depth {
        node = &mut node.content[0];
    }
    node
}

/// Child indices along the right spine of `node`, `depth` levels deep.
pub fn right_spine_path(node: &Node, depth: usize) -> Vec<usize> {
    let mut path = Vec::with_capacity(depth);
    let mut current = node;
    for _ in 0..depth {
        let last = current.content.len() - 1;
        path.push(last);
        current = &current.content[last];
    }
    path
}

/// How far down the right spine of `node` a position can reach. Leaf nodes,
/// inline content included, hold no positions.
pub fn right_spine_depth(node: &Node) -> usize {
    let mut depth = 0;
    let mut current = node;
    while let Some(last) = current.content.last() {
        if last.node_type().is_leaf() {
            break;
        }
        current = last;
        depth += 1;
    }
    depth
}

/// The end of the node found `depth` levels down the right spine of `node`.
pub fn right_spine_pos(node: &Node, depth: usize) -> Pos {
    let path = right_spine_path(node, depth);
    let offset = node_at(node, &path).size();
    Pos::new(path, offset)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::NodeType;
    use crate::model::build::{blockquote, bullet_list, doc, hr, list_item, p};
    use pretty_assertions::assert_eq;

    fn sample() -> Node {
        doc(vec![
            blockquote(vec![p("first"), p("second")]),
            bullet_list(vec![list_item(vec![p("one")]), list_item(vec![p("two!")])]),
        ])
    }

    #[test]
    fn test_spines() {
        let d = sample();

        let left: Vec<NodeType> = spine_left(&d, 2).iter().map(|n| n.node_type()).collect();
        let right: Vec<NodeType> = spine_right(&d, 3).iter().map(|n| n.node_type()).collect();

        assert_eq!(left, vec![NodeType::Doc, NodeType::Blockquote, NodeType::Paragraph]);
        assert_eq!(
            right,
            vec![NodeType::Doc, NodeType::BulletList, NodeType::ListItem, NodeType::Paragraph]
        );
        assert_eq!(spine_left(&d, 2)[2].text_content(), "first");
    }

    #[test]
    fn test_right_spine_pos() {
        let d = sample();

        assert_eq!(right_spine_pos(&d, 0), Pos::new(vec![], 2));
        assert_eq!(right_spine_pos(&d, 3), Pos::new(vec![1, 1, 0], 4));
    }

    #[test]
    fn test_right_spine_depth_stops_above_leaves() {
        assert_eq!(right_spine_depth(&sample()), 3);
        assert_eq!(right_spine_depth(&doc(vec![p("a"), hr()])), 0);
        assert_eq!(right_spine_depth(&doc(vec![])), 0);
        assert_eq!(right_spine_depth(&doc(vec![blockquote(vec![])])), 1);
    }

    #[test]
    fn test_node_at() {
        let mut d = sample();

        assert_eq!(node_at(&d, &[1, 0, 0]).text_content(), "one");
        node_at_mut(&mut d, &[0]).content.clear();
        assert_eq!(node_at(&d, &[0]).size(), 0);
    }

    #[test]
    #[should_panic]
    fn test_spine_deeper_than_tree_panics() {
        spine_left(&doc(vec![p("a")]), 3);
    }
}
