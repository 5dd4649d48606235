//! Shorthand constructors for documents, used by tests, benchmarks and the
//! insertion helpers.

use super::node::{Attrs, Node, NodeType};
use super::style::{Style, StyleSet};

pub fn doc(content: Vec<Node>) -> Node {
    Node::new(NodeType::Doc, content)
}

/// A paragraph holding a single unstyled text run.
pub fn p(text_value: &str) -> Node {
    p_with(vec![text(text_value)])
}

pub fn p_with(content: Vec<Node>) -> Node {
    Node::new(NodeType::Paragraph, content)
}

pub fn heading(level: u8, text_value: &str) -> Node {
    Node::with_attrs(
        NodeType::Heading,
        Attrs::from([("level".to_string(), level.to_string())]),
        vec![text(text_value)],
    )
}

pub fn blockquote(content: Vec<Node>) -> Node {
    Node::new(NodeType::Blockquote, content)
}

pub fn bullet_list(items: Vec<Node>) -> Node {
    Node::new(NodeType::BulletList, items)
}

pub fn ordered_list(items: Vec<Node>) -> Node {
    Node::new(NodeType::OrderedList, items)
}

pub fn list_item(content: Vec<Node>) -> Node {
    Node::new(NodeType::ListItem, content)
}

pub fn code_block(text_value: &str) -> Node {
    Node::new(NodeType::CodeBlock, vec![text(text_value)])
}

pub fn hr() -> Node {
    Node::new(NodeType::HorizontalRule, Vec::new())
}

pub fn text(value: &str) -> Node {
    Node::text(value, StyleSet::new())
}

pub fn styled(value: &str, styles: &[Style]) -> Node {
    Node::text(value, styles.iter().cloned().collect())
}

pub fn em(value: &str) -> Node {
    styled(value, &[Style::Em])
}

pub fn strong(value: &str) -> Node {
    styled(value, &[Style::Strong])
}

pub fn code(value: &str) -> Node {
    styled(value, &[Style::Code])
}

pub fn link(value: &str, href: &str) -> Node {
    styled(value, &[Style::link(href)])
}

pub fn image(src: &str) -> Node {
    Node::inline(
        NodeType::Image,
        Attrs::from([("src".to_string(), src.to_string())]),
        StyleSet::new(),
    )
}

pub fn hard_break() -> Node {
    Node::inline(NodeType::HardBreak, Attrs::new(), StyleSet::new())
}
