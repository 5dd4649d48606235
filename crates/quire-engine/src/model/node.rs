use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::fmt;

use super::style::StyleSet;

pub type Attrs = BTreeMap<String, String>;

/// What kind of children a node type holds.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContentKind {
    Block,
    Inline,
    ListItem,
    /// Leaf nodes hold no children.
    Nothing,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum NodeType {
    Doc,
    Paragraph,
    Heading,
    Blockquote,
    BulletList,
    OrderedList,
    ListItem,
    CodeBlock,
    HorizontalRule,
    Text,
    Image,
    HardBreak,
}

impl NodeType {
    pub fn name(self) -> &'static str {
        match self {
            NodeType::Doc => "doc",
            NodeType::Paragraph => "paragraph",
            NodeType::Heading => "heading",
            NodeType::Blockquote => "blockquote",
            NodeType::BulletList => "bullet_list",
            NodeType::OrderedList => "ordered_list",
            NodeType::ListItem => "list_item",
            NodeType::CodeBlock => "code_block",
            NodeType::HorizontalRule => "horizontal_rule",
            NodeType::Text => "text",
            NodeType::Image => "image",
            NodeType::HardBreak => "hard_break",
        }
    }

    pub fn contains(self) -> ContentKind {
        match self {
            NodeType::Doc | NodeType::Blockquote | NodeType::ListItem => ContentKind::Block,
            NodeType::Paragraph | NodeType::Heading | NodeType::CodeBlock => ContentKind::Inline,
            NodeType::BulletList | NodeType::OrderedList => ContentKind::ListItem,
            NodeType::HorizontalRule | NodeType::Text | NodeType::Image | NodeType::HardBreak => {
                ContentKind::Nothing
            }
        }
    }

    pub fn is_inline(self) -> bool {
        matches!(self, NodeType::Text | NodeType::Image | NodeType::HardBreak)
    }

    /// Blocks whose children are inline content.
    pub fn is_textblock(self) -> bool {
        self.contains() == ContentKind::Inline
    }

    /// Textblocks whose text never carries styles.
    pub fn is_plain_text(self) -> bool {
        self == NodeType::CodeBlock
    }

    pub fn is_leaf(self) -> bool {
        self.contains() == ContentKind::Nothing
    }
}

impl fmt::Display for NodeType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// A document tree node.
///
/// Block containers own their children in `content`; textblocks own inline
/// children (text runs, images, hard breaks). Text nodes carry `text` and
/// every inline node carries a style set. A node exclusively owns its
/// children, so fragments cut from a document are independent copies.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Node {
    #[serde(rename = "type")]
    pub(crate) node_type: NodeType,
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub(crate) attrs: Attrs,
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub(crate) content: Vec<Node>,
    #[serde(default, skip_serializing_if = "String::is_empty")]
    pub(crate) text: String,
    #[serde(default, skip_serializing_if = "StyleSet::is_empty")]
    pub(crate) styles: StyleSet,
}

impl Node {
    /// A container node. Textblock content is coalesced.
    pub fn new(node_type: NodeType, content: Vec<Node>) -> Self {
        Self::with_attrs(node_type, Attrs::new(), content)
    }

    pub fn with_attrs(node_type: NodeType, attrs: Attrs, content: Vec<Node>) -> Self {
        let mut node = Self {
            node_type,
            attrs,
            content,
            text: String::new(),
            styles: StyleSet::new(),
        };
        if node_type.is_textblock() {
            node.coalesce_inline();
        }
        node
    }

    pub fn text(text: impl Into<String>, styles: StyleSet) -> Self {
        Self {
            node_type: NodeType::Text,
            attrs: Attrs::new(),
            content: Vec::new(),
            text: text.into(),
            styles,
        }
    }

    /// A non-text inline node such as an image or hard break.
    pub fn inline(node_type: NodeType, attrs: Attrs, styles: StyleSet) -> Self {
        Self {
            node_type,
            attrs,
            content: Vec::new(),
            text: String::new(),
            styles,
        }
    }

    pub fn node_type(&self) -> NodeType {
        self.node_type
    }

    pub fn attrs(&self) -> &Attrs {
        &self.attrs
    }

    pub fn attr(&self, key: &str) -> Option<&str> {
        self.attrs.get(key).map(String::as_str)
    }

    pub fn content(&self) -> &[Node] {
        &self.content
    }

    pub fn child(&self, index: usize) -> Option<&Node> {
        self.content.get(index)
    }

    pub fn child_count(&self) -> usize {
        self.content.len()
    }

    pub fn styles(&self) -> &StyleSet {
        &self.styles
    }

    /// The raw text of a text node (empty for every other node).
    pub fn text_str(&self) -> &str {
        &self.text
    }

    /// Addressable length in this node's own offset unit: characters for
    /// textblocks and text, children for block containers.
    pub fn size(&self) -> usize {
        match self.node_type.contains() {
            ContentKind::Inline => self.content.iter().map(Node::width).sum(),
            ContentKind::Nothing if self.node_type == NodeType::Text => self.text.chars().count(),
            ContentKind::Nothing => 0,
            ContentKind::Block | ContentKind::ListItem => self.content.len(),
        }
    }

    /// Space this node takes up inside its parent.
    pub fn width(&self) -> usize {
        if self.node_type == NodeType::Text {
            self.text.chars().count()
        } else {
            1
        }
    }

    /// All text below this node, concatenated in document order.
    pub fn text_content(&self) -> String {
        let mut out = String::new();
        let mut stack = vec![self];
        while let Some(node) = stack.pop() {
            out.push_str(&node.text);
            stack.extend(node.content.iter().rev());
        }
        out
    }

    /// Same type, attributes, text and styles, with new children.
    pub(crate) fn copy_with(&self, content: Vec<Node>) -> Node {
        Node {
            node_type: self.node_type,
            attrs: self.attrs.clone(),
            content,
            text: self.text.clone(),
            styles: self.styles.clone(),
        }
    }

    pub(crate) fn with_styles(&self, styles: StyleSet) -> Node {
        Node {
            styles,
            ..self.clone()
        }
    }

    /// A text node holding the characters `from..to` of this one.
    pub(crate) fn text_slice(&self, from: usize, to: usize) -> Node {
        Node::text(char_slice(&self.text, from, to), self.styles.clone())
    }

    /// Styles of the last inline child, which is what text typed at the end
    /// of this textblock picks up.
    pub(crate) fn styles_at_end(&self) -> StyleSet {
        self.content
            .last()
            .map(|child| child.styles.clone())
            .unwrap_or_default()
    }

    /// Drop empty text runs and join adjacent runs with equal styles.
    pub(crate) fn coalesce_inline(&mut self) {
        let mut merged: Vec<Node> = Vec::with_capacity(self.content.len());
        for child in self.content.drain(..) {
            if child.node_type == NodeType::Text && child.text.is_empty() {
                continue;
            }
            if let Some(last) = merged.last_mut()
                && last.node_type == NodeType::Text
                && child.node_type == NodeType::Text
                && last.styles == child.styles
            {
                last.text.push_str(&child.text);
                continue;
            }
            merged.push(child);
        }
        self.content = merged;
    }
}

/// The characters `from..to` of `s`, counted in chars rather than bytes.
pub(crate) fn char_slice(s: &str, from: usize, to: usize) -> &str {
    let byte_at = |n: usize| s.char_indices().nth(n).map_or(s.len(), |(i, _)| i);
    &s[byte_at(from)..byte_at(to)]
}

/// Inline children of `content` restricted to the character range
/// `from..to`, splitting text runs at the edges.
pub(crate) fn slice_inline(content: &[Node], from: usize, to: usize) -> Vec<Node> {
    let mut out = Vec::new();
    let mut offset = 0;
    for child in content {
        let start = offset;
        let end = offset + child.width();
        offset = end;
        if end <= from || start >= to {
            continue;
        }
        if child.node_type == NodeType::Text {
            out.push(child.text_slice(from.max(start) - start, to.min(end) - start));
        } else {
            out.push(child.clone());
        }
    }
    out
}

impl fmt::Display for Node {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.node_type == NodeType::Text {
            for style in self.styles.iter() {
                write!(f, "{style}(")?;
            }
            write!(f, "{:?}", self.text)?;
            for _ in self.styles.iter() {
                f.write_str(")")?;
            }
            return Ok(());
        }

        f.write_str(self.node_type.name())?;
        if !self.attrs.is_empty() {
            let attrs: Vec<String> = self.attrs.iter().map(|(k, v)| format!("{k}={v}")).collect();
            write!(f, "{{{}}}", attrs.join(" "))?;
        }
        if self.node_type.is_leaf() {
            return Ok(());
        }
        f.write_str("(")?;
        for (i, child) in self.content.iter().enumerate() {
            if i > 0 {
                f.write_str(", ")?;
            }
            write!(f, "{child}")?;
        }
        f.write_str(")")
    }
}
