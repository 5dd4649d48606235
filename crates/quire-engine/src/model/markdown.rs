//! Markdown import, used to build documents for tests and benchmarks.
//!
//! Only the subset of CommonMark that maps onto [`NodeType`] is kept: raw
//! HTML, footnotes and tables are dropped.

use pulldown_cmark::{CodeBlockKind, Event, Parser, Tag};

use super::node::{Attrs, Node, NodeType};
use super::style::{Style, StyleSet};

/// Parse `markdown` into a document tree.
pub fn from_markdown(markdown: &str) -> Node {
    let mut builder = TreeBuilder::new();
    for event in Parser::new(markdown) {
        builder.process_event(event);
    }
    builder.finish()
}

/// A block being filled with children.
struct Frame {
    node_type: NodeType,
    attrs: Attrs,
    content: Vec<Node>,
    /// Opened around loose inline content, such as text in a tight list item.
    implicit: bool,
}

impl Frame {
    fn new(node_type: NodeType, attrs: Attrs) -> Self {
        Self {
            node_type,
            attrs,
            content: Vec::new(),
            implicit: false,
        }
    }
}

/// What a start tag opened, so the matching end tag knows what to close.
enum Open {
    Block,
    Style,
    Image(String),
    Ignored,
}

struct TreeBuilder {
    frames: Vec<Frame>,
    open: Vec<Open>,
    styles: Vec<Style>,
}

impl TreeBuilder {
    fn new() -> Self {
        Self {
            frames: vec![Frame::new(NodeType::Doc, Attrs::new())],
            open: Vec::new(),
            styles: Vec::new(),
        }
    }

    fn process_event(&mut self, event: Event) {
        match event {
            Event::Start(tag) => self.start(tag),
            Event::End(_) => self.end(),
            Event::Text(text) => {
                if self.in_image() {
                    return;
                }
                let styles = self.current_styles();
                self.add_inline(Node::text(text.to_string(), styles));
            }
            Event::Code(code) => {
                let styles = self.current_styles().add(&Style::Code);
                self.add_inline(Node::text(code.to_string(), styles));
            }
            Event::SoftBreak => {
                let styles = self.current_styles();
                self.add_inline(Node::text(" ", styles));
            }
            Event::HardBreak => {
                let styles = self.current_styles();
                self.add_inline(Node::inline(NodeType::HardBreak, Attrs::new(), styles));
            }
            Event::Rule => {
                self.close_implicit();
                self.push_child(Node::new(NodeType::HorizontalRule, Vec::new()));
            }
            _ => {}
        }
    }

    fn start(&mut self, tag: Tag) {
        let open = match tag {
            Tag::Paragraph => self.open_block(NodeType::Paragraph, Attrs::new()),
            Tag::Heading { level, .. } => self.open_block(
                NodeType::Heading,
                Attrs::from([("level".to_string(), (level as u8).to_string())]),
            ),
            Tag::BlockQuote(_) => self.open_block(NodeType::Blockquote, Attrs::new()),
            Tag::CodeBlock(kind) => {
                let mut attrs = Attrs::new();
                if let CodeBlockKind::Fenced(params) = kind
                    && !params.is_empty()
                {
                    attrs.insert("params".to_string(), params.to_string());
                }
                self.open_block(NodeType::CodeBlock, attrs)
            }
            Tag::List(Some(order)) => self.open_block(
                NodeType::OrderedList,
                Attrs::from([("order".to_string(), order.to_string())]),
            ),
            Tag::List(None) => self.open_block(NodeType::BulletList, Attrs::new()),
            Tag::Item => self.open_block(NodeType::ListItem, Attrs::new()),
            Tag::Emphasis => self.open_style(Style::Em),
            Tag::Strong => self.open_style(Style::Strong),
            Tag::Link { dest_url, title, .. } => self.open_style(Style::Link {
                href: dest_url.to_string(),
                title: (!title.is_empty()).then(|| title.to_string()),
            }),
            Tag::Image { dest_url, .. } => Open::Image(dest_url.to_string()),
            _ => Open::Ignored,
        };
        self.open.push(open);
    }

    fn end(&mut self) {
        match self.open.pop() {
            Some(Open::Block) => {
                self.close_implicit();
                self.close_frame();
            }
            Some(Open::Style) => {
                self.styles.pop();
            }
            Some(Open::Image(src)) => {
                let styles = self.current_styles();
                self.add_inline(Node::inline(
                    NodeType::Image,
                    Attrs::from([("src".to_string(), src)]),
                    styles,
                ));
            }
            Some(Open::Ignored) | None => {}
        }
    }

    fn open_block(&mut self, node_type: NodeType, attrs: Attrs) -> Open {
        self.close_implicit();
        self.frames.push(Frame::new(node_type, attrs));
        Open::Block
    }

    fn open_style(&mut self, style: Style) -> Open {
        self.styles.push(style);
        Open::Style
    }

    fn in_image(&self) -> bool {
        self.open.iter().any(|open| matches!(open, Open::Image(_)))
    }

    fn current_styles(&self) -> StyleSet {
        self.styles.iter().cloned().collect()
    }

    fn top(&mut self) -> &mut Frame {
        let last = self.frames.len() - 1;
        &mut self.frames[last]
    }

    fn add_inline(&mut self, node: Node) {
        if !self.top().node_type.is_textblock() {
            let mut frame = Frame::new(NodeType::Paragraph, Attrs::new());
            frame.implicit = true;
            self.frames.push(frame);
        }
        let plain = self.top().node_type.is_plain_text();
        let node = if plain {
            node.with_styles(StyleSet::new())
        } else {
            node
        };
        self.top().content.push(node);
    }

    fn push_child(&mut self, node: Node) {
        self.top().content.push(node);
    }

    fn close_implicit(&mut self) {
        if self.top().implicit {
            self.close_frame();
        }
    }

    fn close_frame(&mut self) {
        // The root frame is only closed by `finish`.
        if self.frames.len() < 2 {
            return;
        }
        let Some(frame) = self.frames.pop() else {
            return;
        };
        let mut node = Node::with_attrs(frame.node_type, frame.attrs, frame.content);
        if node.node_type == NodeType::CodeBlock
            && let Some(last) = node.content.last_mut()
            && last.text.ends_with('\n')
        {
            last.text.pop();
            node.coalesce_inline();
        }
        self.push_child(node);
    }

    fn finish(mut self) -> Node {
        while self.frames.len() > 1 {
            self.close_frame();
        }
        let root = self.top();
        Node::new(root.node_type, std::mem::take(&mut root.content))
    }
}
