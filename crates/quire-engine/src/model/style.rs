use serde::{Deserialize, Serialize};
use std::fmt;

/// Character-level formatting carried by inline nodes.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum Style {
    Link {
        href: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        title: Option<String>,
    },
    Strong,
    Em,
    Code,
}

/// The kind of a [`Style`]. A style set holds at most one style per kind.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum StyleType {
    Link,
    Strong,
    Em,
    Code,
}

impl Style {
    pub fn link(href: impl Into<String>) -> Self {
        Style::Link {
            href: href.into(),
            title: None,
        }
    }

    pub fn style_type(&self) -> StyleType {
        match self {
            Style::Link { .. } => StyleType::Link,
            Style::Strong => StyleType::Strong,
            Style::Em => StyleType::Em,
            Style::Code => StyleType::Code,
        }
    }
}

impl fmt::Display for Style {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Style::Link { href, .. } => write!(f, "link[{href}]"),
            Style::Strong => f.write_str("strong"),
            Style::Em => f.write_str("em"),
            Style::Code => f.write_str("code"),
        }
    }
}

/// An ordered set of styles, at most one per [`StyleType`], kept sorted by
/// type so that equal sets compare equal.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "Vec<Style>", into = "Vec<Style>")]
pub struct StyleSet(Vec<Style>);

impl StyleSet {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn iter(&self) -> impl Iterator<Item = &Style> {
        self.0.iter()
    }

    pub fn contains(&self, style: &Style) -> bool {
        self.0.contains(style)
    }

    /// The style of the given kind, if present.
    pub fn of_type(&self, style_type: StyleType) -> Option<&Style> {
        self.0.iter().find(|s| s.style_type() == style_type)
    }

    /// A copy with `style` added, replacing any style of the same kind.
    pub fn add(&self, style: &Style) -> StyleSet {
        let mut styles: Vec<Style> = self
            .0
            .iter()
            .filter(|s| s.style_type() != style.style_type())
            .cloned()
            .collect();
        let at = styles
            .iter()
            .position(|s| s.style_type() > style.style_type())
            .unwrap_or(styles.len());
        styles.insert(at, style.clone());
        StyleSet(styles)
    }

    /// A copy without `style`. Other values of the same kind are kept.
    pub fn remove(&self, style: &Style) -> StyleSet {
        StyleSet(self.0.iter().filter(|s| *s != style).cloned().collect())
    }
}

impl From<Vec<Style>> for StyleSet {
    fn from(styles: Vec<Style>) -> Self {
        styles.iter().fold(StyleSet::new(), |set, style| set.add(style))
    }
}

impl From<StyleSet> for Vec<Style> {
    fn from(set: StyleSet) -> Self {
        set.0
    }
}

impl FromIterator<Style> for StyleSet {
    fn from_iter<I: IntoIterator<Item = Style>>(iter: I) -> Self {
        iter.into_iter()
            .fold(StyleSet::new(), |set, style| set.add(&style))
    }
}
