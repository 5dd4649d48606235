//! Document model: positions, nodes, styles, and the read-only helpers the
//! transforms build on.

pub mod build;
pub mod markdown;
pub mod node;
pub mod pos;
pub mod resolve;
pub mod slice;
pub mod spans;
pub mod style;

pub use markdown::from_markdown;
pub use node::{Attrs, ContentKind, Node, NodeType};
pub use pos::Pos;
pub use resolve::{Bias, flat_offset, resolve};
pub use slice::{after, before, between};
pub use spans::{TextblockRange, for_spans_between, textblocks, textblocks_between};
pub use style::{Style, StyleSet, StyleType};
