//! Structural edits on tree-shaped rich documents.
//!
//! Documents are [`Node`] trees addressed by [`Pos`]. Edits are [`Step`]s:
//! a replace that deletes a range and splices in copied content, merging the
//! boundary nodes on both sides, and style steps that add or remove
//! character formatting over a range. Every applied step yields a
//! [`StepResult`] that maps old positions into the new document and can be
//! inverted to undo the edit.

pub mod addressing;
pub mod model;
pub mod transform;

pub use model::{Bias, Node, NodeType, Pos, Style, StyleSet, StyleType, from_markdown};
pub use quire_config::{Compatibility, EngineConfig};
pub use transform::{
    Chunk, ChunkKind, Mapped, ReplaceSource, ReplaceStep, Step, StepResult, StyleSpec, StyleStep,
    Transform, TransformError,
};
