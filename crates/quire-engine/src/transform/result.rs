//! What a step changed, and how positions move because of it.

use crate::model::{Bias, Node, Pos};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ChunkKind {
    Inserted,
    Deleted,
    Moved,
}

/// A contiguous region of change.
///
/// Sizes count in the offset unit of the container the position points
/// into. Deleted chunks have a zero-size new side at the collapse point,
/// inserted chunks a zero-size old side at the insertion point.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Chunk {
    pub kind: ChunkKind,
    pub old_pos: Pos,
    pub old_size: usize,
    pub new_pos: Pos,
    pub new_size: usize,
}

impl Chunk {
    pub fn inserted(at: Pos, new_pos: Pos, size: usize) -> Self {
        Self {
            kind: ChunkKind::Inserted,
            old_pos: at,
            old_size: 0,
            new_pos,
            new_size: size,
        }
    }

    pub fn deleted(old_pos: Pos, size: usize, collapsed_to: Pos) -> Self {
        Self {
            kind: ChunkKind::Deleted,
            old_pos,
            old_size: size,
            new_pos: collapsed_to,
            new_size: 0,
        }
    }

    pub fn moved(old_pos: Pos, new_pos: Pos, size: usize) -> Self {
        Self {
            kind: ChunkKind::Moved,
            old_pos,
            old_size: size,
            new_pos,
            new_size: size,
        }
    }

    /// Where `pos` ends up if it lies inside this chunk's old side, either
    /// in its container at an offset it covers or inside one of the
    /// children it covers.
    pub fn relocate(&self, pos: &Pos) -> Option<Pos> {
        let depth = self.old_pos.depth();
        if !pos.path.starts_with(&self.old_pos.path) {
            return None;
        }
        let start = self.old_pos.offset;
        let end = start + self.old_size;
        if pos.depth() == depth {
            return (start..=end).contains(&pos.offset).then(|| {
                Pos::new(
                    self.new_pos.path.clone(),
                    self.new_pos.offset + pos.offset - start,
                )
            });
        }
        let index = pos.path[depth];
        if !(start..end).contains(&index) {
            return None;
        }
        let mut path = self.new_pos.path.clone();
        path.push(self.new_pos.offset + index - start);
        path.extend_from_slice(&pos.path[depth + 1..]);
        Some(Pos::new(path, pos.offset))
    }
}

/// The replaced range of a replace step: `from..to` in the old document,
/// and `join`, the point in the new document where the kept content on
/// both sides of the range meets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ReplacedRange {
    pub from: Pos,
    pub to: Pos,
    pub join: Pos,
}

/// A position mapped through a step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Mapped {
    pub pos: Pos,
    /// The position was inside deleted content.
    pub deleted: bool,
}

impl Mapped {
    fn kept(pos: Pos) -> Self {
        Self { pos, deleted: false }
    }
}

/// The outcome of applying one step.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct StepResult {
    doc: Node,
    chunks: Vec<Chunk>,
    replaced: Option<ReplacedRange>,
}

impl StepResult {
    pub fn new(doc: Node, chunks: Vec<Chunk>, replaced: Option<ReplacedRange>) -> Self {
        Self {
            doc,
            chunks,
            replaced,
        }
    }

    /// A result that moves no positions.
    pub fn identity(doc: Node) -> Self {
        Self::new(doc, Vec::new(), None)
    }

    pub fn doc(&self) -> &Node {
        &self.doc
    }

    pub fn into_doc(self) -> Node {
        self.doc
    }

    pub fn chunks(&self) -> &[Chunk] {
        &self.chunks
    }

    pub fn inserted(&self) -> impl Iterator<Item = &Chunk> {
        self.of_kind(ChunkKind::Inserted)
    }

    pub fn deleted(&self) -> impl Iterator<Item = &Chunk> {
        self.of_kind(ChunkKind::Deleted)
    }

    pub fn moved(&self) -> impl Iterator<Item = &Chunk> {
        self.of_kind(ChunkKind::Moved)
    }

    fn of_kind(&self, kind: ChunkKind) -> impl Iterator<Item = &Chunk> {
        self.chunks.iter().filter(move |chunk| chunk.kind == kind)
    }

    pub fn replaced_range(&self) -> Option<&ReplacedRange> {
        self.replaced.as_ref()
    }

    /// The deleted range as a whole, when the step removed anything.
    pub fn deleted_range(&self) -> Option<(&Pos, &Pos)> {
        self.replaced
            .as_ref()
            .filter(|range| range.from != range.to)
            .map(|range| (&range.from, &range.to))
    }

    /// Map a position from the old document into the new one. A position
    /// at the start of the replaced range stays before inserted content.
    pub fn map(&self, pos: &Pos) -> Mapped {
        self.map_biased(pos, Bias::Left)
    }

    /// Like [`map`](Self::map), but with [`Bias::Right`] the start of the
    /// replaced range moves past inserted content.
    pub fn map_biased(&self, pos: &Pos, bias: Bias) -> Mapped {
        let Some(range) = &self.replaced else {
            return Mapped::kept(pos.clone());
        };
        if *pos < range.from || (*pos == range.from && bias == Bias::Left) {
            return Mapped::kept(pos.clone());
        }
        if *pos == range.from {
            return Mapped::kept(range.join.clone());
        }
        if *pos < range.to {
            return Mapped {
                pos: range.join.clone(),
                deleted: true,
            };
        }
        let relocated = self
            .moved()
            .filter_map(|chunk| chunk.relocate(pos).map(|new| (chunk.old_pos.depth(), new)))
            .max_by_key(|(depth, _)| *depth)
            .map(|(_, new)| new);
        Mapped::kept(relocated.unwrap_or_else(|| range.join.clone()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build::{doc, p};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn joined() -> StepResult {
        // "ab" + "cd" with [0]:1..[1]:1 removed
        StepResult::new(
            doc(vec![p("ad")]),
            vec![
                Chunk::deleted(Pos::new(vec![0], 1), 1, Pos::new(vec![0], 1)),
                Chunk::deleted(Pos::new(vec![1], 0), 1, Pos::new(vec![0], 1)),
                Chunk::moved(Pos::new(vec![1], 1), Pos::new(vec![0], 1), 1),
            ],
            Some(ReplacedRange {
                from: Pos::new(vec![0], 1),
                to: Pos::new(vec![1], 1),
                join: Pos::new(vec![0], 1),
            }),
        )
    }

    #[rstest]
    #[case(Pos::new(vec![0], 0), Pos::new(vec![0], 0), false)]
    #[case(Pos::new(vec![0], 1), Pos::new(vec![0], 1), false)]
    #[case(Pos::new(vec![0], 2), Pos::new(vec![0], 1), true)]
    #[case(Pos::new(vec![1], 0), Pos::new(vec![0], 1), true)]
    #[case(Pos::new(vec![1], 1), Pos::new(vec![0], 1), false)]
    #[case(Pos::new(vec![1], 2), Pos::new(vec![0], 2), false)]
    #[case(Pos::new(vec![], 2), Pos::new(vec![0], 1), false)]
    fn test_map(#[case] old: Pos, #[case] new: Pos, #[case] deleted: bool) {
        assert_eq!(joined().map(&old), Mapped { pos: new, deleted });
    }

    #[test]
    fn test_map_right_bias_moves_start_to_join() {
        let result = StepResult::new(
            doc(vec![p("aXb")]),
            vec![
                Chunk::inserted(Pos::new(vec![0], 1), Pos::new(vec![0], 1), 1),
                Chunk::moved(Pos::new(vec![0], 1), Pos::new(vec![0], 2), 1),
            ],
            Some(ReplacedRange {
                from: Pos::new(vec![0], 1),
                to: Pos::new(vec![0], 1),
                join: Pos::new(vec![0], 2),
            }),
        );

        assert_eq!(result.map(&Pos::new(vec![0], 1)).pos, Pos::new(vec![0], 1));
        assert_eq!(
            result.map_biased(&Pos::new(vec![0], 1), Bias::Right).pos,
            Pos::new(vec![0], 2)
        );
        assert_eq!(result.map(&Pos::new(vec![0], 2)).pos, Pos::new(vec![0], 3));
        assert_eq!(result.deleted_range(), None);
    }

    #[test]
    fn test_identity_maps_everything_to_itself() {
        let result = StepResult::identity(doc(vec![p("a")]));
        let pos = Pos::new(vec![0], 1);

        assert_eq!(result.map(&pos), Mapped { pos: pos.clone(), deleted: false });
        assert_eq!(result.chunks().len(), 0);
    }

    #[test]
    fn test_relocate_into_children() {
        let chunk = Chunk::moved(Pos::new(vec![1], 1), Pos::new(vec![0], 3), 2);

        assert_eq!(chunk.relocate(&Pos::new(vec![1, 2], 4)), Some(Pos::new(vec![0, 4], 4)));
        assert_eq!(chunk.relocate(&Pos::new(vec![1], 3)), Some(Pos::new(vec![0], 5)));
        assert_eq!(chunk.relocate(&Pos::new(vec![1, 0], 0)), None);
        assert_eq!(chunk.relocate(&Pos::new(vec![1, 3], 0)), None);
        assert_eq!(chunk.relocate(&Pos::new(vec![2], 0)), None);
    }

    #[test]
    fn test_chunk_kinds() {
        let result = joined();

        assert_eq!(result.deleted().count(), 2);
        assert_eq!(result.moved().count(), 1);
        assert_eq!(result.inserted().count(), 0);
        assert_eq!(
            result.deleted_range(),
            Some((&Pos::new(vec![0], 1), &Pos::new(vec![1], 1)))
        );
    }
}
