//! Conversion between tree positions and flat character offsets.
//!
//! A flat offset counts the characters of every textblock in document
//! order. Block boundaries take up no room, so the offset at a boundary
//! names both the end of one textblock and the start of the next; [`Bias`]
//! picks between them.

use super::node::Node;
use super::pos::Pos;
use super::spans::textblocks;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Bias {
    /// Prefer the end of the preceding textblock.
    #[default]
    Left,
    /// Prefer the start of the following textblock.
    Right,
}

/// The position of flat offset `flat`, or `None` past the end of `doc`.
pub fn resolve(doc: &Node, flat: usize, bias: Bias) -> Option<Pos> {
    let mut start = 0;
    let mut fallback = None;
    for (path, block) in textblocks(doc) {
        let end = start + block.size();
        if start <= flat && flat <= end {
            let pos = Pos::new(path, flat - start);
            match bias {
                Bias::Left => return Some(pos),
                Bias::Right if flat < end || flat == start => return Some(pos),
                Bias::Right => fallback = Some(pos),
            }
        }
        start = end;
    }
    fallback
}

/// The flat offset of `pos`, or `None` when it does not point into a
/// textblock of `doc`.
pub fn flat_offset(doc: &Node, pos: &Pos) -> Option<usize> {
    let mut start = 0;
    for (path, block) in textblocks(doc) {
        if path == pos.path {
            return (pos.offset <= block.size()).then_some(start + pos.offset);
        }
        start += block.size();
    }
    None
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::build::{blockquote, doc, hr, p};
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn sample() -> Node {
        doc(vec![p("ab"), hr(), blockquote(vec![p("cd")]), p("")])
    }

    #[rstest]
    #[case(0, Bias::Left, Some(Pos::new(vec![0], 0)))]
    #[case(1, Bias::Right, Some(Pos::new(vec![0], 1)))]
    #[case(2, Bias::Left, Some(Pos::new(vec![0], 2)))]
    #[case(2, Bias::Right, Some(Pos::new(vec![2, 0], 0)))]
    #[case(4, Bias::Left, Some(Pos::new(vec![2, 0], 2)))]
    #[case(4, Bias::Right, Some(Pos::new(vec![3], 0)))]
    #[case(5, Bias::Left, None)]
    fn test_resolve(#[case] flat: usize, #[case] bias: Bias, #[case] expected: Option<Pos>) {
        assert_eq!(resolve(&sample(), flat, bias), expected);
    }

    #[test]
    fn test_resolve_right_at_document_end() {
        let d = doc(vec![p("ab"), p("cd")]);
        assert_eq!(resolve(&d, 4, Bias::Right), Some(Pos::new(vec![1], 2)));
    }

    #[test]
    fn test_flat_offset() {
        let d = sample();

        assert_eq!(flat_offset(&d, &Pos::new(vec![2, 0], 1)), Some(3));
        assert_eq!(flat_offset(&d, &Pos::new(vec![3], 0)), Some(4));
        assert_eq!(flat_offset(&d, &Pos::new(vec![1], 0)), None);
        assert_eq!(flat_offset(&d, &Pos::new(vec![0], 3)), None);
    }
}
