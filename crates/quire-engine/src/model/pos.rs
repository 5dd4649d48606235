use serde::{Deserialize, Serialize};
use std::cmp::Ordering;
use std::fmt;

use super::node::Node;

/// A location in a document tree.
///
/// `path` names the child to descend into at each depth, starting from the
/// document root. `offset` is a child index when the addressed node holds
/// blocks, and a character offset when it holds inline content. Paths never
/// descend into inline content: a position inside text stops at its
/// textblock.
///
/// Positions order by document order, so a position inside child `i` sorts
/// after offset `i` and before offset `i + 1` of the same parent.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Pos {
    pub path: Vec<usize>,
    pub offset: usize,
}

impl Pos {
    pub fn new(path: Vec<usize>, offset: usize) -> Self {
        Self { path, offset }
    }

    /// The first position of a document.
    pub fn start() -> Self {
        Self::new(Vec::new(), 0)
    }

    pub fn depth(&self) -> usize {
        self.path.len()
    }

    /// Drop `drop` trailing path components.
    ///
    /// The new offset is the first dropped component plus `bump`, so
    /// `bump = 0` addresses the point just before the node that contained this
    /// position and `bump = 1` the point just after it.
    ///
    /// # Panics
    /// Panics when `drop` is zero or larger than the path.
    pub fn shorten(&self, drop: usize, bump: usize) -> Pos {
        assert!(
            drop >= 1 && drop <= self.path.len(),
            "cannot drop {drop} components from {self}"
        );
        let depth = self.path.len() - drop;
        Pos::new(self.path[..depth].to_vec(), self.path[depth] + bump)
    }

    /// The positions just before and just after the node at `path`.
    pub fn around(path: &[usize]) -> (Pos, Pos) {
        let at = Pos::new(path.to_vec(), 0);
        (at.shorten(1, 0), at.shorten(1, 1))
    }

    /// Whether this position addresses a container in `doc` and its offset
    /// fits that container.
    pub fn is_valid_in(&self, doc: &Node) -> bool {
        let mut node = doc;
        for &index in &self.path {
            if node.node_type().is_textblock() {
                return false;
            }
            match node.child(index) {
                Some(child) => node = child,
                None => return false,
            }
        }
        !node.node_type().is_leaf() && self.offset <= node.size()
    }
}

impl Ord for Pos {
    fn cmp(&self, other: &Self) -> Ordering {
        let shared = self.path.len().min(other.path.len());
        for depth in 0..shared {
            match self.path[depth].cmp(&other.path[depth]) {
                Ordering::Equal => continue,
                ord => return ord,
            }
        }
        match (self.path.len() == shared, other.path.len() == shared) {
            (true, true) => self.offset.cmp(&other.offset),
            // `self` sits between children, `other` inside child `other.path[shared]`
            (true, false) => {
                if self.offset <= other.path[shared] {
                    Ordering::Less
                } else {
                    Ordering::Greater
                }
            }
            (false, true) => {
                if other.offset <= self.path[shared] {
                    Ordering::Greater
                } else {
                    Ordering::Less
                }
            }
            (false, false) => unreachable!("paths diverge before their shared length"),
        }
    }
}

impl PartialOrd for Pos {
    fn partial_cmp(&self, other: &Self) -> Option<Ordering> {
        Some(self.cmp(other))
    }
}

impl fmt::Display for Pos {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{:?}:{}", self.path, self.offset)
    }
}
