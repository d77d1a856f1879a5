//! The alignment graph: positions in the scoring matrix and the edges between them.
//!
//! A local alignment is a path in the DAG whose nodes are the cells of the
//! scoring matrix. Every node has (up to) three incoming edges, from its
//! diagonal, upper, and left neighbour.
use serde::Serialize;
use std::fmt::{Debug, Display};

/// A position in a pairwise matching: `Pos(i, j)` is row `i` (sequence `a`)
/// and column `j` (sequence `b`) of the padded scoring matrix.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Default, PartialOrd, Ord)]
pub struct Pos(pub usize, pub usize);

impl Display for Pos {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "[{}, {}]", self.0, self.1)
    }
}

/// The three kinds of edges in the alignment graph, named after the
/// direction in which the parent lies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum Edge {
    /// From `(i-1, j-1)`: align `a[i-1]` against `b[j-1]`.
    Diagonal,
    /// From `(i-1, j)`: `a[i-1]` against a gap.
    Up,
    /// From `(i, j-1)`: a gap against `b[j-1]`.
    Left,
}

impl Edge {
    /// The parent of `pos` along this edge, or `None` on the boundary.
    pub fn parent(&self, Pos(i, j): Pos) -> Option<Pos> {
        match self {
            Edge::Diagonal => Some(Pos(i.checked_sub(1)?, j.checked_sub(1)?)),
            Edge::Up => Some(Pos(i.checked_sub(1)?, j)),
            Edge::Left => Some(Pos(i, j.checked_sub(1)?)),
        }
    }

    /// The edge going from `from` to `to`, if they are adjacent.
    pub fn between(from: Pos, to: Pos) -> Option<Edge> {
        [Edge::Diagonal, Edge::Up, Edge::Left]
            .into_iter()
            .find(|e| e.parent(to) == Some(from))
    }
}
