//! This module contains the local aligner and the types describing its output.

use self::cigar::Cigar;
use crate::error::Result;
use crate::graph::Pos;
use crate::score_model::{Score, ScoreModel};
use serde::Serialize;

pub mod cigar;
pub mod sw;


/// An owned sequence.
pub type Sequence = Vec<u8>;
/// A sequence slice.
pub type Seq<'a> = &'a [u8];
/// A path through the alignment graph.
pub type Path = Vec<Pos>;

/// An aligner is a type that supports locally aligning sequences using some algorithm.
///
/// Note that insertions are when `b` has more characters than `a`, and deletions are when `b` has less characters than `a`.
pub trait Aligner {
    /// Returns the score model used by the aligner.
    fn score_model(&self) -> &ScoreModel;

    /// Finds the best local alignment score of `a` and `b` and the cell where it ends.
    fn score(&self, a: Seq, b: Seq) -> Result<(Score, Pos)>;

    /// Finds the best local alignment of `a` and `b`.
    fn align(&self, a: Seq, b: Seq) -> Result<Alignment>;
}

/// A local alignment: a path from a 0-score cell `start` to the maximal cell `end`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Alignment {
    pub score: Score,
    /// The 0-score cell where the alignment starts.
    pub start: Pos,
    /// The maximum-score cell where the alignment ends.
    pub end: Pos,
    /// The traceback, from `end` back to `start` (inclusive).
    pub path: Path,
    pub cigar: Cigar,
}

impl Alignment {
    /// The two gapped rows of the alignment, with `-` for gaps.
    pub fn aligned(&self, a: Seq, b: Seq) -> (String, String) {
        self.cigar.aligned_rows(a, b, self.start)
    }

    /// The aligned substrings `a[start.0..end.0]` and `b[start.1..end.1]`.
    pub fn ranges(&self) -> (std::ops::Range<usize>, std::ops::Range<usize>) {
        (self.start.0..self.end.0, self.start.1..self.end.1)
    }
}
