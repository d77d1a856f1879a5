//! Dense storage for the scoring matrix.
use std::ops::Index;

use crate::{graph::Pos, score_model::Score};

/// A `rows x cols` grid of scores, stored row-major in a single allocation.
///
/// Row 0 and column 0 are the boundary and stay 0.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ScoreMatrix {
    rows: usize,
    cols: usize,
    data: Vec<Score>,
}

impl ScoreMatrix {
    /// A zero-initialized matrix. Only the aligner creates and fills matrices.
    pub(crate) fn new(rows: usize, cols: usize) -> Self {
        Self {
            rows,
            cols,
            data: vec![0; rows * cols],
        }
    }

    pub fn rows(&self) -> usize {
        self.rows
    }

    pub fn cols(&self) -> usize {
        self.cols
    }

    #[inline]
    pub fn contains(&self, Pos(i, j): Pos) -> bool {
        i < self.rows && j < self.cols
    }

    /// The score at `pos`, or `None` when it is out of bounds.
    #[inline]
    pub fn get(&self, pos: Pos) -> Option<Score> {
        self.contains(pos).then(|| self[pos])
    }

    pub fn row(&self, i: usize) -> &[Score] {
        &self.data[i * self.cols..(i + 1) * self.cols]
    }

    pub fn iter_rows(&self) -> impl Iterator<Item = &[Score]> + '_ {
        (0..self.rows).map(|i| self.row(i))
    }

    /// Column `j` as an owned vector.
    pub fn col(&self, j: usize) -> Vec<Score> {
        (0..self.rows).map(|i| self[Pos(i, j)]).collect()
    }

    /// Nested vectors, e.g. for serialization.
    pub fn to_rows(&self) -> Vec<Vec<Score>> {
        self.iter_rows().map(|r| r.to_vec()).collect()
    }

    /// The largest value in the matrix. 0 for an empty matrix.
    pub fn max_value(&self) -> Score {
        self.data.iter().copied().max().unwrap_or(0)
    }
}

impl Index<Pos> for ScoreMatrix {
    type Output = Score;

    #[inline]
    fn index(&self, Pos(i, j): Pos) -> &Score {
        debug_assert!(i < self.rows && j < self.cols);
        &self.data[i * self.cols + j]
    }
}

impl ScoreMatrix {
    #[inline]
    pub(crate) fn set(&mut self, Pos(i, j): Pos, score: Score) {
        debug_assert!(i < self.rows && j < self.cols);
        self.data[i * self.cols + j] = score;
    }
}
