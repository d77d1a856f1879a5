//! Smith-Waterman local alignment with linear gap penalties.
//!
//! The scoring matrix is filled row by row. Each cell holds the best score of
//! an alignment ending exactly there, clamped to 0 so that negative prefixes
//! are dropped instead of extended.
//!
//! The traceback does not use stored directions. Instead, it re-derives which
//! of the three recurrence terms produced the score of the current cell,
//! preferring diagonal over up over left when several apply.

use super::cigar::Cigar;
use super::{Aligner, Alignment, Path, Seq};
use crate::error::{AlignError, Result};
use crate::graph::{Edge, Pos};
use crate::matrix::ScoreMatrix;
use crate::score_model::{Score, ScoreModel};
use std::cmp::max;

/// Smith-Waterman aligner.
#[derive(Debug, Clone, Copy, Default)]
pub struct SW {
    /// The score model to use.
    pub sm: ScoreModel,
}

impl SW {
    pub fn new(sm: ScoreModel) -> Self {
        Self { sm }
    }

    /// The recurrence for cell `(i, j)`, with `i, j >= 1`.
    #[inline]
    fn cell(&self, m: &ScoreMatrix, a: Seq, b: Seq, pos: Pos) -> Result<Score> {
        let Pos(i, j) = pos;
        let add = |s: Score, delta: Score| {
            s.checked_add(delta)
                .ok_or(AlignError::ScoreOverflow { pos })
        };
        let diag = add(m[Pos(i - 1, j - 1)], self.sm.similarity(a[i - 1], b[j - 1]))?;
        let up = add(m[Pos(i - 1, j)], self.sm.gap)?;
        let left = add(m[Pos(i, j - 1)], self.sm.gap)?;
        Ok(max(0, max(diag, max(up, left))))
    }

    /// Fills the `(|a|+1) x (|b|+1)` scoring matrix.
    ///
    /// Also returns the position of the first (in row-major order) cell with
    /// the maximal score, or `None` when all cells are 0.
    /// Fails with [`AlignError::ScoreOverflow`] when a score does not fit in a [`Score`].
    pub fn fill(&self, a: Seq, b: Seq) -> Result<(ScoreMatrix, Option<Pos>)> {
        let mut m = ScoreMatrix::new(a.len() + 1, b.len() + 1);

        // Row 0 and column 0 are already 0.
        let mut max_score = 0;
        let mut max_pos = None;
        for i in 1..m.rows() {
            for j in 1..m.cols() {
                let s = self.cell(&m, a, b, Pos(i, j))?;
                // Strictly greater, so the first occurrence is kept.
                if s > max_score {
                    max_score = s;
                    max_pos = Some(Pos(i, j));
                }
                m.set(Pos(i, j), s);
            }
        }

        match max_pos {
            Some(pos) => log::debug!(
                "Filled {}x{} matrix; max score {max_score} at {pos}",
                m.rows(),
                m.cols()
            ),
            None => log::debug!("Filled {}x{} matrix; all cells are 0", m.rows(), m.cols()),
        }
        Ok((m, max_pos))
    }

    /// Like [`SW::fill`], but fails with [`AlignError::NoAlignment`] when no cell is positive.
    pub fn build(&self, a: Seq, b: Seq) -> Result<(ScoreMatrix, Pos)> {
        let (m, max_pos) = self.fill(a, b)?;
        let pos = max_pos.ok_or(AlignError::NoAlignment {
            rows: m.rows(),
            cols: m.cols(),
        })?;
        Ok((m, pos))
    }

    /// The edge that produced the (positive) score at `pos`, and its parent.
    ///
    /// Diagonal is preferred over up, and up over left. `None` when no edge
    /// explains the score, e.g. for a positive cell on the boundary.
    fn parent_edge(&self, m: &ScoreMatrix, a: Seq, b: Seq, pos: Pos) -> Option<(Edge, Pos)> {
        let s = m[pos];
        [Edge::Diagonal, Edge::Up, Edge::Left]
            .into_iter()
            .find_map(|edge| {
                let parent = edge.parent(pos)?;
                let delta = s.checked_sub(m[parent])?;
                let explained = match edge {
                    Edge::Diagonal => self.sm.is_diagonal(a[parent.0], b[parent.1], delta),
                    Edge::Up | Edge::Left => self.sm.is_gap(delta),
                };
                explained.then_some((edge, parent))
            })
    }

    /// Walk back from `start` until a cell with score 0 is reached.
    ///
    /// Returns all visited positions, starting with `start` and ending with the
    /// 0 cell. When `start` itself has score 0, the path is just `[start]`.
    pub fn track_path(&self, m: &ScoreMatrix, a: Seq, b: Seq, start: Pos) -> Result<Path> {
        if m.rows() != a.len() + 1 || m.cols() != b.len() + 1 {
            return Err(AlignError::DimensionMismatch {
                len_a: a.len(),
                len_b: b.len(),
                rows: m.rows(),
                cols: m.cols(),
            });
        }
        if !m.contains(start) {
            return Err(AlignError::InvalidStart {
                pos: start,
                rows: m.rows(),
                cols: m.cols(),
            });
        }

        let mut path: Path = vec![];
        let mut pos = start;
        while m[pos] != 0 {
            path.push(pos);
            let Some((edge, parent)) = self.parent_edge(m, a, b, pos) else {
                return Err(AlignError::InconsistentMatrix { pos, score: m[pos] });
            };
            log::trace!("{pos} score {} <- {edge:?}", m[pos]);
            pos = parent;
        }
        path.push(pos);
        Ok(path)
    }

    /// The full alignment ending at `end`, read from a matrix built by [`SW::fill`].
    pub fn traceback(&self, m: &ScoreMatrix, a: Seq, b: Seq, end: Pos) -> Result<Alignment> {
        let path = self.track_path(m, a, b, end)?;
        let cigar = Cigar::from_path(a, b, &path);
        let start = *path.last().unwrap_or(&end);
        log::debug!("Aligned {start} -> {end} with score {}: {cigar}", m[end]);
        Ok(Alignment {
            score: m[end],
            start,
            end,
            path,
            cigar,
        })
    }
}

impl Aligner for SW {
    fn score_model(&self) -> &ScoreModel {
        &self.sm
    }

    fn score(&self, a: Seq, b: Seq) -> Result<(Score, Pos)> {
        let (m, pos) = self.build(a, b)?;
        Ok((m[pos], pos))
    }

    fn align(&self, a: Seq, b: Seq) -> Result<Alignment> {
        let (m, end) = self.build(a, b)?;
        self.traceback(&m, a, b, end)
    }
}
