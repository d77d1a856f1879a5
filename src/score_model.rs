//! This module contains the `ScoreModel`: a linear scoring scheme for local alignment.
//!
//! Unlike the cost models of global aligners, scores are maximized: matches
//! are rewarded and mismatches and gaps are (typically) penalized.
use serde::{Deserialize, Serialize};

/// Type for storing scores. Signed, since mismatches and gaps are negative.
pub type Score = i32;

/// A linear score model: a match reward, a mismatch penalty, and a single gap
/// penalty used for both insertions and deletions.
#[derive(Serialize, Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScoreModel {
    /// Score for two identical aligned symbols. Should be positive.
    pub match_score: Score,
    /// Score for two differing aligned symbols. Typically negative.
    pub mismatch: Score,
    /// Score for a symbol aligned to a gap, in either sequence. Typically negative.
    pub gap: Score,
}

impl Default for ScoreModel {
    fn default() -> Self {
        Self {
            match_score: 3,
            mismatch: -3,
            gap: -2,
        }
    }
}

impl ScoreModel {
    pub fn new(match_score: Score, mismatch: Score, gap: Score) -> Self {
        Self {
            match_score,
            mismatch,
            gap,
        }
    }

    /// The score of aligning `x` against `y`.
    #[inline]
    pub fn similarity(&self, x: u8, y: u8) -> Score {
        if x == y {
            self.match_score
        } else {
            self.mismatch
        }
    }

    /// Whether a score increase of `delta` along a diagonal edge is explained by
    /// aligning `x` against `y`.
    #[inline]
    pub fn is_diagonal(&self, x: u8, y: u8, delta: Score) -> bool {
        delta == self.similarity(x, y)
    }

    /// Whether a score increase of `delta` along a horizontal or vertical edge
    /// is explained by a gap.
    #[inline]
    pub fn is_gap(&self, delta: Score) -> bool {
        delta == self.gap
    }
}

impl std::fmt::Display for ScoreModel {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(
            f,
            "match={} mismatch={} gap={}",
            self.match_score, self.mismatch, self.gap
        )
    }
}
