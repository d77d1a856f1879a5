//! Errors reported by the aligner and its input handling.
use thiserror::Error;

use crate::{graph::Pos, score_model::Score};

#[derive(Debug, Error)]
pub enum AlignError {
    /// No cell of the scoring matrix is positive, so there is no local alignment.
    /// Happens for empty sequences, or when no symbol pair scores positively.
    #[error("no local alignment: all cells of the {rows}x{cols} scoring matrix are 0")]
    NoAlignment { rows: usize, cols: usize },

    /// Traceback was requested from a position outside the matrix.
    #[error("traceback start {pos} is outside the {rows}x{cols} scoring matrix")]
    InvalidStart { pos: Pos, rows: usize, cols: usize },

    /// The sequences passed to the traceback do not match the matrix they built.
    #[error(
        "sequences of length {len_a} and {len_b} do not fit a {rows}x{cols} scoring matrix"
    )]
    DimensionMismatch {
        len_a: usize,
        len_b: usize,
        rows: usize,
        cols: usize,
    },

    /// A cell score does not fit in a `Score`, e.g. for very large match scores.
    #[error("score overflow at {pos}: the score model is too large for these sequences")]
    ScoreOverflow { pos: Pos },

    /// A positive cell whose score is not explained by any of its parents.
    #[error("scoring matrix is inconsistent at {pos}: no parent explains score {score}")]
    InconsistentMatrix { pos: Pos, score: Score },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Malformed input file.
    #[error("invalid input: {0}")]
    Input(String),

    #[error("failed to write JSON: {0}")]
    Json(#[from] serde_json::Error),
}

pub type Result<T> = std::result::Result<T, AlignError>;
