//! Exact local pairwise alignment using the Smith-Waterman recurrence.
//!
//! The [`aligners::sw::SW`] aligner fills a scoring matrix where each cell
//! holds the best score of an alignment ending there (never below 0), finds the
//! first cell with the maximal score, and walks back from it to a 0 cell.
//!
//! ```
//! use local_pairwise_aligner::prelude::*;
//!
//! let aln = SW::default().align(b"TGTTACGG", b"GGTTGACTA").unwrap();
//! assert_eq!(aln.score, 13);
//! assert_eq!(aln.end, Pos(6, 7));
//! assert_eq!(aln.cigar.to_string(), "3M1I2M");
//! ```

pub mod aligners;
pub mod cli;
pub mod error;
pub mod generate;
pub mod graph;
pub mod matrix;
pub mod render;
pub mod score_model;

pub mod prelude {
    pub use crate::aligners::cigar::{Cigar, CigarElement, CigarOp};
    pub use crate::aligners::sw::SW;
    pub use crate::aligners::{Aligner, Alignment, Path, Seq, Sequence};
    pub use crate::error::{AlignError, Result};
    pub use crate::graph::{Edge, Pos};
    pub use crate::matrix::ScoreMatrix;
    pub use crate::score_model::{Score, ScoreModel};

    /// Lossy conversion of a sequence to a printable string.
    pub fn to_string(seq: Seq) -> String {
        String::from_utf8_lossy(seq).into_owned()
    }
}
