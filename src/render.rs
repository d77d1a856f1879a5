//! Plain-text rendering of matrices, paths and alignments.
use itertools::Itertools;

use crate::aligners::{Alignment, Seq};
use crate::graph::Pos;
use crate::matrix::ScoreMatrix;

/// The transposed matrix, one column of the matrix per line, in numpy style:
/// ```text
/// [[ 0  0  0]
///  [ 0  3  1]]
/// ```
pub fn format_matrix(m: &ScoreMatrix) -> String {
    let width = (0..m.rows())
        .flat_map(|i| m.row(i).iter())
        .map(|v| v.to_string().len())
        .max()
        .unwrap_or(1);
    let lines = (0..m.cols())
        .map(|j| {
            m.col(j)
                .iter()
                .map(|v| format!("{v:>width$}"))
                .join(" ")
        })
        .collect_vec();
    let last = lines.len().saturating_sub(1);
    lines
        .iter()
        .enumerate()
        .map(|(idx, line)| {
            let open = if idx == 0 { "[[" } else { " [" };
            let close = if idx == last { "]]" } else { "]" };
            format!("{open}{line}{close}")
        })
        .join("\n")
}

/// `[i, j] -> [i, j] -> ...`, or `No matches.` for an empty path.
pub fn format_path(path: &[Pos]) -> String {
    if path.is_empty() {
        return "No matches.".to_string();
    }
    path.iter().join(" -> ")
}

/// The gapped rows of `a` and `b`, with a middle line marking matches with `|`
/// and mismatches with `.`.
pub fn format_alignment(alignment: &Alignment, a: Seq, b: Seq) -> String {
    let (row_a, row_b) = alignment.aligned(a, b);
    let marks: String = row_a
        .bytes()
        .zip(row_b.bytes())
        .map(|(x, y)| match (x, y) {
            (b'-', _) | (_, b'-') => ' ',
            (x, y) if x == y => '|',
            _ => '.',
        })
        .collect();
    format!("{row_a}\n{marks}\n{row_b}")
}
