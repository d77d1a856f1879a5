use itertools::Itertools;
use serde::{Serialize, Serializer};
use std::fmt::{self, Write};

use super::Seq;
use crate::graph::{Edge, Pos};
use crate::score_model::{Score, ScoreModel};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum CigarOp {
    Match,
    Mismatch,
    /// A character of `b` opposite a gap in `a`.
    Insertion,
    /// A character of `a` opposite a gap in `b`.
    Deletion,
}

impl CigarOp {
    pub fn get_char(&self) -> char {
        match self {
            CigarOp::Match => 'M',
            CigarOp::Mismatch => 'X',
            CigarOp::Insertion => 'I',
            CigarOp::Deletion => 'D',
        }
    }

    /// The op corresponding to an edge into `to`.
    fn from_edge(edge: Edge, a: Seq, b: Seq, Pos(i, j): Pos) -> CigarOp {
        match edge {
            Edge::Diagonal if a[i - 1] == b[j - 1] => CigarOp::Match,
            Edge::Diagonal => CigarOp::Mismatch,
            Edge::Up => CigarOp::Deletion,
            Edge::Left => CigarOp::Insertion,
        }
    }

    pub fn score(&self, sm: &ScoreModel) -> Score {
        match self {
            CigarOp::Match => sm.match_score,
            CigarOp::Mismatch => sm.mismatch,
            CigarOp::Insertion | CigarOp::Deletion => sm.gap,
        }
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct CigarElement {
    pub op: CigarOp,
    pub cnt: usize,
}

/// A run-length encoded sequence of `CigarOp`s.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Cigar {
    ops: Vec<CigarElement>,
}

impl Cigar {
    /// Appends `op`, extending the last run when it has the same op.
    pub fn push(&mut self, op: CigarOp) {
        if let Some(s) = self.ops.last_mut() {
            if s.op == op {
                s.cnt += 1;
                return;
            }
        }
        self.ops.push(CigarElement { op, cnt: 1 });
    }

    /// Decode a traceback path, given from its end (the maximal cell) back to
    /// its start (the 0 cell), as returned by the traceback.
    ///
    /// # Panics
    ///
    /// When two consecutive positions are not connected by an edge.
    pub fn from_path(a: Seq, b: Seq, path: &[Pos]) -> Cigar {
        let mut cigar = Cigar::default();
        for (&from, &to) in path.iter().rev().tuple_windows() {
            let edge = Edge::between(from, to).unwrap_or_else(|| {
                panic!("Path contains non-adjacent positions {from} and {to}.")
            });
            cigar.push(CigarOp::from_edge(edge, a, b, to));
        }
        cigar
    }

    pub fn ops(&self) -> &[CigarElement] {
        &self.ops
    }

    /// The number of runs.
    pub fn len(&self) -> usize {
        self.ops.len()
    }

    pub fn is_empty(&self) -> bool {
        self.ops.is_empty()
    }

    /// The total score of the ops under `sm`, or `None` when it overflows.
    pub fn score(&self, sm: &ScoreModel) -> Option<Score> {
        self.ops.iter().try_fold(0 as Score, |total, e| {
            let cnt = Score::try_from(e.cnt).ok()?;
            total.checked_add(e.op.score(sm).checked_mul(cnt)?)
        })
    }

    /// The two gapped rows of the alignment that starts at `start`, with `-` for gaps.
    pub fn aligned_rows(&self, a: Seq, b: Seq, start: Pos) -> (String, String) {
        let Pos(mut i, mut j) = start;
        let mut row_a = String::new();
        let mut row_b = String::new();
        for &CigarElement { op, cnt } in &self.ops {
            for _ in 0..cnt {
                match op {
                    CigarOp::Match | CigarOp::Mismatch => {
                        row_a.push(a[i] as char);
                        row_b.push(b[j] as char);
                        i += 1;
                        j += 1;
                    }
                    CigarOp::Deletion => {
                        row_a.push(a[i] as char);
                        row_b.push('-');
                        i += 1;
                    }
                    CigarOp::Insertion => {
                        row_a.push('-');
                        row_b.push(b[j] as char);
                        j += 1;
                    }
                }
            }
        }
        (row_a, row_b)
    }
}

impl fmt::Display for Cigar {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for e in &self.ops {
            write!(f, "{}", e.cnt)?;
            f.write_char(e.op.get_char())?;
        }
        Ok(())
    }
}

impl Serialize for Cigar {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

#[cfg(test)]
pub mod test {
    use super::*;

    /// Checks that the cigar is consistent with the sequences and re-sums to `score`.
    pub fn verify_cigar(sm: &ScoreModel, a: Seq, b: Seq, start: Pos, cigar: &Cigar, score: Score) {
        let Pos(mut i, mut j) = start;
        for &CigarElement { op, cnt } in cigar.ops() {
            for _ in 0..cnt {
                match op {
                    CigarOp::Match => {
                        assert_eq!(a[i], b[j], "Match at ({i}, {j}) on different characters.");
                        i += 1;
                        j += 1;
                    }
                    CigarOp::Mismatch => {
                        assert_ne!(a[i], b[j], "Mismatch at ({i}, {j}) on equal characters.");
                        i += 1;
                        j += 1;
                    }
                    CigarOp::Deletion => i += 1,
                    CigarOp::Insertion => j += 1,
                }
            }
        }
        assert!(i <= a.len() && j <= b.len());
        assert_eq!(cigar.score(sm), Some(score), "Cigar {cigar} does not sum to {score}.");
    }

    #[test]
    fn push_merges_runs() {
        let mut c = Cigar::default();
        for op in [
            CigarOp::Match,
            CigarOp::Match,
            CigarOp::Insertion,
            CigarOp::Match,
            CigarOp::Mismatch,
            CigarOp::Deletion,
            CigarOp::Deletion,
        ] {
            c.push(op);
        }
        assert_eq!(c.len(), 5);
        assert_eq!(c.to_string(), "2M1I1M1X2D");
    }

    #[test]
    fn score_overflow() {
        let mut c = Cigar::default();
        c.push(CigarOp::Match);
        c.push(CigarOp::Match);
        let sm = ScoreModel::new(Score::MAX / 2 + 1, -1, -1);
        assert_eq!(c.score(&sm), None);
        let sm = ScoreModel::new(Score::MAX / 2, -1, -1);
        assert_eq!(c.score(&sm), Some(Score::MAX - 1));
    }

    #[test]
    fn from_traceback_order() {
        let (a, b) = (b"TGTTACGG", b"GGTTGACTA");
        let path = vec![
            Pos(6, 7),
            Pos(5, 6),
            Pos(4, 5),
            Pos(4, 4),
            Pos(3, 3),
            Pos(2, 2),
            Pos(1, 1),
        ];
        let c = Cigar::from_path(a, b, &path);
        assert_eq!(c.to_string(), "3M1I2M");
        assert_eq!(c.score(&ScoreModel::default()), Some(13));
        let (ra, rb) = c.aligned_rows(a, b, Pos(1, 1));
        assert_eq!(ra, "GTT-AC");
        assert_eq!(rb, "GTTGAC");
    }

    #[test]
    fn single_position_path_is_empty() {
        let c = Cigar::from_path(b"A", b"C", &[Pos(1, 1)]);
        assert!(c.is_empty());
        assert_eq!(c.to_string(), "");
        assert_eq!(c.aligned_rows(b"A", b"C", Pos(1, 1)), (String::new(), String::new()));
    }

    #[test]
    #[should_panic]
    fn non_adjacent_path_panics() {
        Cigar::from_path(b"AAA", b"AAA", &[Pos(3, 3), Pos(1, 1)]);
    }

    #[test]
    fn serializes_as_string() {
        let c = Cigar::from_path(b"AC", b"AG", &[Pos(2, 2), Pos(1, 1), Pos(0, 0)]);
        assert_eq!(serde_json::to_string(&c).unwrap(), "\"1M1X\"");
    }
}
