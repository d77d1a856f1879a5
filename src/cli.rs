use crate::aligners::{sw::SW, Alignment, Seq};
use crate::error::{AlignError, Result};
use crate::generate::{generate_pair, GenerateArgs};
use crate::prelude::to_string;
use crate::render::{format_alignment, format_matrix, format_path};
use crate::score_model::{Score, ScoreModel};
use bio::io::fasta;
use clap::{value_parser, Parser};
use itertools::Itertools;
use rand::{Rng, SeedableRng};
use rand_chacha::ChaCha8Rng;
use serde::{Deserialize, Serialize};
use std::{
    fmt,
    fs::File,
    io::{BufRead, BufReader, Write},
    ops::ControlFlow,
    path::{Path, PathBuf},
};

/// The pair aligned when no input is given.
pub const DEFAULT_A: &[u8] = b"TGTTACGG";
pub const DEFAULT_B: &[u8] = b"GGTTGACTA";

/// Locally align pairs of sequences using Smith-Waterman.
#[derive(Parser, Serialize, Deserialize, Debug)]
#[clap(author, about)]
pub struct Cli {
    /// The first sequence, indexing the rows of the matrix.
    #[clap(requires = "b", conflicts_with_all = ["input", "length"], display_order = 0)]
    pub a: Option<String>,

    /// The second sequence, indexing the columns of the matrix.
    #[clap(display_order = 0)]
    pub b: Option<String>,

    /// A .seq, .txt, or Fasta file with sequence pairs to align.
    #[clap(short, long, value_parser = value_parser!(PathBuf), conflicts_with = "length", display_order = 1)]
    pub input: Option<PathBuf>,

    /// Write one JSON object per aligned pair to this file.
    #[clap(short, long, value_parser = value_parser!(PathBuf), display_order = 1)]
    pub output: Option<PathBuf>,

    /// Print the (transposed) scoring matrix of each pair.
    #[clap(short = 'm', long)]
    pub print_matrix: bool,

    /// Print less. Pass twice for summary line only.
    #[clap(short, long, action = clap::ArgAction::Count)]
    pub silent: u8,

    /// Scores for matches, mismatches, and gaps.
    #[clap(flatten)]
    pub scoring: ScoringArgs,

    /// Options to generate an input pair.
    #[clap(flatten)]
    pub generate: GenerateArgs,
}

#[derive(Parser, Serialize, Deserialize, Debug, Clone, Copy)]
#[clap(next_help_heading = "Scoring")]
pub struct ScoringArgs {
    /// Score of two equal aligned characters
    #[clap(long = "match", default_value_t = 3, allow_hyphen_values = true, value_name = "SCORE")]
    pub match_score: Score,

    /// Score of two different aligned characters
    #[clap(long, default_value_t = -3, allow_hyphen_values = true, value_name = "SCORE")]
    pub mismatch: Score,

    /// Score of a character aligned to a gap
    #[clap(long, default_value_t = -2, allow_hyphen_values = true, value_name = "SCORE")]
    pub gap: Score,
}

impl ScoringArgs {
    pub fn score_model(&self) -> ScoreModel {
        ScoreModel::new(self.match_score, self.mismatch, self.gap)
    }
}

impl Cli {
    /// Call the given function for each pair in the input.
    ///
    /// The input is, in order of preference: the two positional sequences,
    /// the `--input` file or directory, generated pairs when `--length` is
    /// set, or the default pair.
    pub fn process_input_pairs(
        &self,
        mut run_pair: impl FnMut(Seq, Seq) -> Result<ControlFlow<()>>,
    ) -> Result<()> {
        if let (Some(a), Some(b)) = (&self.a, &self.b) {
            run_pair(a.as_bytes(), b.as_bytes())?;
            return Ok(());
        }

        if let Some(input) = &self.input {
            let files = if input.is_file() {
                vec![input.clone()]
            } else {
                let mut files = input
                    .read_dir()?
                    .map(|entry| entry.map(|e| e.path()))
                    .collect::<std::io::Result<Vec<_>>>()?;
                files.sort();
                files
            };

            for f in files {
                log::info!("Reading pairs from {}", f.display());
                if let ControlFlow::Break(()) = process_file(&f, &mut run_pair)? {
                    break;
                }
            }
        } else if let Some(opts) = self.generate.to_generate_options() {
            let seed = self.generate.seed.unwrap_or_else(|| {
                let seed = rand::thread_rng().gen_range(0..u32::MAX as u64);
                log::info!("Generating pairs with seed {seed}");
                seed
            });
            let ref mut rng = ChaCha8Rng::seed_from_u64(seed);
            for _ in 0..self.generate.cnt {
                let (a, b) = generate_pair(&opts, rng);
                if let ControlFlow::Break(()) = run_pair(&a, &b)? {
                    break;
                }
            }
        } else {
            run_pair(DEFAULT_A, DEFAULT_B)?;
        }
        Ok(())
    }
}

impl Cli {
    /// Align one pair and report it.
    ///
    /// Unless silenced, the matrix (with `-m`), path, and alignment go to `out`.
    /// One JSON line per pair goes to `json`, and the pair is counted in `summary`.
    pub fn report_pair(
        &self,
        sw: &SW,
        a: Seq,
        b: Seq,
        out: &mut impl Write,
        json: Option<&mut dyn Write>,
        summary: &mut Summary,
    ) -> Result<()> {
        let (m, max_pos) = sw.fill(a, b)?;
        if self.print_matrix && self.silent == 0 {
            writeln!(out, "{}", format_matrix(&m))?;
        }

        let alignment = match max_pos {
            Some(end) => Some(sw.traceback(&m, a, b, end)?),
            None => {
                log::warn!(
                    "No local alignment between {} and {}",
                    to_string(a),
                    to_string(b)
                );
                None
            }
        };

        if self.silent == 0 {
            match &alignment {
                Some(aln) => {
                    writeln!(out, "{}", format_path(&aln.path))?;
                    writeln!(out, "{}", format_alignment(aln, a, b))?;
                    writeln!(out, "score {} cigar {}", aln.score, aln.cigar)?;
                }
                None => writeln!(out, "{}", format_path(&[]))?,
            }
        }

        summary.add(alignment.as_ref());
        if let Some(json) = json {
            serde_json::to_writer(&mut *json, &PairRecord::new(a, b, sw.sm, alignment))?;
            writeln!(json)?;
        }
        Ok(())
    }
}

/// Run all pairs in a single file.
fn process_file(
    f: &Path,
    run_pair: &mut impl FnMut(Seq, Seq) -> Result<ControlFlow<()>>,
) -> Result<ControlFlow<()>> {
    let ext = f.extension().and_then(|e| e.to_str()).unwrap_or_default();
    match ext {
        "seq" | "txt" => {
            let lines = BufReader::new(File::open(f)?)
                .lines()
                .collect::<std::io::Result<Vec<_>>>()?;
            for (a, b) in lines.iter().map(|l| l.trim_end().as_bytes()).tuples() {
                let (a, b) = if ext == "seq" {
                    (strip_marker(a, b'>', f)?, strip_marker(b, b'<', f)?)
                } else {
                    (a, b)
                };
                if let ControlFlow::Break(()) = run_pair(a, b)? {
                    return Ok(ControlFlow::Break(()));
                }
            }
        }
        "fna" | "fa" | "fasta" => {
            for (a, b) in fasta::Reader::new(BufReader::new(File::open(f)?))
                .records()
                .tuples()
            {
                let (a, b) = (a?, b?);
                if let ControlFlow::Break(()) = run_pair(a.seq(), b.seq())? {
                    return Ok(ControlFlow::Break(()));
                }
            }
        }
        ext => {
            return Err(AlignError::Input(format!(
                "Unknown file extension {ext:?} of {}. Must be in {{seq,txt,fna,fa,fasta}}.",
                f.display()
            )))
        }
    }
    Ok(ControlFlow::Continue(()))
}

/// Lines of a .seq file start with `>` for the first and `<` for the second sequence.
fn strip_marker<'a>(line: &'a [u8], marker: u8, f: &Path) -> Result<&'a [u8]> {
    match line.split_first() {
        Some((&c, rest)) if c == marker => Ok(rest),
        _ => Err(AlignError::Input(format!(
            "Line {:?} in {} does not start with {:?}.",
            to_string(line),
            f.display(),
            marker as char
        ))),
    }
}

/// One line of `--output`.
#[derive(Serialize, Debug)]
pub struct PairRecord {
    pub a: String,
    pub b: String,
    pub score_model: ScoreModel,
    /// `None` when the pair has no local alignment.
    pub alignment: Option<Alignment>,
    pub aligned_a: Option<String>,
    pub aligned_b: Option<String>,
}

impl PairRecord {
    pub fn new(a: Seq, b: Seq, sm: ScoreModel, alignment: Option<Alignment>) -> Self {
        let (aligned_a, aligned_b) = match &alignment {
            Some(aln) => {
                let (x, y) = aln.aligned(a, b);
                (Some(x), Some(y))
            }
            None => (None, None),
        };
        Self {
            a: to_string(a),
            b: to_string(b),
            score_model: sm,
            alignment,
            aligned_a,
            aligned_b,
        }
    }
}

/// Counts over all processed pairs.
#[derive(Serialize, Default, Debug, Clone, Copy, PartialEq, Eq)]
pub struct Summary {
    pub pairs: usize,
    pub aligned: usize,
    pub no_match: usize,
    pub total_score: i64,
}

impl Summary {
    pub fn add(&mut self, alignment: Option<&Alignment>) {
        self.pairs += 1;
        match alignment {
            Some(aln) => {
                self.aligned += 1;
                self.total_score += aln.score as i64;
            }
            None => self.no_match += 1,
        }
    }
}

impl fmt::Display for Summary {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "pairs={} aligned={} no_match={} total_score={}",
            self.pairs, self.aligned, self.no_match, self.total_score
        )
    }
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::aligners::Aligner;

    #[test]
    fn cli_test() {
        <Cli as clap::CommandFactory>::command().debug_assert();
    }

    fn collect_pairs(cli: &Cli) -> Result<Vec<(String, String)>> {
        let mut pairs = vec![];
        cli.process_input_pairs(|a, b| {
            pairs.push((to_string(a), to_string(b)));
            Ok(ControlFlow::Continue(()))
        })?;
        Ok(pairs)
    }

    fn temp_file(name: &str, content: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("lpa-cli-test-{}", std::process::id()));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join(name);
        std::fs::File::create(&path)
            .unwrap()
            .write_all(content.as_bytes())
            .unwrap();
        path
    }

    #[test]
    fn defaults() {
        let cli = Cli::try_parse_from(["lpa"]).unwrap();
        assert_eq!(cli.scoring.score_model(), ScoreModel::default());
        assert_eq!(
            collect_pairs(&cli).unwrap(),
            vec![("TGTTACGG".to_string(), "GGTTGACTA".to_string())]
        );
    }

    #[test]
    fn negative_scores() {
        let cli =
            Cli::try_parse_from(["lpa", "--match", "2", "--mismatch", "-1", "--gap", "-4"]).unwrap();
        assert_eq!(cli.scoring.score_model(), ScoreModel::new(2, -1, -4));
    }

    #[test]
    fn positional_pair() {
        let cli = Cli::try_parse_from(["lpa", "ACGT", "CGTA"]).unwrap();
        assert_eq!(
            collect_pairs(&cli).unwrap(),
            vec![("ACGT".to_string(), "CGTA".to_string())]
        );
        assert!(Cli::try_parse_from(["lpa", "ACGT"]).is_err());
    }

    #[test]
    fn generated_pairs() {
        let cli = Cli::try_parse_from(["lpa", "-n", "20", "-x", "3", "--seed", "1"]).unwrap();
        let pairs = collect_pairs(&cli).unwrap();
        assert_eq!(pairs.len(), 3);
        assert!(pairs.iter().all(|(a, _)| a.len() == 20));
        assert_eq!(pairs, collect_pairs(&cli).unwrap());
    }

    #[test]
    fn seq_file() {
        let f = temp_file("pairs.seq", ">ACGT\n<ACGA\n>TTT\n<TTA\n");
        let cli = Cli::try_parse_from(["lpa", "-i", f.to_str().unwrap()]).unwrap();
        assert_eq!(
            collect_pairs(&cli).unwrap(),
            vec![
                ("ACGT".to_string(), "ACGA".to_string()),
                ("TTT".to_string(), "TTA".to_string())
            ]
        );

        let f = temp_file("bad.seq", "ACGT\n<ACGA\n");
        let cli = Cli::try_parse_from(["lpa", "-i", f.to_str().unwrap()]).unwrap();
        assert!(matches!(collect_pairs(&cli), Err(AlignError::Input(_))));
    }

    #[test]
    fn fasta_file() {
        let f = temp_file("pairs.fa", ">a\nACGT\nAC\n>b\nGGT\n");
        let cli = Cli::try_parse_from(["lpa", "-i", f.to_str().unwrap()]).unwrap();
        assert_eq!(
            collect_pairs(&cli).unwrap(),
            vec![("ACGTAC".to_string(), "GGT".to_string())]
        );
    }

    #[test]
    fn unknown_extension() {
        let f = temp_file("pairs.csv", "A,C\n");
        let cli = Cli::try_parse_from(["lpa", "-i", f.to_str().unwrap()]).unwrap();
        assert!(matches!(collect_pairs(&cli), Err(AlignError::Input(_))));
    }

    #[test]
    fn stop_early() {
        let cli = Cli::try_parse_from(["lpa", "-n", "5", "-x", "10", "--seed", "3"]).unwrap();
        let mut cnt = 0;
        cli.process_input_pairs(|_, _| {
            cnt += 1;
            Ok(if cnt == 4 {
                ControlFlow::Break(())
            } else {
                ControlFlow::Continue(())
            })
        })
        .unwrap();
        assert_eq!(cnt, 4);
    }

    #[test]
    fn record_and_summary() {
        let sw = SW::default();
        let mut summary = Summary::default();

        let aln = sw.align(DEFAULT_A, DEFAULT_B).ok();
        summary.add(aln.as_ref());
        let r = PairRecord::new(DEFAULT_A, DEFAULT_B, sw.sm, aln);
        assert_eq!(r.aligned_a.as_deref(), Some("GTT-AC"));
        let json = serde_json::to_string(&r).unwrap();
        assert!(json.contains("\"cigar\":\"3M1I2M\""), "{json}");
        assert!(json.contains("\"end\":[6,7]"), "{json}");

        let aln = sw.align(b"", b"ACGT").ok();
        summary.add(aln.as_ref());
        let r = PairRecord::new(b"", b"ACGT", sw.sm, aln);
        assert!(r.alignment.is_none());

        assert_eq!(summary.to_string(), "pairs=2 aligned=1 no_match=1 total_score=13");
    }

    fn report(args: &[&str], pairs: &[(Seq, Seq)]) -> (String, String, Summary) {
        let cli = Cli::try_parse_from(args.iter().copied()).unwrap();
        let sw = SW::new(cli.scoring.score_model());
        let (mut out, mut json) = (Vec::<u8>::new(), Vec::<u8>::new());
        let mut summary = Summary::default();
        for &(a, b) in pairs {
            let json: &mut dyn Write = &mut json;
            cli.report_pair(&sw, a, b, &mut out, Some(json), &mut summary)
                .unwrap();
        }
        (
            String::from_utf8(out).unwrap(),
            String::from_utf8(json).unwrap(),
            summary,
        )
    }

    #[test]
    fn report_pairs() {
        let pairs: [(Seq, Seq); 2] = [(DEFAULT_A, DEFAULT_B), (b"AAAA", b"CCCC")];

        let (out, json, summary) = report(&["lpa"], &pairs);
        assert_eq!(
            out,
            "[6, 7] -> [5, 6] -> [4, 5] -> [4, 4] -> [3, 3] -> [2, 2] -> [1, 1]\n\
             GTT-AC\n||| ||\nGTTGAC\n\
             score 13 cigar 3M1I2M\n\
             No matches.\n"
        );
        let lines = json.lines().collect_vec();
        assert_eq!(lines.len(), 2);
        assert!(lines[0].contains("\"cigar\":\"3M1I2M\""), "{}", lines[0]);
        assert!(lines[1].contains("\"alignment\":null"), "{}", lines[1]);
        assert_eq!(summary.to_string(), "pairs=2 aligned=1 no_match=1 total_score=13");

        let (out, _, _) = report(&["lpa", "-m"], &pairs[..1]);
        assert!(out.starts_with("[[ 0  0  0  0  0  0  0  0  0]\n"), "{out}");
        assert!(out.ends_with("score 13 cigar 3M1I2M\n"), "{out}");

        // Silenced output still writes JSON and counts pairs.
        let (out, json, summary) = report(&["lpa", "-s", "-m"], &pairs);
        assert_eq!(out, "");
        assert_eq!(json.lines().count(), 2);
        assert_eq!(summary.pairs, 2);
    }

    #[test]
    fn report_overflow() {
        let cli = Cli::try_parse_from(["lpa", "--match", "1073741824"]).unwrap();
        let sw = SW::new(cli.scoring.score_model());
        let mut summary = Summary::default();
        let res = cli.report_pair(&sw, b"AA", b"AA", &mut Vec::<u8>::new(), None, &mut summary);
        assert!(matches!(res, Err(AlignError::ScoreOverflow { .. })));
        assert_eq!(summary.pairs, 0);
    }
}
