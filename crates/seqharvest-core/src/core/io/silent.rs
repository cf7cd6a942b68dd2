use crate::core::models::table::ScoreTable;
use crate::core::models::variant::VariantKey;
use crate::core::sequence::regions::VariableRegions;
use std::fs::File;
use std::io::{self, BufRead, BufReader};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, trace, warn};

const SEQUENCE_PREFIX: &str = "SEQUENCE:";
const SCORE_PREFIX: &str = "SCORE:";
const ANNOTATED_SEQUENCE_PREFIX: &str = "ANNOTATED_SEQUENCE:";
const BOUNDARY_MARKER: &str = "REMARK";
const HEADER_LABEL: &str = "description";
const MISSING_LABEL: &str = "missing";

#[derive(Debug, Error)]
pub enum SilentError {
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),
    #[error("Parse error on line {line}: {kind}")]
    Parse {
        line: usize,
        kind: SilentParseErrorKind,
    },
}

#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SilentParseErrorKind {
    #[error("Invalid or non-finite score (value: '{value}')")]
    InvalidFloat { value: String },
    #[error("Invalid integer format in column '{column}' (value: '{value}')")]
    InvalidInt { column: &'static str, value: String },
    #[error("SCORE data line precedes any SCORE header; column '{0}' is undefined")]
    UndefinedColumn(&'static str),
    #[error("SCORE header does not declare a '{0}' column")]
    MissingColumn(&'static str),
    #[error("{record} line has no field {position}")]
    MissingField {
        record: &'static str,
        position: usize,
    },
}

/// The role a single line plays in a silent file.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LineKind {
    Sequence,
    ScoreHeader,
    ScoreData,
    AnnotatedSequence,
    Boundary,
    Other,
}

impl LineKind {
    pub fn classify(line: &str) -> Self {
        if line.starts_with(SEQUENCE_PREFIX) {
            LineKind::Sequence
        } else if line.starts_with(SCORE_PREFIX) {
            if line.split_whitespace().any(|token| token == HEADER_LABEL) {
                LineKind::ScoreHeader
            } else {
                LineKind::ScoreData
            }
        } else if line.starts_with(ANNOTATED_SEQUENCE_PREFIX) {
            LineKind::AnnotatedSequence
        } else if line.contains(BOUNDARY_MARKER) {
            LineKind::Boundary
        } else {
            LineKind::Other
        }
    }
}

/// What happened to the record in progress when a boundary line was reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlushOutcome {
    /// No annotated sequence was seen; the buffered fields are kept for the record.
    Empty,
    Accepted,
    /// The stripped sequence did not match the master length (or no master was known).
    LengthMismatch,
    /// The model reported a nonzero number of residues without coordinates.
    MissingResidues,
    /// The record never received a SCORE data line.
    Unscored,
}

#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ParseStats {
    pub lines: usize,
    pub records: usize,
    pub accepted: usize,
    pub length_mismatches: usize,
    pub missing_residues: usize,
    pub unscored: usize,
}

impl ParseStats {
    pub fn rejected(&self) -> usize {
        self.length_mismatches + self.missing_residues + self.unscored
    }

    fn count(&mut self, outcome: FlushOutcome) {
        if outcome == FlushOutcome::Empty {
            return;
        }
        self.records += 1;
        match outcome {
            FlushOutcome::Accepted => self.accepted += 1,
            FlushOutcome::LengthMismatch => self.length_mismatches += 1,
            FlushOutcome::MissingResidues => self.missing_residues += 1,
            FlushOutcome::Unscored => self.unscored += 1,
            FlushOutcome::Empty => {}
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq)]
enum SequenceSlot {
    #[default]
    Unseen,
    NoMatch,
    Variant(VariantKey),
}

#[derive(Debug, Clone, Default, PartialEq)]
struct PendingRecord {
    score: Option<f64>,
    missing: Option<i64>,
    sequence: SequenceSlot,
}

/// Everything a completed pass over a silent file produces.
#[derive(Debug, Clone, Default)]
pub struct ParsedSilentFile {
    pub regions: Option<VariableRegions>,
    pub table: ScoreTable,
    pub stats: ParseStats,
}

/// Line-driven state machine that aggregates the models of one silent file.
///
/// The master sequence (and its variable regions) and the position of the `missing`
/// column are established from the file's header lines. Every other field belongs to the
/// record in progress and is cleared by [`flush`](Self::flush) when a boundary line is seen.
#[derive(Debug, Default)]
pub struct SilentParser {
    regions: Option<VariableRegions>,
    missing_column: Option<usize>,
    pending: PendingRecord,
    table: ScoreTable,
    stats: ParseStats,
}

impl SilentParser {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn regions(&self) -> Option<&VariableRegions> {
        self.regions.as_ref()
    }

    pub fn table(&self) -> &ScoreTable {
        &self.table
    }

    pub fn stats(&self) -> &ParseStats {
        &self.stats
    }

    /// Consumes one line. Returns the flush outcome when the line was a record boundary.
    pub fn feed_line(&mut self, line: &str) -> Result<Option<FlushOutcome>, SilentError> {
        self.stats.lines += 1;
        let line_num = self.stats.lines;
        let at_line = |kind| SilentError::Parse {
            line: line_num,
            kind,
        };

        match LineKind::classify(line) {
            LineKind::Sequence => self.read_master(line).map_err(at_line)?,
            LineKind::ScoreHeader => self.read_score_header(line).map_err(at_line)?,
            LineKind::ScoreData => self.read_score_data(line).map_err(at_line)?,
            LineKind::AnnotatedSequence => {
                self.read_annotated_sequence(line).map_err(at_line)?
            }
            LineKind::Boundary => return Ok(Some(self.flush())),
            LineKind::Other => {}
        }
        Ok(None)
    }

    /// Commits the record in progress to the score table if it is complete and valid,
    /// then clears it.
    ///
    /// A record is committed only when its annotated sequence matched the master length
    /// and its missing-residue count is zero. When no annotated sequence has been seen yet
    /// the flush does nothing and the buffered fields stay in place.
    pub fn flush(&mut self) -> FlushOutcome {
        if self.pending.sequence == SequenceSlot::Unseen {
            return FlushOutcome::Empty;
        }

        let pending = std::mem::take(&mut self.pending);
        let outcome = match pending.sequence {
            SequenceSlot::Unseen => FlushOutcome::Empty,
            SequenceSlot::NoMatch => FlushOutcome::LengthMismatch,
            SequenceSlot::Variant(key) => match (pending.missing, pending.score) {
                (Some(0), Some(score)) => {
                    trace!("Accepted {} with score {}", key, score);
                    self.table.record(key, score);
                    FlushOutcome::Accepted
                }
                (Some(missing), _) if missing != 0 => {
                    trace!("Rejected {}: {} missing residue(s)", key, missing);
                    FlushOutcome::MissingResidues
                }
                _ => {
                    trace!("Rejected {}: no score data for record", key);
                    FlushOutcome::Unscored
                }
            },
        };
        self.stats.count(outcome);
        outcome
    }

    pub fn finish(self) -> ParsedSilentFile {
        if self.pending.sequence != SequenceSlot::Unseen {
            debug!("Input ended inside a record without a boundary line; record discarded.");
        }
        ParsedSilentFile {
            regions: self.regions,
            table: self.table,
            stats: self.stats,
        }
    }

    pub fn read_from(reader: &mut impl BufRead) -> Result<ParsedSilentFile, SilentError> {
        Self::read_from_with(reader, |_| {})
    }

    /// Parses every line of `reader`, calling `on_flush` with the outcome of each boundary.
    pub fn read_from_with(
        reader: &mut impl BufRead,
        mut on_flush: impl FnMut(FlushOutcome),
    ) -> Result<ParsedSilentFile, SilentError> {
        let mut parser = Self::new();
        for line in reader.lines() {
            if let Some(outcome) = parser.feed_line(&line?)? {
                on_flush(outcome);
            }
        }
        Ok(parser.finish())
    }

    pub fn read_from_path<P: AsRef<Path>>(path: P) -> Result<ParsedSilentFile, SilentError> {
        Self::read_from_path_with(path, |_| {})
    }

    pub fn read_from_path_with<P: AsRef<Path>>(
        path: P,
        on_flush: impl FnMut(FlushOutcome),
    ) -> Result<ParsedSilentFile, SilentError> {
        let file = File::open(path)?;
        let mut reader = BufReader::new(file);
        Self::read_from_with(&mut reader, on_flush)
    }

    fn read_master(&mut self, line: &str) -> Result<(), SilentParseErrorKind> {
        if self.regions.is_some() {
            return Ok(());
        }
        let master = second_token(line, "SEQUENCE")?;
        let regions = VariableRegions::from_master(master);
        debug!(
            "Master sequence of length {} has {} variable region(s): {:?}",
            regions.master_len(),
            regions.len(),
            regions.groups()
        );
        if regions.is_empty() {
            warn!("Master sequence '{}' has no design positions.", master);
        }
        self.regions = Some(regions);
        Ok(())
    }

    fn read_score_header(&mut self, line: &str) -> Result<(), SilentParseErrorKind> {
        let column = line
            .split_whitespace()
            .position(|token| token == MISSING_LABEL)
            .ok_or(SilentParseErrorKind::MissingColumn(MISSING_LABEL))?;
        if self.missing_column.is_some_and(|known| known != column) {
            debug!(
                "SCORE header moved the '{}' column to position {}",
                MISSING_LABEL, column
            );
        }
        self.missing_column = Some(column);
        Ok(())
    }

    fn read_score_data(&mut self, line: &str) -> Result<(), SilentParseErrorKind> {
        let missing_column = self
            .missing_column
            .ok_or(SilentParseErrorKind::UndefinedColumn(MISSING_LABEL))?;
        let tokens: Vec<&str> = line.split_whitespace().collect();

        let score_token = tokens.get(1).ok_or(SilentParseErrorKind::MissingField {
            record: "SCORE",
            position: 2,
        })?;
        let score = score_token
            .parse::<f64>()
            .ok()
            .filter(|score| score.is_finite())
            .ok_or_else(|| SilentParseErrorKind::InvalidFloat {
                value: score_token.to_string(),
            })?;

        let missing_token = tokens
            .get(missing_column)
            .ok_or(SilentParseErrorKind::MissingField {
                record: "SCORE",
                position: missing_column + 1,
            })?;
        let missing: i64 = missing_token
            .parse()
            .map_err(|_| SilentParseErrorKind::InvalidInt {
                column: MISSING_LABEL,
                value: missing_token.to_string(),
            })?;

        self.pending.score = Some(score);
        self.pending.missing = Some(missing);
        Ok(())
    }

    fn read_annotated_sequence(&mut self, line: &str) -> Result<(), SilentParseErrorKind> {
        let annotated = second_token(line, "ANNOTATED_SEQUENCE")?;
        self.pending.sequence = match &self.regions {
            Some(regions) => match regions.extract(annotated) {
                Some(key) => SequenceSlot::Variant(key),
                None => {
                    trace!(
                        "Annotated sequence does not match master length {}",
                        regions.master_len()
                    );
                    SequenceSlot::NoMatch
                }
            },
            None => {
                warn!("ANNOTATED_SEQUENCE line seen before any SEQUENCE line.");
                SequenceSlot::NoMatch
            }
        };
        Ok(())
    }
}

fn second_token<'a>(line: &'a str, record: &'static str) -> Result<&'a str, SilentParseErrorKind> {
    line.split_whitespace()
        .nth(1)
        .ok_or(SilentParseErrorKind::MissingField {
            record,
            position: 2,
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Cursor;

    const HEADER: &str = "SCORE:     score    rna_score  missing  description";

    fn key(regions: &[&str]) -> VariantKey {
        regions.iter().map(|r| r.to_string()).collect()
    }

    fn score_line(score: f64, missing: i64, tag: &str) -> String {
        format!("SCORE:  {score}  -1.000  {missing}  {tag}")
    }

    fn annotated_line(sequence: &str, tag: &str) -> String {
        format!("ANNOTATED_SEQUENCE: {sequence} {tag}")
    }

    fn parse(lines: &[String]) -> Result<ParsedSilentFile, SilentError> {
        let text = lines.join("\n");
        SilentParser::read_from(&mut Cursor::new(text))
    }

    fn feed_all(parser: &mut SilentParser, lines: &[&str]) {
        for line in lines {
            parser.feed_line(line).unwrap();
        }
    }

    fn model(score: f64, missing: i64, sequence: &str, tag: &str) -> Vec<String> {
        vec![
            score_line(score, missing, tag),
            annotated_line(sequence, tag),
            format!("REMARK BINARY SILENTFILE {tag}"),
        ]
    }

    fn example_file() -> Vec<String> {
        let mut lines = vec!["SEQUENCE: acgunbacgu".to_string(), HEADER.to_string()];
        lines.extend(model(3.2, 0, "a[RAD]c[RCY]g[RGU]u[URA]XYacgu", "S_000001"));
        lines.extend(model(1.9, 0, "acguXYa[RAD:Virtual_Phosphate]cgu", "S_000002"));
        lines.extend(model(0.5, 1, "acguXYacgu", "S_000003"));
        lines.extend(model(-9.0, 0, "acguXYacg", "S_000004"));
        lines
    }

    #[test]
    fn classify_recognizes_every_line_kind() {
        assert_eq!(LineKind::classify("SEQUENCE: acgu"), LineKind::Sequence);
        assert_eq!(LineKind::classify(HEADER), LineKind::ScoreHeader);
        assert_eq!(
            LineKind::classify("SCORE: -1.0 0 S_1"),
            LineKind::ScoreData
        );
        assert_eq!(
            LineKind::classify("ANNOTATED_SEQUENCE: acgu S_1"),
            LineKind::AnnotatedSequence
        );
        assert_eq!(
            LineKind::classify("REMARK BINARY SILENTFILE"),
            LineKind::Boundary
        );
        assert_eq!(LineKind::classify("FOLD_TREE EDGE 1 4 -1"), LineKind::Other);
    }

    #[test]
    fn classify_uses_prefix_before_boundary_marker() {
        assert_eq!(
            LineKind::classify("SCORE: 1.0 0 REMARKABLE_TAG"),
            LineKind::ScoreData
        );
        assert_eq!(
            LineKind::classify("  trailing REMARK text"),
            LineKind::Boundary
        );
    }

    #[test]
    fn classify_requires_description_as_a_whole_token() {
        assert_eq!(
            LineKind::classify("SCORE: 1.0 0 S_description_1"),
            LineKind::ScoreData
        );
    }

    #[test]
    fn aggregates_the_worked_example() {
        let parsed = parse(&example_file()).unwrap();

        assert_eq!(parsed.table.len(), 1);
        assert_eq!(parsed.table.get(&key(&["XY"])), Some(&[3.2, 1.9][..]));
        assert_eq!(parsed.stats.records, 4);
        assert_eq!(parsed.stats.accepted, 2);
        assert_eq!(parsed.stats.missing_residues, 1);
        assert_eq!(parsed.stats.length_mismatches, 1);
        assert_eq!(parsed.regions.unwrap().groups(), &[vec![4, 5]]);
    }

    #[test]
    fn nonzero_missing_never_contributes() {
        let mut lines = vec!["SEQUENCE: acgunbacgu".to_string(), HEADER.to_string()];
        lines.extend(model(-50.0, 2, "acguXYacgu", "S_1"));
        lines.extend(model(-60.0, -1, "acguXYacgu", "S_2"));
        let parsed = parse(&lines).unwrap();
        assert!(parsed.table.is_empty());
        assert_eq!(parsed.stats.missing_residues, 2);
    }

    #[test]
    fn regions_yield_one_string_per_group() {
        let mut lines = vec!["SEQUENCE: gnnagcuka".to_string(), HEADER.to_string()];
        lines.extend(model(-2.0, 0, "gCCagcuUa", "S_1"));
        lines.extend(model(-3.0, 0, "gCCagcuUa", "S_2"));
        lines.extend(model(-1.0, 0, "gAAagcuGa", "S_3"));
        let parsed = parse(&lines).unwrap();
        assert_eq!(parsed.table.get(&key(&["CC", "U"])), Some(&[-2.0, -3.0][..]));
        assert_eq!(parsed.table.get(&key(&["AA", "G"])), Some(&[-1.0][..]));
    }

    #[test]
    fn only_the_first_master_sequence_is_used() {
        let mut lines = vec![
            "SEQUENCE: acgunbacgu".to_string(),
            HEADER.to_string(),
            "SEQUENCE: nnnn".to_string(),
        ];
        lines.extend(model(1.0, 0, "acguXYacgu", "S_1"));
        let parsed = parse(&lines).unwrap();
        assert_eq!(parsed.regions.unwrap().master(), "acgunbacgu");
        assert_eq!(parsed.table.get(&key(&["XY"])), Some(&[1.0][..]));
    }

    #[test]
    fn score_and_sequence_lines_may_arrive_in_either_order() {
        let mut parser = SilentParser::new();
        feed_all(
            &mut parser,
            &[
                "SEQUENCE: acgunbacgu",
                HEADER,
                "ANNOTATED_SEQUENCE: acguXYacgu S_1",
                "SCORE: 4.5 -1.0 0 S_1",
            ],
        );
        assert_eq!(parser.feed_line("REMARK").unwrap(), Some(FlushOutcome::Accepted));
        assert_eq!(parser.table().get(&key(&["XY"])), Some(&[4.5][..]));
    }

    #[test]
    fn later_score_line_overwrites_buffered_values() {
        let mut parser = SilentParser::new();
        feed_all(
            &mut parser,
            &[
                "SEQUENCE: acgunbacgu",
                HEADER,
                "SCORE: 4.5 -1.0 3 S_1",
                "SCORE: 2.5 -1.0 0 S_1",
                "ANNOTATED_SEQUENCE: acguXYacgu S_1",
                "REMARK",
            ],
        );
        assert_eq!(parser.table().get(&key(&["XY"])), Some(&[2.5][..]));
    }

    #[test]
    fn flush_resets_the_record_in_progress() {
        let mut parser = SilentParser::new();
        feed_all(
            &mut parser,
            &[
                "SEQUENCE: acgunbacgu",
                HEADER,
                "SCORE: 4.5 -1.0 0 S_1",
                "ANNOTATED_SEQUENCE: acguXYacgu S_1",
                "REMARK",
                "ANNOTATED_SEQUENCE: acguZZacgu S_2",
            ],
        );
        assert_eq!(parser.feed_line("REMARK").unwrap(), Some(FlushOutcome::Unscored));
        assert_eq!(parser.table().len(), 1);
        assert_eq!(parser.table().get(&key(&["ZZ"])), None);
    }

    #[test]
    fn flush_without_sequence_is_a_no_op() {
        let mut parser = SilentParser::new();
        feed_all(
            &mut parser,
            &["SEQUENCE: acgunbacgu", HEADER, "SCORE: 4.5 -1.0 0 S_1"],
        );
        assert_eq!(parser.flush(), FlushOutcome::Empty);
        assert_eq!(parser.stats().records, 0);

        feed_all(&mut parser, &["ANNOTATED_SEQUENCE: acguXYacgu S_1"]);
        assert_eq!(parser.flush(), FlushOutcome::Accepted);
        assert_eq!(parser.table().get(&key(&["XY"])), Some(&[4.5][..]));
    }

    #[test]
    fn annotated_sequence_before_master_is_rejected() {
        let mut parser = SilentParser::new();
        feed_all(
            &mut parser,
            &[HEADER, "SCORE: 4.5 -1.0 0 S_1", "ANNOTATED_SEQUENCE: acgu S_1"],
        );
        assert_eq!(parser.flush(), FlushOutcome::LengthMismatch);
        assert!(parser.table().is_empty());
    }

    #[test]
    fn trailing_record_without_boundary_is_discarded() {
        let mut lines = vec!["SEQUENCE: acgunbacgu".to_string(), HEADER.to_string()];
        lines.push(score_line(1.0, 0, "S_1"));
        lines.push(annotated_line("acguXYacgu", "S_1"));
        let parsed = parse(&lines).unwrap();
        assert!(parsed.table.is_empty());
        assert_eq!(parsed.stats.lines, 4);
    }

    #[test]
    fn score_data_before_header_is_fatal() {
        let lines = vec![
            "SEQUENCE: acgunbacgu".to_string(),
            score_line(1.0, 0, "S_1"),
        ];
        match parse(&lines) {
            Err(SilentError::Parse { line, kind }) => {
                assert_eq!(line, 2);
                assert_eq!(kind, SilentParseErrorKind::UndefinedColumn("missing"));
            }
            other => panic!("expected undefined column error, got {other:?}"),
        }
    }

    #[test]
    fn header_without_missing_column_is_fatal() {
        let lines = vec!["SCORE: score rna_score description".to_string()];
        assert!(matches!(
            parse(&lines),
            Err(SilentError::Parse {
                line: 1,
                kind: SilentParseErrorKind::MissingColumn("missing")
            })
        ));
    }

    #[test]
    fn malformed_score_is_fatal() {
        let lines = vec![HEADER.to_string(), "SCORE: abc -1.0 0 S_1".to_string()];
        match parse(&lines) {
            Err(SilentError::Parse { line, kind }) => {
                assert_eq!(line, 2);
                assert_eq!(
                    kind,
                    SilentParseErrorKind::InvalidFloat {
                        value: "abc".into()
                    }
                );
            }
            other => panic!("expected invalid float error, got {other:?}"),
        }
    }

    #[test]
    fn non_finite_scores_are_fatal() {
        for token in ["nan", "NaN", "inf", "-inf"] {
            let lines = vec![HEADER.to_string(), format!("SCORE: {token} -1.0 0 S_1")];
            match parse(&lines) {
                Err(SilentError::Parse { line, kind }) => {
                    assert_eq!(line, 2);
                    assert_eq!(
                        kind,
                        SilentParseErrorKind::InvalidFloat {
                            value: token.into()
                        }
                    );
                }
                other => panic!("'{token}' should be rejected, got {other:?}"),
            }
        }
    }

    #[test]
    fn malformed_missing_count_is_fatal() {
        let lines = vec![HEADER.to_string(), "SCORE: 1.0 -1.0 0.5 S_1".to_string()];
        assert!(matches!(
            parse(&lines),
            Err(SilentError::Parse {
                line: 2,
                kind: SilentParseErrorKind::InvalidInt { .. }
            })
        ));
    }

    #[test]
    fn short_score_line_is_fatal() {
        let lines = vec![HEADER.to_string(), "SCORE: 1.0".to_string()];
        assert!(matches!(
            parse(&lines),
            Err(SilentError::Parse {
                line: 2,
                kind: SilentParseErrorKind::MissingField {
                    record: "SCORE",
                    position: 4
                }
            })
        ));
    }

    #[test]
    fn sequence_line_without_value_is_fatal() {
        let lines = vec!["SEQUENCE:".to_string()];
        assert!(matches!(
            parse(&lines),
            Err(SilentError::Parse {
                line: 1,
                kind: SilentParseErrorKind::MissingField {
                    record: "SEQUENCE",
                    ..
                }
            })
        ));
    }

    #[test]
    fn read_from_with_reports_each_boundary() {
        let mut outcomes = Vec::new();
        let text = example_file().join("\n");
        let parsed =
            SilentParser::read_from_with(&mut Cursor::new(text), |outcome| outcomes.push(outcome))
                .unwrap();

        assert_eq!(parsed.stats.records, 4);
        assert_eq!(
            outcomes,
            vec![
                FlushOutcome::Accepted,
                FlushOutcome::Accepted,
                FlushOutcome::MissingResidues,
                FlushOutcome::LengthMismatch,
            ]
        );
    }

    #[test]
    fn read_from_path_reads_a_file() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("design.out");
        std::fs::write(&path, example_file().join("\n")).unwrap();

        let parsed = SilentParser::read_from_path(&path).unwrap();
        assert_eq!(parsed.table.get(&key(&["XY"])), Some(&[3.2, 1.9][..]));
    }

    #[test]
    fn read_from_path_reports_missing_file() {
        let dir = tempfile::tempdir().unwrap();
        let result = SilentParser::read_from_path(dir.path().join("absent.out"));
        assert!(matches!(result, Err(SilentError::Io(_))));
    }
}
