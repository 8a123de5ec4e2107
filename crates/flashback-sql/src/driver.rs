//! Batch driver.
//!
//! Reads one statement per line, hands it to the [`Rewriter`] and writes the
//! result, preserving line order. The first fatal rewrite error stops the
//! run.

use std::fs::File;
use std::io::{self, BufRead, BufReader, BufWriter, Write};
use std::path::{Path, PathBuf};

use flashback_sql_core::{Diagnostic, DiagnosticSink, Mode, Rewriter, Severity};
use tracing::{debug, error, info, info_span, warn};

use crate::error::{DriverError, Result};

/// Number of lines between two progress messages.
pub const PROGRESS_INTERVAL: usize = 10_000;

/// Returns true for `--` and `#` comment lines, which are copied verbatim.
#[must_use]
pub fn is_comment_line(line: &str) -> bool {
    let line = line.trim_start();
    line.starts_with("--") || line.starts_with('#')
}

/// Forwards diagnostics to `tracing`, at a level matching their severity.
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn report(&mut self, diagnostic: Diagnostic) {
        match diagnostic.severity() {
            Severity::Error => error!("{diagnostic}"),
            Severity::Warning => warn!("{diagnostic}"),
            Severity::Info => info!("{diagnostic}"),
        }
    }
}

/// Settings of one file run.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Options {
    /// File to read statements from.
    pub input: PathBuf,
    /// File to write results to; standard output when `None`.
    pub output: Option<PathBuf>,
    /// Rewrite mode applied to every statement.
    pub mode: Mode,
}

/// Line counts of a finished run.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Summary {
    /// Lines written.
    pub lines: usize,
    /// INSERT, UPDATE and DELETE statements handed to the rewriter.
    pub statements: usize,
    /// Comment, blank and non-DML lines copied unchanged.
    pub passed_through: usize,
}

/// Periodic progress reporting.
#[derive(Debug, Clone)]
pub struct Progress {
    label: String,
    total: Option<usize>,
}

impl Progress {
    /// Creates a progress reporter for `label` expecting `total` statements.
    #[must_use]
    pub fn new(label: impl Into<String>, total: Option<usize>) -> Self {
        Self {
            label: label.into(),
            total,
        }
    }

    fn tick(&self, lines: usize) {
        if lines % PROGRESS_INTERVAL == 0 {
            self.report(lines);
        }
    }

    fn report(&self, lines: usize) {
        match self.total {
            Some(total) => info!("[{}] [Filtered line count: {lines} / {total}]", self.label),
            None => info!("[{}] [Filtered line count: {lines}]", self.label),
        }
    }

    fn finish(&self, lines: usize) {
        self.report(lines);
        info!("[{}] finished", self.label);
    }
}

/// Counts the statement lines of a file, skipping `--` and `#` comments.
pub fn count_statements(path: &Path) -> Result<usize> {
    info!(file = %path.display(), "Getting file lines");
    let reader = BufReader::new(File::open(path)?);
    let mut count = 0;
    for line in reader.lines() {
        if !is_comment_line(&line?) {
            count += 1;
        }
    }
    Ok(count)
}

/// Rewrites every line of `reader` into `writer`.
///
/// Comment lines and blank lines are copied as they are. A fatal rewrite
/// error is returned with its 1-based line number; the lines before it have
/// already been written.
pub fn process<R, W>(
    reader: R,
    writer: &mut W,
    rewriter: &Rewriter,
    mode: Mode,
    sink: &mut dyn DiagnosticSink,
    progress: &Progress,
) -> Result<Summary>
where
    R: BufRead,
    W: Write,
{
    let mut summary = Summary::default();

    for (index, line) in reader.lines().enumerate() {
        let number = index + 1;
        let line = line?;
        let line = line.trim();

        let output = if line.is_empty() {
            summary.passed_through += 1;
            String::new()
        } else if is_comment_line(line) {
            warn!(line = number, "Ignore comment line");
            summary.passed_through += 1;
            line.to_string()
        } else {
            let _span = info_span!("line", number).entered();
            let rewritten = rewriter
                .rewrite(line, mode, sink)
                .map_err(|source| DriverError::Rewrite {
                    line: number,
                    statement: line.to_string(),
                    source,
                })?;
            debug!(kind = %rewritten.kind, sql = %rewritten.sql, "Rewrote statement");
            if rewritten.kind.is_dml() {
                summary.statements += 1;
            } else {
                summary.passed_through += 1;
            }
            rewritten.sql
        };

        writeln!(writer, "{output}")?;
        summary.lines += 1;
        progress.tick(summary.lines);
    }

    progress.finish(summary.lines);
    Ok(summary)
}

/// Rewrites the file named in `options`.
pub fn run_file(options: &Options, rewriter: &Rewriter) -> Result<Summary> {
    if !options.input.is_file() {
        return Err(DriverError::InputNotFound(options.input.clone()));
    }

    let total = count_statements(&options.input)?;
    let progress = Progress::new(options.input.display().to_string(), Some(total));
    let reader = BufReader::new(File::open(&options.input)?);
    let mut sink = TracingSink;

    match &options.output {
        Some(path) => {
            let mut writer = BufWriter::new(File::create(path)?);
            let summary = process(reader, &mut writer, rewriter, options.mode, &mut sink, &progress)?;
            writer.flush()?;
            warn!("The result saved in {}", path.display());
            Ok(summary)
        }
        None => {
            let stdout = io::stdout();
            let mut writer = BufWriter::new(stdout.lock());
            let summary = process(reader, &mut writer, rewriter, options.mode, &mut sink, &progress)?;
            writer.flush()?;
            Ok(summary)
        }
    }
}

/// Rewrites a single statement in every mode.
pub fn preview(
    sql: &str,
    rewriter: &Rewriter,
    sink: &mut dyn DiagnosticSink,
) -> Result<Vec<(Mode, String)>> {
    [Mode::Filter, Mode::Flashback, Mode::FullFlashback]
        .into_iter()
        .map(|mode| {
            rewriter
                .rewrite(sql, mode, sink)
                .map(|rewritten| (mode, rewritten.sql))
                .map_err(|source| DriverError::Rewrite {
                    line: 1,
                    statement: sql.to_string(),
                    source,
                })
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use flashback_sql_core::{Clause, RewriteConfig, RewriteError};
    use std::io::Cursor;

    const INPUT: &str = "\
-- binlog2sql output
UPDATE t SET `id`=1, `a`=2 WHERE `id`=1 AND `a`=1 LIMIT 1; #start 4 end 9

BEGIN;
DELETE FROM t WHERE `id`=2 LIMIT 1;
INSERT INTO t (`id`) VALUES (3);
";

    fn run(input: &str, mode: Mode) -> (Result<Summary>, String, Vec<Diagnostic>) {
        let rewriter = Rewriter::new(RewriteConfig::default());
        let mut out: Vec<u8> = Vec::new();
        let mut sink: Vec<Diagnostic> = Vec::new();
        let result = process(
            Cursor::new(input),
            &mut out,
            &rewriter,
            mode,
            &mut sink,
            &Progress::new("test", None),
        );
        (result, String::from_utf8(out).unwrap(), sink)
    }

    #[test]
    fn test_is_comment_line() {
        assert!(is_comment_line("-- x"));
        assert!(is_comment_line("  # x"));
        assert!(!is_comment_line("UPDATE t"));
    }

    #[test]
    fn test_process_filter() {
        let (result, out, diags) = run(INPUT, Mode::Filter);
        let summary = result.unwrap();
        assert_eq!(
            out,
            "\
-- binlog2sql output
UPDATE t SET `a`=2 WHERE `id`=1 AND `a`=1; #start 4 end 9

BEGIN;
DELETE FROM t WHERE `id`=2 LIMIT 1;
INSERT INTO t (`id`) VALUES (3);
"
        );
        assert_eq!(
            summary,
            Summary {
                lines: 6,
                statements: 3,
                passed_through: 3,
            }
        );
        assert_eq!(
            diags,
            vec![Diagnostic::NotDml {
                statement: "BEGIN;".to_string()
            }]
        );
    }

    #[test]
    fn test_process_flashback() {
        let (result, out, _) = run(INPUT, Mode::Flashback);
        result.unwrap();
        let lines: Vec<&str> = out.lines().collect();
        assert_eq!(lines[1], "UPDATE t SET `a`=1 WHERE `id`=1 AND `a`=2; #start 4 end 9");
        assert_eq!(lines[4], "INSERT INTO t (`id`) VALUES (2);");
        assert_eq!(lines[5], "DELETE FROM t WHERE `id`=3;");
    }

    #[test]
    fn test_process_stops_on_fatal_error() {
        let input = "UPDATE t SET `id`=1 WHERE `id`=1 LIMIT 1;\nUPDATE t SET `a`=1;\nINSERT INTO t (`id`) VALUES (3);\n";
        let (result, out, _) = run(input, Mode::Filter);
        match result.unwrap_err() {
            DriverError::Rewrite {
                line,
                statement,
                source,
            } => {
                assert_eq!(line, 2);
                assert_eq!(statement, "UPDATE t SET `a`=1;");
                assert!(matches!(
                    source,
                    RewriteError::MissingClause {
                        clause: Clause::Where,
                        ..
                    }
                ));
            }
            other => panic!("Expected rewrite error, got {other:?}"),
        }
        assert_eq!(out, "UPDATE t SET  WHERE `id`=1;\n");
    }

    #[test]
    fn test_preview_all_modes() {
        let rewriter = Rewriter::default();
        let results = preview(
            "UPDATE t SET `a`=1,`b`=2 WHERE `a`=1 AND `b`=1 LIMIT 1;",
            &rewriter,
            &mut Vec::<Diagnostic>::new(),
        )
        .unwrap();
        assert_eq!(
            results,
            vec![
                (Mode::Filter, "UPDATE t SET `b`=2 WHERE `b`=1;".to_string()),
                (Mode::Flashback, "UPDATE t SET `b`=1 WHERE `b`=2;".to_string()),
                (
                    Mode::FullFlashback,
                    "UPDATE t SET `a`=1,`b`=1 WHERE `a`=1 AND `b`=2;".to_string()
                ),
            ]
        );
    }

    #[test]
    fn test_run_file_writes_output() {
        let dir = tempfile::tempdir().unwrap();
        let input = dir.path().join("binlog.sql");
        let output = dir.path().join("flashback.sql");
        std::fs::write(&input, INPUT).unwrap();

        assert_eq!(count_statements(&input).unwrap(), 5);

        let options = Options {
            input,
            output: Some(output.clone()),
            mode: Mode::FullFlashback,
        };
        let summary = run_file(&options, &Rewriter::default()).unwrap();
        assert_eq!(summary.lines, 6);

        let written = std::fs::read_to_string(output).unwrap();
        assert_eq!(
            written.lines().nth(1),
            Some("UPDATE t SET `id`=1,`a`=1 WHERE `id`=1 AND `a`=2; #start 4 end 9")
        );
    }

    #[test]
    fn test_run_file_missing_input() {
        let dir = tempfile::tempdir().unwrap();
        let options = Options {
            input: dir.path().join("missing.sql"),
            output: None,
            mode: Mode::Filter,
        };
        let err = run_file(&options, &Rewriter::default()).unwrap_err();
        assert!(matches!(err, DriverError::InputNotFound(_)));
    }
}
