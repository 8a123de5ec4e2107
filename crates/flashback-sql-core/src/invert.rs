//! INSERT ⇄ DELETE inversion.

use std::sync::LazyLock;

use regex::Regex;

use crate::assignment::{Assignment, AssignmentMap};
use crate::config::Mode;
use crate::error::{Clause, DiagnosticSink, Result, RewriteError};
use crate::splitter::{ColumnSplitter, COMMA};
use crate::statement::{terminate, Keyword, StatementKind, StatementTail};

static INSERT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"(?is)^INSERT\s+INTO\s+(?P<table>.+?)\s*\((?P<columns>[^)]*)\)\s*VALUES\s*\((?P<values>.*)\)$",
    )
    .expect("insert pattern is valid")
});

/// Turns an INSERT into the DELETE that removes the inserted row.
///
/// ```text
/// INSERT INTO t (`id`, `name`) VALUES (5, 'x'); #start 4 end 9
/// DELETE FROM t WHERE `id`=5 AND `name`='x'; #start 4 end 9
/// ```
///
/// Outside the flashback modes, and for anything that is not an INSERT, the
/// input comes back trimmed.
pub fn invert_insert(sql: &str, mode: Mode) -> Result<String> {
    let sql = sql.trim();
    if !mode.inverts() || StatementKind::classify(sql) != StatementKind::Insert {
        return Ok(sql.to_string());
    }

    let tail = StatementTail::parse(sql);
    let malformed = |reason: &'static str| RewriteError::MalformedInsert {
        reason,
        statement: sql.to_string(),
    };

    let captures = INSERT
        .captures(tail.body)
        .ok_or_else(|| malformed("expected INSERT INTO <table> (columns) VALUES (values)"))?;
    let table = &captures["table"];
    let columns = ColumnSplitter::new(COMMA).split(&captures["columns"]);
    let values = ColumnSplitter::new(COMMA).split(&captures["values"]);

    if columns.iter().any(|column| column.is_empty()) {
        return Err(malformed("empty column name"));
    }
    if columns.len() != values.len() {
        return Err(malformed("column and value counts differ"));
    }

    let predicates = columns
        .iter()
        .zip(&values)
        .map(|(column, value)| Assignment::predicate(column, value))
        .collect::<Vec<_>>()
        .join(" AND ");

    Ok(tail.terminate(&format!("DELETE FROM {table} WHERE {predicates}")))
}

/// Turns a DELETE into the INSERT that puts the deleted row back.
///
/// ```text
/// DELETE FROM t WHERE `id`=5 AND `name`='x' LIMIT 1; #start 4 end 9
/// INSERT INTO t (`id`, `name`) VALUES (5, 'x'); #start 4 end 9
/// ```
///
/// Every predicate must be an equality or an `IS NULL` test; anything else
/// is a [`RewriteError::MalformedPredicate`]. Outside the flashback modes,
/// and for anything that is not a DELETE, the input comes back trimmed.
pub fn invert_delete(sql: &str, mode: Mode, sink: &mut dyn DiagnosticSink) -> Result<String> {
    let sql = sql.trim();
    if !mode.inverts() || StatementKind::classify(sql) != StatementKind::Delete {
        return Ok(sql.to_string());
    }

    let tail = StatementTail::parse(sql);
    let missing = |clause: Clause| RewriteError::MissingClause {
        clause,
        statement: sql.to_string(),
    };

    let from = Keyword::From
        .locate(tail.body)
        .ok_or_else(|| missing(Clause::From))?;
    let where_at = Keyword::Where
        .locate(tail.body)
        .filter(|range| range.start >= from.end)
        .ok_or_else(|| missing(Clause::Where))?;
    let table = tail.body[from.end..where_at.start].trim();

    let predicates = ColumnSplitter::where_clause().split(&tail.body[where_at.end..]);
    let parsed = AssignmentMap::parse(predicates);
    if let Some(predicate) = parsed.unclassified.first() {
        return Err(RewriteError::MalformedPredicate {
            predicate: (*predicate).to_string(),
            statement: sql.to_string(),
        });
    }
    let row = parsed.report(sink);

    let columns = row.keys().collect::<Vec<_>>().join(", ");
    let values = row
        .iter()
        .map(|assignment| assignment.value.as_str())
        .collect::<Vec<_>>()
        .join(", ");

    Ok(terminate(
        &format!("INSERT INTO {table} ({columns}) VALUES ({values})"),
        tail.comment,
    ))
}
