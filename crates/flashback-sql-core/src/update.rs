//! UPDATE filtering and inversion.
//!
//! binlog2sql emits every column of the row on both sides of an UPDATE:
//!
//! ```text
//! UPDATE `db`.`t` SET `id`=1, `a`=2, `b`=3 WHERE `id`=1 AND `a`=2 AND `b`=4 LIMIT 1; #start 4 end 388
//! ```
//!
//! The SET side holds the new row image, the WHERE side the old one. The
//! [`UpdateReconciler`] pairs both images column by column and keeps only
//! what the [`Mode`] asks for.

use indexmap::IndexMap;

use crate::assignment::{is_null, Assignment, AssignmentMap};
use crate::config::{Mode, RewriteConfig};
use crate::error::{Clause, Diagnostic, DiagnosticSink, Result, RewriteError};
use crate::splitter::ColumnSplitter;
use crate::statement::{Keyword, StatementKind, StatementTail};

/// How a column differs between the new and the old row image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ColumnChange {
    /// Same value on both sides.
    Unchanged,
    /// Exactly one side is `NULL`.
    NullTransition,
    /// Two different non-`NULL` values.
    Changed,
}

impl ColumnChange {
    /// Compares the new value with the old one.
    #[must_use]
    pub fn between(new: &str, old: &str) -> Self {
        if new == old {
            Self::Unchanged
        } else if is_null(new) != is_null(old) {
            Self::NullTransition
        } else {
            Self::Changed
        }
    }
}

/// An UPDATE statement split into its parts.
#[derive(Debug, Clone)]
pub struct UpdateParts<'a> {
    /// `UPDATE <table> SET`
    pub prefix: &'a str,
    /// New row image.
    pub set: AssignmentMap,
    /// Old row image.
    pub filter: AssignmentMap,
    /// LIMIT clause and comment that followed the WHERE clause.
    pub tail: StatementTail<'a>,
}

impl<'a> UpdateParts<'a> {
    /// Splits an UPDATE statement into prefix, both clauses and tail.
    pub fn parse(sql: &'a str, sink: &mut dyn DiagnosticSink) -> Result<Self> {
        let where_at = Keyword::Where
            .locate(sql)
            .ok_or_else(|| missing(Clause::Where, sql))?;
        let set_side = &sql[..where_at.start];
        let where_side = &sql[where_at.end..];

        let set_at = Keyword::Set
            .locate(set_side)
            .ok_or_else(|| missing(Clause::Set, sql))?;
        let prefix = &set_side[..set_at.end];

        let set = AssignmentMap::parse(ColumnSplitter::set_clause().split(&set_side[set_at.end..]))
            .report(sink);

        let tail = StatementTail::parse(where_side);
        let filter =
            AssignmentMap::parse(ColumnSplitter::where_clause().split(tail.body)).report(sink);

        Ok(Self {
            prefix,
            set,
            filter,
            tail,
        })
    }
}

fn missing(clause: Clause, sql: &str) -> RewriteError {
    RewriteError::MissingClause {
        clause,
        statement: sql.to_string(),
    }
}

/// Rendered clause entries, at most one per column.
#[derive(Debug, Default)]
struct ClauseBuilder<'k> {
    entries: IndexMap<&'k str, String>,
}

impl<'k> ClauseBuilder<'k> {
    fn push(&mut self, key: &'k str, rendered: impl FnOnce() -> String) {
        self.entries.entry(key).or_insert_with(rendered);
    }

    fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    fn join(&self, separator: &str) -> String {
        self.entries
            .values()
            .map(String::as_str)
            .collect::<Vec<_>>()
            .join(separator)
    }
}

/// Filters or inverts UPDATE statements.
#[derive(Debug, Clone, Copy)]
pub struct UpdateReconciler<'c> {
    config: &'c RewriteConfig,
}

impl<'c> UpdateReconciler<'c> {
    /// Creates a reconciler using the keep columns of `config`.
    #[must_use]
    pub const fn new(config: &'c RewriteConfig) -> Self {
        Self { config }
    }

    /// Rewrites one UPDATE statement.
    ///
    /// Input that is not an UPDATE comes back trimmed and otherwise
    /// untouched. The LIMIT clause is dropped; an inline comment is kept.
    pub fn rewrite(&self, sql: &str, mode: Mode, sink: &mut dyn DiagnosticSink) -> Result<String> {
        let sql = sql.trim();
        if StatementKind::classify(sql) != StatementKind::Update {
            return Ok(sql.to_string());
        }

        let parts = UpdateParts::parse(sql, sink)?;
        let mut set = ClauseBuilder::default();
        let mut filter = ClauseBuilder::default();

        for new in &parts.set {
            let key = new.key.as_str();
            let Some(old) = parts.filter.get(key) else {
                // Nothing to guard on and nothing to restore.
                if mode.inverts() {
                    sink.report(Diagnostic::MissingOldValue {
                        column: key.to_string(),
                    });
                } else {
                    set.push(key, || Assignment::assign(key, &new.value));
                }
                continue;
            };

            if mode == Mode::FullFlashback {
                set.push(key, || Assignment::assign(key, &old.value));
                filter.push(key, || Assignment::predicate(key, &new.value));
                continue;
            }

            match ColumnChange::between(&new.value, &old.value) {
                ColumnChange::Unchanged => {
                    if self.config.is_kept(key) {
                        filter.push(key, || old.to_string());
                    }
                }
                ColumnChange::NullTransition | ColumnChange::Changed => {
                    let (assigned, guarded) = if mode.inverts() {
                        (&old.value, &new.value)
                    } else {
                        (&new.value, &old.value)
                    };
                    set.push(key, || Assignment::assign(key, assigned));
                    filter.push(key, || Assignment::predicate(key, guarded));
                }
            }
        }

        if set.is_empty() {
            sink.report(Diagnostic::NoChange {
                statement: sql.to_string(),
            });
        }

        let statement = format!(
            "{} {} WHERE {}",
            parts.prefix,
            set.join(","),
            filter.join(" AND ")
        );
        Ok(parts.tail.terminate(&statement))
    }
}
