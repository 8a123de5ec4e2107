//! Rewrite errors and diagnostics.
//!
//! Two families exist. A [`RewriteError`] means the statement cannot be
//! reconstructed at all, and the caller has to stop the batch. A
//! [`Diagnostic`] describes an anomaly that was isolated to one column or one
//! line; processing continues and the diagnostic is handed to a
//! [`DiagnosticSink`].

use core::fmt;

/// A clause the rewriter needs to locate in a statement.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Clause {
    /// The `SET` clause of an UPDATE.
    Set,
    /// The `WHERE` clause of an UPDATE or DELETE.
    Where,
    /// The `FROM` keyword of a DELETE.
    From,
}

impl fmt::Display for Clause {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Set => "SET",
            Self::Where => "WHERE",
            Self::From => "FROM",
        })
    }
}

/// Errors that prevent a statement from being rewritten.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RewriteError {
    /// A statement lacks a clause its rewrite depends on.
    #[error("Missing {clause} clause in statement: {statement}")]
    MissingClause {
        /// The clause that could not be found.
        clause: Clause,
        /// The offending statement.
        statement: String,
    },

    /// A WHERE predicate is neither a `` `col`=value `` equality nor an
    /// `IS NULL` test.
    #[error("Malformed predicate '{predicate}' in statement: {statement}")]
    MalformedPredicate {
        /// The predicate text.
        predicate: String,
        /// The offending statement.
        statement: String,
    },

    /// An INSERT whose column list and VALUES list cannot be paired.
    #[error("Malformed INSERT ({reason}): {statement}")]
    MalformedInsert {
        /// What is wrong with the statement.
        reason: &'static str,
        /// The offending statement.
        statement: String,
    },
}

impl RewriteError {
    /// Returns the statement the error refers to.
    #[must_use]
    pub fn statement(&self) -> &str {
        match self {
            Self::MissingClause { statement, .. }
            | Self::MalformedPredicate { statement, .. }
            | Self::MalformedInsert { statement, .. } => statement,
        }
    }
}

/// Result type for rewrite operations.
pub type Result<T> = std::result::Result<T, RewriteError>;

/// How loudly a diagnostic should be surfaced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Severity {
    /// Informational.
    Info,
    /// Something was dropped or left untouched.
    Warning,
    /// Part of a statement could not be understood.
    Error,
}

/// A non-fatal anomaly found while rewriting a statement.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum Diagnostic {
    /// The line is not an INSERT, UPDATE or DELETE statement.
    #[error("SQL [{statement}] is not a dml sql")]
    NotDml {
        /// The line as received.
        statement: String,
    },

    /// A column fragment matched neither `` `col`=value `` nor `IS NULL`.
    #[error("Unclassified column token: {token}")]
    UnclassifiedToken {
        /// The fragment text.
        token: String,
    },

    /// A column appeared twice in one clause; the later occurrence was dropped.
    #[error("Duplicate column {column} dropped")]
    DuplicateColumn {
        /// The repeated column.
        column: String,
    },

    /// A SET column has no counterpart in the WHERE clause, so it cannot be
    /// inverted.
    #[error("Column {column} has no old value in the WHERE clause")]
    MissingOldValue {
        /// The column without an old value.
        column: String,
    },

    /// Every SET column was unchanged. The statement is still emitted, with
    /// an empty SET clause, so the output is not executable SQL.
    #[error("UPDATE changes no column; emitted with an empty SET, not executable: {statement}")]
    NoChange {
        /// The original statement.
        statement: String,
    },
}

impl Diagnostic {
    /// Returns the severity of this diagnostic.
    #[must_use]
    pub const fn severity(&self) -> Severity {
        match self {
            Self::UnclassifiedToken { .. } => Severity::Error,
            Self::NotDml { .. } | Self::DuplicateColumn { .. } | Self::MissingOldValue { .. } => {
                Severity::Warning
            }
            Self::NoChange { .. } => Severity::Info,
        }
    }
}

/// Receiver of the diagnostics produced while rewriting.
///
/// The rewriter never logs on its own; whoever drives it decides what a
/// diagnostic turns into.
pub trait DiagnosticSink {
    /// Records one diagnostic.
    fn report(&mut self, diagnostic: Diagnostic);
}

impl DiagnosticSink for Vec<Diagnostic> {
    fn report(&mut self, diagnostic: Diagnostic) {
        self.push(diagnostic);
    }
}

/// A sink that drops every diagnostic.
#[derive(Debug, Clone, Copy, Default)]
pub struct Discard;

impl DiagnosticSink for Discard {
    fn report(&mut self, _diagnostic: Diagnostic) {}
}
