//! # flashback-sql-core
//!
//! Rewrites the DML statements produced by binlog2sql, one line at a time.
//!
//! This crate provides:
//! - UPDATE filtering: columns whose value did not change are removed from
//!   both the `SET` and the `WHERE` clause
//! - Flashback: the statement that undoes the original (UPDATE reversed,
//!   INSERT → DELETE, DELETE → INSERT)
//! - Full flashback: UPDATE inversion of every column, changed or not
//!
//! The rewriter works on the narrow, mechanical statement shape binlog2sql
//! emits; it is not a SQL parser and never validates grammar.
//!
//! ## Example
//!
//! ```rust
//! use flashback_sql_core::{Diagnostic, Mode, RewriteConfig, Rewriter};
//!
//! let rewriter = Rewriter::new(RewriteConfig::default());
//! let sql = "UPDATE t SET `a`=1,`b`=2 WHERE `a`=1 AND `b`=1 LIMIT 1;";
//!
//! let mut diagnostics: Vec<Diagnostic> = Vec::new();
//! let filtered = rewriter.rewrite(sql, Mode::Filter, &mut diagnostics).unwrap();
//! assert_eq!(filtered.sql, "UPDATE t SET `b`=2 WHERE `b`=1;");
//!
//! let undo = rewriter.rewrite(sql, Mode::Flashback, &mut diagnostics).unwrap();
//! assert_eq!(undo.sql, "UPDATE t SET `b`=1 WHERE `b`=2;");
//! ```
//!
//! ## Diagnostics
//!
//! Anomalies that only affect one column (an unparsable fragment, a
//! duplicated column) are handed to a [`DiagnosticSink`] and the statement is
//! still rewritten. Anomalies that make the statement impossible to rebuild
//! are returned as a [`RewriteError`].

pub mod assignment;
pub mod config;
pub mod error;
pub mod invert;
pub mod router;
pub mod splitter;
pub mod statement;
pub mod update;

pub use assignment::{Assignment, AssignmentMap, Separator};
pub use config::{Mode, RewriteConfig, DEFAULT_PRIMARY_KEY};
pub use error::{Clause, Diagnostic, DiagnosticSink, Discard, RewriteError, Severity};
pub use invert::{invert_delete, invert_insert};
pub use router::{Rewriter, Rewritten};
pub use splitter::ColumnSplitter;
pub use statement::{StatementKind, StatementTail};
pub use update::{ColumnChange, UpdateReconciler};
