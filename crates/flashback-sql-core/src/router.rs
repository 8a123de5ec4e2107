//! Dispatch of raw lines to the statement rewriters.

use crate::config::{Mode, RewriteConfig};
use crate::error::{Diagnostic, DiagnosticSink, Result};
use crate::invert::{invert_delete, invert_insert};
use crate::statement::StatementKind;
use crate::update::UpdateReconciler;

/// Result of rewriting one line.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rewritten {
    /// How the line was classified.
    pub kind: StatementKind,
    /// The line to emit.
    pub sql: String,
}

/// Routes statements to the UPDATE reconciler or the INSERT/DELETE inverter.
///
/// A `Rewriter` only reads its configuration, so one instance can serve any
/// number of lines (or threads).
#[derive(Debug, Clone, Default)]
pub struct Rewriter {
    config: RewriteConfig,
}

impl Rewriter {
    /// Creates a rewriter.
    #[must_use]
    pub const fn new(config: RewriteConfig) -> Self {
        Self { config }
    }

    /// Returns the configuration.
    #[must_use]
    pub const fn config(&self) -> &RewriteConfig {
        &self.config
    }

    /// Rewrites one statement line.
    ///
    /// Lines that are not INSERT, UPDATE or DELETE are reported as
    /// [`Diagnostic::NotDml`] and returned exactly as received.
    pub fn rewrite(
        &self,
        sql: &str,
        mode: Mode,
        sink: &mut dyn DiagnosticSink,
    ) -> Result<Rewritten> {
        let kind = StatementKind::classify(sql);
        let sql = match kind {
            StatementKind::Update => UpdateReconciler::new(&self.config).rewrite(sql, mode, sink)?,
            StatementKind::Delete => invert_delete(sql, mode, sink)?,
            StatementKind::Insert => invert_insert(sql, mode)?,
            StatementKind::Other => {
                sink.report(Diagnostic::NotDml {
                    statement: sql.to_string(),
                });
                sql.to_string()
            }
        };
        Ok(Rewritten { kind, sql })
    }
}
