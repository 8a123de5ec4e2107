//! Column assignments and their ordered per-clause map.

use core::fmt;

use indexmap::IndexMap;

use crate::error::{Diagnostic, DiagnosticSink};

/// The literal SQL null.
pub const NULL: &str = "NULL";

/// Returns true if `value` is the literal text `NULL`.
#[must_use]
pub fn is_null(value: &str) -> bool {
    value == NULL
}

/// Operator between a column and its value.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Separator {
    /// `` `col`=value ``
    Eq,
    /// `` `col` IS NULL ``
    Is,
}

impl Separator {
    /// Picks the predicate operator able to match `value`.
    #[must_use]
    pub fn for_value(value: &str) -> Self {
        if is_null(value) {
            Self::Is
        } else {
            Self::Eq
        }
    }

    /// Returns the separator as it appears in SQL text.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Eq => "=",
            Self::Is => " IS ",
        }
    }
}

impl fmt::Display for Separator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// One parsed `column <sep> value` unit.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Assignment {
    /// Backtick-quoted column identifier.
    pub key: String,
    /// Separator found in the source text.
    pub sep: Separator,
    /// Value text, as written.
    pub value: String,
}

impl Assignment {
    /// Creates an assignment.
    #[must_use]
    pub fn new(key: impl Into<String>, sep: Separator, value: impl Into<String>) -> Self {
        Self {
            key: key.into(),
            sep,
            value: value.into(),
        }
    }

    /// Parses a single column token.
    ///
    /// `` `col`=value `` splits on the first `` `= ``; a token containing
    /// `IS NULL` takes its first and last words. Anything else yields `None`.
    #[must_use]
    pub fn parse(token: &str) -> Option<Self> {
        if let Some((column, value)) = token.split_once("`=") {
            let column = column.trim();
            if column.is_empty() {
                return None;
            }
            return Some(Self::new(format!("{column}`"), Separator::Eq, value.trim()));
        }

        if token.contains("IS NULL") {
            let mut words = token.split_whitespace();
            let key = words.next()?;
            let value = words.last()?;
            return Some(Self::new(key, Separator::Is, value));
        }

        None
    }

    /// Renders `` `col`=value ``, the form used on the SET side.
    #[must_use]
    pub fn assign(key: &str, value: &str) -> String {
        format!("{key}={value}")
    }

    /// Renders a predicate matching `value`, using `IS` for `NULL`.
    #[must_use]
    pub fn predicate(key: &str, value: &str) -> String {
        format!("{key}{}{value}", Separator::for_value(value))
    }
}

impl fmt::Display for Assignment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}{}{}", self.key, self.sep, self.value)
    }
}

/// Ordered mapping from column to assignment for one clause.
///
/// Iteration follows the column order of the source statement. The first
/// assignment of a column wins; later ones are rejected.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct AssignmentMap {
    entries: IndexMap<String, Assignment>,
}

impl AssignmentMap {
    /// Parses a sequence of column tokens. Empty tokens are skipped.
    #[must_use]
    pub fn parse<'a, I>(tokens: I) -> ParsedClause<'a>
    where
        I: IntoIterator<Item = &'a str>,
    {
        let mut parsed = ParsedClause::default();
        for token in tokens {
            if token.trim().is_empty() {
                continue;
            }
            match Assignment::parse(token) {
                Some(assignment) => {
                    let key = assignment.key.clone();
                    if !parsed.assignments.insert(assignment) {
                        parsed.duplicates.push(key);
                    }
                }
                None => parsed.unclassified.push(token),
            }
        }
        parsed
    }

    /// Inserts an assignment unless its column is already present.
    ///
    /// Returns false if the column was already mapped.
    pub fn insert(&mut self, assignment: Assignment) -> bool {
        if self.entries.contains_key(&assignment.key) {
            return false;
        }
        self.entries.insert(assignment.key.clone(), assignment);
        true
    }

    /// Returns the assignment of `key`.
    #[must_use]
    pub fn get(&self, key: &str) -> Option<&Assignment> {
        self.entries.get(key)
    }

    /// Iterates assignments in statement order.
    pub fn iter(&self) -> impl Iterator<Item = &Assignment> {
        self.entries.values()
    }

    /// Iterates column names in statement order.
    pub fn keys(&self) -> impl Iterator<Item = &str> {
        self.entries.keys().map(String::as_str)
    }

    /// Returns the number of columns.
    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Returns true if no column is mapped.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

impl<'m> IntoIterator for &'m AssignmentMap {
    type Item = &'m Assignment;
    type IntoIter = indexmap::map::Values<'m, String, Assignment>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.values()
    }
}

/// The outcome of parsing one clause.
#[derive(Debug, Clone, Default)]
pub struct ParsedClause<'a> {
    /// Classified assignments.
    pub assignments: AssignmentMap,
    /// Tokens that matched neither form.
    pub unclassified: Vec<&'a str>,
    /// Columns whose later occurrences were dropped.
    pub duplicates: Vec<String>,
}

impl ParsedClause<'_> {
    /// Hands the anomalies to `sink` and returns the map.
    pub fn report(self, sink: &mut dyn DiagnosticSink) -> AssignmentMap {
        for column in self.duplicates {
            sink.report(Diagnostic::DuplicateColumn { column });
        }
        for token in self.unclassified {
            sink.report(Diagnostic::UnclassifiedToken {
                token: token.to_string(),
            });
        }
        self.assignments
    }
}
