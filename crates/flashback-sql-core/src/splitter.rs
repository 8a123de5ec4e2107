//! Clause splitting with JSON re-merging.
//!
//! binlog2sql renders every column as `` `col`=value `` joined by `,` in SET
//! clauses and by ` AND ` in WHERE clauses. A naive split on the separator
//! tears apart JSON objects and string literals that contain the separator;
//! [`ColumnSplitter`] glues those fragments back together.

/// Separator of SET assignments, INSERT column lists and VALUES lists.
pub const COMMA: &str = ",";

/// Separator of WHERE predicates.
pub const AND: &str = " AND ";

/// Number of leading SET fragments that are never merged.
///
/// Mirrors the fixed prefix shape of the statements binlog2sql generates.
pub const SET_RESERVED_FRAGMENTS: usize = 3;

/// Splits a clause into column tokens.
///
/// Every returned token is a trimmed slice of the input. A token that starts
/// an unbalanced JSON object (more `{` than `}`) or an unterminated `'`
/// string literal keeps absorbing the following fragments until it is
/// balanced again; the absorbed fragments are rejoined with the separator
/// text they were split on. Input that never balances absorbs everything up
/// to the end of the clause.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ColumnSplitter<'s> {
    separator: &'s str,
    reserved: usize,
}

impl<'s> ColumnSplitter<'s> {
    /// Creates a splitter for the given separator with no reserved fragments.
    #[must_use]
    pub const fn new(separator: &'s str) -> Self {
        Self {
            separator,
            reserved: 0,
        }
    }

    /// Splitter for the assignments of a SET clause.
    #[must_use]
    pub const fn set_clause() -> ColumnSplitter<'static> {
        ColumnSplitter::new(COMMA).reserve(SET_RESERVED_FRAGMENTS)
    }

    /// Splitter for the predicates of a WHERE clause.
    #[must_use]
    pub const fn where_clause() -> ColumnSplitter<'static> {
        ColumnSplitter::new(AND)
    }

    /// Passes the first `count` fragments through verbatim.
    #[must_use]
    pub const fn reserve(mut self, count: usize) -> Self {
        self.reserved = count;
        self
    }

    /// Splits `clause` into tokens.
    #[must_use]
    pub fn split<'a>(&self, clause: &'a str) -> Vec<&'a str> {
        let mut tokens = Vec::new();
        // Start offset and balance of the token being merged.
        let mut open: Option<(usize, Balance)> = None;
        // Quote state left by the reserved fragments. A literal opened there
        // is never merged; its remaining halves pass through verbatim.
        let mut prefix = Balance::default();
        let mut offset = 0;

        for (index, fragment) in clause.split(self.separator).enumerate() {
            let start = offset;
            let end = start + fragment.len();
            offset = end + self.separator.len();

            if index < self.reserved || prefix.is_quoted() {
                prefix.feed(fragment);
                tokens.push(fragment.trim());
                continue;
            }

            match open.take() {
                Some((begin, mut balance)) => {
                    balance.feed(fragment);
                    if balance.is_closed() {
                        tokens.push(clause[begin..end].trim());
                    } else {
                        open = Some((begin, balance));
                    }
                }
                None => {
                    let mut balance = Balance::default();
                    balance.feed(fragment);
                    if balance.is_closed() {
                        tokens.push(fragment.trim());
                    } else {
                        open = Some((start, balance));
                    }
                }
            }
        }

        if let Some((begin, _)) = open {
            tokens.push(clause[begin..].trim());
        }

        tokens
    }
}

/// Running brace depth and quote state over a sequence of fragments.
///
/// Tracks `'` string literals (with `\` escapes) and `` ` `` identifiers;
/// each kind of quote is inert inside the other.
#[derive(Debug, Clone, Copy, Default)]
pub(crate) struct Balance {
    depth: i64,
    in_string: bool,
    in_identifier: bool,
    escaped: bool,
}

impl Balance {
    pub(crate) fn feed(&mut self, fragment: &str) {
        for c in fragment.chars() {
            if self.escaped {
                self.escaped = false;
                continue;
            }
            match c {
                '\\' if self.in_string => self.escaped = true,
                '\'' if !self.in_identifier => self.in_string = !self.in_string,
                '`' if !self.in_string => self.in_identifier = !self.in_identifier,
                '{' if !self.in_identifier => self.depth += 1,
                '}' if !self.in_identifier => self.depth -= 1,
                _ => {}
            }
        }
    }

    /// Returns true while inside a string literal or a quoted identifier.
    pub(crate) const fn is_quoted(&self) -> bool {
        self.in_string || self.in_identifier
    }

    const fn is_closed(&self) -> bool {
        self.depth <= 0 && !self.is_quoted()
    }
}
