//! Statement classification and the pieces shared by every rewrite.

use core::fmt;
use core::ops::Range;
use std::sync::LazyLock;

use regex::Regex;

use crate::splitter::Balance;

/// Kind of a raw statement line.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StatementKind {
    /// `INSERT INTO ...`
    Insert,
    /// `UPDATE ... SET ... WHERE ...`
    Update,
    /// `DELETE FROM ... WHERE ...`
    Delete,
    /// Anything else.
    Other,
}

impl StatementKind {
    /// Classifies a statement by its first six non-whitespace characters,
    /// ignoring case.
    #[must_use]
    pub fn classify(sql: &str) -> Self {
        let head = sql.trim_start();
        let Some(head) = head.get(..6) else {
            return Self::Other;
        };
        if head.eq_ignore_ascii_case("INSERT") {
            Self::Insert
        } else if head.eq_ignore_ascii_case("UPDATE") {
            Self::Update
        } else if head.eq_ignore_ascii_case("DELETE") {
            Self::Delete
        } else {
            Self::Other
        }
    }

    /// Returns true for INSERT, UPDATE and DELETE.
    #[must_use]
    pub const fn is_dml(self) -> bool {
        !matches!(self, Self::Other)
    }
}

impl fmt::Display for StatementKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Self::Insert => "INSERT",
            Self::Update => "UPDATE",
            Self::Delete => "DELETE",
            Self::Other => "OTHER",
        })
    }
}

/// Keywords located by byte range inside a statement.
///
/// A keyword only matches when surrounded by whitespace (or the end of the
/// text) and outside quotes, so neither `` `where` `` nor
/// `'tell me where'` is taken for a clause boundary.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Keyword {
    Set,
    Where,
    From,
}

fn keyword_pattern(word: &str) -> Regex {
    Regex::new(&format!(r"(?i)\s({word})(?:\s|$)")).expect("keyword pattern is valid")
}

static SET: LazyLock<Regex> = LazyLock::new(|| keyword_pattern("SET"));
static WHERE: LazyLock<Regex> = LazyLock::new(|| keyword_pattern("WHERE"));
static FROM: LazyLock<Regex> = LazyLock::new(|| keyword_pattern("FROM"));

static LIMIT: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(?i)\s+LIMIT\s+\d+(?:\s*,\s*\d+)?\s*$").expect("limit pattern is valid")
});

impl Keyword {
    fn pattern(self) -> &'static Regex {
        match self {
            Self::Set => &SET,
            Self::Where => &WHERE,
            Self::From => &FROM,
        }
    }

    /// Byte range of the first unquoted occurrence of the keyword in `text`.
    pub(crate) fn locate(self, text: &str) -> Option<Range<usize>> {
        let mut balance = Balance::default();
        let mut scanned = 0;
        self.pattern()
            .captures_iter(text)
            .filter_map(|captures| captures.get(1))
            .map(|m| m.range())
            .find(|range| {
                balance.feed(&text[scanned..range.start]);
                scanned = range.start;
                !balance.is_quoted()
            })
    }
}

/// Marker that introduces the inline comment binlog2sql appends.
const COMMENT_MARKER: &str = "; #";

/// The end of a statement split into body, LIMIT clause and inline comment.
///
/// `UPDATE ... WHERE `id`=1 LIMIT 1; #start 4 end 388` has body
/// `` UPDATE ... WHERE `id`=1 ``, limit `LIMIT 1` and comment
/// `#start 4 end 388`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct StatementTail<'a> {
    /// Text before the LIMIT clause and terminator.
    pub body: &'a str,
    /// The LIMIT clause, if present.
    pub limit: Option<&'a str>,
    /// The inline comment starting at `#`, if present.
    pub comment: Option<&'a str>,
}

impl<'a> StatementTail<'a> {
    /// Splits the tail off `text`.
    #[must_use]
    pub fn parse(text: &'a str) -> Self {
        let text = text.trim();
        let (body, comment) = match text.rfind(COMMENT_MARKER) {
            Some(idx) => (&text[..idx], Some(text[idx + 2..].trim())),
            None => (text, None),
        };
        let body = body.trim_end();
        let body = body.strip_suffix(';').unwrap_or(body).trim_end();

        match LIMIT.find(body) {
            Some(m) => Self {
                body: body[..m.start()].trim_end(),
                limit: Some(m.as_str().trim()),
                comment,
            },
            None => Self {
                body,
                limit: None,
                comment,
            },
        }
    }

    /// Returns true if a LIMIT clause was stripped.
    #[must_use]
    pub const fn has_limit(&self) -> bool {
        self.limit.is_some()
    }

    /// Appends the statement terminator, re-attaching the comment.
    #[must_use]
    pub fn terminate(&self, statement: &str) -> String {
        terminate(statement, self.comment)
    }
}

/// Appends `;` to `statement`, followed by ` #comment` when one is given.
pub(crate) fn terminate(statement: &str, comment: Option<&str>) -> String {
    match comment {
        Some(comment) => format!("{statement}; {comment}"),
        None => format!("{statement};"),
    }
}
