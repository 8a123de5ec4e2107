//! Rewrite configuration and modes.

use indexmap::IndexSet;

/// Default primary key column.
pub const DEFAULT_PRIMARY_KEY: &str = "`id`";

/// How a statement is rewritten.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Mode {
    /// Drop unchanged UPDATE columns; INSERT and DELETE pass through.
    #[default]
    Filter,
    /// Invert changed UPDATE columns; INSERT and DELETE swap.
    Flashback,
    /// Invert every UPDATE column, changed or not; INSERT and DELETE swap.
    FullFlashback,
}

impl Mode {
    /// Builds the mode from the two command-line flags. Full flashback wins
    /// when both are set.
    #[must_use]
    pub const fn from_flags(flashback: bool, full_flashback: bool) -> Self {
        if full_flashback {
            Self::FullFlashback
        } else if flashback {
            Self::Flashback
        } else {
            Self::Filter
        }
    }

    /// Returns true for both flashback modes.
    #[must_use]
    pub const fn inverts(self) -> bool {
        !matches!(self, Self::Filter)
    }
}

/// Wraps a column name in backticks unless it already is quoted.
#[must_use]
pub fn quote_identifier(name: &str) -> String {
    let name = name.trim();
    if name.len() >= 2 && name.starts_with('`') && name.ends_with('`') {
        name.to_string()
    } else {
        format!("`{}`", name.trim_matches('`'))
    }
}

/// Process-wide, read-only rewrite settings.
///
/// The primary key is always part of the keep-column set.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RewriteConfig {
    primary_key: String,
    keep_columns: IndexSet<String>,
}

impl RewriteConfig {
    /// Creates a configuration with the given primary key.
    #[must_use]
    pub fn new(primary_key: &str) -> Self {
        let primary_key = quote_identifier(primary_key);
        let mut keep_columns = IndexSet::new();
        keep_columns.insert(primary_key.clone());
        Self {
            primary_key,
            keep_columns,
        }
    }

    /// Adds a column that is always kept in the WHERE clause.
    #[must_use]
    pub fn keep_column(mut self, column: &str) -> Self {
        self.keep_columns.insert(quote_identifier(column));
        self
    }

    /// Adds several keep columns.
    #[must_use]
    pub fn keep_columns<I, S>(self, columns: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: AsRef<str>,
    {
        columns
            .into_iter()
            .fold(self, |config, column| config.keep_column(column.as_ref()))
    }

    /// Returns the quoted primary key.
    #[must_use]
    pub fn primary_key(&self) -> &str {
        &self.primary_key
    }

    /// Returns true if `column` is the primary key or a keep column.
    #[must_use]
    pub fn is_kept(&self, column: &str) -> bool {
        self.keep_columns.contains(column)
    }

    /// Iterates the keep columns, primary key first.
    pub fn kept(&self) -> impl Iterator<Item = &str> {
        self.keep_columns.iter().map(String::as_str)
    }
}

impl Default for RewriteConfig {
    fn default() -> Self {
        Self::new(DEFAULT_PRIMARY_KEY)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_mode_from_flags() {
        assert_eq!(Mode::from_flags(false, false), Mode::Filter);
        assert_eq!(Mode::from_flags(true, false), Mode::Flashback);
        assert_eq!(Mode::from_flags(false, true), Mode::FullFlashback);
        assert_eq!(Mode::from_flags(true, true), Mode::FullFlashback);
        assert!(!Mode::Filter.inverts());
        assert!(Mode::Flashback.inverts());
    }

    #[test]
    fn test_quote_identifier() {
        assert_eq!(quote_identifier("id"), "`id`");
        assert_eq!(quote_identifier(" `id` "), "`id`");
        assert_eq!(quote_identifier("`id"), "`id`");
    }

    #[test]
    fn test_primary_key_is_kept() {
        let config = RewriteConfig::new("uid").keep_columns(["tenant", "`region`"]);
        assert_eq!(config.primary_key(), "`uid`");
        assert!(config.is_kept("`uid`"));
        assert!(config.is_kept("`tenant`"));
        assert!(config.is_kept("`region`"));
        assert!(!config.is_kept("`id`"));
        assert_eq!(
            config.kept().collect::<Vec<_>>(),
            vec!["`uid`", "`tenant`", "`region`"]
        );
    }

    #[test]
    fn test_default_primary_key() {
        let config = RewriteConfig::default();
        assert_eq!(config.primary_key(), "`id`");
        assert!(config.is_kept("`id`"));
    }
}
