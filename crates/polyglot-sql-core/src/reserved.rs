//! Reserved-word handling.
//!
//! A column named after a reserved word must be quoted in generated SQL.
//! The word table is externally overridable: deployments can ship their
//! own list (serde round-trippable) when targeting engine versions with a
//! different reserved vocabulary. Resolution is pure and never fails; an
//! unreserved name passes through untouched.

use std::borrow::Cow;
use std::collections::HashSet;

use serde::{Deserialize, Serialize};

/// Column names treated as reserved, matched case-insensitively.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(transparent)]
pub struct ReservedWords {
    words: HashSet<String>,
}

/// Words reserved by at least one supported engine and seen in the wild
/// as column names.
const DEFAULT_WORDS: &[&str] = &[
    "add", "all", "and", "as", "asc", "between", "by", "case", "check", "column", "comment",
    "create", "current", "date", "day", "default", "delete", "desc", "distinct", "drop", "else",
    "end", "exists", "from", "function", "group", "having", "in", "index", "inner", "insert",
    "interval", "into", "is", "join", "key", "left", "level", "like", "limit", "not", "null",
    "of", "on", "or", "order", "outer", "primary", "right", "row", "rows", "select", "sequence",
    "set", "size", "table", "then", "time", "timestamp", "to", "type", "union", "unique",
    "update", "user", "using", "value", "values", "when", "where", "year",
];

impl Default for ReservedWords {
    fn default() -> Self {
        Self {
            words: DEFAULT_WORDS.iter().map(|w| (*w).to_owned()).collect(),
        }
    }
}

impl ReservedWords {
    /// The built-in word table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// An empty table (no quoting at all).
    #[must_use]
    pub fn none() -> Self {
        Self {
            words: HashSet::new(),
        }
    }

    /// A table built from an explicit word list, replacing the default.
    #[must_use]
    pub fn with_words<S: AsRef<str>, I: IntoIterator<Item = S>>(words: I) -> Self {
        Self {
            words: words
                .into_iter()
                .map(|w| w.as_ref().to_lowercase())
                .collect(),
        }
    }

    /// Adds a word to the table.
    pub fn add(&mut self, word: impl AsRef<str>) {
        self.words.insert(word.as_ref().to_lowercase());
    }

    /// Whether the column name is reserved.
    #[must_use]
    pub fn is_reserved(&self, column: &str) -> bool {
        self.words.contains(&column.to_lowercase())
    }

    /// Returns the dialect-safe form of a column name, quoting with the
    /// given character when the name is reserved.
    #[must_use]
    pub fn resolve<'a>(&self, column: &'a str, quote: char) -> Cow<'a, str> {
        if self.is_reserved(column) {
            Cow::Owned(format!("{quote}{column}{quote}"))
        } else {
            Cow::Borrowed(column)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unreserved_passes_through() {
        let words = ReservedWords::new();
        assert_eq!(words.resolve("customer_name", '"'), "customer_name");
    }

    #[test]
    fn test_reserved_word_is_quoted() {
        let words = ReservedWords::new();
        assert_eq!(words.resolve("order", '"'), "\"order\"");
        assert_eq!(words.resolve("ORDER", '`'), "`ORDER`");
    }

    #[test]
    fn test_custom_table_replaces_default() {
        let words = ReservedWords::with_words(["rank"]);
        assert_eq!(words.resolve("rank", '"'), "\"rank\"");
        // "order" is no longer reserved under the custom table
        assert_eq!(words.resolve("order", '"'), "order");
    }

    #[test]
    fn test_serde_round_trip() {
        let mut words = ReservedWords::with_words(["order", "level"]);
        words.add("rank");
        let json = serde_json::to_string(&words).unwrap();
        let back: ReservedWords = serde_json::from_str(&json).unwrap();
        assert!(back.is_reserved("rank"));
        assert!(back.is_reserved("order"));
        assert!(!back.is_reserved("user"));
    }
}
