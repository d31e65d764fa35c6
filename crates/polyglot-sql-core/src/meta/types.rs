//! Closed type tags used to describe entity columns.

use serde::{Deserialize, Serialize};

/// JDBC-flavoured column type tag.
///
/// The set is deliberately closed: dialect cast tables and temporal
/// classification match on it exhaustively, so a new tag forces every
/// dialect to state how it is handled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SqlType {
    /// Fixed-width character data.
    Char,
    /// Variable-width character data.
    Varchar,
    /// Character large object.
    Clob,
    /// 32-bit integer.
    Integer,
    /// 8-bit integer.
    TinyInt,
    /// 64-bit integer.
    BigInt,
    /// Exact numeric with scale.
    Numeric,
    /// Exact decimal with scale.
    Decimal,
    /// 64-bit float.
    Double,
    /// 32-bit float.
    Float,
    /// Boolean.
    Boolean,
    /// Calendar date without time of day.
    Date,
    /// Time of day without date.
    Time,
    /// Date and time at seconds precision.
    DateTime,
    /// Date and time with fractional seconds.
    Timestamp,
    /// Raw binary data.
    Binary,
    /// Binary large object.
    Blob,
    /// Anything the generator has no special handling for.
    Other,
}

impl SqlType {
    /// Returns whether values of this type are character data.
    ///
    /// Used by dialects that must cast string parameters explicitly
    /// to avoid multi-byte corruption.
    #[must_use]
    pub const fn is_character(self) -> bool {
        matches!(self, Self::Char | Self::Varchar | Self::Clob)
    }

    /// Default temporal classification for this type.
    #[must_use]
    pub const fn temporal_kind(self) -> TemporalKind {
        match self {
            Self::Time => TemporalKind::Time,
            Self::Date => TemporalKind::Date,
            Self::DateTime => TemporalKind::DateTime,
            Self::Timestamp => TemporalKind::Timestamp,
            Self::Char
            | Self::Varchar
            | Self::Clob
            | Self::Integer
            | Self::TinyInt
            | Self::BigInt
            | Self::Numeric
            | Self::Decimal
            | Self::Double
            | Self::Float
            | Self::Boolean
            | Self::Binary
            | Self::Blob
            | Self::Other => TemporalKind::None,
        }
    }
}

/// Semantic date/time classification of a column.
///
/// Drives the format mask chosen when a "current time" default is
/// materialized, and the dialect conversion wrapper applied to date
/// literals inside MERGE statements.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum TemporalKind {
    /// Not a date/time column.
    None,
    /// Time of day (`HH:mm:ss`).
    Time,
    /// Calendar date (`yyyy-MM-dd`).
    Date,
    /// Date and time at seconds precision (`yyyy-MM-dd HH:mm:ss`).
    DateTime,
    /// Date and time with fractional seconds; current-time defaults use
    /// the database's own clock rather than a generation-time literal.
    Timestamp,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_character_types() {
        assert!(SqlType::Varchar.is_character());
        assert!(SqlType::Char.is_character());
        assert!(SqlType::Clob.is_character());
        assert!(!SqlType::Integer.is_character());
        assert!(!SqlType::Blob.is_character());
    }

    #[test]
    fn test_default_temporal_kind() {
        assert_eq!(SqlType::Date.temporal_kind(), TemporalKind::Date);
        assert_eq!(SqlType::Time.temporal_kind(), TemporalKind::Time);
        assert_eq!(SqlType::DateTime.temporal_kind(), TemporalKind::DateTime);
        assert_eq!(SqlType::Timestamp.temporal_kind(), TemporalKind::Timestamp);
        assert_eq!(SqlType::Varchar.temporal_kind(), TemporalKind::None);
    }
}
