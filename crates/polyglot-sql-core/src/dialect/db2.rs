//! IBM DB2 dialect.
//!
//! DB2 has native `MERGE INTO` but cannot infer the type of a bare
//! parameter placeholder inside a derived table, so every column of the
//! synthetic source projection is cast explicitly. Date and time literals
//! need constructor-style conversion (`date(..)`, `time(..)`,
//! `timestamp(..)`), and the current-timestamp keyword is spelled without
//! an underscore.

use super::{DialectKind, SqlDialect};
use crate::meta::{FieldMeta, SqlType, TemporalKind};
use crate::reserved::ReservedWords;

/// DB2 SQL generation.
#[derive(Debug, Clone, Default)]
pub struct Db2Dialect {
    reserved: ReservedWords,
}

impl Db2Dialect {
    /// Creates the dialect with the default reserved-word table.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates the dialect with a custom reserved-word table.
    #[must_use]
    pub const fn with_reserved_words(reserved: ReservedWords) -> Self {
        Self { reserved }
    }
}

impl SqlDialect for Db2Dialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Db2
    }

    fn name(&self) -> &'static str {
        "db2"
    }

    fn reserved_words(&self) -> &ReservedWords {
        &self.reserved
    }

    fn current_timestamp(&self) -> &'static str {
        "CURRENT TIMESTAMP"
    }

    fn supports_merge(&self) -> bool {
        true
    }

    fn typed_source_column(&self, field: &FieldMeta) -> String {
        let length = field.declared_length();
        match field.sql_type() {
            SqlType::Varchar => format!("cast(? as varchar({length}))"),
            SqlType::Char => format!("cast(? as char({length}))"),
            SqlType::Clob => format!("cast(? as clob({length}))"),
            SqlType::Blob => format!("cast(? as blob({length}))"),
            SqlType::Binary => format!("cast(? as BINARY LARGE OBJECT({length}))"),
            SqlType::Date => String::from("cast(? as date)"),
            SqlType::Time => String::from("cast(? as time)"),
            SqlType::DateTime | SqlType::Timestamp => String::from("cast(? as timestamp)"),
            SqlType::Numeric => String::from("cast(? as numeric)"),
            SqlType::Decimal => String::from("cast(? as decimal)"),
            SqlType::BigInt => String::from("cast(? as bigint)"),
            SqlType::Integer | SqlType::TinyInt => String::from("cast(? as integer)"),
            SqlType::Double => String::from("cast(? as double)"),
            SqlType::Float => String::from("cast(? as float)"),
            SqlType::Boolean => String::from("cast(? as boolean)"),
            // untyped placeholder, deferring to implicit coercion
            SqlType::Other => String::from("?"),
        }
    }

    fn wrap_temporal_literal(&self, kind: TemporalKind, literal: &str) -> String {
        match kind {
            TemporalKind::Time => format!("time({literal})"),
            TemporalKind::Date => format!("date({literal})"),
            TemporalKind::DateTime => format!("timestamp({literal})"),
            TemporalKind::Timestamp | TemporalKind::None => literal.to_owned(),
        }
    }
}
