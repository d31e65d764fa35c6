//! Oracle dialect (also the shape used by Oracle-compatible engines).
//!
//! Oracle has native `MERGE INTO` and resolves parameter types inside a
//! derived table on its own, so the synthetic source keeps bare
//! placeholders. Date literals need an explicit `to_date` with a format
//! mask; the customary null-coalesce function is `nvl`.

use super::{DialectKind, SqlDialect};
use crate::meta::TemporalKind;
use crate::reserved::ReservedWords;

/// Oracle SQL generation.
#[derive(Debug, Clone, Default)]
pub struct OracleDialect {
    reserved: ReservedWords,
}

impl OracleDialect {
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

impl SqlDialect for OracleDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Oracle
    }

    fn name(&self) -> &'static str {
        "oracle"
    }

    fn reserved_words(&self) -> &ReservedWords {
        &self.reserved
    }

    fn null_function(&self) -> &'static str {
        "nvl"
    }

    fn supports_merge(&self) -> bool {
        true
    }

    fn wrap_temporal_literal(&self, kind: TemporalKind, literal: &str) -> String {
        match kind {
            TemporalKind::Time => format!("to_date({literal},'HH24:mi:ss')"),
            TemporalKind::Date => format!("to_date({literal},'yyyy-MM-dd')"),
            TemporalKind::DateTime => format!("to_date({literal},'yyyy-MM-dd HH24:mi:ss')"),
            TemporalKind::Timestamp | TemporalKind::None => literal.to_owned(),
        }
    }
}
