//! Default-value resolution for merge/upsert insert branches.
//!
//! A single default-value annotation on an entity must behave correctly
//! across every supported dialect; this module is the sole seam where
//! that translation happens. "Current time" markers are materialized as
//! formatted literals at generation time, except for fractional-seconds
//! timestamps where the database's own clock keyword is emitted instead:
//! an application-computed instant would lose precision and stamp every
//! row of a batch identically.

use std::borrow::Cow;

use chrono::Local;

use crate::dialect::SqlDialect;
use crate::meta::{FieldMeta, TemporalKind};
use crate::unify::UnifyFields;

/// Expressions recognized, case-insensitively, as "the current time".
const CURRENT_TIME_MARKERS: &[&str] = &[
    "now",
    "now()",
    "sysdate",
    "sysdatetime()",
    "systimestamp",
    "current_timestamp",
    "current timestamp",
    "current_date",
    "current_time",
    "curdate()",
    "curtime()",
    "getdate()",
    "localtime",
    "localtimestamp",
];

/// Whether a default-value expression denotes the current time.
#[must_use]
pub fn is_current_time_marker(value: &str) -> bool {
    let lower = value.trim().to_lowercase();
    CURRENT_TIME_MARKERS.contains(&lower.as_str())
}

/// Picks the default value for a column in a merge insert branch: an
/// audit unify value wins over the field's declared default.
#[must_use]
pub fn insert_default<'a>(unify: &'a UnifyFields, field: &'a FieldMeta) -> Option<Cow<'a, str>> {
    if let Some(value) = unify.create_default_for(field.field()) {
        return Some(Cow::Borrowed(value));
    }
    field.default().map(Cow::Borrowed)
}

/// Renders a resolved default value as a dialect-correct SQL expression.
///
/// Non-temporal columns pass the literal through verbatim; an
/// unrecognized shape is a configuration error deferred to the database,
/// not a generator failure.
#[must_use]
pub fn render_default<D: SqlDialect + ?Sized>(
    dialect: &D,
    field: &FieldMeta,
    raw: &str,
) -> String {
    let kind = field.temporal_kind();
    let current = is_current_time_marker(raw);
    match kind {
        TemporalKind::None => raw.to_owned(),
        // Fractional timestamps take the database clock, never a
        // generation-time literal.
        TemporalKind::Timestamp => {
            if current {
                dialect.current_timestamp().to_owned()
            } else {
                quote_literal(raw).into_owned()
            }
        }
        TemporalKind::Time | TemporalKind::Date | TemporalKind::DateTime => {
            let literal = if current {
                let format = match kind {
                    TemporalKind::Time => "%H:%M:%S",
                    TemporalKind::Date => "%Y-%m-%d",
                    _ => "%Y-%m-%d %H:%M:%S",
                };
                Cow::Owned(format!("'{}'", Local::now().format(format)))
            } else {
                quote_literal(raw)
            };
            dialect.wrap_temporal_literal(kind, &literal)
        }
    }
}

/// Wraps a literal in single quotes unless it already is, as a single
/// idempotent step.
fn quote_literal(value: &str) -> Cow<'_, str> {
    if value.len() >= 2 && value.starts_with('\'') && value.ends_with('\'') {
        Cow::Borrowed(value)
    } else {
        Cow::Owned(format!("'{value}'"))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::{Db2Dialect, OracleDialect, PostgresDialect};
    use crate::meta::SqlType;

    #[test]
    fn test_current_time_markers() {
        assert!(is_current_time_marker("now()"));
        assert!(is_current_time_marker("SYSDATE"));
        assert!(is_current_time_marker(" Current_Timestamp "));
        assert!(is_current_time_marker("CURRENT TIMESTAMP"));
        assert!(!is_current_time_marker("2024-01-01"));
        assert!(!is_current_time_marker("nowhere"));
    }

    #[test]
    fn test_unify_value_wins_over_declared_default() {
        let field = FieldMeta::new("created_by", "created_by", SqlType::Varchar)
            .default_value("'anonymous'");
        let unify = UnifyFields::new().create_default("created_by", "'system'");
        assert_eq!(insert_default(&unify, &field).as_deref(), Some("'system'"));
        assert_eq!(
            insert_default(&UnifyFields::new(), &field).as_deref(),
            Some("'anonymous'")
        );
    }

    #[test]
    fn test_timestamp_current_time_uses_database_clock() {
        let field = FieldMeta::new("created_at", "created_at", SqlType::Timestamp);
        assert_eq!(
            render_default(&Db2Dialect::new(), &field, "now()"),
            "CURRENT TIMESTAMP"
        );
        assert_eq!(
            render_default(&PostgresDialect::new(), &field, "now()"),
            "CURRENT_TIMESTAMP"
        );
    }

    #[test]
    fn test_timestamp_literal_is_quoted_not_replaced() {
        let field = FieldMeta::new("created_at", "created_at", SqlType::Timestamp);
        assert_eq!(
            render_default(&Db2Dialect::new(), &field, "2024-01-01 00:00:00"),
            "'2024-01-01 00:00:00'"
        );
    }

    #[test]
    fn test_date_literal_dialect_wrapping() {
        let field = FieldMeta::new("start_date", "start_date", SqlType::Date);
        assert_eq!(
            render_default(&Db2Dialect::new(), &field, "2024-01-01"),
            "date('2024-01-01')"
        );
        assert_eq!(
            render_default(&OracleDialect::new(), &field, "2024-01-01"),
            "to_date('2024-01-01','yyyy-MM-dd')"
        );
        // implicit coercion: no wrapping
        assert_eq!(
            render_default(&PostgresDialect::new(), &field, "2024-01-01"),
            "'2024-01-01'"
        );
    }

    #[test]
    fn test_quoting_is_idempotent() {
        let field = FieldMeta::new("start_date", "start_date", SqlType::Date);
        let once = render_default(&PostgresDialect::new(), &field, "2024-01-01");
        let twice = render_default(&PostgresDialect::new(), &field, &once);
        assert_eq!(once, twice);
    }

    #[test]
    fn test_current_date_materializes_formatted_literal() {
        let field = FieldMeta::new("created_on", "created_on", SqlType::Date);
        let rendered = render_default(&PostgresDialect::new(), &field, "current_date");
        // 'yyyy-MM-dd', quoted
        assert_eq!(rendered.len(), 12);
        assert!(rendered.starts_with('\'') && rendered.ends_with('\''));
    }

    #[test]
    fn test_non_temporal_passes_through_verbatim() {
        let field = FieldMeta::new("status", "status", SqlType::Integer);
        assert_eq!(render_default(&Db2Dialect::new(), &field, "0"), "0");
    }
}
