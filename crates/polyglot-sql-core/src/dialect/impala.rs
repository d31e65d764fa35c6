//! Impala/Kudu dialect.
//!
//! No native MERGE and no ON CONFLICT; every upsert-family operation
//! degrades to a plain insert, and callers that need insert-or-update
//! semantics probe first with `unique_check`. The one quirk this engine
//! family carries is an explicit cast requirement on string parameters:
//! without `cast(? as string)` multi-byte text is corrupted on the way
//! in.

use super::{DialectKind, SqlDialect};
use crate::reserved::ReservedWords;

/// Impala SQL generation.
#[derive(Debug, Clone, Default)]
pub struct ImpalaDialect {
    reserved: ReservedWords,
}

impl ImpalaDialect {
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

impl SqlDialect for ImpalaDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Impala
    }

    fn name(&self) -> &'static str {
        "impala"
    }

    fn reserved_words(&self) -> &ReservedWords {
        &self.reserved
    }

    fn quote_char(&self) -> char {
        '`'
    }

    fn requires_string_cast(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::dialect::SaveSqlOptions;
    use crate::meta::{EntityMeta, FieldMeta, PkStrategy, SqlType};
    use crate::unify::UnifyFields;

    fn event_meta() -> EntityMeta {
        EntityMeta::builder("events")
            .field(FieldMeta::new("id", "id", SqlType::BigInt).primary_key())
            .field(FieldMeta::new("title", "title", SqlType::Varchar).length(200))
            .field(FieldMeta::new("weight", "weight", SqlType::Double))
            .build()
            .unwrap()
    }

    #[test]
    fn test_string_columns_are_cast() {
        let dialect = ImpalaDialect::new();
        let sql = dialect.insert(&event_meta(), &SaveSqlOptions::new(PkStrategy::Assigned));
        assert_eq!(
            sql,
            "INSERT INTO events (id, title, weight) VALUES (?, cast(? as string), ?)"
        );
    }

    #[test]
    fn test_upsert_family_degrades_to_insert() {
        let dialect = ImpalaDialect::new();
        let meta = event_meta();
        let opts = SaveSqlOptions::new(PkStrategy::Assigned);
        let insert = dialect.insert(&meta, &opts);
        assert_eq!(
            dialect.save_or_update(&meta, &UnifyFields::new(), &opts),
            insert
        );
        assert_eq!(
            dialect.merge_ignore(&meta, &UnifyFields::new(), &opts),
            insert
        );
        assert_eq!(dialect.insert_ignore(&meta, &opts), insert);
    }

    #[test]
    fn test_reserved_word_uses_backticks() {
        let dialect = ImpalaDialect::new();
        let meta = EntityMeta::builder("metrics")
            .field(FieldMeta::new("id", "id", SqlType::BigInt).primary_key())
            .field(FieldMeta::new("order", "order", SqlType::Integer))
            .build()
            .unwrap();
        let sql = dialect.insert(&meta, &SaveSqlOptions::new(PkStrategy::Assigned));
        assert_eq!(sql, "INSERT INTO metrics (id, `order`) VALUES (?, ?)");
    }
}
