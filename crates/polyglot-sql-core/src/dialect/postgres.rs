//! PostgreSQL dialect (also the shape used by Postgres-compatible
//! engines).
//!
//! No native `MERGE`; the upsert family is expressed with
//! `INSERT .. ON CONFLICT`. Save-or-update keeps the same semantics as
//! the MERGE dialects — force-update fields win unconditionally, other
//! columns null-coalesce against the stored row, update-time audit
//! fields take the database clock — using the `excluded` pseudo-row and
//! a table alias. String-to-date coercion is implicit, so temporal
//! literals pass through unwrapped. The `ON CONFLICT` form has no
//! synthetic source table, so a `from_table` override is ignored here.

use tracing::debug;

use super::{build_insert, build_insert_ignore, DialectKind, SaveSqlOptions, SqlDialect};
use crate::defaults::{insert_default, render_default};
use crate::meta::{EntityMeta, PkStrategy};
use crate::reserved::ReservedWords;
use crate::unify::UnifyFields;

/// PostgreSQL SQL generation.
#[derive(Debug, Clone, Default)]
pub struct PostgresDialect {
    reserved: ReservedWords,
}

impl PostgresDialect {
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

impl SqlDialect for PostgresDialect {
    fn kind(&self) -> DialectKind {
        DialectKind::Postgres
    }

    fn name(&self) -> &'static str {
        "postgres"
    }

    fn reserved_words(&self) -> &ReservedWords {
        &self.reserved
    }

    fn supports_on_conflict(&self) -> bool {
        true
    }

    #[allow(clippy::too_many_lines)]
    fn save_or_update(
        &self,
        meta: &EntityMeta,
        unify: &UnifyFields,
        opts: &SaveSqlOptions<'_>,
    ) -> String {
        if !meta.has_primary_key() {
            return build_insert(self, meta, opts);
        }
        let table = meta.schema_table(opts.table);
        let null_fn = opts.null_fn.unwrap_or_else(|| self.null_function());
        let sequence = opts.sequence.unwrap_or_default();

        let mut sql = String::from("INSERT INTO ");
        sql.push_str(table);
        sql.push_str(" AS ta (");
        let mut values = String::new();
        let mut first = true;
        for field in meta.fields() {
            let field_meta = meta.field_meta(field);
            let column = self.resolve_column(field_meta.column());
            let value = if field_meta.is_primary_key() {
                match opts.pk_strategy {
                    PkStrategy::Identity => {
                        if !opts.assign_pk {
                            continue;
                        }
                        String::from("?")
                    }
                    PkStrategy::Sequence => {
                        if opts.assign_pk {
                            format!("{null_fn}(?, {sequence})")
                        } else {
                            sequence.to_owned()
                        }
                    }
                    PkStrategy::Assigned => String::from("?"),
                }
            } else if let Some(default) = insert_default(unify, field_meta) {
                format!(
                    "{null_fn}(?, {})",
                    render_default(self, field_meta, &default)
                )
            } else {
                match self
                    .current_time_expr(field_meta)
                    .filter(|_| unify.is_create_time_field(field))
                {
                    Some(now) => format!("{null_fn}(?, {now})"),
                    None => String::from("?"),
                }
            };
            if !first {
                sql.push_str(", ");
                values.push_str(", ");
            }
            sql.push_str(&column);
            values.push_str(&value);
            first = false;
        }
        sql.push_str(") VALUES (");
        sql.push_str(&values);
        sql.push_str(") ON CONFLICT (");
        for (i, field) in meta.id_fields().iter().enumerate() {
            if i > 0 {
                sql.push_str(", ");
            }
            sql.push_str(&self.resolve_column(meta.column_name(field)));
        }
        sql.push(')');

        // Pure composite-key entity: nothing to update once matched.
        if meta.reject_id_fields().is_empty() {
            sql.push_str(" DO NOTHING");
        } else {
            sql.push_str(" DO UPDATE SET ");
            // Unknown force-update names drop out instead of failing.
            let force: Vec<String> = opts
                .force_update_fields
                .iter()
                .filter_map(|f| meta.find_field(f))
                .map(|fm| self.resolve_column(fm.column()).into_owned())
                .collect();
            for (i, field) in meta.reject_id_fields().iter().enumerate() {
                let field_meta = meta.field_meta(field);
                let column = self.resolve_column(field_meta.column());
                if i > 0 {
                    sql.push_str(", ");
                }
                sql.push_str(&column);
                sql.push('=');
                if force.iter().any(|c| c == column.as_ref()) {
                    sql.push_str("excluded.");
                    sql.push_str(&column);
                } else {
                    sql.push_str(null_fn);
                    sql.push_str("(excluded.");
                    sql.push_str(&column);
                    sql.push_str(", ");
                    match self
                        .current_time_expr(field_meta)
                        .filter(|_| unify.is_update_time_field(field))
                    {
                        Some(now) => sql.push_str(now),
                        None => {
                            sql.push_str("ta.");
                            sql.push_str(&column);
                        }
                    }
                    sql.push(')');
                }
            }
        }
        debug!(dialect = self.name(), table, "generated upsert sql");
        sql
    }

    fn merge_ignore(
        &self,
        meta: &EntityMeta,
        _unify: &UnifyFields,
        opts: &SaveSqlOptions<'_>,
    ) -> String {
        build_insert_ignore(self, meta, opts)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::meta::{FieldMeta, SqlType};

    fn product_meta() -> EntityMeta {
        EntityMeta::builder("products")
            .field(FieldMeta::new("id", "id", SqlType::BigInt).primary_key())
            .field(FieldMeta::new("name", "name", SqlType::Varchar).length(200))
            .field(FieldMeta::new("updated_at", "updated_at", SqlType::Timestamp))
            .build()
            .unwrap()
    }

    #[test]
    fn test_insert_ignore_suffix() {
        let dialect = PostgresDialect::new();
        let sql = dialect.insert_ignore(&product_meta(), &SaveSqlOptions::new(PkStrategy::Assigned));
        assert_eq!(
            sql,
            "INSERT INTO products (id, name, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT (id) DO NOTHING"
        );
    }

    #[test]
    fn test_insert_ignore_keyless_omits_suffix() {
        let dialect = PostgresDialect::new();
        let meta = EntityMeta::builder("audit_log")
            .field(FieldMeta::new("message", "message", SqlType::Varchar))
            .build()
            .unwrap();
        let sql = dialect.insert_ignore(&meta, &SaveSqlOptions::new(PkStrategy::Assigned));
        assert_eq!(sql, "INSERT INTO audit_log (message) VALUES (?)");
    }

    #[test]
    fn test_save_or_update_on_conflict_shape() {
        let dialect = PostgresDialect::new();
        let unify = UnifyFields::new().update_time_field("updated_at");
        let sql = dialect.save_or_update(
            &product_meta(),
            &unify,
            &SaveSqlOptions::new(PkStrategy::Assigned),
        );
        assert_eq!(
            sql,
            "INSERT INTO products AS ta (id, name, updated_at) VALUES (?, ?, ?) \
             ON CONFLICT (id) DO UPDATE SET name=coalesce(excluded.name, ta.name), \
             updated_at=coalesce(excluded.updated_at, CURRENT_TIMESTAMP)"
        );
    }

    #[test]
    fn test_save_or_update_applies_create_defaults() {
        let dialect = PostgresDialect::new();
        let meta = EntityMeta::builder("products")
            .field(FieldMeta::new("id", "id", SqlType::BigInt).primary_key())
            .field(
                FieldMeta::new("created_by", "created_by", SqlType::Varchar)
                    .length(50)
                    .default_value("'system'"),
            )
            .build()
            .unwrap();
        let sql = dialect.save_or_update(
            &meta,
            &UnifyFields::new(),
            &SaveSqlOptions::new(PkStrategy::Assigned),
        );
        assert!(sql.contains("VALUES (?, coalesce(?, 'system'))"));
    }

    #[test]
    fn test_save_or_update_force_update() {
        let dialect = PostgresDialect::new();
        let force = ["name"];
        let opts = SaveSqlOptions::new(PkStrategy::Assigned).force_update(&force);
        let sql = dialect.save_or_update(&product_meta(), &UnifyFields::new(), &opts);
        assert!(sql.contains("DO UPDATE SET name=excluded.name,"));
    }

    #[test]
    fn test_save_or_update_composite_key_degrades_to_do_nothing() {
        let dialect = PostgresDialect::new();
        let meta = EntityMeta::builder("user_roles")
            .field(FieldMeta::new("user_id", "user_id", SqlType::BigInt).primary_key())
            .field(FieldMeta::new("role_id", "role_id", SqlType::BigInt).primary_key())
            .build()
            .unwrap();
        let sql = dialect.save_or_update(
            &meta,
            &UnifyFields::new(),
            &SaveSqlOptions::new(PkStrategy::Assigned),
        );
        assert_eq!(
            sql,
            "INSERT INTO user_roles AS ta (user_id, role_id) VALUES (?, ?) \
             ON CONFLICT (user_id, role_id) DO NOTHING"
        );
    }

    #[test]
    fn test_sequence_strategy_value_slot() {
        let dialect = PostgresDialect::new();
        let opts = SaveSqlOptions::new(PkStrategy::Sequence).sequence("nextval('seq_products')");
        let sql = dialect.save_or_update(&product_meta(), &UnifyFields::new(), &opts);
        assert!(sql.contains("VALUES (nextval('seq_products'), ?, ?)"));
    }
}
