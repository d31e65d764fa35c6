//! Dialect-specific SQL generation for persistence operations.
//!
//! Each supported engine implements [`SqlDialect`]; the shared INSERT and
//! MERGE skeletons live here as default methods and helpers, so a dialect
//! only overrides the places where its syntax actually differs (cast
//! requirements, current-timestamp keyword, temporal literal wrapping,
//! upsert mechanism). Adding a dialect means adding one implementation,
//! never touching existing ones.
//!
//! All operations are pure single-pass functions from immutable inputs to
//! an SQL string with positional `?` placeholders. The placeholder order
//! follows entity field declaration order filtered by the same inclusion
//! rules as the column list; the execution layer binds by position, so
//! that ordering is part of the contract.

mod db2;
mod impala;
mod oracle;
mod postgres;

pub use db2::Db2Dialect;
pub use impala::ImpalaDialect;
pub use oracle::OracleDialect;
pub use postgres::PostgresDialect;

use std::borrow::Cow;
use std::collections::HashSet;

use tracing::debug;

use crate::defaults::{insert_default, render_default};
use crate::meta::{EntityMeta, FieldMeta, PkStrategy, TemporalKind};
use crate::reserved::ReservedWords;
use crate::unify::UnifyFields;

/// Identifies a supported database dialect.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum DialectKind {
    /// IBM DB2 (typed MERGE source).
    Db2,
    /// Oracle and compatible engines (untyped MERGE source).
    Oracle,
    /// PostgreSQL and compatible engines (ON CONFLICT).
    Postgres,
    /// Impala/Kudu (plain inserts, explicit string casts).
    Impala,
}

impl DialectKind {
    /// Creates the dialect implementation for this kind, with the default
    /// reserved-word table.
    #[must_use]
    pub fn dialect(self) -> Box<dyn SqlDialect> {
        match self {
            Self::Db2 => Box::new(Db2Dialect::new()),
            Self::Oracle => Box::new(OracleDialect::new()),
            Self::Postgres => Box::new(PostgresDialect::new()),
            Self::Impala => Box::new(ImpalaDialect::new()),
        }
    }
}

/// Per-call generation overrides.
///
/// Mirrors what the execution layer knows at save time: the key strategy,
/// the null-coalesce function to use (falls back to the dialect default),
/// the sequence expression for [`PkStrategy::Sequence`], whether an
/// explicitly assigned key value may override generation, a target-table
/// override, an optional synthetic source table for MERGE, and the fields
/// to update unconditionally.
#[derive(Debug, Clone, Default)]
pub struct SaveSqlOptions<'a> {
    /// How the primary-key value is produced.
    pub pk_strategy: PkStrategy,
    /// Null-coalesce function name; `None` uses the dialect default.
    pub null_fn: Option<&'a str>,
    /// Sequence expression (e.g. `seq_orders.nextval`).
    pub sequence: Option<&'a str>,
    /// Whether the caller may supply the key value explicitly.
    pub assign_pk: bool,
    /// Target table override (e.g. a sharded or archive table).
    pub table: Option<&'a str>,
    /// Source table for the MERGE synthetic row, when values come from an
    /// existing table instead of bound parameters.
    pub from_table: Option<&'a str>,
    /// Fields updated unconditionally instead of null-coalesced. Names
    /// that resolve to no declared field are ignored.
    pub force_update_fields: &'a [&'a str],
}

impl<'a> SaveSqlOptions<'a> {
    /// Creates options for the given key strategy.
    #[must_use]
    pub fn new(pk_strategy: PkStrategy) -> Self {
        Self {
            pk_strategy,
            ..Self::default()
        }
    }

    /// Sets the null-coalesce function name.
    #[must_use]
    pub const fn null_fn(mut self, null_fn: &'a str) -> Self {
        self.null_fn = Some(null_fn);
        self
    }

    /// Sets the sequence expression.
    #[must_use]
    pub const fn sequence(mut self, sequence: &'a str) -> Self {
        self.sequence = Some(sequence);
        self
    }

    /// Allows an explicitly assigned key value to win over generation.
    #[must_use]
    pub const fn assign_pk(mut self) -> Self {
        self.assign_pk = true;
        self
    }

    /// Overrides the target table.
    #[must_use]
    pub const fn table(mut self, table: &'a str) -> Self {
        self.table = Some(table);
        self
    }

    /// Sets the MERGE source table.
    #[must_use]
    pub const fn from_table(mut self, from_table: &'a str) -> Self {
        self.from_table = Some(from_table);
        self
    }

    /// Sets the fields to update unconditionally.
    #[must_use]
    pub const fn force_update(mut self, fields: &'a [&'a str]) -> Self {
        self.force_update_fields = fields;
        self
    }
}

/// Trait implemented once per supported database engine.
///
/// The four generation operations have shared default implementations;
/// dialects override the capability surface and, where their upsert
/// mechanism differs structurally (PostgreSQL), the operations themselves.
pub trait SqlDialect: Send + Sync {
    /// The dialect tag.
    fn kind(&self) -> DialectKind;

    /// The dialect name, for logging.
    fn name(&self) -> &'static str;

    /// The reserved-word table in effect for this dialect instance.
    fn reserved_words(&self) -> &ReservedWords;

    /// The identifier quote character.
    fn quote_char(&self) -> char {
        '"'
    }

    /// The null-coalesce function used when the caller supplies none.
    fn null_function(&self) -> &'static str {
        "coalesce"
    }

    /// The native current-timestamp keyword.
    fn current_timestamp(&self) -> &'static str {
        "CURRENT_TIMESTAMP"
    }

    /// Whether the engine has native `MERGE INTO`.
    fn supports_merge(&self) -> bool {
        false
    }

    /// Whether the engine has native `ON CONFLICT`.
    fn supports_on_conflict(&self) -> bool {
        false
    }

    /// Whether string parameters must be cast explicitly in plain inserts
    /// (legacy engines corrupt multi-byte text otherwise).
    fn requires_string_cast(&self) -> bool {
        false
    }

    /// The typed placeholder emitted inside a MERGE synthetic source
    /// projection. Engines that resolve parameter types implicitly keep
    /// the bare placeholder.
    fn typed_source_column(&self, _field: &FieldMeta) -> String {
        String::from("?")
    }

    /// Wraps a quoted date/time literal in the dialect's conversion
    /// syntax. Engines with implicit string coercion pass it through.
    fn wrap_temporal_literal(&self, _kind: TemporalKind, literal: &str) -> String {
        literal.to_owned()
    }

    /// The database-clock expression for a field, or `None` when the
    /// field is not temporal.
    fn current_time_expr(&self, field: &FieldMeta) -> Option<&'static str> {
        match field.temporal_kind() {
            TemporalKind::None => None,
            _ => Some(self.current_timestamp()),
        }
    }

    /// Resolves a column name to its dialect-safe form.
    fn resolve_column<'a>(&self, column: &'a str) -> Cow<'a, str> {
        self.reserved_words().resolve(column, self.quote_char())
    }

    /// Builds a plain single-row INSERT.
    fn insert(&self, meta: &EntityMeta, opts: &SaveSqlOptions<'_>) -> String {
        build_insert(self, meta, opts)
    }

    /// Builds the save-or-update statement (MERGE or ON CONFLICT
    /// depending on the engine). Degrades to [`SqlDialect::insert`] for
    /// keyless entities; omits the update branch when every field is part
    /// of the key. Engines with no native upsert at all degrade to a
    /// plain insert; their callers probe with
    /// [`SqlDialect::unique_check`] and branch themselves.
    fn save_or_update(
        &self,
        meta: &EntityMeta,
        unify: &UnifyFields,
        opts: &SaveSqlOptions<'_>,
    ) -> String {
        if self.supports_merge() {
            build_merge(self, meta, unify, opts, true, true)
        } else {
            build_insert(self, meta, opts)
        }
    }

    /// Builds the insert-if-absent-otherwise-skip statement.
    fn merge_ignore(
        &self,
        meta: &EntityMeta,
        unify: &UnifyFields,
        opts: &SaveSqlOptions<'_>,
    ) -> String {
        if self.supports_merge() {
            build_merge(self, meta, unify, opts, false, false)
        } else {
            build_insert(self, meta, opts)
        }
    }

    /// Builds the INSERT with an `ON CONFLICT .. DO NOTHING` suffix where
    /// the engine supports it; the suffix is omitted for keyless entities.
    fn insert_ignore(&self, meta: &EntityMeta, opts: &SaveSqlOptions<'_>) -> String {
        if self.supports_on_conflict() {
            build_insert_ignore(self, meta, opts)
        } else if self.supports_merge() {
            self.merge_ignore(meta, &UnifyFields::new(), opts)
        } else {
            build_insert(self, meta, opts)
        }
    }

    /// Builds the existence probe used before a manual insert-or-update
    /// round trip: `SELECT 1, pk-cols FROM t WHERE c1=? AND c2=?`.
    ///
    /// `params` are the entity field names the probe filters on; a name
    /// with no declared field is taken as a column name verbatim, so the
    /// placeholder count always matches the parameter list.
    fn unique_check(&self, meta: &EntityMeta, params: &[&str], table: Option<&str>) -> String {
        let mut sql = String::from("SELECT 1");
        for field in meta.id_fields() {
            sql.push_str(", ");
            sql.push_str(&self.resolve_column(meta.column_name(field)));
        }
        sql.push_str(" FROM ");
        sql.push_str(meta.schema_table(table));
        sql.push_str(" WHERE ");
        for (i, field) in params.iter().enumerate() {
            if i > 0 {
                sql.push_str(" AND ");
            }
            let column = meta.find_field(field).map_or(*field, FieldMeta::column);
            sql.push_str(&self.resolve_column(column));
            sql.push_str("=?");
        }
        sql
    }
}

/// Shared single-row INSERT builder.
///
/// Column/value pairing: an identity key is skipped entirely unless the
/// caller may assign it; a sequence key emits the sequence expression, or
/// a null-coalesce of placeholder and sequence when an assigned value may
/// win; an assigned key binds like any other column. Non-key columns are
/// placeholders, cast explicitly on dialects that require it for strings.
pub(crate) fn build_insert<D: SqlDialect + ?Sized>(
    dialect: &D,
    meta: &EntityMeta,
    opts: &SaveSqlOptions<'_>,
) -> String {
    let table = meta.schema_table(opts.table);
    let null_fn = opts.null_fn.unwrap_or_else(|| dialect.null_function());
    let sequence = opts.sequence.unwrap_or_default();

    let mut sql = String::from("INSERT INTO ");
    sql.push_str(table);
    sql.push_str(" (");
    let mut values = String::new();
    let mut first = true;
    for field in meta.fields() {
        let field_meta = meta.field_meta(field);
        let column = dialect.resolve_column(field_meta.column());
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
        } else if dialect.requires_string_cast() && field_meta.sql_type().is_character() {
            String::from("cast(? as string)")
        } else {
            String::from("?")
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
    sql.push(')');
    debug!(dialect = dialect.name(), table, "generated insert sql");
    sql
}

/// Shared INSERT plus `ON CONFLICT (pk) DO NOTHING` builder.
///
/// With no primary key the conflict target is undefined and the suffix is
/// omitted entirely.
pub(crate) fn build_insert_ignore<D: SqlDialect + ?Sized>(
    dialect: &D,
    meta: &EntityMeta,
    opts: &SaveSqlOptions<'_>,
) -> String {
    let mut sql = build_insert(dialect, meta, opts);
    if meta.has_primary_key() {
        sql.push_str(" ON CONFLICT (");
        push_id_list(dialect, &mut sql, meta, "");
        sql.push_str(") DO NOTHING");
    }
    sql
}

/// Shared MERGE skeleton for save-or-update and insert-if-absent.
///
/// `with_update` controls the `WHEN MATCHED THEN UPDATE SET` branch;
/// `with_defaults` controls whether the insert branch substitutes
/// resolved default values (audit unify values or declared defaults) in
/// addition to create-time database-clock coalescing.
#[allow(clippy::too_many_lines)]
pub(crate) fn build_merge<D: SqlDialect + ?Sized>(
    dialect: &D,
    meta: &EntityMeta,
    unify: &UnifyFields,
    opts: &SaveSqlOptions<'_>,
    with_update: bool,
    with_defaults: bool,
) -> String {
    // An upsert is meaningless without identity.
    if !meta.has_primary_key() {
        return build_insert(dialect, meta, opts);
    }
    let table = meta.schema_table(opts.table);
    let null_fn = opts.null_fn.unwrap_or_else(|| dialect.null_function());
    let sequence = opts.sequence.unwrap_or_default();

    let mut sql = String::from("MERGE INTO ");
    sql.push_str(table);
    sql.push_str(" ta USING (SELECT ");
    for (i, field) in meta.fields().iter().enumerate() {
        let field_meta = meta.field_meta(field);
        let column = dialect.resolve_column(field_meta.column());
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(&dialect.typed_source_column(field_meta));
        sql.push_str(" AS ");
        sql.push_str(&column);
    }
    if let Some(from_table) = opts.from_table {
        sql.push_str(" FROM ");
        sql.push_str(from_table);
    }
    sql.push_str(") tv ON (");
    for (i, field) in meta.id_fields().iter().enumerate() {
        let column = dialect.resolve_column(meta.column_name(field));
        if i > 0 {
            sql.push_str(" AND ");
        }
        sql.push_str("ta.");
        sql.push_str(&column);
        sql.push_str("=tv.");
        sql.push_str(&column);
    }
    sql.push(')');

    // Pure composite-key entity: nothing to update once matched.
    let all_ids = meta.reject_id_fields().is_empty();
    let mut insert_cols = String::new();
    let mut insert_values = String::new();
    if !all_ids {
        if with_update {
            sql.push_str(" WHEN MATCHED THEN UPDATE SET ");
        }
        // Unknown force-update names drop out instead of failing.
        let force: HashSet<String> = opts
            .force_update_fields
            .iter()
            .filter_map(|f| meta.find_field(f))
            .map(|fm| dialect.resolve_column(fm.column()).into_owned())
            .collect();
        for (i, field) in meta.reject_id_fields().iter().enumerate() {
            let field_meta = meta.field_meta(field);
            let column = dialect.resolve_column(field_meta.column());
            if i > 0 {
                insert_cols.push_str(", ");
                insert_values.push_str(", ");
                if with_update {
                    sql.push_str(", ");
                }
            }
            if with_update {
                sql.push_str("ta.");
                sql.push_str(&column);
                sql.push('=');
                if force.contains(column.as_ref()) {
                    sql.push_str("tv.");
                    sql.push_str(&column);
                } else {
                    // NULL incoming values preserve the stored value;
                    // update-time audit fields take the database clock.
                    sql.push_str(null_fn);
                    sql.push_str("(tv.");
                    sql.push_str(&column);
                    sql.push_str(", ");
                    match dialect
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
            insert_cols.push_str(&column);
            push_insert_branch_value(
                dialect,
                &mut insert_values,
                field,
                field_meta,
                &column,
                unify,
                null_fn,
                with_defaults,
            );
        }
    }

    sql.push_str(" WHEN NOT MATCHED THEN INSERT (");
    if all_ids {
        push_id_list(dialect, &mut sql, meta, "");
        sql.push_str(") VALUES (");
        push_id_list(dialect, &mut sql, meta, "tv.");
    } else {
        sql.push_str(&insert_cols);
        match opts.pk_strategy {
            PkStrategy::Sequence => {
                let column = dialect.resolve_column(meta.column_name(&meta.id_fields()[0]));
                sql.push_str(", ");
                sql.push_str(&column);
                sql.push_str(") VALUES (");
                sql.push_str(&insert_values);
                sql.push_str(", ");
                if opts.assign_pk {
                    sql.push_str(null_fn);
                    sql.push_str("(tv.");
                    sql.push_str(&column);
                    sql.push_str(", ");
                    sql.push_str(sequence);
                    sql.push(')');
                } else {
                    sql.push_str(sequence);
                }
            }
            PkStrategy::Identity => {
                let column = dialect.resolve_column(meta.column_name(&meta.id_fields()[0]));
                if opts.assign_pk {
                    sql.push_str(", ");
                    sql.push_str(&column);
                }
                sql.push_str(") VALUES (");
                sql.push_str(&insert_values);
                if opts.assign_pk {
                    sql.push_str(", tv.");
                    sql.push_str(&column);
                }
            }
            PkStrategy::Assigned => {
                sql.push_str(", ");
                push_id_list(dialect, &mut sql, meta, "");
                sql.push_str(") VALUES (");
                sql.push_str(&insert_values);
                sql.push_str(", ");
                push_id_list(dialect, &mut sql, meta, "tv.");
            }
        }
    }
    sql.push(')');
    debug!(
        dialect = dialect.name(),
        table, with_update, "generated merge sql"
    );
    sql
}

/// Appends the primary-key column list, each column prefixed (e.g. `tv.`).
fn push_id_list<D: SqlDialect + ?Sized>(
    dialect: &D,
    sql: &mut String,
    meta: &EntityMeta,
    prefix: &str,
) {
    for (i, field) in meta.id_fields().iter().enumerate() {
        if i > 0 {
            sql.push_str(", ");
        }
        sql.push_str(prefix);
        sql.push_str(&dialect.resolve_column(meta.column_name(field)));
    }
}

/// Appends one insert-branch value for a non-key column: the source value,
/// null-coalesced with a resolved default or the database clock when the
/// column has audit semantics.
#[allow(clippy::too_many_arguments)]
fn push_insert_branch_value<D: SqlDialect + ?Sized>(
    dialect: &D,
    out: &mut String,
    field: &str,
    field_meta: &FieldMeta,
    column: &str,
    unify: &UnifyFields,
    null_fn: &str,
    with_defaults: bool,
) {
    if with_defaults {
        if let Some(default) = insert_default(unify, field_meta) {
            out.push_str(null_fn);
            out.push_str("(tv.");
            out.push_str(column);
            out.push_str(", ");
            out.push_str(&render_default(dialect, field_meta, &default));
            out.push(')');
            return;
        }
    }
    match dialect
        .current_time_expr(field_meta)
        .filter(|_| unify.is_create_time_field(field))
    {
        Some(now) => {
            out.push_str(null_fn);
            out.push_str("(tv.");
            out.push_str(column);
            out.push_str(", ");
            out.push_str(now);
            out.push(')');
        }
        None => {
            out.push_str("tv.");
            out.push_str(column);
        }
    }
}
