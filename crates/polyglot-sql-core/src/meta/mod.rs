//! Entity metadata: the immutable description of a persistable row type.
//!
//! An [`EntityMeta`] is built once from an entity definition and treated as
//! read-only for the lifetime of the process. Field declaration order is
//! load-bearing: it drives column order in every generated clause, and the
//! positional placeholder sequence the execution layer binds against.

mod types;

pub use types::{SqlType, TemporalKind};

use std::collections::HashMap;

use crate::error::{MetaError, Result};

/// How a row's primary-key value is produced.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum PkStrategy {
    /// The caller supplies the key value; it binds like any other column.
    #[default]
    Assigned,
    /// The database generates the key on insert; the column is omitted
    /// unless the dialect accepts an explicit override.
    Identity,
    /// The key comes from a named sequence expression, optionally wrapped
    /// in a null-coalesce so an explicit value wins when supplied.
    Sequence,
}

/// Metadata for a single column of an entity.
#[derive(Debug, Clone)]
pub struct FieldMeta {
    field: String,
    column: String,
    sql_type: SqlType,
    length: u32,
    primary_key: bool,
    default_value: Option<String>,
    temporal: TemporalKind,
}

impl FieldMeta {
    /// Creates field metadata mapping `field` to column `column`.
    #[must_use]
    pub fn new(field: impl Into<String>, column: impl Into<String>, sql_type: SqlType) -> Self {
        Self {
            field: field.into(),
            column: column.into(),
            sql_type,
            length: 0,
            primary_key: false,
            default_value: None,
            temporal: sql_type.temporal_kind(),
        }
    }

    /// Sets the declared length/precision.
    #[must_use]
    pub const fn length(mut self, length: u32) -> Self {
        self.length = length;
        self
    }

    /// Marks this field as part of the primary key.
    #[must_use]
    pub const fn primary_key(mut self) -> Self {
        self.primary_key = true;
        self
    }

    /// Sets the literal default-value expression.
    #[must_use]
    pub fn default_value(mut self, value: impl Into<String>) -> Self {
        self.default_value = Some(value.into());
        self
    }

    /// Overrides the temporal classification derived from the SQL type.
    ///
    /// Useful for columns stored as `Timestamp` but semantically holding
    /// seconds-precision datetimes.
    #[must_use]
    pub const fn temporal(mut self, kind: TemporalKind) -> Self {
        self.temporal = kind;
        self
    }

    /// The entity field name.
    #[must_use]
    pub fn field(&self) -> &str {
        &self.field
    }

    /// The database column name (unescaped).
    #[must_use]
    pub fn column(&self) -> &str {
        &self.column
    }

    /// The column's SQL type tag.
    #[must_use]
    pub const fn sql_type(&self) -> SqlType {
        self.sql_type
    }

    /// The declared length/precision (0 when unspecified).
    #[must_use]
    pub const fn declared_length(&self) -> u32 {
        self.length
    }

    /// Whether this field is part of the primary key.
    #[must_use]
    pub const fn is_primary_key(&self) -> bool {
        self.primary_key
    }

    /// The literal default-value expression, if declared.
    #[must_use]
    pub fn default(&self) -> Option<&str> {
        self.default_value.as_deref()
    }

    /// The temporal classification of this field.
    #[must_use]
    pub const fn temporal_kind(&self) -> TemporalKind {
        self.temporal
    }
}

/// Immutable metadata for a persistable entity.
#[derive(Debug, Clone)]
pub struct EntityMeta {
    table: String,
    fields: Vec<String>,
    field_map: HashMap<String, FieldMeta>,
    id_fields: Vec<String>,
    reject_id_fields: Vec<String>,
}

impl EntityMeta {
    /// Starts building metadata for the given (optionally schema-qualified)
    /// table name.
    #[must_use]
    pub fn builder(table: impl Into<String>) -> EntityMetaBuilder {
        EntityMetaBuilder {
            table: table.into(),
            fields: Vec::new(),
            keys: None,
        }
    }

    /// The declared table name.
    #[must_use]
    pub fn table(&self) -> &str {
        &self.table
    }

    /// Resolves the effective target table: a per-call override wins over
    /// the declared name.
    #[must_use]
    pub fn schema_table<'a>(&'a self, table: Option<&'a str>) -> &'a str {
        match table {
            Some(t) if !t.trim().is_empty() => t,
            _ => &self.table,
        }
    }

    /// Field names in declaration order.
    #[must_use]
    pub fn fields(&self) -> &[String] {
        &self.fields
    }

    /// Looks up the metadata for a field.
    ///
    /// # Panics
    ///
    /// Panics if the field was never declared; every name handed to this
    /// method comes from the entity's own field lists.
    #[must_use]
    pub fn field_meta(&self, field: &str) -> &FieldMeta {
        &self.field_map[field]
    }

    /// The database column name for a field.
    ///
    /// # Panics
    ///
    /// Panics if the field was never declared; every name handed to this
    /// method comes from the entity's own field lists.
    #[must_use]
    pub fn column_name(&self, field: &str) -> &str {
        self.field_map[field].column()
    }

    /// Looks up the metadata for a field, or `None` when no such field
    /// was declared. Caller-supplied names (force-update lists, probe
    /// parameters) go through this so a misconfigured name degrades the
    /// statement instead of failing generation.
    #[must_use]
    pub fn find_field(&self, field: &str) -> Option<&FieldMeta> {
        self.field_map.get(field)
    }

    /// Primary-key field names in declaration order. Empty means the
    /// entity is keyless.
    #[must_use]
    pub fn id_fields(&self) -> &[String] {
        &self.id_fields
    }

    /// Non-key field names in declaration order. Empty means every field
    /// is part of the primary key.
    #[must_use]
    pub fn reject_id_fields(&self) -> &[String] {
        &self.reject_id_fields
    }

    /// Whether the entity has a primary key at all.
    #[must_use]
    pub fn has_primary_key(&self) -> bool {
        !self.id_fields.is_empty()
    }
}

/// Builder for [`EntityMeta`]; validates the field partition on `build`.
#[derive(Debug)]
pub struct EntityMetaBuilder {
    table: String,
    fields: Vec<FieldMeta>,
    keys: Option<Vec<String>>,
}

impl EntityMetaBuilder {
    /// Declares a field. Declaration order is preserved in generated SQL.
    #[must_use]
    pub fn field(mut self, meta: FieldMeta) -> Self {
        self.fields.push(meta);
        self
    }

    /// Declares the primary-key fields explicitly, in key order.
    ///
    /// Without this call the key is derived from fields marked with
    /// [`FieldMeta::primary_key`], in declaration order.
    #[must_use]
    pub fn primary_key<S: Into<String>, I: IntoIterator<Item = S>>(mut self, fields: I) -> Self {
        self.keys = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Validates and freezes the metadata.
    ///
    /// # Errors
    ///
    /// Returns [`MetaError`] when the entity has no fields, a field is
    /// declared twice, or the primary-key list names unknown or repeated
    /// fields.
    pub fn build(self) -> Result<EntityMeta> {
        if self.fields.is_empty() {
            return Err(MetaError::NoFields(self.table));
        }
        let mut field_map: HashMap<String, FieldMeta> = HashMap::with_capacity(self.fields.len());
        let mut fields = Vec::with_capacity(self.fields.len());
        for meta in self.fields {
            if field_map.contains_key(meta.field()) {
                return Err(MetaError::DuplicateField {
                    entity: self.table,
                    field: meta.field().to_owned(),
                });
            }
            fields.push(meta.field().to_owned());
            field_map.insert(meta.field().to_owned(), meta);
        }

        let id_fields = match self.keys {
            Some(keys) => {
                let mut seen = Vec::with_capacity(keys.len());
                for key in keys {
                    let Some(meta) = field_map.get_mut(&key) else {
                        return Err(MetaError::UnknownKeyField {
                            entity: self.table,
                            field: key,
                        });
                    };
                    if seen.contains(&key) {
                        return Err(MetaError::DuplicateKeyField {
                            entity: self.table,
                            field: key,
                        });
                    }
                    meta.primary_key = true;
                    seen.push(key);
                }
                seen
            }
            None => fields
                .iter()
                .filter(|f| field_map[*f].is_primary_key())
                .cloned()
                .collect(),
        };

        let reject_id_fields = fields
            .iter()
            .filter(|f| !field_map[*f].is_primary_key())
            .cloned()
            .collect();

        Ok(EntityMeta {
            table: self.table,
            fields,
            field_map,
            id_fields,
            reject_id_fields,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn order_meta() -> EntityMeta {
        EntityMeta::builder("orders")
            .field(FieldMeta::new("id", "id", SqlType::BigInt).primary_key())
            .field(FieldMeta::new("name", "name", SqlType::Varchar).length(100))
            .field(FieldMeta::new("created_at", "created_at", SqlType::Timestamp))
            .build()
            .unwrap()
    }

    #[test]
    fn test_field_order_is_stable() {
        let meta = order_meta();
        assert_eq!(meta.fields(), &["id", "name", "created_at"]);
        assert_eq!(meta.id_fields(), &["id"]);
        assert_eq!(meta.reject_id_fields(), &["name", "created_at"]);
    }

    #[test]
    fn test_explicit_primary_key_order() {
        let meta = EntityMeta::builder("user_roles")
            .field(FieldMeta::new("user_id", "user_id", SqlType::BigInt))
            .field(FieldMeta::new("role_id", "role_id", SqlType::BigInt))
            .primary_key(["role_id", "user_id"])
            .build()
            .unwrap();
        assert_eq!(meta.id_fields(), &["role_id", "user_id"]);
        assert!(meta.reject_id_fields().is_empty());
        assert!(meta.field_meta("user_id").is_primary_key());
    }

    #[test]
    fn test_keyless_entity() {
        let meta = EntityMeta::builder("audit_log")
            .field(FieldMeta::new("message", "message", SqlType::Varchar))
            .build()
            .unwrap();
        assert!(!meta.has_primary_key());
        assert_eq!(meta.reject_id_fields(), &["message"]);
    }

    #[test]
    fn test_find_field_tolerates_unknown_names() {
        let meta = order_meta();
        assert_eq!(meta.find_field("name").map(FieldMeta::column), Some("name"));
        assert!(meta.find_field("no_such_field").is_none());
    }

    #[test]
    fn test_schema_table_override() {
        let meta = order_meta();
        assert_eq!(meta.schema_table(None), "orders");
        assert_eq!(meta.schema_table(Some("archive.orders")), "archive.orders");
        assert_eq!(meta.schema_table(Some("  ")), "orders");
    }

    #[test]
    fn test_duplicate_field_rejected() {
        let err = EntityMeta::builder("t")
            .field(FieldMeta::new("a", "a", SqlType::Integer))
            .field(FieldMeta::new("a", "a2", SqlType::Integer))
            .build()
            .unwrap_err();
        assert!(matches!(err, MetaError::DuplicateField { .. }));
    }

    #[test]
    fn test_unknown_key_field_rejected() {
        let err = EntityMeta::builder("t")
            .field(FieldMeta::new("a", "a", SqlType::Integer))
            .primary_key(["missing"])
            .build()
            .unwrap_err();
        assert!(matches!(err, MetaError::UnknownKeyField { .. }));
    }

    #[test]
    fn test_empty_entity_rejected() {
        let err = EntityMeta::builder("t").build().unwrap_err();
        assert!(matches!(err, MetaError::NoFields(_)));
    }
}
