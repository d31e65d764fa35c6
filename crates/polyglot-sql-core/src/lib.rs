//! # polyglot-sql-core
//!
//! Dialect-aware SQL generation for single-row persistence and upsert
//! operations.
//!
//! Given an entity's structural metadata (columns, primary-key strategy,
//! reserved words, default-value rules), this crate produces
//! syntactically correct, dialect-specific SQL for INSERT,
//! MERGE-based save-or-update, MERGE-based insert-only, and
//! ON-CONFLICT-based insert-only statements. Upsert semantics differ
//! fundamentally across engines — true `MERGE INTO`, `ON CONFLICT`, or
//! nothing at all — and key-generation strategies and default-value
//! substitution interact with each of them differently; the dialect
//! implementations own exactly those differences.
//!
//! Everything here is pure string assembly over immutable inputs: no
//! I/O, no shared mutable state, safe for unlimited concurrent use. The
//! output uses positional `?` placeholders in the exact order the
//! execution layer must bind values.
//!
//! ## Example
//!
//! ```rust
//! use polyglot_sql_core::{
//!     DialectKind, EntityMeta, FieldMeta, PkStrategy, SaveSqlOptions, SqlType, UnifyFields,
//! };
//!
//! let meta = EntityMeta::builder("orders")
//!     .field(FieldMeta::new("id", "id", SqlType::BigInt).primary_key())
//!     .field(FieldMeta::new("name", "name", SqlType::Varchar).length(100))
//!     .field(FieldMeta::new("created_at", "created_at", SqlType::Timestamp))
//!     .build()
//!     .unwrap();
//!
//! let unify = UnifyFields::new().create_time_field("created_at");
//! let opts = SaveSqlOptions::new(PkStrategy::Sequence).sequence("seq_orders.nextval");
//!
//! let dialect = DialectKind::Oracle.dialect();
//! let sql = dialect.save_or_update(&meta, &unify, &opts);
//! assert!(sql.starts_with("MERGE INTO orders ta USING (SELECT"));
//! ```
//!
//! The execution layer (parameter binding, JDBC-style result mapping,
//! pooling) and DDL generation are deliberately out of scope.

pub mod defaults;
pub mod dialect;
pub mod error;
pub mod meta;
pub mod reserved;
pub mod unify;

pub use dialect::{
    Db2Dialect, DialectKind, ImpalaDialect, OracleDialect, PostgresDialect, SaveSqlOptions,
    SqlDialect,
};
pub use error::{MetaError, Result};
pub use meta::{EntityMeta, FieldMeta, PkStrategy, SqlType, TemporalKind};
pub use reserved::ReservedWords;
pub use unify::UnifyFields;
