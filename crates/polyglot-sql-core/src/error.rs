//! Error types for entity metadata construction.

use thiserror::Error;

/// Errors raised while assembling entity metadata.
///
/// SQL generation itself is infallible; malformed metadata is rejected
/// up front so every builder can assume a consistent field partition.
#[derive(Debug, Error)]
pub enum MetaError {
    /// The entity declares no fields at all.
    #[error("entity '{0}' has no fields")]
    NoFields(String),

    /// The same field name was declared twice.
    #[error("duplicate field '{field}' on entity '{entity}'")]
    DuplicateField {
        /// Entity (table) name.
        entity: String,
        /// The offending field name.
        field: String,
    },

    /// A primary-key field does not exist among the declared fields.
    #[error("primary key field '{field}' is not declared on entity '{entity}'")]
    UnknownKeyField {
        /// Entity (table) name.
        entity: String,
        /// The missing field name.
        field: String,
    },

    /// The same field was named twice in the primary-key list.
    #[error("primary key field '{field}' listed more than once on entity '{entity}'")]
    DuplicateKeyField {
        /// Entity (table) name.
        entity: String,
        /// The repeated field name.
        field: String,
    },
}

/// Result type alias for metadata operations.
pub type Result<T> = std::result::Result<T, MetaError>;
