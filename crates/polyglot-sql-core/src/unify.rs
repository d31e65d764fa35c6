//! Audit ("unify") field configuration.
//!
//! Unify fields are columns populated automatically rather than by
//! caller-supplied values: creator, creation time, last-modified time and
//! the like. Lookups are case-insensitive because entity field names and
//! externally configured audit names rarely agree on casing.

use std::collections::{HashMap, HashSet};

/// Immutable audit-field configuration supplied per generation call.
///
/// Three independent pieces:
/// - fields whose value on *create* should come from the database clock,
/// - fields whose value on *update* should come from the database clock,
/// - literal audit defaults (creator, tenant, a fixed timestamp literal)
///   substituted in the insert branch of merge statements when the bound
///   value is NULL.
#[derive(Debug, Clone, Default)]
pub struct UnifyFields {
    create_time_fields: HashSet<String>,
    update_time_fields: HashSet<String>,
    create_defaults: HashMap<String, String>,
}

impl UnifyFields {
    /// Creates an empty configuration (no audit handling).
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds a field whose create-time value is the database's current time.
    #[must_use]
    pub fn create_time_field(mut self, field: impl AsRef<str>) -> Self {
        self.create_time_fields
            .insert(field.as_ref().to_lowercase());
        self
    }

    /// Adds a field whose update-time value is the database's current time.
    #[must_use]
    pub fn update_time_field(mut self, field: impl AsRef<str>) -> Self {
        self.update_time_fields
            .insert(field.as_ref().to_lowercase());
        self
    }

    /// Adds a literal audit default for a field (e.g. creator name).
    #[must_use]
    pub fn create_default(mut self, field: impl AsRef<str>, value: impl Into<String>) -> Self {
        self.create_defaults
            .insert(field.as_ref().to_lowercase(), value.into());
        self
    }

    /// Whether the field takes the database clock on create.
    #[must_use]
    pub fn is_create_time_field(&self, field: &str) -> bool {
        self.create_time_fields.contains(&field.to_lowercase())
    }

    /// Whether the field takes the database clock on update.
    #[must_use]
    pub fn is_update_time_field(&self, field: &str) -> bool {
        self.update_time_fields.contains(&field.to_lowercase())
    }

    /// The literal audit default configured for a field, if any.
    #[must_use]
    pub fn create_default_for(&self, field: &str) -> Option<&str> {
        self.create_defaults
            .get(&field.to_lowercase())
            .map(String::as_str)
    }

    /// Whether any literal audit defaults are configured.
    #[must_use]
    pub fn has_create_defaults(&self) -> bool {
        !self.create_defaults.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_lookups_are_case_insensitive() {
        let unify = UnifyFields::new()
            .create_time_field("CREATED_AT")
            .update_time_field("updated_at")
            .create_default("CreatedBy", "system");

        assert!(unify.is_create_time_field("created_at"));
        assert!(unify.is_update_time_field("UPDATED_AT"));
        assert_eq!(unify.create_default_for("createdby"), Some("system"));
        assert_eq!(unify.create_default_for("other"), None);
    }

    #[test]
    fn test_empty_configuration() {
        let unify = UnifyFields::new();
        assert!(!unify.is_create_time_field("created_at"));
        assert!(!unify.has_create_defaults());
    }
}
