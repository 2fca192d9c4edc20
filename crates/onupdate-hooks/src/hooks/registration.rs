//! Per-model registration store: tracked fields and the hook bound to each.
//!
//! A registration only grows. Every declaration is merged into it:
//! - new fields are appended after the ones already tracked,
//! - a field that is already tracked keeps its position,
//! - the hook of the latest declaration wins for every field it names.

use std::collections::HashMap;

use onupdate_core::AppResult;

use super::definitions::{FieldName, Hook, OnUpdateOptions, normalize_fields};

/// Tracked fields and their hooks for one model type.
///
/// Every tracked field has exactly one hook entry, and the tracked list never
/// holds duplicates or null identifiers.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Registration {
    /// Fields in the order they were first declared.
    tracked_fields: Vec<FieldName>,
    /// Field → hook.
    field_hooks: HashMap<FieldName, Hook>,
}

impl Registration {
    /// Creates an empty registration.
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds the registration described by a single declaration.
    pub fn from_options(options: OnUpdateOptions) -> AppResult<Self> {
        let (fields, hook) = options.normalize()?;
        let field_hooks = fields
            .iter()
            .map(|field| (field.clone(), hook.clone()))
            .collect();

        Ok(Self {
            tracked_fields: fields,
            field_hooks,
        })
    }

    /// Validates a declaration and merges it into this registration.
    ///
    /// Nothing is merged when the declaration is invalid.
    pub fn configure(&mut self, options: OnUpdateOptions) -> AppResult<()> {
        let declaration = Self::from_options(options)?;
        self.merge(declaration);
        Ok(())
    }

    /// Merges another registration into this one.
    pub fn merge(&mut self, other: Registration) {
        self.tracked_fields.extend(other.tracked_fields);
        normalize_fields(&mut self.tracked_fields);
        self.field_hooks.extend(other.field_hooks);
    }

    /// Tracked fields in declaration order.
    pub fn tracked_fields(&self) -> &[FieldName] {
        &self.tracked_fields
    }

    /// Returns the hook bound to a field.
    pub fn hook_for(&self, field: &str) -> Option<&Hook> {
        self.field_hooks.get(field)
    }

    /// Iterates `(field, hook)` pairs in declaration order.
    pub fn entries(&self) -> impl Iterator<Item = (&FieldName, &Hook)> {
        self.tracked_fields
            .iter()
            .filter_map(|field| self.field_hooks.get(field).map(|hook| (field, hook)))
    }

    /// Returns whether the field is tracked.
    pub fn tracks(&self, field: &str) -> bool {
        self.field_hooks.contains_key(field)
    }

    /// Number of tracked fields.
    pub fn len(&self) -> usize {
        self.tracked_fields.len()
    }

    /// Returns whether nothing is tracked.
    pub fn is_empty(&self) -> bool {
        self.tracked_fields.is_empty()
    }
}
