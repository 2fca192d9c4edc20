//! Capabilities the dispatcher needs from a model instance.

use onupdate_core::AppResult;

use crate::hooks::definitions::FieldName;

/// A persisted model type that can carry on-update hooks.
///
/// Implementors expose the columns changed since load and a method table for
/// named hooks.
pub trait Model: Sized + 'static {
    /// Name used in logs and error messages.
    fn model_name() -> &'static str {
        std::any::type_name::<Self>()
    }

    /// Columns whose values changed since the instance was loaded or saved.
    fn changed_columns(&self) -> Vec<FieldName>;

    /// Forgets all changes. Called by the engine once an update is committed.
    fn clear_changed_columns(&mut self);

    /// Calls the named method with the changed columns of the save.
    ///
    /// Returns `None` when the model has no method with that name.
    fn call_method(&mut self, method: &str, changed: &[FieldName]) -> Option<AppResult<()>> {
        let _ = (method, changed);
        None
    }
}

/// Ordered record of the columns changed on an instance.
///
/// Models embed one and route their setters through [`ChangeSet::assign`].
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ChangeSet {
    columns: Vec<FieldName>,
}

impl ChangeSet {
    /// Creates an empty change set.
    pub fn new() -> Self {
        Self::default()
    }

    /// Marks a column as changed. A column is listed once, at its first change.
    pub fn mark(&mut self, column: impl Into<FieldName>) {
        let column = column.into();
        if !self.columns.contains(&column) {
            self.columns.push(column);
        }
    }

    /// Writes `value` into `slot`, marking `column` when the value differs.
    ///
    /// Returns whether the column was marked.
    pub fn assign<T: PartialEq>(&mut self, column: &str, slot: &mut T, value: T) -> bool {
        if *slot == value {
            return false;
        }
        *slot = value;
        self.mark(column);
        true
    }

    /// Changed columns in the order they first changed.
    pub fn columns(&self) -> &[FieldName] {
        &self.columns
    }

    /// Returns whether the column changed.
    pub fn contains(&self, column: &str) -> bool {
        self.columns.iter().any(|c| c == column)
    }

    /// Returns whether nothing changed.
    pub fn is_empty(&self) -> bool {
        self.columns.is_empty()
    }

    /// Forgets all changes.
    pub fn clear(&mut self) {
        self.columns.clear();
    }
}
