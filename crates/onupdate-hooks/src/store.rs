//! In-memory persistence engine wired to the on-update lifecycle.
//!
//! Only `update` runs the hook points; inserts and deletes never fire hooks.

use std::collections::BTreeMap;

use tracing::debug;

use onupdate_core::{AppError, AppResult};

use crate::hooks::dispatcher::{Dispatched, HookDispatcher};
use crate::model::Model;

/// Row storage for one model type.
#[derive(Debug)]
pub struct MemoryStore<M> {
    /// Hook dispatcher for update lifecycle points.
    dispatcher: HookDispatcher,
    /// Row id → committed row.
    rows: BTreeMap<u64, M>,
    /// Next row id to hand out.
    next_id: u64,
}

impl<M: Model + Clone> MemoryStore<M> {
    /// Creates an empty store.
    pub fn new(dispatcher: HookDispatcher) -> Self {
        Self {
            dispatcher,
            rows: BTreeMap::new(),
            next_id: 1,
        }
    }

    /// Inserts a new row and returns its id.
    pub fn insert(&mut self, record: &mut M) -> u64 {
        let id = self.next_id;
        self.next_id += 1;

        record.clear_changed_columns();
        self.rows.insert(id, record.clone());

        debug!(model = %M::model_name(), id = id, "Row inserted");
        id
    }

    /// Saves changes to an existing row, then fires its on-update hooks.
    ///
    /// A hook error is returned to the caller, but the row stays updated.
    pub fn update(&mut self, id: u64, record: &mut M) -> AppResult<Dispatched> {
        if !self.rows.contains_key(&id) {
            return Err(AppError::not_found(format!(
                "{} row {} not found",
                M::model_name(),
                id
            )));
        }

        let pending = self.dispatcher.before_update(record);

        record.clear_changed_columns();
        self.rows.insert(id, record.clone());
        debug!(model = %M::model_name(), id = id, "Row updated");

        self.dispatcher.after_update(record, pending)
    }

    /// Returns the committed row.
    pub fn get(&self, id: u64) -> Option<&M> {
        self.rows.get(&id)
    }

    /// Removes a row.
    pub fn delete(&mut self, id: u64) -> AppResult<M> {
        let row = self.rows.remove(&id).ok_or_else(|| {
            AppError::not_found(format!("{} row {} not found", M::model_name(), id))
        })?;

        debug!(model = %M::model_name(), id = id, "Row deleted");
        Ok(row)
    }

    /// Number of rows.
    pub fn len(&self) -> usize {
        self.rows.len()
    }

    /// Returns whether the store is empty.
    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
