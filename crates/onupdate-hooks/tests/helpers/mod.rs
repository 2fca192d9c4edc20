//! Shared fixtures for the on-update integration tests.

#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use onupdate_core::{AppError, AppResult};
use onupdate_hooks::{
    ChangeSet, FieldName, Hook, HookDispatcher, MemoryStore, Model, ModelRegistry,
    OnUpdateOptions,
};

/// A model with three columns and a few hook methods.
#[derive(Debug, Clone, Default)]
pub struct Item {
    pub name: String,
    pub slug: String,
    pub password: String,
    /// `(method, changed columns)` for every method hook that ran.
    pub calls: Vec<(String, Vec<String>)>,
    changes: ChangeSet,
}

impl Item {
    pub fn new(name: &str, slug: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            slug: slug.to_string(),
            password: password.to_string(),
            ..Self::default()
        }
    }

    pub fn set_name(&mut self, value: &str) {
        self.changes.assign("name", &mut self.name, value.to_string());
    }

    pub fn set_slug(&mut self, value: &str) {
        self.changes.assign("slug", &mut self.slug, value.to_string());
    }

    pub fn set_password(&mut self, value: &str) {
        self.changes
            .assign("password", &mut self.password, value.to_string());
    }

    pub fn called(&self) -> Vec<&str> {
        self.calls.iter().map(|(method, _)| method.as_str()).collect()
    }
}

impl Model for Item {
    fn model_name() -> &'static str {
        "item"
    }

    fn changed_columns(&self) -> Vec<FieldName> {
        self.changes.columns().to_vec()
    }

    fn clear_changed_columns(&mut self) {
        self.changes.clear();
    }

    fn call_method(&mut self, method: &str, changed: &[FieldName]) -> Option<AppResult<()>> {
        let changed: Vec<String> = changed.iter().map(ToString::to_string).collect();
        match method {
            "test" | "blerg" | "oven" => {
                self.calls.push((method.to_string(), changed));
                Some(Ok(()))
            }
            "explode" => {
                self.calls.push((method.to_string(), changed));
                Some(Err(AppError::internal("hook exploded")))
            }
            _ => None,
        }
    }
}

/// An item subtype defined after `Item`.
#[derive(Debug, Clone, Default)]
pub struct SpecialItem {
    pub item: Item,
}

impl Model for SpecialItem {
    fn model_name() -> &'static str {
        "special_item"
    }

    fn changed_columns(&self) -> Vec<FieldName> {
        self.item.changed_columns()
    }

    fn clear_changed_columns(&mut self) {
        self.item.clear_changed_columns();
    }

    fn call_method(&mut self, method: &str, changed: &[FieldName]) -> Option<AppResult<()>> {
        self.item.call_method(method, changed)
    }
}

/// Builds options for a method hook.
pub fn on(fields: &[&str], hook: &str) -> OnUpdateOptions {
    OnUpdateOptions::new()
        .fields(fields.iter().copied())
        .hook(Hook::method(hook))
}

/// Builds a store for `Item` from a list of declarations.
pub fn item_store(declarations: &[(&[&str], &str)]) -> MemoryStore<Item> {
    let mut registry = ModelRegistry::new();
    for (fields, hook) in declarations {
        registry.configure::<Item>(on(fields, hook)).unwrap();
    }
    MemoryStore::new(HookDispatcher::new(Arc::new(registry)))
}

/// Inserts the standard fixture row.
pub fn create_item(store: &mut MemoryStore<Item>) -> (u64, Item) {
    let mut item = Item::new("roxio", "burner", "foo");
    let id = store.insert(&mut item);
    (id, item)
}

/// A callable hook that records the changed columns it receives.
pub fn recording_hook() -> (Hook, Arc<Mutex<Vec<Vec<String>>>>) {
    let seen = Arc::new(Mutex::new(Vec::new()));
    let sink = Arc::clone(&seen);
    let hook = Hook::callable(move |changed: &[FieldName]| {
        sink.lock()
            .unwrap()
            .push(changed.iter().map(ToString::to_string).collect());
        Ok(())
    });
    (hook, seen)
}
