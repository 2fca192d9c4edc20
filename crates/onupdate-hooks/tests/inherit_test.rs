//! Integration tests for registrations on derived models.

mod helpers;

use std::sync::Arc;

use onupdate_core::ErrorKind;
use onupdate_hooks::{HookDispatcher, MemoryStore, ModelRegistry, OnUpdateOptions, PendingUpdate};

use helpers::{Item, SpecialItem, on};

fn tracked(registry: &ModelRegistry) -> (Vec<String>, Vec<String>) {
    let names = |fields: &[onupdate_hooks::FieldName]| {
        fields.iter().map(ToString::to_string).collect::<Vec<_>>()
    };
    (
        names(registry.registration::<Item>().unwrap().tracked_fields()),
        names(registry.registration::<SpecialItem>().unwrap().tracked_fields()),
    )
}

#[test]
fn test_child_keeps_fields_when_parent_grows() {
    let mut registry = ModelRegistry::new();
    registry.configure::<Item>(on(&["name"], "test")).unwrap();
    assert!(registry.inherit::<SpecialItem, Item>());

    registry.configure::<Item>(on(&["slug"], "oven")).unwrap();

    let (parent, child) = tracked(&registry);
    assert_eq!(parent, ["name", "slug"]);
    assert_eq!(child, ["name"]);
}

#[test]
fn test_child_additions_do_not_leak_to_parent() {
    let mut registry = ModelRegistry::new();
    registry.configure::<Item>(on(&["name"], "test")).unwrap();
    registry.inherit::<SpecialItem, Item>();

    registry
        .configure::<SpecialItem>(on(&["password", "name"], "blerg"))
        .unwrap();

    let (parent, child) = tracked(&registry);
    assert_eq!(parent, ["name"]);
    assert_eq!(child, ["name", "password"]);

    let parent_hook = registry.registration::<Item>().unwrap().hook_for("name");
    let child_hook = registry.registration::<SpecialItem>().unwrap().hook_for("name");
    assert_eq!(parent_hook.and_then(|h| h.method_name()), Some("test"));
    assert_eq!(child_hook.and_then(|h| h.method_name()), Some("blerg"));
}

#[test]
fn test_child_dispatches_inherited_hooks() {
    let mut registry = ModelRegistry::new();
    registry
        .configure::<Item>(on(&["name", "slug"], "test"))
        .unwrap();
    registry.inherit::<SpecialItem, Item>();

    let mut store = MemoryStore::new(HookDispatcher::new(Arc::new(registry)));
    let mut special = SpecialItem::default();
    let id = store.insert(&mut special);

    special.item.set_slug("burn");
    let dispatched = store.update(id, &mut special).unwrap();

    assert_eq!(dispatched.fired_names(), ["test"]);
    assert_eq!(special.item.called(), ["test"]);
}

#[test]
fn test_invalid_declarations_fail_fast() {
    let mut registry = ModelRegistry::new();

    let err = registry
        .configure::<Item>(OnUpdateOptions::new().hook(onupdate_hooks::Hook::method("test")))
        .unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
    assert_eq!(err.message, ":fields must be a non-empty array");

    let err = registry.configure::<Item>(on(&["name"], "xy z")).unwrap_err();
    assert_eq!(err.kind, ErrorKind::InvalidConfiguration);
    assert_eq!(err.message, ":hook must be a method name or callable");

    assert!(!registry.is_registered::<Item>());
}

#[test]
fn test_recapture_takes_latest_changes() {
    let mut registry = ModelRegistry::new();
    registry.configure::<Item>(on(&["name"], "test")).unwrap();
    registry.configure::<Item>(on(&["password"], "blerg")).unwrap();
    let dispatcher = HookDispatcher::new(Arc::new(registry));

    let mut item = Item::new("roxio", "burner", "foo");
    item.set_name("burner");
    let mut pending = dispatcher.before_update(&item);
    item.set_password("bar");
    pending.recapture(&item);

    assert_eq!(pending.changed_columns(), ["name", "password"]);
    let dispatched = dispatcher.after_update(&mut item, pending).unwrap();
    assert_eq!(dispatched.fired_names(), ["test", "blerg"]);

    let empty = PendingUpdate::capture(&Item::default());
    assert!(dispatcher.resolve::<Item>(&empty).is_empty());
}
