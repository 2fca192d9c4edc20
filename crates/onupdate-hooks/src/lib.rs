//! # onupdate-hooks
//!
//! Field-scoped after-update hooks for persisted models. Provides:
//!
//! - Per-model registrations merged from repeated declarations
//! - Copy-on-inherit registrations for derived models
//! - A dispatcher that fires each distinct hook once per update, in
//!   registration order, with the list of changed columns
//! - An in-memory store that drives the update lifecycle

pub mod hooks;
pub mod model;
pub mod registry;
pub mod store;

pub use hooks::definitions::{FieldName, Hook, OnUpdateOptions};
pub use hooks::dispatcher::{Dispatched, HookDispatcher, PendingUpdate};
pub use hooks::registration::Registration;
pub use model::{ChangeSet, Model};
pub use registry::ModelRegistry;
pub use store::MemoryStore;
