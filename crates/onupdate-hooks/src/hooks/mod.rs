//! Hook system — declarations, per-model registrations, and the dispatcher.

pub mod definitions;
pub mod dispatcher;
pub mod registration;

pub use definitions::{FieldName, Hook, OnUpdateOptions};
pub use dispatcher::{Dispatched, HookDispatcher, PendingUpdate};
pub use registration::Registration;
