//! Hook dispatcher — runs on-update hooks around a persisted update.
//!
//! An update goes through two steps:
//! - `before_update` captures the changed columns while they are still known,
//!   yielding a [`PendingUpdate`].
//! - `after_update` consumes that snapshot once the update is committed,
//!   resolves which hooks fire, and invokes them in order.
//!
//! Hooks fire in the order their fields were registered, not the order the
//! fields were changed. Each distinct hook fires once per update and receives
//! every changed column. The first failing hook aborts the rest of the
//! dispatch and its error is returned as-is; the committed update is not
//! rolled back.

use std::sync::Arc;

use tracing::{debug, warn};

use onupdate_core::{AppError, AppResult};

use super::definitions::{FieldName, Hook};
use super::registration::Registration;
use crate::model::Model;
use crate::registry::ModelRegistry;

/// Resolves the hooks to fire for a set of changed columns.
///
/// Walks the tracked fields in registration order and keeps the first
/// occurrence of each hook whose field changed.
pub fn resolve_hooks(registration: &Registration, changed: &[FieldName]) -> Vec<Hook> {
    let mut hooks: Vec<Hook> = Vec::new();

    for (field, hook) in registration.entries() {
        if changed.contains(field) && !hooks.contains(hook) {
            hooks.push(hook.clone());
        }
    }

    hooks
}

/// Invokes hooks in order, stopping at the first error.
///
/// Callables receive the changed columns directly; method hooks are looked up
/// on the instance.
pub fn invoke_hooks<M: Model>(
    instance: &mut M,
    hooks: &[Hook],
    changed: &[FieldName],
) -> AppResult<()> {
    for hook in hooks {
        debug!(model = %M::model_name(), hook = %hook, "Invoking on-update hook");

        let result = match hook {
            Hook::Callable(func) => (**func)(changed),
            Hook::Method(name) => instance.call_method(name, changed).unwrap_or_else(|| {
                Err(AppError::hook_invocation(format!(
                    "undefined method `{}` for {}",
                    name,
                    M::model_name()
                )))
            }),
        };

        if let Err(e) = result {
            warn!(
                model = %M::model_name(),
                hook = %hook,
                error = %e,
                "On-update hook failed"
            );
            return Err(e);
        }
    }

    Ok(())
}

/// Changed columns captured before an update is applied.
///
/// Consumed by [`HookDispatcher::after_update`], so a snapshot is used at most
/// once.
#[derive(Debug, Clone, PartialEq, Eq)]
#[must_use = "a pending update must be passed to `after_update` once committed"]
pub struct PendingUpdate {
    changed: Vec<FieldName>,
}

impl PendingUpdate {
    /// Captures the changed columns of an instance.
    pub fn capture<M: Model>(instance: &M) -> Self {
        Self {
            changed: instance.changed_columns(),
        }
    }

    /// Replaces the snapshot with the instance's current changed columns.
    pub fn recapture<M: Model>(&mut self, instance: &M) {
        self.changed = instance.changed_columns();
    }

    /// The captured columns.
    pub fn changed_columns(&self) -> &[FieldName] {
        &self.changed
    }
}

/// Outcome of a completed dispatch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Dispatched {
    /// Hooks that were invoked, in order.
    pub fired: Vec<Hook>,
    /// Columns that changed in the update.
    pub changed: Vec<FieldName>,
}

impl Dispatched {
    /// Display names of the fired hooks.
    pub fn fired_names(&self) -> Vec<String> {
        self.fired.iter().map(ToString::to_string).collect()
    }
}

/// Dispatches on-update hooks using a shared model registry.
#[derive(Debug, Clone)]
pub struct HookDispatcher {
    /// Model registry.
    registry: Arc<ModelRegistry>,
}

impl HookDispatcher {
    /// Creates a new dispatcher.
    pub fn new(registry: Arc<ModelRegistry>) -> Self {
        Self { registry }
    }

    /// Pre-update point: captures the instance's changed columns.
    ///
    /// Runs for every update, whether or not a tracked field changed.
    pub fn before_update<M: Model>(&self, instance: &M) -> PendingUpdate {
        let pending = PendingUpdate::capture(instance);
        debug!(
            model = %M::model_name(),
            changed = pending.changed.len(),
            "Captured pending changes"
        );
        pending
    }

    /// Resolves the hooks that an update with `pending` changes would fire.
    pub fn resolve<M: Model>(&self, pending: &PendingUpdate) -> Vec<Hook> {
        self.registry
            .registration::<M>()
            .map(|registration| resolve_hooks(registration, &pending.changed))
            .unwrap_or_default()
    }

    /// Post-update point: fires the hooks for the captured changes.
    pub fn after_update<M: Model>(
        &self,
        instance: &mut M,
        pending: PendingUpdate,
    ) -> AppResult<Dispatched> {
        let hooks = self.resolve::<M>(&pending);

        if hooks.is_empty() {
            debug!(model = %M::model_name(), "No on-update hooks to fire");
        } else {
            debug!(
                model = %M::model_name(),
                hook_count = hooks.len(),
                "Dispatching on-update hooks"
            );
            invoke_hooks(instance, &hooks, &pending.changed)?;
        }

        Ok(Dispatched {
            fired: hooks,
            changed: pending.changed,
        })
    }

    /// Returns a reference to the model registry.
    pub fn registry(&self) -> &Arc<ModelRegistry> {
        &self.registry
    }
}
