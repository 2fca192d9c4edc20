//! Model registry — one registration per model type.
//!
//! Registrations are created on the first declaration for a type and merged
//! on every later one. A derived model receives a copy of its parent's
//! registration when it is defined; after that the two evolve separately.
//!
//! The registry is mutated through `&mut self` during startup and shared
//! read-only (usually behind an `Arc`) once updates start.

use std::any::TypeId;
use std::collections::HashMap;

use tracing::{debug, info};

use onupdate_core::AppResult;
use onupdate_core::config::AppConfig;

use crate::hooks::definitions::OnUpdateOptions;
use crate::hooks::registration::Registration;
use crate::model::Model;

/// Entry in the model registry.
#[derive(Debug, Clone)]
struct ModelEntry {
    /// Model name, for logging.
    name: &'static str,
    /// Tracked fields and hooks.
    registration: Registration,
}

/// Registry of on-update registrations keyed by model type.
#[derive(Debug, Default)]
pub struct ModelRegistry {
    /// Model type → registration.
    models: HashMap<TypeId, ModelEntry>,
}

impl ModelRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Declares an on-update hook for `M`.
    ///
    /// Fails with an invalid-configuration error when the options are
    /// malformed; the registry is left untouched in that case.
    pub fn configure<M: Model>(&mut self, options: OnUpdateOptions) -> AppResult<()> {
        let declaration = Registration::from_options(options)?;
        let field_count = declaration.len();

        let entry = self
            .models
            .entry(TypeId::of::<M>())
            .or_insert_with(|| ModelEntry {
                name: M::model_name(),
                registration: Registration::new(),
            });
        entry.registration.merge(declaration);

        info!(
            model = %entry.name,
            declared_fields = field_count,
            tracked_fields = entry.registration.len(),
            "On-update hook registered"
        );

        Ok(())
    }

    /// Applies every declaration listed for `model` in the configuration.
    ///
    /// Declarations are applied in file order and the first invalid one stops
    /// the process. Returns the number of declarations applied.
    pub fn configure_from_config<M: Model>(
        &mut self,
        model: &str,
        config: &AppConfig,
    ) -> AppResult<usize> {
        let Some(hooks) = config.model_hooks(model) else {
            debug!(model = %model, "No configured on-update hooks");
            return Ok(0);
        };

        for raw in &hooks.on_update {
            self.configure::<M>(OnUpdateOptions::try_from(raw)?)?;
        }

        Ok(hooks.on_update.len())
    }

    /// Copies the current registration of `Parent` into `Child`.
    ///
    /// Call this when the derived model is defined. Returns `false` when the
    /// parent has nothing registered.
    pub fn inherit<Child: Model, Parent: Model>(&mut self) -> bool {
        let Some(parent) = self.models.get(&TypeId::of::<Parent>()) else {
            debug!(
                child = %Child::model_name(),
                parent = %Parent::model_name(),
                "Parent has no on-update hooks to inherit"
            );
            return false;
        };

        let registration = parent.registration.clone();
        let tracked_fields = registration.len();
        self.models.insert(
            TypeId::of::<Child>(),
            ModelEntry {
                name: Child::model_name(),
                registration,
            },
        );

        info!(
            child = %Child::model_name(),
            parent = %Parent::model_name(),
            tracked_fields = tracked_fields,
            "On-update hooks inherited"
        );

        true
    }

    /// Returns the registration for `M`.
    pub fn registration<M: Model>(&self) -> Option<&Registration> {
        self.models
            .get(&TypeId::of::<M>())
            .map(|entry| &entry.registration)
    }

    /// Returns whether `M` has declared any on-update hook.
    pub fn is_registered<M: Model>(&self) -> bool {
        self.models.contains_key(&TypeId::of::<M>())
    }

    /// Names of all registered models, sorted.
    pub fn model_names(&self) -> Vec<&'static str> {
        let mut names: Vec<&'static str> = self.models.values().map(|e| e.name).collect();
        names.sort_unstable();
        names
    }

    /// Number of registered models.
    pub fn len(&self) -> usize {
        self.models.len()
    }

    /// Returns whether no model is registered.
    pub fn is_empty(&self) -> bool {
        self.models.is_empty()
    }
}
