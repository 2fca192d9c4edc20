//! OnUpdate demo — declares hooks on a `User` model and saves a few updates.
//!
//! Hooks come from the configuration files and from code, and every save
//! goes through the in-memory store so the update lifecycle runs end to end.

use std::sync::Arc;

use tracing_subscriber::{EnvFilter, fmt};

use onupdate_core::config::AppConfig;
use onupdate_core::error::AppError;
use onupdate_core::result::AppResult;
use onupdate_hooks::{
    ChangeSet, FieldName, Hook, HookDispatcher, MemoryStore, Model, ModelRegistry,
    OnUpdateOptions,
};

fn main() {
    let config = match load_configuration() {
        Ok(c) => c,
        Err(e) => {
            eprintln!("Failed to load configuration: {}", e);
            std::process::exit(1);
        }
    };

    init_logging(&config);

    if let Err(e) = run(&config) {
        tracing::error!("Demo error: {}", e);
        std::process::exit(1);
    }
}

/// Load configuration from file and environment
fn load_configuration() -> Result<AppConfig, AppError> {
    let env = std::env::var("ONUPDATE_ENV").unwrap_or_else(|_| "development".to_string());

    AppConfig::load(&env)
}

/// Initialize tracing/logging
fn init_logging(config: &AppConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.logging.level));

    match config.logging.format.as_str() {
        "json" => {
            fmt()
                .json()
                .with_env_filter(filter)
                .with_target(config.logging.with_target)
                .init();
        }
        _ => {
            fmt()
                .pretty()
                .with_env_filter(filter)
                .with_target(config.logging.with_target)
                .init();
        }
    }
}

/// A user account with change tracking.
#[derive(Debug, Clone, Default)]
struct User {
    name: String,
    email: String,
    password: String,
    slug: String,
    changes: ChangeSet,
}

impl User {
    fn new(name: &str, email: &str, password: &str) -> Self {
        Self {
            name: name.to_string(),
            email: email.to_string(),
            password: password.to_string(),
            slug: slugify(name),
            ..Self::default()
        }
    }

    fn set_name(&mut self, value: &str) {
        self.changes.assign("name", &mut self.name, value.to_string());
    }

    fn set_email(&mut self, value: &str) {
        self.changes.assign("email", &mut self.email, value.to_string());
    }

    fn set_password(&mut self, value: &str) {
        self.changes
            .assign("password", &mut self.password, value.to_string());
    }

    fn send_security_notice(&mut self, changed: &[FieldName]) -> AppResult<()> {
        tracing::info!(
            email = %self.email,
            changed = ?changed,
            "Security notice queued"
        );
        Ok(())
    }

    fn refresh_slug(&mut self, _changed: &[FieldName]) -> AppResult<()> {
        self.slug = slugify(&self.name);
        tracing::info!(slug = %self.slug, "Slug refreshed");
        Ok(())
    }
}

impl Model for User {
    fn model_name() -> &'static str {
        "user"
    }

    fn changed_columns(&self) -> Vec<FieldName> {
        self.changes.columns().to_vec()
    }

    fn clear_changed_columns(&mut self) {
        self.changes.clear();
    }

    fn call_method(&mut self, method: &str, changed: &[FieldName]) -> Option<AppResult<()>> {
        match method {
            "send_security_notice" => Some(self.send_security_notice(changed)),
            "refresh_slug" => Some(self.refresh_slug(changed)),
            _ => None,
        }
    }
}

fn slugify(name: &str) -> String {
    name.split_whitespace()
        .map(str::to_lowercase)
        .collect::<Vec<_>>()
        .join("-")
}

/// Registers hooks and runs a few saves.
fn run(config: &AppConfig) -> AppResult<()> {
    tracing::info!("Starting OnUpdate demo v{}", env!("CARGO_PKG_VERSION"));

    let mut registry = ModelRegistry::new();
    let declared = registry.configure_from_config::<User>(User::model_name(), config)?;
    tracing::info!(declarations = declared, "Configured hooks loaded");

    registry.configure::<User>(
        OnUpdateOptions::new()
            .fields(["email", "name"])
            .hook(Hook::callable(|changed: &[FieldName]| {
                tracing::info!(changed = ?changed, "Audit entry written");
                Ok(())
            })),
    )?;

    let mut users = MemoryStore::new(HookDispatcher::new(Arc::new(registry)));

    let mut user = User::new("Ada Lovelace", "ada@example.com", "engine");
    let id = users.insert(&mut user);

    user.set_password("analytical");
    user.set_email("ada@example.org");
    let dispatched = users.update(id, &mut user)?;
    tracing::info!(fired = ?dispatched.fired_names(), "Credentials updated");

    user.set_name("Ada King");
    let dispatched = users.update(id, &mut user)?;
    tracing::info!(fired = ?dispatched.fired_names(), slug = %user.slug, "Profile updated");

    let dispatched = users.update(id, &mut user)?;
    tracing::info!(fired = ?dispatched.fired_names(), "Saved without changes");

    Ok(())
}
