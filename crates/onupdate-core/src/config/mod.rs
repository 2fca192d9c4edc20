//! Application configuration schemas.
//!
//! All configuration structs are deserialized from TOML files via the
//! `config` crate. Each sub-module represents a logical configuration
//! section.

pub mod hooks;
pub mod logging;

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};
use tracing::debug;

use self::hooks::ModelHooksConfig;
use self::logging::LoggingConfig;

use crate::error::AppError;

/// Root application configuration.
///
/// This struct is the top-level deserialization target for the merged
/// TOML configuration files (default.toml + environment overlay).
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct AppConfig {
    /// Logging settings.
    #[serde(default)]
    pub logging: LoggingConfig,
    /// Model name → declarative hook configuration.
    #[serde(default)]
    pub models: BTreeMap<String, ModelHooksConfig>,
}

impl AppConfig {
    /// Load configuration from TOML files.
    ///
    /// Merges the default configuration with an environment-specific overlay
    /// and environment variables prefixed with `ONUPDATE__`.
    pub fn load(env: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::with_name("config/default").required(false))
            .add_source(config::File::with_name(&format!("config/{env}")).required(false))
            .add_source(
                config::Environment::with_prefix("ONUPDATE")
                    .separator("__")
                    .try_parsing(true),
            )
            .build()
            .map_err(|e| AppError::configuration(format!("Failed to build config: {e}")))?;

        debug!(env = %env, "Loaded configuration sources");

        config
            .try_deserialize()
            .map_err(|e| AppError::configuration(format!("Failed to deserialize config: {e}")))
    }

    /// Parse configuration from an in-memory TOML document.
    pub fn from_toml_str(source: &str) -> Result<Self, AppError> {
        let config = config::Config::builder()
            .add_source(config::File::from_str(source, config::FileFormat::Toml))
            .build()?;

        Ok(config.try_deserialize()?)
    }

    /// Returns the hook declarations for a model, if any.
    pub fn model_hooks(&self, model: &str) -> Option<&ModelHooksConfig> {
        self.models.get(model)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults_when_empty() {
        let config = AppConfig::from_toml_str("").unwrap();
        assert_eq!(config.logging.level, "info");
        assert_eq!(config.logging.format, "pretty");
        assert!(config.models.is_empty());
    }

    #[test]
    fn test_model_hooks_in_file_order() {
        let config = AppConfig::from_toml_str(
            r#"
            [logging]
            level = "debug"

            [[models.user.on_update]]
            fields = ["email", "password"]
            hook = "send_security_notice"

            [[models.user.on_update]]
            fields = ["name"]
            hook = "refresh_slug"
            "#,
        )
        .unwrap();

        assert_eq!(config.logging.level, "debug");
        let user = config.model_hooks("user").unwrap();
        assert_eq!(user.on_update.len(), 2);
        assert_eq!(
            user.on_update[0].fields,
            Some(serde_json::json!(["email", "password"]))
        );
        assert_eq!(user.on_update[1].hook, Some(serde_json::json!("refresh_slug")));
        assert!(config.model_hooks("post").is_none());
    }

    #[test]
    fn test_load_applies_env_overrides() {
        // SAFETY: no other test in this crate reads `ONUPDATE__*` variables.
        unsafe {
            std::env::set_var("ONUPDATE__LOGGING__LEVEL", "trace");
            std::env::set_var("ONUPDATE__LOGGING__FORMAT", "json");
        }

        let config = AppConfig::load("layered-load-test");

        unsafe {
            std::env::remove_var("ONUPDATE__LOGGING__LEVEL");
            std::env::remove_var("ONUPDATE__LOGGING__FORMAT");
        }

        let config = config.unwrap();
        assert_eq!(config.logging.level, "trace");
        assert_eq!(config.logging.format, "json");
        assert!(config.logging.with_target);
        assert!(config.models.is_empty());
    }

    #[test]
    fn test_missing_keys_are_none() {
        let config = AppConfig::from_toml_str(
            r#"
            [[models.user.on_update]]
            hook = "notify"
            "#,
        )
        .unwrap();

        let declaration = &config.model_hooks("user").unwrap().on_update[0];
        assert!(declaration.fields.is_none());
        assert_eq!(declaration.hook, Some(serde_json::json!("notify")));
    }
}
