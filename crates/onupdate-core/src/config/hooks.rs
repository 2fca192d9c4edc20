//! Declarative on-update hook configuration.
//!
//! Hooks can be declared per model in the configuration files:
//!
//! ```toml
//! [[models.user.on_update]]
//! fields = ["email", "password"]
//! hook = "send_security_notice"
//! ```
//!
//! Values are kept loosely typed here; the hook crate validates them with the
//! same rules it applies to declarations made in code.

use serde::{Deserialize, Serialize};

/// A single `on_update` declaration as it appears in a configuration source.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct RawHookOptions {
    /// Expected to be a non-empty array of field names.
    #[serde(default)]
    pub fields: Option<serde_json::Value>,
    /// Expected to be a method name.
    #[serde(default)]
    pub hook: Option<serde_json::Value>,
}

/// Hook declarations for one model.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct ModelHooksConfig {
    /// Declarations applied in file order.
    #[serde(default)]
    pub on_update: Vec<RawHookOptions>,
}
