//! Field identifiers, hook references, and declaration options.

use std::borrow::Borrow;
use std::fmt;
use std::sync::Arc;

use serde::{Deserialize, Serialize};

use onupdate_core::AppError;
use onupdate_core::AppResult;
use onupdate_core::config::hooks::RawHookOptions;

/// Message for a missing, empty, or non-sequence `fields` option.
pub const FIELDS_REQUIRED: &str = ":fields must be a non-empty array";
/// Message for a `hook` option that is neither a method name nor callable.
pub const HOOK_INVALID: &str = ":hook must be a method name or callable";
/// Message for a missing `hook` option.
pub const HOOK_REQUIRED: &str = "you must provide a hook to call";

/// A column identifier on a model.
///
/// A blank identifier is treated as null: it is accepted on input but never
/// survives normalization into a registration.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct FieldName(String);

impl FieldName {
    /// Creates a field name.
    pub fn new(name: impl Into<String>) -> Self {
        Self(name.into())
    }

    /// Returns the identifier as a string slice.
    pub fn as_str(&self) -> &str {
        &self.0
    }

    /// Returns whether this is the null (blank) identifier.
    pub fn is_null(&self) -> bool {
        self.0.trim().is_empty()
    }
}

impl fmt::Display for FieldName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for FieldName {
    fn from(name: &str) -> Self {
        Self(name.to_string())
    }
}

impl From<String> for FieldName {
    fn from(name: String) -> Self {
        Self(name)
    }
}

impl Borrow<str> for FieldName {
    fn borrow(&self) -> &str {
        &self.0
    }
}

impl PartialEq<str> for FieldName {
    fn eq(&self, other: &str) -> bool {
        self.0 == other
    }
}

impl PartialEq<&str> for FieldName {
    fn eq(&self, other: &&str) -> bool {
        self.0 == *other
    }
}

/// Signature of a free-standing hook. Receives the changed columns of the save.
pub type HookFn = dyn Fn(&[FieldName]) -> AppResult<()> + Send + Sync;

/// A callback fired after an update that touched one of its fields.
#[derive(Clone)]
pub enum Hook {
    /// A method resolved against the model instance when the hook fires.
    Method(String),
    /// A closure invoked directly.
    Callable(Arc<HookFn>),
}

impl Hook {
    /// Creates a named-method hook.
    pub fn method(name: impl Into<String>) -> Self {
        Self::Method(name.into())
    }

    /// Creates a callable hook from a closure.
    pub fn callable<F>(f: F) -> Self
    where
        F: Fn(&[FieldName]) -> AppResult<()> + Send + Sync + 'static,
    {
        Self::Callable(Arc::new(f))
    }

    /// Returns the method name for named hooks.
    pub fn method_name(&self) -> Option<&str> {
        match self {
            Self::Method(name) => Some(name),
            Self::Callable(_) => None,
        }
    }

    /// Returns whether this hook can be dispatched at all.
    ///
    /// Callables always can; method hooks need an identifier-shaped name.
    pub fn is_dispatchable(&self) -> bool {
        match self {
            Self::Method(name) => is_method_name(name),
            Self::Callable(_) => true,
        }
    }
}

/// Method names look like identifiers, optionally ending in `?` or `!`.
fn is_method_name(name: &str) -> bool {
    let body = name.strip_suffix(['?', '!']).unwrap_or(name);
    let mut chars = body.chars();
    match chars.next() {
        Some(c) if c.is_ascii_alphabetic() || c == '_' => {}
        _ => return false,
    }
    chars.all(|c| c.is_ascii_alphanumeric() || c == '_')
}

impl PartialEq for Hook {
    fn eq(&self, other: &Self) -> bool {
        match (self, other) {
            (Self::Method(a), Self::Method(b)) => a == b,
            (Self::Callable(a), Self::Callable(b)) => {
                std::ptr::addr_eq(Arc::as_ptr(a), Arc::as_ptr(b))
            }
            _ => false,
        }
    }
}

impl Eq for Hook {}

impl fmt::Debug for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(name) => f.debug_tuple("Method").field(name).finish(),
            Self::Callable(func) => f
                .debug_tuple("Callable")
                .field(&Arc::as_ptr(func).cast::<()>())
                .finish(),
        }
    }
}

impl fmt::Display for Hook {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Method(name) => f.write_str(name),
            Self::Callable(_) => f.write_str("<callable>"),
        }
    }
}

/// Options for one `on_update` declaration.
///
/// Both options are required. They are consumed by the registry, so a
/// declaration cannot be changed after it has been applied.
#[derive(Debug, Clone, Default)]
pub struct OnUpdateOptions {
    /// Fields to track for the hook.
    pub fields: Option<Vec<FieldName>>,
    /// Hook fired when any of the fields changed.
    pub hook: Option<Hook>,
}

impl OnUpdateOptions {
    /// Creates empty options.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the tracked fields.
    pub fn fields<I, F>(mut self, fields: I) -> Self
    where
        I: IntoIterator<Item = F>,
        F: Into<FieldName>,
    {
        self.fields = Some(fields.into_iter().map(Into::into).collect());
        self
    }

    /// Sets the hook.
    pub fn hook(mut self, hook: Hook) -> Self {
        self.hook = Some(hook);
        self
    }

    /// Validates the options and returns the normalized fields with the hook.
    ///
    /// Fields are checked before the hook.
    pub fn normalize(self) -> AppResult<(Vec<FieldName>, Hook)> {
        let fields = checked_fields(self.fields)?;

        let hook = self
            .hook
            .ok_or_else(|| AppError::invalid_configuration(HOOK_REQUIRED))?;
        if !hook.is_dispatchable() {
            return Err(AppError::invalid_configuration(HOOK_INVALID));
        }

        Ok((fields, hook))
    }
}

fn checked_fields(fields: Option<Vec<FieldName>>) -> AppResult<Vec<FieldName>> {
    let mut fields = fields.ok_or_else(|| AppError::invalid_configuration(FIELDS_REQUIRED))?;
    normalize_fields(&mut fields);
    if fields.is_empty() {
        return Err(AppError::invalid_configuration(FIELDS_REQUIRED));
    }
    Ok(fields)
}

/// Drops null identifiers and duplicates, keeping first occurrences in order.
pub(crate) fn normalize_fields(fields: &mut Vec<FieldName>) {
    let mut seen = std::collections::HashSet::new();
    fields.retain(|field| !field.is_null() && seen.insert(field.clone()));
}

impl TryFrom<&RawHookOptions> for OnUpdateOptions {
    type Error = AppError;

    fn try_from(raw: &RawHookOptions) -> Result<Self, Self::Error> {
        let fields = match &raw.fields {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::Array(items)) => {
                let mut fields = Vec::with_capacity(items.len());
                for item in items {
                    match item {
                        serde_json::Value::String(name) => fields.push(FieldName::new(name.as_str())),
                        serde_json::Value::Null => {}
                        _ => return Err(AppError::invalid_configuration(FIELDS_REQUIRED)),
                    }
                }
                Some(fields)
            }
            Some(_) => return Err(AppError::invalid_configuration(FIELDS_REQUIRED)),
        };

        let hook = match &raw.hook {
            None | Some(serde_json::Value::Null) => None,
            Some(serde_json::Value::String(name)) => Some(Hook::method(name.as_str())),
            Some(_) => {
                // A fields problem still reports first.
                checked_fields(fields)?;
                return Err(AppError::invalid_configuration(HOOK_INVALID));
            }
        };

        Ok(Self { fields, hook })
    }
}
