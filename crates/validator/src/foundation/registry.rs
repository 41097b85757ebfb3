//! Custom validator registry
//!
//! Schemas refer to custom validators by name (`custom("slug", args)`); the
//! registry an [`Engine`](crate::engine::Engine) was built with resolves
//! that name when the rule runs. Registries are plain values, so several
//! can coexist.

use std::collections::HashMap;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, warn};

use crate::foundation::context::Context;
use crate::foundation::error::ConfigError;
use crate::value::Value;

/// Signature of a custom validator.
///
/// It receives the current context and the arguments given at schema build
/// time, and reports through the context like any other rule.
pub type CustomValidator = Arc<dyn Fn(&mut Context<'_>, &[Value]) + Send + Sync>;

/// Name → custom validator lookup table.
#[derive(Clone, Default)]
pub struct Registry {
    validators: HashMap<String, CustomValidator>,
}

impl Registry {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers `validator` under `name`, replacing any previous entry.
    pub fn register<F>(&mut self, name: impl Into<String>, validator: F)
    where
        F: Fn(&mut Context<'_>, &[Value]) + Send + Sync + 'static,
    {
        self.validators.insert(name.into(), Arc::new(validator));
    }

    /// Builder-style [`register`](Self::register).
    #[must_use = "builder methods must be chained or built"]
    pub fn with<F>(mut self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[Value]) + Send + Sync + 'static,
    {
        self.register(name, validator);
        self
    }

    #[must_use]
    pub fn get(&self, name: &str) -> Option<&CustomValidator> {
        self.validators.get(name)
    }

    #[must_use]
    pub fn contains(&self, name: &str) -> bool {
        self.validators.contains_key(name)
    }

    /// Registered names, sorted.
    #[must_use]
    pub fn names(&self) -> Vec<&str> {
        let mut names: Vec<&str> = self.validators.keys().map(String::as_str).collect();
        names.sort_unstable();
        names
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.validators.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.validators.is_empty()
    }
}

impl fmt::Debug for Registry {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Registry")
            .field("validators", &self.names())
            .finish()
    }
}

/// Runs the custom validator `name` against `ctx`.
///
/// An unregistered name halts the whole validation with
/// [`ConfigError::UnknownValidator`]; it never becomes a field error.
pub(crate) fn invoke(ctx: &mut Context<'_>, name: &str, args: &[Value]) {
    let registry = ctx.registry();
    let Some(validator) = registry.get(name) else {
        warn!(validator = name, field = %ctx.field_path(), "custom validator is not registered");
        ctx.fail(ConfigError::unknown_validator(name));
        return;
    };
    debug!(validator = name, field = %ctx.field_path(), args = args.len(), "running custom validator");
    validator(ctx, args);
}
