//! Validation entry point
//!
//! An [`Engine`] pairs a custom validator [`Registry`] with
//! [`EngineOptions`] and runs schemas against documents. Engines are cheap
//! to share; every call gets its own context and error bag.
//!
//! # Examples
//!
//! ```rust,ignore
//! use strata_validator::prelude::*;
//!
//! let engine = Engine::builder()
//!     .register("even", |ctx, _| {
//!         if ctx.value().as_f64().is_some_and(|n| n % 2.0 != 0.0) {
//!             ctx.report_message("must be even");
//!         }
//!     })
//!     .build();
//!
//! let outcome = engine.validate(&number().custom("even", []), 3)?;
//! assert_eq!(outcome.errors.to_strings(), vec!["must be even"]);
//! ```

use std::num::NonZeroUsize;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::foundation::{ConfigError, Context, ErrorBag, FieldError, Registry, Schema};
use crate::path::DEFAULT_SEPARATOR;
use crate::value::Value;

// ============================================================================
// OPTIONS
// ============================================================================

/// Runtime settings for an [`Engine`].
///
/// Deserializable, so it can live in an application's config file:
///
/// ```json
/// { "max_errors": 20, "path_separator": "/" }
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineOptions {
    /// Caps the number of errors in an [`Outcome`]. `None` keeps all.
    ///
    /// Never zero, so a capped report of an invalid document is never empty.
    pub max_errors: Option<NonZeroUsize>,
    /// Joins field path segments in messages and splits reference paths.
    pub path_separator: String,
}

impl Default for EngineOptions {
    fn default() -> Self {
        Self {
            max_errors: None,
            path_separator: DEFAULT_SEPARATOR.to_owned(),
        }
    }
}

// ============================================================================
// OUTCOME
// ============================================================================

/// Result of one validation: the (possibly transformed) value and the
/// errors found.
#[derive(Debug, Clone, PartialEq)]
pub struct Outcome {
    pub value: Value,
    pub errors: ErrorBag,
}

impl Outcome {
    #[must_use]
    pub fn is_valid(&self) -> bool {
        self.errors.is_empty()
    }

    /// The value if there were no errors.
    ///
    /// # Errors
    ///
    /// Returns the error bag when validation found problems.
    pub fn into_result(self) -> Result<Value, ErrorBag> {
        self.errors.into_result(self.value)
    }

    #[must_use]
    pub fn into_parts(self) -> (Value, ErrorBag) {
        (self.value, self.errors)
    }
}

// ============================================================================
// ENGINE
// ============================================================================

/// Runs schemas with a fixed registry and options.
#[derive(Debug, Clone, Default)]
pub struct Engine {
    registry: Registry,
    options: EngineOptions,
}

impl Engine {
    /// An engine with no custom validators and default options.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn builder() -> EngineBuilder {
        EngineBuilder::default()
    }

    #[must_use]
    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    #[must_use]
    pub fn options(&self) -> &EngineOptions {
        &self.options
    }

    /// Validates `value` against `schema`.
    ///
    /// # Errors
    ///
    /// Returns a [`ConfigError`] when the schema cannot run as built, for
    /// example when it names a custom validator this engine does not have.
    /// Field-level problems are never errors here; they are in
    /// [`Outcome::errors`].
    pub fn validate<S>(&self, schema: &S, value: impl Into<Value>) -> Result<Outcome, ConfigError>
    where
        S: Schema + ?Sized,
    {
        let value = value.into();
        let mut document = value.clone();
        let mut ctx = Context::new(value, &mut document, &self.registry, &self.options);

        schema.validate(&mut ctx);

        let (value, mut errors, fatal) = ctx.into_parts();
        if let Some(error) = fatal {
            debug!(%error, "validation halted");
            return Err(error);
        }
        if let Some(max) = self.options.max_errors {
            errors.truncate(max.get());
        }

        debug!(errors = errors.len(), "validation finished");
        Ok(Outcome { value, errors })
    }

    /// Validates and returns only the errors, sorted.
    ///
    /// # Errors
    ///
    /// Same as [`Engine::validate`].
    pub fn errors<S>(&self, schema: &S, value: impl Into<Value>) -> Result<Vec<FieldError>, ConfigError>
    where
        S: Schema + ?Sized,
    {
        let outcome = self.validate(schema, value)?;
        Ok(outcome.errors.sorted().into_iter().cloned().collect())
    }
}

// ============================================================================
// BUILDER
// ============================================================================

#[derive(Debug, Clone, Default)]
pub struct EngineBuilder {
    registry: Registry,
    options: EngineOptions,
}

impl EngineBuilder {
    /// Replaces the whole registry.
    #[must_use = "builder methods must be chained or built"]
    pub fn registry(mut self, registry: Registry) -> Self {
        self.registry = registry;
        self
    }

    /// Adds one custom validator.
    #[must_use = "builder methods must be chained or built"]
    pub fn register<F>(mut self, name: impl Into<String>, validator: F) -> Self
    where
        F: Fn(&mut Context<'_>, &[Value]) + Send + Sync + 'static,
    {
        self.registry.register(name, validator);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn options(mut self, options: EngineOptions) -> Self {
        self.options = options;
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max_errors(mut self, max: NonZeroUsize) -> Self {
        self.options.max_errors = Some(max);
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn path_separator(mut self, separator: impl Into<String>) -> Self {
        self.options.path_separator = separator.into();
        self
    }

    #[must_use]
    pub fn build(self) -> Engine {
        Engine {
            registry: self.registry,
            options: self.options,
        }
    }
}
