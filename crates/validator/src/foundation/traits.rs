//! Core traits for the validation system
//!
//! Two seams carry all validation:
//!
//! - [`Rule`]: one step of a schema. Rules read and write the [`Context`]
//!   and never return errors.
//! - [`Schema`]: a priority and a `validate` entry point. Every schema type
//!   in [`crate::schema`] stores its rules in a [`RuleChain`].

use std::fmt;
use std::sync::Arc;

use crate::foundation::context::Context;

// ============================================================================
// RULE
// ============================================================================

/// A single rule step.
///
/// Any `Fn(&mut Context<'_>) + Send + Sync` closure is a rule.
pub trait Rule: Send + Sync {
    fn apply(&self, ctx: &mut Context<'_>);
}

impl<F> Rule for F
where
    F: Fn(&mut Context<'_>) + Send + Sync,
{
    fn apply(&self, ctx: &mut Context<'_>) {
        self(ctx);
    }
}

// ============================================================================
// SCHEMA
// ============================================================================

/// Immutable description of one document node.
///
/// A schema can be shared across any number of validations; all per-call
/// state lives in the [`Context`].
pub trait Schema: Send + Sync {
    /// Evaluation priority among sibling object keys; higher runs first.
    fn priority(&self) -> i32 {
        0
    }

    /// Validates the context's current value, possibly rewriting it.
    fn validate(&self, ctx: &mut Context<'_>);

    /// Whether this is an object schema. The key evaluator anchors relative
    /// references at the first mapping that holds one.
    fn is_object(&self) -> bool {
        false
    }

    /// Wraps the schema for sharing between parents.
    fn into_ref(self) -> SchemaRef
    where
        Self: Sized + 'static,
    {
        Arc::new(self)
    }
}

/// Shared, type-erased schema.
pub type SchemaRef = Arc<dyn Schema>;

impl<S: Schema + ?Sized> Schema for Arc<S> {
    fn priority(&self) -> i32 {
        (**self).priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        (**self).validate(ctx);
    }

    fn is_object(&self) -> bool {
        (**self).is_object()
    }
}

impl<S: Schema + ?Sized> Schema for Box<S> {
    fn priority(&self) -> i32 {
        (**self).priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        (**self).validate(ctx);
    }

    fn is_object(&self) -> bool {
        (**self).is_object()
    }
}

impl<S: Schema + ?Sized> Schema for &S {
    fn priority(&self) -> i32 {
        (**self).priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        (**self).validate(ctx);
    }

    fn is_object(&self) -> bool {
        (**self).is_object()
    }
}

// ============================================================================
// RULE CHAIN
// ============================================================================

/// Whether a schema accepts an absent (null) value.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Presence {
    /// Nothing configured: behaves as [`Presence::Optional`].
    #[default]
    Unspecified,
    Required,
    Optional,
}

/// Ordered rule list shared by every schema type.
#[derive(Clone, Default)]
pub struct RuleChain {
    priority: i32,
    presence: Presence,
    rules: Vec<Arc<dyn Rule>>,
}

impl RuleChain {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn priority(&self) -> i32 {
        self.priority
    }

    pub fn set_priority(&mut self, priority: i32) {
        self.priority = priority;
    }

    #[must_use]
    pub fn presence(&self) -> Presence {
        self.presence
    }

    pub fn set_presence(&mut self, presence: Presence) {
        self.presence = presence;
    }

    pub fn push(&mut self, rule: impl Rule + 'static) {
        self.rules.push(Arc::new(rule));
    }

    pub fn prepend(&mut self, rule: impl Rule + 'static) {
        self.rules.insert(0, Arc::new(rule));
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.rules.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }

    /// Runs the rules in order until one skips or validation fails.
    ///
    /// With no presence configured, an absent value skips every rule.
    pub fn run(&self, ctx: &mut Context<'_>) {
        if self.presence == Presence::Unspecified && ctx.value().is_null() {
            ctx.skip();
            return;
        }
        for rule in &self.rules {
            rule.apply(ctx);
            if ctx.is_skipped() || ctx.is_failed() {
                return;
            }
        }
    }
}

impl fmt::Debug for RuleChain {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("RuleChain")
            .field("priority", &self.priority)
            .field("presence", &self.presence)
            .field("rules", &self.rules.len())
            .finish()
    }
}
