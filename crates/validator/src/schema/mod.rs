//! Schema types
//!
//! Each constructor returns a builder; builder calls only record rules, so
//! nothing is validated until the schema is handed to an
//! [`Engine`](crate::engine::Engine).
//!
//! | Constructor  | Native kind | Type                  |
//! |--------------|-------------|-----------------------|
//! | [`any`]      | (none)      | [`AnySchema`]         |
//! | [`string`]   | string      | [`StringSchema`]      |
//! | [`number`]   | number      | [`NumberSchema`]      |
//! | [`boolean`]  | boolean     | [`BoolSchema`]        |
//! | [`array`]    | sequence    | [`ArraySchema`]       |
//! | [`object`]   | mapping     | [`ObjectSchema`]      |

mod any;
mod array;
mod boolean;
mod keys;
mod number;
mod object;
mod string;

pub use any::AnySchema;
pub use array::ArraySchema;
pub use boolean::BoolSchema;
pub use keys::Keys;
pub use number::NumberSchema;
pub use object::ObjectSchema;
pub use string::StringSchema;

use std::fmt;

use tracing::debug;

use crate::foundation::{Context, MESSAGE_PLACEHOLDER, Rule, Schema, SchemaRef, Violation};
use crate::foundation::registry;
use crate::path::FieldPath;
use crate::value::{Value, ValueKind};

// ============================================================================
// CONSTRUCTORS
// ============================================================================

/// A schema with no native kind.
#[must_use]
pub fn any() -> AnySchema {
    AnySchema::new()
}

#[must_use]
pub fn string() -> StringSchema {
    StringSchema::new()
}

#[must_use]
pub fn number() -> NumberSchema {
    NumberSchema::new()
}

#[must_use]
pub fn boolean() -> BoolSchema {
    BoolSchema::new()
}

#[must_use]
pub fn array() -> ArraySchema {
    ArraySchema::new()
}

#[must_use]
pub fn object() -> ObjectSchema {
    ObjectSchema::new()
}

// ============================================================================
// SHARED RULES
// ============================================================================

/// Conditional branch: validates the current field against `then` while the
/// referenced value equals `condition`.
///
/// Errors raised inside the branch are annotated with
/// `when <field> = <value>`, where `<field>` is the last segment of the
/// reference path.
pub struct When {
    reference: String,
    condition: Value,
    then: SchemaRef,
}

impl When {
    pub fn new(
        reference: impl Into<String>,
        condition: impl Into<Value>,
        then: impl Schema + 'static,
    ) -> Self {
        Self {
            reference: reference.into(),
            condition: condition.into(),
            then: then.into_ref(),
        }
    }
}

impl Rule for When {
    fn apply(&self, ctx: &mut Context<'_>) {
        let Some(found) = ctx.reference(&self.reference) else {
            return;
        };
        if *found != self.condition {
            return;
        }
        let found = found.to_string();
        let field = FieldPath::parse_with(&self.reference, &ctx.options().path_separator)
            .last()
            .map(ToString::to_string)
            .unwrap_or_default();

        debug!(
            reference = %self.reference,
            value = %found,
            field = %ctx.field_path(),
            "conditional branch matched"
        );

        let template = format!("{MESSAGE_PLACEHOLDER} when {field} = {found}");
        let previous = ctx.errors_mut().replace_template(Some(template));
        self.then.validate(ctx);
        ctx.errors_mut().replace_template(previous);
    }
}

impl fmt::Debug for When {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("When")
            .field("reference", &self.reference)
            .field("condition", &self.condition)
            .finish_non_exhaustive()
    }
}

/// Invokes a named validator from the engine's registry.
#[derive(Debug, Clone)]
pub struct Custom {
    name: String,
    args: Vec<Value>,
}

impl Custom {
    pub fn new(name: impl Into<String>, args: Vec<Value>) -> Self {
        Self {
            name: name.into(),
            args,
        }
    }
}

impl Rule for Custom {
    fn apply(&self, ctx: &mut Context<'_>) {
        registry::invoke(ctx, &self.name, &self.args);
    }
}

// ============================================================================
// HELPERS
// ============================================================================

/// Aborts with a type error unless the value is null or of `kind`.
///
/// Returns whether the rule chain may run.
pub(crate) fn expect_kind(ctx: &mut Context<'_>, kind: ValueKind) -> bool {
    if ctx.value().is_null() || ctx.assert_kind(kind) {
        return true;
    }
    ctx.abort(Violation::type_mismatch(kind));
    false
}

/// Reports the outcome of a narrowed check.
pub(crate) fn report(ctx: &mut Context<'_>, outcome: Result<(), Violation>) {
    if let Err(violation) = outcome {
        ctx.report(violation);
    }
}
