//! Object key evaluator
//!
//! Validates each declared key of a mapping against its schema, highest
//! priority first. Equal priorities keep declaration order.
//!
//! For every key the evaluator:
//!
//! 1. moves the cursor to the key (path, value, and enclosing mapping),
//! 2. clears the skip flag, so one key never stops its siblings,
//! 3. anchors relative references at the enclosing mapping the first time
//!    a nested object schema is met,
//! 4. runs the key's schema,
//! 5. writes the resulting value back into the mapping and the working
//!    document, unless the key added errors or skipped.
//!
//! The cursor is restored afterwards, so the rule chain of the object
//! schema continues on the (rewritten) mapping.

use std::fmt;

use tracing::trace;

use crate::foundation::{Context, Rule, Schema, SchemaRef, Violation};
use crate::value::{Value, ValueKind};

/// Declared keys of an object schema, in declaration order.
#[derive(Clone, Default)]
pub struct Keys {
    entries: Vec<(String, SchemaRef)>,
}

impl Keys {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds `name`, replacing an earlier declaration of the same key.
    #[must_use = "builder methods must be chained or built"]
    pub fn key(mut self, name: impl Into<String>, schema: impl Schema + 'static) -> Self {
        self.insert(name, schema.into_ref());
        self
    }

    pub fn insert(&mut self, name: impl Into<String>, schema: SchemaRef) {
        let name = name.into();
        match self.entries.iter_mut().find(|(existing, _)| *existing == name) {
            Some(entry) => entry.1 = schema,
            None => self.entries.push((name, schema)),
        }
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Key names in declaration order.
    pub fn names(&self) -> impl Iterator<Item = &str> {
        self.entries.iter().map(|(name, _)| name.as_str())
    }

    /// Key names in evaluation order.
    #[must_use]
    pub fn evaluation_order(&self) -> Vec<&str> {
        let mut entries: Vec<&(String, SchemaRef)> = self.entries.iter().collect();
        entries.sort_by_key(|(_, schema)| std::cmp::Reverse(schema.priority()));
        entries.into_iter().map(|(name, _)| name.as_str()).collect()
    }

    /// Consumes the declarations into a rule that evaluates them.
    pub(crate) fn into_rule(mut self) -> KeyEvaluator {
        // stable: ties keep declaration order
        self.entries
            .sort_by_key(|(_, schema)| std::cmp::Reverse(schema.priority()));
        KeyEvaluator {
            entries: self.entries,
        }
    }
}

impl fmt::Debug for Keys {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_list().entries(self.names()).finish()
    }
}

impl<K: Into<String>, S: Schema + 'static> FromIterator<(K, S)> for Keys {
    fn from_iter<I: IntoIterator<Item = (K, S)>>(iter: I) -> Self {
        iter.into_iter()
            .fold(Self::new(), |keys, (name, schema)| keys.key(name, schema))
    }
}

/// The rule produced by [`ObjectSchema::keys`](crate::schema::ObjectSchema::keys).
pub(crate) struct KeyEvaluator {
    entries: Vec<(String, SchemaRef)>,
}

impl Rule for KeyEvaluator {
    fn apply(&self, ctx: &mut Context<'_>) {
        if !ctx.assert_kind(ValueKind::Mapping) {
            ctx.abort(Violation::type_mismatch(ValueKind::Mapping));
            return;
        }
        ctx.sync_document();
        let base = ctx.path().clone();
        let Value::Mapping(mut mapping) = ctx.take_value() else {
            return;
        };

        for (name, schema) in &self.entries {
            if ctx.is_failed() {
                break;
            }

            let path = base.child(name.as_str());
            let original = mapping.get(name.as_str()).cloned();
            let current = original.clone().unwrap_or_default();
            let scope = ctx.enter(current, path.clone(), base.clone());
            if schema.is_object() && !ctx.has_parent_root() {
                ctx.set_parent_root(base.clone());
            }

            trace!(
                key = %name,
                priority = schema.priority(),
                field = %ctx.field_path(),
                "validating key"
            );

            let before = ctx.errors().reported();
            schema.validate(ctx);
            let clean = ctx.errors().reported() == before && !ctx.is_skipped() && !ctx.is_failed();
            let value = ctx.take_value();
            ctx.leave(scope);

            if clean {
                mapping.insert(name.clone(), value.clone());
                ctx.write_document(&path, value);
            } else {
                // nested keys may have written into the document already
                ctx.restore_document(&path, original);
            }
        }

        ctx.set_value(Value::Mapping(mapping));
    }
}
