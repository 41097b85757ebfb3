//! Array schema

use std::collections::HashSet;

use tracing::trace;

use crate::foundation::{Context, RuleChain, Schema, SchemaRef, Violation};
use crate::macros::impl_schema_builder;
use crate::schema::{expect_kind, report};
use crate::value::{Value, ValueKind};

/// Matches sequences.
#[derive(Debug, Clone)]
pub struct ArraySchema {
    chain: RuleChain,
}

impl_schema_builder!(ArraySchema, Vec<Value>);

#[allow(clippy::new_without_default)]
impl ArraySchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: RuleChain::new(),
        }
    }

    /// Runs `f` against the elements; a returned violation is recorded and
    /// the chain continues.
    #[must_use = "builder methods must be chained or built"]
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(&[Value]) -> Result<(), Violation> + Send + Sync + 'static,
    {
        self.transform(move |ctx| {
            let Some(items) = ctx.value().as_sequence() else {
                ctx.abort(Violation::type_mismatch(ValueKind::Sequence));
                return;
            };
            let outcome = f(items);
            report(ctx, outcome);
        })
    }

    /// Validates every element against every schema in `schemas`.
    ///
    /// Each schema's errors are collected independently, so an element must
    /// satisfy all of them. Errors carry the element index in their path.
    #[must_use = "builder methods must be chained or built"]
    pub fn items(self, schemas: impl IntoIterator<Item = SchemaRef>) -> Self {
        let schemas: Vec<SchemaRef> = schemas.into_iter().collect();
        self.transform(move |ctx| validate_items(ctx, &schemas))
    }

    /// [`items`](Self::items) with a single schema.
    #[must_use = "builder methods must be chained or built"]
    pub fn item(self, schema: impl Schema + 'static) -> Self {
        self.items([schema.into_ref()])
    }

    /// At least `min` elements.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(self, min: usize) -> Self {
        self.check(move |items| {
            if items.len() < min {
                Err(Violation::array_min_length(min))
            } else {
                Ok(())
            }
        })
    }

    /// At most `max` elements.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(self, max: usize) -> Self {
        self.check(move |items| {
            if items.len() > max {
                Err(Violation::array_max_length(max))
            } else {
                Ok(())
            }
        })
    }

    /// Exactly `length` elements.
    #[must_use = "builder methods must be chained or built"]
    pub fn length(self, length: usize) -> Self {
        self.check(move |items| {
            if items.len() == length {
                Ok(())
            } else {
                Err(Violation::array_exact_length(length))
            }
        })
    }

    /// No two mapping elements may share the same values for `fields`.
    ///
    /// Reports once, at the first repeat. Does nothing if any element is
    /// not a mapping.
    #[must_use = "builder methods must be chained or built"]
    pub fn unique_objects<I, S>(self, fields: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let fields: Vec<String> = fields.into_iter().map(Into::into).collect();
        self.check(move |items| {
            let mut seen: HashSet<Vec<String>> = HashSet::with_capacity(items.len());
            for item in items {
                let Some(mapping) = item.as_mapping() else {
                    return Ok(());
                };
                let key = fields
                    .iter()
                    .map(|field| {
                        mapping
                            .get(field.as_str())
                            .map(ToString::to_string)
                            .unwrap_or_default()
                    })
                    .collect();
                if !seen.insert(key) {
                    return Err(Violation::unique_objects(&fields));
                }
            }
            Ok(())
        })
    }
}

fn validate_items(ctx: &mut Context<'_>, schemas: &[SchemaRef]) {
    if !ctx.assert_kind(ValueKind::Sequence) {
        ctx.abort(Violation::type_mismatch(ValueKind::Sequence));
        return;
    }
    ctx.sync_document();

    let len = ctx.value().as_sequence().map_or(0, <[Value]>::len);
    for index in 0..len {
        for schema in schemas {
            let element = ctx
                .value()
                .as_sequence()
                .and_then(|items| items.get(index))
                .cloned()
                .unwrap_or_default();
            let path = ctx.path().child(index);

            let mut child = ctx.nested(element.clone(), index);
            trace!(index, field = %child.field_path(), "validating item");
            schema.validate(&mut child);
            let nested = child.finish();

            if let Some(error) = nested.fatal {
                ctx.fail(error);
                return;
            }
            let clean = nested.errors.is_empty() && !nested.skipped;
            ctx.errors_mut().merge(nested.errors);
            if clean {
                if let Some(slot) = ctx
                    .value_mut()
                    .as_sequence_mut()
                    .and_then(|items| items.get_mut(index))
                {
                    slot.clone_from(&nested.value);
                }
                ctx.write_document(&path, nested.value);
            } else {
                ctx.write_document(&path, element);
            }
        }
    }
}

impl Schema for ArraySchema {
    fn priority(&self) -> i32 {
        self.chain.priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        if expect_kind(ctx, ValueKind::Sequence) {
            self.chain.run(ctx);
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::schema::{number, string};
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(schema: &ArraySchema, value: serde_json::Value) -> (Value, Vec<String>) {
        let outcome = Engine::new().validate(schema, value).unwrap();
        let strings = outcome.errors.to_strings();
        (outcome.value, strings)
    }

    #[test]
    fn every_schema_is_applied_to_every_item() {
        let schema = ArraySchema::new().items([
            number().max(0.0).into_ref(),
            number().min(0.0).into_ref(),
        ]);
        assert_eq!(run(&schema, json!([1])).1, vec!["0 must be <= 0"]);
    }

    #[test]
    fn items_are_written_back() {
        let schema = ArraySchema::new().item(string().uppercase());
        assert_eq!(run(&schema, json!(["a", "b"])).0, Value::from(json!(["A", "B"])));
    }

    #[test]
    fn count_bounds() {
        assert_eq!(
            run(&ArraySchema::new().min(2), json!([1])).1,
            vec!["must have at least 2 items"]
        );
        assert_eq!(
            run(&ArraySchema::new().max(1), json!([1, 2])).1,
            vec!["cannot have more than 1 item"]
        );
        assert!(run(&ArraySchema::new().length(2), json!([1, 2])).1.is_empty());
    }

    #[test]
    fn unique_objects() {
        let schema = ArraySchema::new().unique_objects(["id"]);
        assert_eq!(
            run(&schema, json!([{"id": "a"}, {"id": "a"}])).1,
            vec!["must be unique [fields: id]"]
        );
        assert!(run(&schema, json!([{"id": "a"}, {"id": "b"}])).1.is_empty());
        assert!(run(&schema, json!([{"id": "a"}, "a", {"id": "a"}])).1.is_empty());
    }

    #[test]
    fn composite_key_does_not_concatenate() {
        let schema = ArraySchema::new().unique_objects(["a", "b"]);
        let input = json!([{"a": "ab", "b": "c"}, {"a": "a", "b": "bc"}]);
        assert!(run(&schema, input).1.is_empty());
    }

    #[test]
    fn non_array_is_a_type_error() {
        let schema = ArraySchema::new().min(1);
        assert_eq!(run(&schema, json!({"a": 1})).1, vec!["must be an array"]);
    }
}
