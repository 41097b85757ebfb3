//! Object schema

use crate::foundation::{Context, RuleChain, Schema, Violation};
use crate::macros::impl_schema_builder;
use crate::schema::keys::Keys;
use crate::schema::{expect_kind, report};
use crate::value::{Map, ValueKind};

/// Matches mappings.
#[derive(Debug, Clone)]
pub struct ObjectSchema {
    chain: RuleChain,
}

impl_schema_builder!(ObjectSchema, Map);

#[allow(clippy::new_without_default)]
impl ObjectSchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: RuleChain::new(),
        }
    }

    /// Validates the declared keys. See [`Keys`] for evaluation order.
    #[must_use = "builder methods must be chained or built"]
    pub fn keys(mut self, keys: Keys) -> Self {
        self.chain.push(keys.into_rule());
        self
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(&Map) -> Result<(), Violation> + Send + Sync + 'static,
    {
        self.transform(move |ctx| {
            let Some(mapping) = ctx.value().as_mapping() else {
                ctx.abort(Violation::type_mismatch(ValueKind::Mapping));
                return;
            };
            let outcome = f(mapping);
            report(ctx, outcome);
        })
    }

    /// Every listed key must be present. Missing keys are reported together.
    #[must_use = "builder methods must be chained or built"]
    pub fn with<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.check(move |mapping| {
            let missing: Vec<&str> = keys
                .iter()
                .map(String::as_str)
                .filter(|key| !mapping.contains_key(*key))
                .collect();
            if missing.is_empty() {
                Ok(())
            } else {
                Err(Violation::missing_keys(missing))
            }
        })
    }

    /// The listed keys are mutually exclusive: an error is reported when two
    /// or more of them are present together.
    #[must_use = "builder methods must be chained or built"]
    pub fn without<I, S>(self, keys: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let keys: Vec<String> = keys.into_iter().map(Into::into).collect();
        self.check(move |mapping| {
            let present: Vec<&str> = keys
                .iter()
                .map(String::as_str)
                .filter(|key| mapping.contains_key(*key))
                .collect();
            if present.len() > 1 {
                Err(Violation::forbidden_keys(present))
            } else {
                Ok(())
            }
        })
    }
}

impl Schema for ObjectSchema {
    fn priority(&self) -> i32 {
        self.chain.priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        if expect_kind(ctx, ValueKind::Mapping) {
            self.chain.run(ctx);
        }
    }

    fn is_object(&self) -> bool {
        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::engine::Engine;
    use crate::keys;
    use crate::schema::{number, string};
    use crate::value::Value;
    use pretty_assertions::assert_eq;
    use serde_json::json;

    fn run(schema: &ObjectSchema, value: serde_json::Value) -> (Value, Vec<String>) {
        let outcome = Engine::new().validate(schema, value).unwrap();
        let strings = outcome.errors.to_strings();
        (outcome.value, strings)
    }

    #[test]
    fn with_reports_only_missing() {
        let schema = ObjectSchema::new().with(["a", "b"]);
        assert_eq!(run(&schema, json!({"a": 1})).1, vec!["is missing required keys [b]"]);
    }

    #[test]
    fn without_needs_two_present() {
        let schema = ObjectSchema::new().without(["card", "iban"]);
        assert!(run(&schema, json!({"card": "x"})).1.is_empty());
        assert_eq!(
            run(&schema, json!({"card": "x", "iban": "y"})).1,
            vec!["contains forbidden keys [card, iban]"]
        );
    }

    #[test]
    fn keys_write_back_transformed_values() {
        let schema = ObjectSchema::new().keys(keys! {
            "name" => string().trim(),
            "age" => number().parse_string(),
        });
        let (value, errors) = run(&schema, json!({"name": " ada ", "age": "36", "extra": true}));
        assert!(errors.is_empty());
        assert_eq!(value, Value::from(json!({"name": "ada", "age": 36, "extra": true})));
    }

    #[test]
    fn failing_key_keeps_original_value() {
        let schema = ObjectSchema::new().keys(keys! {
            "name" => string().trim().min(10),
        });
        let (value, errors) = run(&schema, json!({"name": " ada "}));
        assert_eq!(errors, vec!["name must have at least 10 characters"]);
        assert_eq!(value, Value::from(json!({"name": " ada "})));
    }

    #[test]
    fn skip_does_not_leak_to_siblings_or_the_object_chain() {
        let schema = ObjectSchema::new()
            .keys(keys! {
                "a" => string(),
                "b" => string().required(),
            })
            .with(["c"]);
        let (_, errors) = run(&schema, json!({}));
        assert_eq!(errors, vec!["b is required", "is missing required keys [c]"]);
    }

    #[test]
    fn default_is_inserted_for_absent_key() {
        let schema = ObjectSchema::new().keys(keys! {
            "role" => string().default("member"),
        });
        assert_eq!(run(&schema, json!({})).0, Value::from(json!({"role": "member"})));
    }
}
