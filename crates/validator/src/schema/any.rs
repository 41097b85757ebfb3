//! Any schema
//!
//! No native kind: every value passes the type check, so only the
//! configured rules constrain it.

use crate::foundation::error::render_values;
use crate::foundation::{Context, RuleChain, Schema, Violation};
use crate::macros::impl_schema_builder;
use crate::schema::report;
use crate::value::Value;

/// Matches any value.
#[derive(Debug, Clone)]
pub struct AnySchema {
    chain: RuleChain,
}

impl_schema_builder!(AnySchema, Value);

#[allow(clippy::new_without_default)]
impl AnySchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: RuleChain::new(),
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(&Value) -> Result<(), Violation> + Send + Sync + 'static,
    {
        self.transform(move |ctx| {
            let outcome = f(ctx.value());
            report(ctx, outcome);
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn equal(self, expected: impl Into<Value>) -> Self {
        let expected = expected.into();
        self.check(move |value| {
            if *value == expected {
                Ok(())
            } else {
                Err(Violation::equal(&expected))
            }
        })
    }

    /// The value must be one of `values`.
    #[must_use = "builder methods must be chained or built"]
    pub fn valid<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let rendered = render_values(&values);
        self.check(move |value| {
            if values.contains(value) {
                Ok(())
            } else {
                Err(Violation::one_of(&rendered))
            }
        })
    }

    /// The value must not be any of `values`.
    #[must_use = "builder methods must be chained or built"]
    pub fn invalid<I, V>(self, values: I) -> Self
    where
        I: IntoIterator<Item = V>,
        V: Into<Value>,
    {
        let values: Vec<Value> = values.into_iter().map(Into::into).collect();
        let rendered = render_values(&values);
        self.check(move |value| {
            if values.contains(value) {
                Err(Violation::not_one_of(&rendered))
            } else {
                Ok(())
            }
        })
    }
}

impl Schema for AnySchema {
    fn priority(&self) -> i32 {
        self.chain.priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        self.chain.run(ctx);
    }
}
