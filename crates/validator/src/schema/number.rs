//! Number schema
//!
//! Every number is an `f64` once it is a [`Value`], so integer inputs are
//! already normalized when the rules run.

use crate::foundation::{Context, RuleChain, Schema, Violation};
use crate::macros::impl_schema_builder;
use crate::schema::{expect_kind, report};
use crate::value::{Value, ValueKind};

/// Matches number values.
#[derive(Debug, Clone)]
pub struct NumberSchema {
    chain: RuleChain,
    parses_strings: bool,
}

impl_schema_builder!(NumberSchema, f64);

#[allow(clippy::new_without_default)]
impl NumberSchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: RuleChain::new(),
            parses_strings: false,
        }
    }

    /// Runs `f` against the number; a returned violation is recorded and
    /// the chain continues.
    #[must_use = "builder methods must be chained or built"]
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(f64) -> Result<(), Violation> + Send + Sync + 'static,
    {
        self.transform(move |ctx| {
            let Some(value) = ctx.value().as_f64() else {
                ctx.abort(Violation::type_mismatch(ValueKind::Number));
                return;
            };
            report(ctx, f(value));
        })
    }

    /// Replaces the number with `f(value)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn convert<F>(self, f: F) -> Self
    where
        F: Fn(f64) -> f64 + Send + Sync + 'static,
    {
        self.transform(move |ctx| {
            let Some(value) = ctx.value().as_f64() else {
                ctx.abort(Violation::type_mismatch(ValueKind::Number));
                return;
            };
            ctx.set_value(f(value));
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn ceil(self) -> Self {
        self.convert(f64::ceil)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn floor(self) -> Self {
        self.convert(f64::floor)
    }

    /// Rounds half away from zero.
    #[must_use = "builder methods must be chained or built"]
    pub fn round(self) -> Self {
        self.convert(f64::round)
    }

    /// Parses a string value as a number; other values pass through.
    ///
    /// A string that is not a number aborts with a type error.
    #[must_use = "builder methods must be chained or built"]
    pub fn parse_string(mut self) -> Self {
        self.parses_strings = true;
        self.transform(|ctx| {
            let parsed = ctx.value().as_str().map(str::parse::<f64>);
            match parsed {
                Some(Ok(number)) => ctx.set_value(number),
                Some(Err(_)) => ctx.abort(Violation::type_mismatch(ValueKind::Number)),
                None => {}
            }
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn equal(self, expected: f64) -> Self {
        self.check(move |value| {
            if value == expected {
                Ok(())
            } else {
                Err(Violation::equal(expected))
            }
        })
    }

    /// The value must be one of `values`.
    #[must_use = "builder methods must be chained or built"]
    pub fn valid(self, values: impl IntoIterator<Item = f64>) -> Self {
        let values: Vec<f64> = values.into_iter().collect();
        self.check(move |value| {
            if values.iter().any(|candidate| *candidate == value) {
                Ok(())
            } else {
                Err(Violation::one_of(&values))
            }
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn min(self, min: f64) -> Self {
        self.check(move |value| {
            if value < min {
                Err(Violation::min(min))
            } else {
                Ok(())
            }
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn max(self, max: f64) -> Self {
        self.check(move |value| {
            if value > max {
                Err(Violation::max(max))
            } else {
                Ok(())
            }
        })
    }

    /// The value must have no fractional part.
    #[must_use = "builder methods must be chained or built"]
    pub fn integer(self) -> Self {
        self.check(|value| {
            if value == value.trunc() {
                Ok(())
            } else {
                Err(Violation::not_integer())
            }
        })
    }

    /// The value must be at least the number found at `reference`.
    ///
    /// A reference that is missing or not a number reports
    /// `must be a number` on this field.
    #[must_use = "builder methods must be chained or built"]
    pub fn greater_than_or_equal_to_field(self, reference: impl Into<String>) -> Self {
        let reference = reference.into();
        self.transform(move |ctx| {
            let Some(value) = ctx.value().as_f64() else {
                ctx.abort(Violation::type_mismatch(ValueKind::Number));
                return;
            };
            match ctx.reference(&reference).and_then(Value::as_f64) {
                None => ctx.report(Violation::type_mismatch(ValueKind::Number)),
                Some(bound) if value < bound => ctx.report(Violation::min(&reference)),
                Some(_) => {}
            }
        })
    }
}

impl Schema for NumberSchema {
    fn priority(&self) -> i32 {
        self.chain.priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        let parses = self.parses_strings && ctx.assert_kind(ValueKind::String);
        if !parses && !expect_kind(ctx, ValueKind::Number) {
            return;
        }

        let before = ctx.errors().reported();
        self.chain.run(ctx);

        // rules may have rewritten the value; it has to end up a number
        let clean = ctx.errors().reported() == before && !ctx.is_skipped();
        if clean && ctx.value().as_f64().is_none() {
            ctx.abort(Violation::type_mismatch(ValueKind::Number));
        }
    }
}
