//! Boolean schema

use crate::foundation::{Context, RuleChain, Schema, Violation};
use crate::macros::impl_schema_builder;
use crate::schema::{expect_kind, report};
use crate::value::ValueKind;

/// Matches boolean values.
#[derive(Debug, Clone)]
pub struct BoolSchema {
    chain: RuleChain,
    parses_strings: bool,
}

impl_schema_builder!(BoolSchema, bool);

#[allow(clippy::new_without_default)]
impl BoolSchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: RuleChain::new(),
            parses_strings: false,
        }
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(bool) -> Result<(), Violation> + Send + Sync + 'static,
    {
        self.transform(move |ctx| {
            let Some(value) = ctx.value().as_bool() else {
                ctx.abort(Violation::type_mismatch(ValueKind::Bool));
                return;
            };
            report(ctx, f(value));
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn equal(self, expected: bool) -> Self {
        self.check(move |value| {
            if value == expected {
                Ok(())
            } else {
                Err(Violation::equal(expected))
            }
        })
    }

    /// Parses a string value as a boolean; other values pass through.
    ///
    /// Accepts `1`, `t`, `T`, `true`, `TRUE`, `True` and their false
    /// counterparts `0`, `f`, `F`, `false`, `FALSE`, `False`.
    #[must_use = "builder methods must be chained or built"]
    pub fn parse_string(mut self) -> Self {
        self.parses_strings = true;
        self.transform(|ctx| {
            let parsed = ctx.value().as_str().map(parse_bool);
            match parsed {
                Some(Some(flag)) => ctx.set_value(flag),
                Some(None) => ctx.abort(Violation::type_mismatch(ValueKind::Bool)),
                None => {}
            }
        })
    }
}

fn parse_bool(text: &str) -> Option<bool> {
    match text {
        "1" | "t" | "T" | "true" | "TRUE" | "True" => Some(true),
        "0" | "f" | "F" | "false" | "FALSE" | "False" => Some(false),
        _ => None,
    }
}

impl Schema for BoolSchema {
    fn priority(&self) -> i32 {
        self.chain.priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        let parses = self.parses_strings && ctx.assert_kind(ValueKind::String);
        if !parses && !expect_kind(ctx, ValueKind::Bool) {
            return;
        }

        let before = ctx.errors().reported();
        self.chain.run(ctx);

        let clean = ctx.errors().reported() == before && !ctx.is_skipped();
        if clean && ctx.value().as_bool().is_none() {
            ctx.abort(Violation::type_mismatch(ValueKind::Bool));
        }
    }
}
