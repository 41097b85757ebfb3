//! String schema
//!
//! Length rules count characters (Unicode scalar values), not bytes.

#[cfg(feature = "regex")]
use regex::Regex;

use crate::foundation::{Context, RuleChain, Schema, Violation};
#[cfg(feature = "regex")]
use crate::foundation::ConfigError;
use crate::macros::impl_schema_builder;
use crate::schema::{expect_kind, report};
use crate::value::ValueKind;

/// Matches string values.
#[derive(Debug, Clone)]
pub struct StringSchema {
    chain: RuleChain,
}

impl_schema_builder!(StringSchema, String);

#[allow(clippy::new_without_default)]
impl StringSchema {
    #[must_use]
    pub fn new() -> Self {
        Self {
            chain: RuleChain::new(),
        }
    }

    /// Runs `f` against the string value; a returned violation is recorded
    /// and the chain continues.
    #[must_use = "builder methods must be chained or built"]
    pub fn check<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> Result<(), Violation> + Send + Sync + 'static,
    {
        self.transform(move |ctx| {
            let Some(value) = ctx.value().as_str() else {
                ctx.abort(Violation::type_mismatch(ValueKind::String));
                return;
            };
            let outcome = f(value);
            report(ctx, outcome);
        })
    }

    /// Replaces the string with `f(value)`.
    #[must_use = "builder methods must be chained or built"]
    pub fn convert<F>(self, f: F) -> Self
    where
        F: Fn(&str) -> String + Send + Sync + 'static,
    {
        self.transform(move |ctx| {
            let Some(value) = ctx.value().as_str() else {
                ctx.abort(Violation::type_mismatch(ValueKind::String));
                return;
            };
            let converted = f(value);
            ctx.set_value(converted);
        })
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn lowercase(self) -> Self {
        self.convert(str::to_lowercase)
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn uppercase(self) -> Self {
        self.convert(str::to_uppercase)
    }

    /// Removes leading and trailing whitespace.
    #[must_use = "builder methods must be chained or built"]
    pub fn trim(self) -> Self {
        self.convert(|value| value.trim().to_owned())
    }

    #[must_use = "builder methods must be chained or built"]
    pub fn equal(self, expected: impl Into<String>) -> Self {
        let expected = expected.into();
        self.check(move |value| {
            if value == expected {
                Ok(())
            } else {
                Err(Violation::equal(&expected))
            }
        })
    }

    /// The value must be one of `values`.
    #[must_use = "builder methods must be chained or built"]
    pub fn valid<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.check(move |value| {
            if values.iter().any(|candidate| candidate == value) {
                Ok(())
            } else {
                Err(Violation::one_of(&values))
            }
        })
    }

    /// The value must not be any of `values`.
    #[must_use = "builder methods must be chained or built"]
    pub fn invalid<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        let values: Vec<String> = values.into_iter().map(Into::into).collect();
        self.check(move |value| {
            if values.iter().any(|candidate| candidate == value) {
                Err(Violation::not_one_of(&values))
            } else {
                Ok(())
            }
        })
    }

    /// At least `min` characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn min(self, min: usize) -> Self {
        self.check(move |value| {
            if value.chars().count() < min {
                Err(Violation::string_min_length(min))
            } else {
                Ok(())
            }
        })
    }

    /// At most `max` characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn max(self, max: usize) -> Self {
        self.check(move |value| {
            if value.chars().count() > max {
                Err(Violation::string_max_length(max))
            } else {
                Ok(())
            }
        })
    }

    /// Exactly `length` characters.
    #[must_use = "builder methods must be chained or built"]
    pub fn length(self, length: usize) -> Self {
        self.check(move |value| {
            if value.chars().count() == length {
                Ok(())
            } else {
                Err(Violation::string_exact_length(length))
            }
        })
    }

    /// The value must match `pattern`.
    ///
    /// A pattern that does not compile halts validation with
    /// [`ConfigError::InvalidPattern`] the first time the rule runs. Use
    /// [`try_regex`](Self::try_regex) to get the error while building.
    #[cfg(feature = "regex")]
    #[must_use = "builder methods must be chained or built"]
    pub fn regex(self, pattern: &str) -> Self {
        match compile(pattern) {
            Ok(regex) => self.matching(regex),
            Err(error) => self.transform(move |ctx| ctx.fail(error.clone())),
        }
    }

    /// Like [`regex`](Self::regex) but reports a bad pattern immediately.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidPattern`] if `pattern` does not compile.
    #[cfg(feature = "regex")]
    pub fn try_regex(self, pattern: &str) -> Result<Self, ConfigError> {
        Ok(self.matching(compile(pattern)?))
    }

    /// Only ASCII letters and digits.
    #[cfg(feature = "regex")]
    #[must_use = "builder methods must be chained or built"]
    pub fn alphanum(self) -> Self {
        self.regex("^[a-zA-Z0-9]+$")
    }

    /// Only ASCII letters, digits, and underscores.
    #[cfg(feature = "regex")]
    #[must_use = "builder methods must be chained or built"]
    pub fn token(self) -> Self {
        self.regex("^[A-Za-z0-9_]+$")
    }

    #[cfg(feature = "regex")]
    fn matching(self, regex: Regex) -> Self {
        self.check(move |value| {
            if regex.is_match(value) {
                Ok(())
            } else {
                Err(Violation::pattern(regex.as_str()))
            }
        })
    }
}

#[cfg(feature = "regex")]
fn compile(pattern: &str) -> Result<Regex, ConfigError> {
    Regex::new(pattern).map_err(|error| ConfigError::InvalidPattern {
        pattern: pattern.to_owned(),
        reason: error.to_string(),
    })
}

impl Schema for StringSchema {
    fn priority(&self) -> i32 {
        self.chain.priority()
    }

    fn validate(&self, ctx: &mut Context<'_>) {
        if expect_kind(ctx, ValueKind::String) {
            self.chain.run(ctx);
        }
    }
}
