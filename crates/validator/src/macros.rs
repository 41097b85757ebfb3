//! Macros for declaring schemas with minimal boilerplate.
//!
//! # Available Macros
//!
//! - [`keys!`]: declare the keys of an object schema
//! - `impl_schema_builder!`: (internal) the builder methods every schema
//!   type shares
//!
//! # Examples
//!
//! ```rust,ignore
//! use strata_validator::prelude::*;
//!
//! let user = object().keys(keys! {
//!     "name" => string().required().min(2),
//!     "age"  => number().integer().min(0),
//! });
//! ```

// ============================================================================
// KEYS MACRO
// ============================================================================

/// Builds a [`Keys`](crate::schema::Keys) list from `name => schema` pairs.
///
/// Declaration order is kept and breaks ties between equal priorities.
///
/// ```rust,ignore
/// let keys = keys! {
///     "id"    => string().required(),
///     "total" => number().priority(10),
/// };
/// ```
#[macro_export]
macro_rules! keys {
    () => {
        $crate::schema::Keys::new()
    };
    ($($name:expr => $schema:expr),+ $(,)?) => {
        $crate::schema::Keys::new()$(.key($name, $schema))+
    };
}

// ============================================================================
// SCHEMA BUILDER MACRO
// ============================================================================

/// Generates the builder methods shared by every schema type.
///
/// The type must have a `chain: RuleChain` field. `$input` is the value type
/// accepted by `default` and `set`.
macro_rules! impl_schema_builder {
    ($schema:ident, $input:ty) => {
        impl $schema {
            /// Appends a rule step.
            #[must_use = "builder methods must be chained or built"]
            pub fn transform<F>(mut self, rule: F) -> Self
            where
                F: Fn(&mut $crate::foundation::Context<'_>) + Send + Sync + 'static,
            {
                self.chain.push(rule);
                self
            }

            /// Inserts a rule step before every existing one.
            #[must_use = "builder methods must be chained or built"]
            pub fn prepend_transform<F>(mut self, rule: F) -> Self
            where
                F: Fn(&mut $crate::foundation::Context<'_>) + Send + Sync + 'static,
            {
                self.chain.prepend(rule);
                self
            }

            /// Sets the evaluation priority among sibling object keys.
            #[must_use = "builder methods must be chained or built"]
            pub fn priority(mut self, priority: i32) -> Self {
                self.chain.set_priority(priority);
                self
            }

            /// Rejects an absent value with a `required` error.
            #[must_use = "builder methods must be chained or built"]
            pub fn required(mut self) -> Self {
                self.chain
                    .set_presence($crate::foundation::Presence::Required);
                self.prepend_transform(|ctx| {
                    if ctx.value().is_null() {
                        ctx.abort($crate::foundation::Violation::required());
                    }
                })
            }

            /// Accepts an absent value and skips every other rule.
            #[must_use = "builder methods must be chained or built"]
            pub fn optional(mut self) -> Self {
                self.chain
                    .set_presence($crate::foundation::Presence::Optional);
                self.prepend_transform(|ctx| {
                    if ctx.value().is_null() {
                        ctx.skip();
                    }
                })
            }

            /// Substitutes `value` for an absent value, then keeps validating.
            #[must_use = "builder methods must be chained or built"]
            pub fn default(mut self, value: impl Into<$input>) -> Self {
                let value: $input = value.into();
                let value = $crate::value::Value::from(value);
                self.chain
                    .set_presence($crate::foundation::Presence::Optional);
                self.prepend_transform(move |ctx| {
                    if ctx.value().is_null() {
                        ctx.set_value(value.clone());
                    }
                })
            }

            /// Replaces the value unconditionally.
            #[must_use = "builder methods must be chained or built"]
            pub fn set(self, value: impl Into<$input>) -> Self {
                let value: $input = value.into();
                let value = $crate::value::Value::from(value);
                self.transform(move |ctx| ctx.set_value(value.clone()))
            }

            /// Runs the custom validator registered as `name`.
            #[must_use = "builder methods must be chained or built"]
            pub fn custom(
                mut self,
                name: impl Into<String>,
                args: impl IntoIterator<Item = $crate::value::Value>,
            ) -> Self {
                self.chain
                    .push($crate::schema::Custom::new(name, args.into_iter().collect()));
                self
            }

            /// Also validates against `then` when the value at `reference`
            /// equals `condition`.
            #[must_use = "builder methods must be chained or built"]
            pub fn when(
                mut self,
                reference: impl Into<String>,
                condition: impl Into<$crate::value::Value>,
                then: impl $crate::foundation::Schema + 'static,
            ) -> Self {
                self.chain
                    .push($crate::schema::When::new(reference, condition, then));
                self
            }
        }
    };
}

pub(crate) use impl_schema_builder;
