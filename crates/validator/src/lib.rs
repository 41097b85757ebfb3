//! # strata-validator
//!
//! Declarative schema validation for JSON-like documents.
//!
//! A schema is built once from chained rules, then run against any number of
//! documents. Each run returns the (possibly transformed) document together
//! with every field error it found, not just the first.
//!
//! ## Quick Start
//!
//! ```rust,ignore
//! use strata_validator::prelude::*;
//!
//! let order = object().keys(keys! {
//!     "id"       => string().required().token(),
//!     "quantity" => number().parse_string().integer().min(1.0),
//!     "tags"     => array().item(string().trim().lowercase()).max(5),
//! });
//!
//! let outcome = validate(&order, serde_json::json!({"quantity": "0"}))?;
//! assert_eq!(
//!     outcome.errors.to_strings(),
//!     vec!["id is required", "quantity must be >= 1"],
//! );
//! ```
//!
//! ## Schemas
//!
//! - [`any`](schema::any), [`string`](schema::string),
//!   [`number`](schema::number), [`boolean`](schema::boolean),
//!   [`array`](schema::array), [`object`](schema::object)
//!
//! Object keys run highest [`priority`](schema::StringSchema::priority)
//! first, and later keys can read the already-transformed values of earlier
//! ones through reference paths (`when`, `greater_than_or_equal_to_field`).
//!
//! ## Custom validators
//!
//! Register named validators on an [`Engine`] and refer to them with
//! `custom(name, args)`. A name the engine does not know is a
//! [`ConfigError`], never a field error.

pub mod engine;
pub mod foundation;
mod macros;
pub mod path;
pub mod prelude;
pub mod schema;
pub mod value;

pub use engine::{Engine, EngineBuilder, EngineOptions, Outcome};
pub use foundation::{ConfigError, Context, ErrorBag, ErrorKind, FieldError, Registry, Schema};
pub use path::FieldPath;
pub use value::{Map, Value};

/// Validates `value` against `schema` with an engine that has no custom
/// validators and default options.
///
/// # Errors
///
/// Returns a [`ConfigError`] if the schema cannot run as built.
pub fn validate<S>(schema: &S, value: impl Into<Value>) -> Result<Outcome, ConfigError>
where
    S: Schema + ?Sized,
{
    Engine::new().validate(schema, value)
}
