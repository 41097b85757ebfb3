//! Prelude module for convenient imports.
//!
//! Provides a single `use strata_validator::prelude::*;` import that brings
//! in the schema constructors, the engine, and the types custom validators
//! work with.
//!
//! # Examples
//!
//! ```rust,ignore
//! use strata_validator::prelude::*;
//!
//! let login = object().keys(keys! {
//!     "user"     => string().required().trim(),
//!     "password" => string().required().min(12),
//! });
//! ```

// ============================================================================
// SCHEMAS
// ============================================================================

pub use crate::schema::{
    AnySchema, ArraySchema, BoolSchema, Keys, NumberSchema, ObjectSchema, StringSchema, any,
    array, boolean, number, object, string,
};

pub use crate::keys;

// ============================================================================
// ENGINE
// ============================================================================

pub use crate::engine::{Engine, EngineBuilder, EngineOptions, Outcome};
pub use crate::validate;

// ============================================================================
// FOUNDATION
// ============================================================================

pub use crate::foundation::{
    ConfigError, Context, ErrorBag, ErrorKind, FieldError, Registry, Rule, Schema, SchemaRef,
    Violation,
};
pub use crate::path::FieldPath;
pub use crate::value::{Map, Value, ValueKind};
