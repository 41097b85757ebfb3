//! Core validation types and traits
//!
//! This module contains the building blocks every schema is made of:
//!
//! - **Context**: the mutable cursor rules run over ([`Context`])
//! - **Errors**: [`FieldError`], [`ErrorBag`], and the fatal [`ConfigError`]
//! - **Traits**: [`Rule`], [`Schema`], and the shared [`RuleChain`]
//! - **Registry**: named custom validators ([`Registry`])
//!
//! # Architecture
//!
//! ## 1. Rules never fail
//!
//! A rule reports problems by adding errors to the context, and stops its
//! chain with [`Context::skip`] or [`Context::abort`]. Only a configuration
//! mistake, such as a custom validator that was never registered, halts the
//! whole validation.
//!
//! ## 2. One document, many cursors
//!
//! The object and array schemas move the cursor to each child in turn. All
//! of them read and write the same working document, so cross-field rules
//! see values already transformed by higher-priority siblings.
//!
//! ```rust,ignore
//! use strata_validator::prelude::*;
//!
//! let schema = object().keys(keys! {
//!     "kind" => string().lowercase().priority(1),
//!     "code" => string().when("kind", "user", string().required()),
//! });
//! ```

pub mod context;
pub mod error;
pub mod registry;
pub mod traits;

pub use context::Context;
pub use error::{ConfigError, ErrorBag, ErrorKind, FieldError, MESSAGE_PLACEHOLDER, Violation};
pub use registry::{CustomValidator, Registry};
pub use traits::{Presence, Rule, RuleChain, Schema, SchemaRef};

// ============================================================================
// PRELUDE
// ============================================================================

/// Common imports for writing rules and custom validators.
pub mod prelude {
    pub use super::{
        ConfigError, Context, ErrorBag, ErrorKind, FieldError, Registry, Rule, Schema, SchemaRef,
        Violation,
    };
}
