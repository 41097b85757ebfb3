//! Validation context
//!
//! A [`Context`] is the mutable cursor a schema's rule chain runs over. It
//! owns the current value and its path, shares the working document and the
//! custom validator registry with every nested context, and collects errors.
//!
//! # Control flow
//!
//! Rules never return errors. They signal through the context:
//!
//! - [`Context::skip`] stops the remaining rules of the current chain
//!   without recording anything (absent and optional).
//! - [`Context::abort`] records an error and stops the current chain
//!   (wrong shape, nothing further makes sense).
//! - [`Context::report`] records an error and lets the chain continue.
//!
//! Skipping is local: the object key evaluator clears it before every key,
//! so one field never stops its siblings.
//!
//! # References
//!
//! [`Context::reference`] reads another node of the document by a
//! separator-delimited path. The working document is updated as keys are
//! validated, so a field evaluated later sees the transformed values of
//! fields evaluated earlier.

use std::borrow::Cow;

use crate::engine::EngineOptions;
use crate::foundation::error::{ConfigError, ErrorBag, FieldError, Violation};
use crate::foundation::registry::Registry;
use crate::path::{FieldPath, Segment};
use crate::value::{Map, Value, ValueKind};

/// Per-validation mutable state.
pub struct Context<'a> {
    value: Value,
    path: FieldPath,
    document: &'a mut Value,
    parent: Option<FieldPath>,
    parent_root: Option<FieldPath>,
    errors: ErrorBag,
    skip: bool,
    fatal: Option<ConfigError>,
    registry: &'a Registry,
    options: &'a EngineOptions,
}

/// What a nested context hands back to its parent.
pub(crate) struct Nested {
    pub(crate) value: Value,
    pub(crate) errors: ErrorBag,
    pub(crate) skipped: bool,
    pub(crate) fatal: Option<ConfigError>,
}

impl<'a> Context<'a> {
    /// Creates the context for a top-level validation.
    ///
    /// `document` is the working copy of the whole input; `value` is the
    /// root node the schema starts from.
    pub fn new(
        value: Value,
        document: &'a mut Value,
        registry: &'a Registry,
        options: &'a EngineOptions,
    ) -> Self {
        Self {
            value,
            path: FieldPath::root(),
            document,
            parent: None,
            parent_root: None,
            errors: ErrorBag::new(),
            skip: false,
            fatal: None,
            registry,
            options,
        }
    }

    // ------------------------------------------------------------------------
    // value
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn value(&self) -> &Value {
        &self.value
    }

    pub fn value_mut(&mut self) -> &mut Value {
        &mut self.value
    }

    pub fn set_value(&mut self, value: impl Into<Value>) {
        self.value = value.into();
    }

    /// Moves the current value out, leaving `Value::Null`.
    pub fn take_value(&mut self) -> Value {
        std::mem::take(&mut self.value)
    }

    /// Reports whether the current value has `kind`. Never mutates.
    #[must_use]
    pub fn assert_kind(&self, kind: ValueKind) -> bool {
        self.value.kind() == kind
    }

    // ------------------------------------------------------------------------
    // paths
    // ------------------------------------------------------------------------

    #[must_use]
    pub fn path(&self) -> &FieldPath {
        &self.path
    }

    /// The current path rendered with the configured separator.
    #[must_use]
    pub fn field_path(&self) -> String {
        self.path.render(&self.options.path_separator)
    }

    /// Last segment of the current path, if any.
    #[must_use]
    pub fn field_name(&self) -> Option<String> {
        self.path.last().map(ToString::to_string)
    }

    // ------------------------------------------------------------------------
    // control flow
    // ------------------------------------------------------------------------

    /// Stops the remaining rules of the current chain.
    pub fn skip(&mut self) {
        self.skip = true;
    }

    /// Records `violation` at the current path and stops the current chain.
    pub fn abort(&mut self, violation: Violation) {
        self.report(violation);
        self.skip = true;
    }

    #[must_use]
    pub fn is_skipped(&self) -> bool {
        self.skip
    }

    /// Halts the whole validation with a configuration error.
    pub fn fail(&mut self, error: ConfigError) {
        if self.fatal.is_none() {
            self.fatal = Some(error);
        }
        self.skip = true;
    }

    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.fatal.is_some()
    }

    // ------------------------------------------------------------------------
    // errors
    // ------------------------------------------------------------------------

    /// Records `violation` at the current path. Does not stop the chain.
    pub fn report(&mut self, violation: Violation) {
        let field = self.field_path();
        self.errors.add(violation.at(field));
    }

    /// Records a custom message at the current path.
    pub fn report_message(&mut self, message: impl Into<Cow<'static, str>>) {
        self.report(Violation::custom(message));
    }

    /// Records an already-built error as is.
    pub fn add_error(&mut self, error: FieldError) {
        self.errors.add(error);
    }

    #[must_use]
    pub fn errors(&self) -> &ErrorBag {
        &self.errors
    }

    pub fn errors_mut(&mut self) -> &mut ErrorBag {
        &mut self.errors
    }

    // ------------------------------------------------------------------------
    // document
    // ------------------------------------------------------------------------

    /// The live working copy of the whole document.
    #[must_use]
    pub fn root(&self) -> &Value {
        self.document
    }

    /// The nearest enclosing mapping, if the current value is a mapping key.
    #[must_use]
    pub fn parent(&self) -> Option<&Map> {
        self.parent
            .as_ref()
            .and_then(|path| self.document.get_path(path))
            .and_then(Value::as_mapping)
    }

    /// Resolves `path` against the reference anchors.
    ///
    /// Anchors are tried in order: the first ancestor mapping that holds a
    /// nested object schema, the nearest enclosing mapping, then the
    /// document root. Returns `None` when no anchor contains every segment.
    #[must_use]
    pub fn reference(&self, path: &str) -> Option<&Value> {
        let target = FieldPath::parse_with(path, &self.options.path_separator);
        let root = FieldPath::root();
        let anchors = [self.parent_root.as_ref(), self.parent.as_ref(), Some(&root)];

        let mut tried: Vec<&FieldPath> = Vec::with_capacity(anchors.len());
        for anchor in anchors.into_iter().flatten() {
            if tried.contains(&anchor) {
                continue;
            }
            tried.push(anchor);
            let found = self
                .document
                .get_path(anchor)
                .and_then(|node| node.get_path(&target));
            if found.is_some() {
                return found;
            }
        }
        None
    }

    pub fn registry(&self) -> &'a Registry {
        self.registry
    }

    #[must_use]
    pub fn options(&self) -> &'a EngineOptions {
        self.options
    }

    // ------------------------------------------------------------------------
    // scoped descent (used by the array and object schemas)
    // ------------------------------------------------------------------------

    /// Writes the current value into the working document at the current
    /// path, so references see it while its children are validated.
    pub(crate) fn sync_document(&mut self) {
        self.document.set_path(&self.path, self.value.clone());
    }

    /// Writes `value` into the working document at `path`.
    pub(crate) fn write_document(&mut self, path: &FieldPath, value: Value) {
        self.document.set_path(path, value);
    }

    /// Puts `original` back at `path`, removing the entry when there was
    /// none.
    pub(crate) fn restore_document(&mut self, path: &FieldPath, original: Option<Value>) {
        match original {
            Some(value) => {
                self.document.set_path(path, value);
            }
            None => {
                self.document.remove_path(path);
            }
        }
    }

    /// Repositions this context on a child without creating a new one.
    ///
    /// Returns the previous value, path, and parent so the caller can
    /// restore them.
    pub(crate) fn enter(&mut self, value: Value, path: FieldPath, parent: FieldPath) -> Scope {
        Scope {
            value: std::mem::replace(&mut self.value, value),
            path: std::mem::replace(&mut self.path, path),
            parent: self.parent.replace(parent),
        }
    }

    pub(crate) fn leave(&mut self, scope: Scope) {
        self.value = scope.value;
        self.path = scope.path;
        self.parent = scope.parent;
        self.skip = false;
    }

    pub(crate) fn has_parent_root(&self) -> bool {
        self.parent_root.is_some()
    }

    pub(crate) fn set_parent_root(&mut self, path: FieldPath) {
        self.parent_root = Some(path);
    }

    /// Creates an isolated context for one sequence element.
    ///
    /// The child shares the document, registry, and reference anchors but
    /// has its own error bag and skip flag.
    pub(crate) fn nested(&mut self, value: Value, segment: impl Into<Segment>) -> Context<'_> {
        Context {
            value,
            path: self.path.child(segment),
            document: &mut *self.document,
            parent: self.parent.clone(),
            parent_root: self.parent_root.clone(),
            errors: ErrorBag::new(),
            skip: false,
            fatal: None,
            registry: self.registry,
            options: self.options,
        }
    }

    pub(crate) fn finish(self) -> Nested {
        Nested {
            value: self.value,
            errors: self.errors,
            skipped: self.skip,
            fatal: self.fatal,
        }
    }

    /// Consumes the context, returning the final value, the errors, and a
    /// configuration error if one halted validation.
    pub fn into_parts(self) -> (Value, ErrorBag, Option<ConfigError>) {
        (self.value, self.errors, self.fatal)
    }
}

/// Saved cursor state for [`Context::enter`] / [`Context::leave`].
pub(crate) struct Scope {
    value: Value,
    path: FieldPath,
    parent: Option<FieldPath>,
}

impl std::fmt::Debug for Context<'_> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Context")
            .field("value", &self.value)
            .field("path", &self.field_path())
            .field("parent", &self.parent)
            .field("parent_root", &self.parent_root)
            .field("errors", &self.errors.len())
            .field("skip", &self.skip)
            .field("fatal", &self.fatal)
            .finish_non_exhaustive()
    }
}
