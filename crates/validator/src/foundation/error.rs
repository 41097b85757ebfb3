//! Error types for validation failures
//!
//! Document problems are data: each one is a [`FieldError`] collected in an
//! [`ErrorBag`], and a single validation pass reports every independent
//! problem it finds. Schema misconfiguration is different: a
//! [`ConfigError`] halts the whole call and never lands in a bag.
//!
//! Messages use `Cow<'static, str>` so static messages are never allocated.

use std::borrow::Cow;
use std::collections::HashSet;
use std::fmt;
use std::hash::{Hash, Hasher};

use serde::{Serialize, Serializer};

use crate::value::{Value, ValueKind};

// ============================================================================
// ERROR KIND
// ============================================================================

/// What kind of rule a [`Violation`] came from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[non_exhaustive]
pub enum ErrorKind {
    /// The value does not have the schema's native kind.
    TypeMismatch,
    /// The value is absent but required.
    Required,
    /// String length or sequence count is out of bounds.
    LengthBound,
    /// Number is below a minimum or above a maximum.
    RangeBound,
    /// The value does not equal the expected one.
    Equality,
    /// String does not match a pattern.
    PatternMismatch,
    /// The value is (not) one of an allowed (forbidden) set.
    Membership,
    /// Two sequence elements share a composite key.
    Uniqueness,
    /// A mapping lacks required keys.
    MissingKeys,
    /// A mapping holds keys that must not appear together.
    ForbiddenKeys,
    /// Reported by a user check or custom validator.
    Custom,
}

impl ErrorKind {
    /// Stable machine-readable code.
    #[must_use]
    pub const fn code(self) -> &'static str {
        match self {
            Self::TypeMismatch => "type_mismatch",
            Self::Required => "required",
            Self::LengthBound => "length_bound",
            Self::RangeBound => "range_bound",
            Self::Equality => "equality",
            Self::PatternMismatch => "pattern_mismatch",
            Self::Membership => "membership",
            Self::Uniqueness => "uniqueness",
            Self::MissingKeys => "missing_keys",
            Self::ForbiddenKeys => "forbidden_keys",
            Self::Custom => "custom",
        }
    }
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.code())
    }
}

// ============================================================================
// VIOLATION
// ============================================================================

/// A rule failure before it is attached to a field path.
///
/// Rule closures passed to `check` return `Result<(), Violation>`.
///
/// # Examples
///
/// ```
/// use strata_validator::foundation::{ErrorKind, Violation};
///
/// let violation = Violation::custom("must be a prime number");
/// assert_eq!(violation.kind, ErrorKind::Custom);
/// assert_eq!(violation.message, "must be a prime number");
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Violation {
    /// Rule family, for programmatic handling.
    pub kind: ErrorKind,
    /// Human-readable message, rendered after the field path.
    pub message: Cow<'static, str>,
}

impl Violation {
    pub fn new(kind: ErrorKind, message: impl Into<Cow<'static, str>>) -> Self {
        Self {
            kind,
            message: message.into(),
        }
    }

    /// Creates a [`ErrorKind::Custom`] violation.
    pub fn custom(message: impl Into<Cow<'static, str>>) -> Self {
        Self::new(ErrorKind::Custom, message)
    }

    /// Attaches a rendered field path.
    #[must_use]
    pub fn at(self, field: impl Into<String>) -> FieldError {
        FieldError {
            field: field.into(),
            kind: self.kind,
            message: self.message,
        }
    }
}

impl fmt::Display for Violation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.message)
    }
}

impl std::error::Error for Violation {}

// ============================================================================
// CONVENIENCE CONSTRUCTORS
// ============================================================================

impl Violation {
    #[must_use]
    pub fn required() -> Self {
        Self::new(ErrorKind::Required, "is required")
    }

    #[must_use]
    pub fn type_mismatch(expected: ValueKind) -> Self {
        Self::new(ErrorKind::TypeMismatch, format!("must be {expected}"))
    }

    #[must_use]
    pub fn not_integer() -> Self {
        Self::new(ErrorKind::TypeMismatch, "must be an integer")
    }

    #[must_use]
    pub fn string_min_length(min: usize) -> Self {
        Self::new(
            ErrorKind::LengthBound,
            format!("must have at least {}", counted(min, "character")),
        )
    }

    #[must_use]
    pub fn string_max_length(max: usize) -> Self {
        Self::new(
            ErrorKind::LengthBound,
            format!("cannot have more than {}", counted(max, "character")),
        )
    }

    #[must_use]
    pub fn string_exact_length(length: usize) -> Self {
        Self::new(
            ErrorKind::LengthBound,
            format!("must have exactly {}", counted(length, "character")),
        )
    }

    #[must_use]
    pub fn array_min_length(min: usize) -> Self {
        Self::new(
            ErrorKind::LengthBound,
            format!("must have at least {}", counted(min, "item")),
        )
    }

    #[must_use]
    pub fn array_max_length(max: usize) -> Self {
        Self::new(
            ErrorKind::LengthBound,
            format!("cannot have more than {}", counted(max, "item")),
        )
    }

    #[must_use]
    pub fn array_exact_length(length: usize) -> Self {
        Self::new(
            ErrorKind::LengthBound,
            format!("must have exactly {}", counted(length, "item")),
        )
    }

    pub fn min(min: impl fmt::Display) -> Self {
        Self::new(ErrorKind::RangeBound, format!("must be >= {min}"))
    }

    pub fn max(max: impl fmt::Display) -> Self {
        Self::new(ErrorKind::RangeBound, format!("must be <= {max}"))
    }

    pub fn equal(expected: impl fmt::Display) -> Self {
        Self::new(ErrorKind::Equality, format!("must equal {expected}"))
    }

    pub fn one_of<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Self::new(
            ErrorKind::Membership,
            format!("must be one of [{}]", join(values)),
        )
    }

    pub fn not_one_of<I, T>(values: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Self::new(
            ErrorKind::Membership,
            format!("cannot be any of [{}]", join(values)),
        )
    }

    pub fn pattern(pattern: impl fmt::Display) -> Self {
        Self::new(
            ErrorKind::PatternMismatch,
            format!("must match pattern {pattern}"),
        )
    }

    pub fn unique_objects<I, T>(fields: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Self::new(
            ErrorKind::Uniqueness,
            format!("must be unique [fields: {}]", join(fields)),
        )
    }

    pub fn missing_keys<I, T>(keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Self::new(
            ErrorKind::MissingKeys,
            format!("is missing required keys [{}]", join(keys)),
        )
    }

    pub fn forbidden_keys<I, T>(keys: I) -> Self
    where
        I: IntoIterator<Item = T>,
        T: fmt::Display,
    {
        Self::new(
            ErrorKind::ForbiddenKeys,
            format!("contains forbidden keys [{}]", join(keys)),
        )
    }
}

fn counted(count: usize, noun: &str) -> String {
    if count == 1 {
        format!("{count} {noun}")
    } else {
        format!("{count} {noun}s")
    }
}

fn join<I, T>(items: I) -> String
where
    I: IntoIterator<Item = T>,
    T: fmt::Display,
{
    items
        .into_iter()
        .map(|item| item.to_string())
        .collect::<Vec<_>>()
        .join(", ")
}

// ============================================================================
// FIELD ERROR
// ============================================================================

/// A [`Violation`] attached to the rendered path of the field it concerns.
///
/// Equality and hashing look only at `field` and `message`; that pair is
/// what an [`ErrorBag`] deduplicates on.
#[derive(Debug, Clone, Eq)]
pub struct FieldError {
    /// Rendered field path, empty for the document root.
    pub field: String,
    /// Rule family.
    pub kind: ErrorKind,
    /// Human-readable message.
    pub message: Cow<'static, str>,
}

impl FieldError {
    pub fn new(field: impl Into<String>, violation: Violation) -> Self {
        violation.at(field)
    }

    /// Stable machine-readable code of the error kind.
    #[must_use]
    pub fn code(&self) -> &'static str {
        self.kind.code()
    }
}

impl PartialEq for FieldError {
    fn eq(&self, other: &Self) -> bool {
        self.field == other.field && self.message == other.message
    }
}

impl Hash for FieldError {
    fn hash<H: Hasher>(&self, state: &mut H) {
        self.field.hash(state);
        self.message.hash(state);
    }
}

impl fmt::Display for FieldError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.field.is_empty() {
            f.write_str(&self.message)
        } else {
            write!(f, "{} {}", self.field, self.message)
        }
    }
}

impl std::error::Error for FieldError {}

impl Serialize for FieldError {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_str(self)
    }
}

// ============================================================================
// ERROR BAG
// ============================================================================

/// Placeholder replaced by the original message when a template is active.
pub const MESSAGE_PLACEHOLDER: &str = "{message}";

/// A deduplicating collection of [`FieldError`]s.
///
/// Insertion order carries no meaning; [`ErrorBag::to_strings`] and the
/// `Display`/`Serialize` impls sort by rendered text so output is
/// deterministic.
///
/// While a message template is set, every added error has its message
/// rewritten through it, which is how conditional branches annotate the
/// errors they produce.
///
/// # Examples
///
/// ```
/// use strata_validator::foundation::{ErrorBag, FieldError, Violation};
///
/// let mut bag = ErrorBag::new();
/// bag.add(FieldError::new("name", Violation::required()));
/// bag.add(FieldError::new("name", Violation::required()));
/// assert_eq!(bag.len(), 1);
///
/// bag.set_template("{message} when kind = user");
/// bag.add(FieldError::new("age", Violation::min(18)));
/// assert_eq!(
///     bag.to_strings(),
///     vec!["age must be >= 18 when kind = user", "name is required"],
/// );
/// ```
#[derive(Debug, Clone, Default)]
pub struct ErrorBag {
    errors: HashSet<FieldError>,
    template: Option<String>,
    reported: usize,
}

impl ErrorBag {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Adds an error, applying the active template first.
    ///
    /// Adding an error equal to one already present leaves the set unchanged
    /// but still counts towards [`ErrorBag::reported`].
    pub fn add(&mut self, mut error: FieldError) {
        if let Some(template) = &self.template {
            error.message = Cow::Owned(apply_template(template, &error.message));
        }
        self.reported += 1;
        self.errors.insert(error);
    }

    /// How many errors were ever added, duplicates included.
    ///
    /// Compare two readings of this counter to learn whether a step reported
    /// anything; `len` cannot tell, since a re-reported error is deduplicated.
    #[must_use]
    pub fn reported(&self) -> usize {
        self.reported
    }

    /// Adds a custom message for `field`.
    pub fn add_message(&mut self, field: impl Into<String>, message: impl Into<Cow<'static, str>>) {
        self.add(FieldError::new(field, Violation::custom(message)));
    }

    /// Unions another bag into this one, applying this bag's template.
    pub fn add_bag(&mut self, other: &ErrorBag) {
        for error in &other.errors {
            self.add(error.clone());
        }
    }

    /// Like [`ErrorBag::add_bag`] but consumes `other`.
    pub fn merge(&mut self, other: ErrorBag) {
        for error in other.errors {
            self.add(error);
        }
    }

    /// Sets the message template. The first `{message}` is replaced by each
    /// original message; anything after it is copied as is.
    pub fn set_template(&mut self, template: impl Into<String>) {
        self.template = Some(template.into());
    }

    pub fn clear_template(&mut self) {
        self.template = None;
    }

    /// Swaps the active template, returning the previous one.
    pub fn replace_template(&mut self, template: Option<String>) -> Option<String> {
        std::mem::replace(&mut self.template, template)
    }

    #[must_use]
    pub fn template(&self) -> Option<&str> {
        self.template.as_deref()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.errors.is_empty()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.errors.len()
    }

    #[must_use]
    pub fn contains(&self, error: &FieldError) -> bool {
        self.errors.contains(error)
    }

    /// Iterates in unspecified order.
    pub fn iter(&self) -> impl Iterator<Item = &FieldError> {
        self.errors.iter()
    }

    /// Errors sorted by their rendered text.
    #[must_use]
    pub fn sorted(&self) -> Vec<&FieldError> {
        let mut errors: Vec<(String, &FieldError)> = self
            .errors
            .iter()
            .map(|error| (error.to_string(), error))
            .collect();
        errors.sort_by(|a, b| a.0.cmp(&b.0));
        errors.into_iter().map(|(_, error)| error).collect()
    }

    /// Rendered errors, `"<field> <message>"`, sorted lexicographically.
    #[must_use]
    pub fn to_strings(&self) -> Vec<String> {
        let mut list: Vec<String> = self.errors.iter().map(ToString::to_string).collect();
        list.sort();
        list
    }

    /// Keeps only the first `max` errors in sorted order.
    pub fn truncate(&mut self, max: usize) {
        if self.errors.len() <= max {
            return;
        }
        let keep: Vec<FieldError> = self.sorted().into_iter().take(max).cloned().collect();
        self.errors = keep.into_iter().collect();
    }

    /// Converts to a `Result`.
    #[must_use = "result must be used"]
    pub fn into_result<T>(self, ok_value: T) -> Result<T, ErrorBag> {
        if self.is_empty() {
            Ok(ok_value)
        } else {
            Err(self)
        }
    }
}

/// Substitutes only the first placeholder, so text that came from the
/// document (a reference value, say) is never expanded.
fn apply_template(template: &str, message: &str) -> String {
    template.replacen(MESSAGE_PLACEHOLDER, message, 1)
}

impl PartialEq for ErrorBag {
    fn eq(&self, other: &Self) -> bool {
        self.errors == other.errors
    }
}

impl Extend<FieldError> for ErrorBag {
    fn extend<I: IntoIterator<Item = FieldError>>(&mut self, iter: I) {
        for error in iter {
            self.add(error);
        }
    }
}

impl FromIterator<FieldError> for ErrorBag {
    fn from_iter<I: IntoIterator<Item = FieldError>>(iter: I) -> Self {
        let mut bag = Self::new();
        bag.extend(iter);
        bag
    }
}

impl IntoIterator for ErrorBag {
    type Item = FieldError;
    type IntoIter = std::collections::hash_set::IntoIter<FieldError>;

    fn into_iter(self) -> Self::IntoIter {
        self.errors.into_iter()
    }
}

impl fmt::Display for ErrorBag {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}]", self.to_strings().join("; "))
    }
}

impl std::error::Error for ErrorBag {}

impl Serialize for ErrorBag {
    fn serialize<S: Serializer>(&self, serializer: S) -> Result<S::Ok, S::Error> {
        serializer.collect_seq(self.to_strings())
    }
}

// ============================================================================
// CONFIGURATION ERROR
// ============================================================================

/// A schema that cannot run as built.
///
/// Returned from the engine instead of an outcome; never collected in an
/// [`ErrorBag`].
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ConfigError {
    /// `custom(name, ..)` names a validator the registry does not have.
    #[error("custom validator `{name}` is not registered")]
    UnknownValidator { name: String },

    /// A pattern rule was given a pattern that does not compile.
    #[error("invalid pattern `{pattern}`: {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

impl ConfigError {
    pub fn unknown_validator(name: impl Into<String>) -> Self {
        Self::UnknownValidator { name: name.into() }
    }
}

/// Renders a list of values for membership messages.
pub(crate) fn render_values(values: &[Value]) -> Vec<String> {
    values.iter().map(ToString::to_string).collect()
}

// ============================================================================
// TESTS
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn field_error_renders_path_then_message() {
        let error = FieldError::new("user.email", Violation::required());
        assert_eq!(error.to_string(), "user.email is required");
        assert_eq!(error.code(), "required");
    }

    #[test]
    fn root_error_renders_message_only() {
        let error = FieldError::new("", Violation::type_mismatch(ValueKind::Mapping));
        assert_eq!(error.to_string(), "must be an object");
    }

    #[test]
    fn dedup_ignores_kind() {
        let mut bag = ErrorBag::new();
        bag.add(FieldError::new("a", Violation::new(ErrorKind::Custom, "bad")));
        bag.add(FieldError::new("a", Violation::new(ErrorKind::Equality, "bad")));
        assert_eq!(bag.len(), 1);
    }

    #[test]
    fn template_applies_only_while_set() {
        let mut bag = ErrorBag::new();
        bag.set_template("{message} when x = 1");
        bag.add(FieldError::new("a", Violation::required()));
        bag.clear_template();
        bag.add(FieldError::new("b", Violation::required()));
        assert_eq!(bag.to_strings(), vec!["a is required when x = 1", "b is required"]);
    }

    #[test]
    fn template_expands_only_its_own_placeholder() {
        let mut bag = ErrorBag::new();
        bag.set_template("{message} when kind = {message}");
        bag.add(FieldError::new("code", Violation::required()));
        assert_eq!(bag.to_strings(), vec!["code is required when kind = {message}"]);
    }

    #[test]
    fn reported_counts_duplicates() {
        let mut bag = ErrorBag::new();
        bag.add(FieldError::new("a", Violation::required()));
        let before = bag.reported();
        bag.add(FieldError::new("a", Violation::required()));
        assert_eq!(bag.len(), 1);
        assert_eq!(bag.reported(), before + 1);
    }

    #[test]
    fn add_bag_reapplies_template() {
        let mut inner = ErrorBag::new();
        inner.add(FieldError::new("tags.0", Violation::string_min_length(2)));

        let mut outer = ErrorBag::new();
        outer.set_template("{message} when kind = b");
        outer.add_bag(&inner);
        assert_eq!(
            outer.to_strings(),
            vec!["tags.0 must have at least 2 characters when kind = b"]
        );
    }

    #[test]
    fn pluralization() {
        assert_eq!(Violation::string_min_length(1).message, "must have at least 1 character");
        assert_eq!(Violation::array_max_length(3).message, "cannot have more than 3 items");
    }

    #[test]
    fn display_and_serialize_are_sorted() {
        let bag: ErrorBag = vec![
            FieldError::new("b", Violation::required()),
            FieldError::new("a", Violation::required()),
        ]
        .into_iter()
        .collect();
        assert_eq!(bag.to_string(), "[a is required; b is required]");
        assert_eq!(
            serde_json::to_string(&bag).unwrap(),
            r#"["a is required","b is required"]"#
        );
    }

    #[test]
    fn truncate_keeps_sorted_prefix() {
        let mut bag: ErrorBag = ["c", "a", "b"]
            .into_iter()
            .map(|field| FieldError::new(field, Violation::required()))
            .collect();
        bag.truncate(2);
        assert_eq!(bag.to_strings(), vec!["a is required", "b is required"]);
    }

    #[test]
    fn into_result() {
        assert_eq!(ErrorBag::new().into_result(5), Ok(5));
        let bag: ErrorBag = std::iter::once(FieldError::new("a", Violation::required())).collect();
        assert!(bag.into_result(()).is_err());
    }

    #[test]
    fn config_error_display() {
        let error = ConfigError::unknown_validator("iban");
        assert_eq!(error.to_string(), "custom validator `iban` is not registered");
    }
}
