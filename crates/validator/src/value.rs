//! Dynamic document values
//!
//! Every document node is one [`Value`]: null, boolean, number, string,
//! ordered sequence, or string-keyed mapping. Numbers have a single `f64`
//! representation, so integer inputs are already normalized by the time
//! numeric rules run.
//!
//! # Examples
//!
//! ```
//! use strata_validator::value::{Value, ValueKind};
//! use serde_json::json;
//!
//! let value = Value::from(json!({"user": {"tags": ["a", "b"]}}));
//! assert_eq!(value.kind(), ValueKind::Mapping);
//! assert_eq!(value.get_path(&"user.tags.1".parse().unwrap()), Some(&Value::from("b")));
//! ```

use std::fmt;

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};

use crate::path::{FieldPath, Segment};

/// Insertion-ordered string-keyed mapping.
pub type Map = IndexMap<String, Value>;

// ============================================================================
// VALUE
// ============================================================================

/// A JSON-like document node.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Value {
    /// Absent value.
    #[default]
    Null,
    /// Boolean.
    Bool(bool),
    /// Number, always stored as `f64`.
    Number(f64),
    /// UTF-8 string.
    String(String),
    /// Ordered sequence.
    Sequence(Vec<Value>),
    /// String-keyed mapping.
    Mapping(Map),
}

/// The native kind of a [`Value`], used for type checks.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ValueKind {
    /// `Value::Null`
    Null,
    /// `Value::Bool`
    Bool,
    /// `Value::Number`
    Number,
    /// `Value::String`
    String,
    /// `Value::Sequence`
    Sequence,
    /// `Value::Mapping`
    Mapping,
}

impl ValueKind {
    /// Returns the kind's name as used in "must be ..." messages.
    #[must_use]
    pub const fn description(self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool => "a boolean",
            Self::Number => "a number",
            Self::String => "a string",
            Self::Sequence => "an array",
            Self::Mapping => "an object",
        }
    }
}

impl fmt::Display for ValueKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.description())
    }
}

impl Value {
    /// Returns the native kind of this value.
    #[must_use]
    pub const fn kind(&self) -> ValueKind {
        match self {
            Self::Null => ValueKind::Null,
            Self::Bool(_) => ValueKind::Bool,
            Self::Number(_) => ValueKind::Number,
            Self::String(_) => ValueKind::String,
            Self::Sequence(_) => ValueKind::Sequence,
            Self::Mapping(_) => ValueKind::Mapping,
        }
    }

    /// Short type name, as used in logs.
    #[must_use]
    pub const fn type_name(&self) -> &'static str {
        match self {
            Self::Null => "null",
            Self::Bool(_) => "boolean",
            Self::Number(_) => "number",
            Self::String(_) => "string",
            Self::Sequence(_) => "array",
            Self::Mapping(_) => "object",
        }
    }

    /// Returns true for `Value::Null`.
    #[must_use]
    pub const fn is_null(&self) -> bool {
        matches!(self, Self::Null)
    }

    #[must_use]
    pub const fn as_bool(&self) -> Option<bool> {
        match self {
            Self::Bool(b) => Some(*b),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_f64(&self) -> Option<f64> {
        match self {
            Self::Number(n) => Some(*n),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_str(&self) -> Option<&str> {
        match self {
            Self::String(s) => Some(s),
            _ => None,
        }
    }

    #[must_use]
    pub fn as_sequence(&self) -> Option<&[Value]> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    pub fn as_sequence_mut(&mut self) -> Option<&mut Vec<Value>> {
        match self {
            Self::Sequence(items) => Some(items),
            _ => None,
        }
    }

    #[must_use]
    pub const fn as_mapping(&self) -> Option<&Map> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    pub fn as_mapping_mut(&mut self) -> Option<&mut Map> {
        match self {
            Self::Mapping(map) => Some(map),
            _ => None,
        }
    }

    /// Returns the child addressed by a single segment.
    ///
    /// Key segments index mappings; they also index sequences when the key
    /// is a decimal integer, so reference paths like `items.0.id` work.
    #[must_use]
    pub fn get(&self, segment: &Segment) -> Option<&Value> {
        match (self, segment) {
            (Self::Mapping(map), Segment::Key(key)) => map.get(key.as_str()),
            (Self::Mapping(map), Segment::Index(index)) => map.get(index.to_string().as_str()),
            (Self::Sequence(items), Segment::Index(index)) => items.get(*index),
            (Self::Sequence(items), Segment::Key(key)) => {
                key.parse::<usize>().ok().and_then(|index| items.get(index))
            }
            _ => None,
        }
    }

    fn get_mut(&mut self, segment: &Segment) -> Option<&mut Value> {
        match (self, segment) {
            (Self::Mapping(map), Segment::Key(key)) => map.get_mut(key.as_str()),
            (Self::Mapping(map), Segment::Index(index)) => map.get_mut(index.to_string().as_str()),
            (Self::Sequence(items), Segment::Index(index)) => items.get_mut(*index),
            (Self::Sequence(items), Segment::Key(key)) => {
                key.parse::<usize>().ok().and_then(|index| items.get_mut(index))
            }
            _ => None,
        }
    }

    /// Follows `path` from this value. Returns `None` if any segment is absent.
    #[must_use]
    pub fn get_path(&self, path: &FieldPath) -> Option<&Value> {
        path.iter()
            .try_fold(self, |node, segment| node.get(segment))
    }

    /// Replaces the node at `path`, inserting the last key into its parent
    /// mapping when it is missing.
    ///
    /// Returns `false` when the parent of the target does not exist or
    /// cannot hold the last segment.
    pub fn set_path(&mut self, path: &FieldPath, value: Value) -> bool {
        let Some((last, parents)) = path.segments().split_last() else {
            *self = value;
            return true;
        };

        let mut node = self;
        for segment in parents {
            match node.get_mut(segment) {
                Some(next) => node = next,
                None => return false,
            }
        }

        if let Self::Mapping(map) = node {
            map.insert(last.to_string(), value);
            return true;
        }
        match node.get_mut(last) {
            Some(slot) => {
                *slot = value;
                true
            }
            None => false,
        }
    }

    /// Removes the mapping entry at `path`, keeping the order of the others.
    ///
    /// Sequence elements are left in place; removing one would renumber its
    /// siblings.
    pub fn remove_path(&mut self, path: &FieldPath) -> Option<Value> {
        let (last, parents) = path.segments().split_last()?;
        let mut node = self;
        for segment in parents {
            node = node.get_mut(segment)?;
        }
        match node {
            Self::Mapping(map) => map.shift_remove(last.to_string().as_str()),
            _ => None,
        }
    }
}

// ============================================================================
// DISPLAY
// ============================================================================

impl fmt::Display for Value {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::String(s) => f.write_str(s),
            other => write_nested(f, other),
        }
    }
}

/// Renders containers JSON-like, with strings quoted inside them.
fn write_nested(f: &mut fmt::Formatter<'_>, value: &Value) -> fmt::Result {
    match value {
        Value::Null => f.write_str("null"),
        Value::Bool(b) => write!(f, "{b}"),
        Value::Number(n) => write!(f, "{n}"),
        Value::String(s) => write!(f, "{s:?}"),
        Value::Sequence(items) => {
            f.write_str("[")?;
            for (i, item) in items.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write_nested(f, item)?;
            }
            f.write_str("]")
        }
        Value::Mapping(map) => {
            f.write_str("{")?;
            for (i, (key, item)) in map.iter().enumerate() {
                if i > 0 {
                    f.write_str(", ")?;
                }
                write!(f, "{key}: ")?;
                write_nested(f, item)?;
            }
            f.write_str("}")
        }
    }
}

// ============================================================================
// CONVERSIONS
// ============================================================================

macro_rules! impl_from_number {
    ($($ty:ty),* $(,)?) => {
        $(
            impl From<$ty> for Value {
                fn from(n: $ty) -> Self {
                    Self::Number(n as f64)
                }
            }
        )*
    };
}

impl_from_number!(i8, i16, i32, i64, isize, u8, u16, u32, u64, usize, f32);

impl From<f64> for Value {
    fn from(n: f64) -> Self {
        Self::Number(n)
    }
}

impl From<bool> for Value {
    fn from(b: bool) -> Self {
        Self::Bool(b)
    }
}

impl From<&str> for Value {
    fn from(s: &str) -> Self {
        Self::String(s.to_owned())
    }
}

impl From<String> for Value {
    fn from(s: String) -> Self {
        Self::String(s)
    }
}

impl From<Map> for Value {
    fn from(map: Map) -> Self {
        Self::Mapping(map)
    }
}

impl<T: Into<Value>> From<Vec<T>> for Value {
    fn from(items: Vec<T>) -> Self {
        Self::Sequence(items.into_iter().map(Into::into).collect())
    }
}

impl<T: Into<Value>> From<Option<T>> for Value {
    fn from(value: Option<T>) -> Self {
        value.map_or(Self::Null, Into::into)
    }
}

impl<T: Into<Value>> FromIterator<T> for Value {
    fn from_iter<I: IntoIterator<Item = T>>(iter: I) -> Self {
        Self::Sequence(iter.into_iter().map(Into::into).collect())
    }
}

impl From<serde_json::Value> for Value {
    fn from(value: serde_json::Value) -> Self {
        match value {
            serde_json::Value::Null => Self::Null,
            serde_json::Value::Bool(b) => Self::Bool(b),
            serde_json::Value::Number(n) => Self::Number(n.as_f64().unwrap_or_default()),
            serde_json::Value::String(s) => Self::String(s),
            serde_json::Value::Array(items) => {
                Self::Sequence(items.into_iter().map(Self::from).collect())
            }
            serde_json::Value::Object(map) => Self::Mapping(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

impl From<Value> for serde_json::Value {
    fn from(value: Value) -> Self {
        match value {
            Value::Null => Self::Null,
            Value::Bool(b) => Self::Bool(b),
            Value::Number(n) => number_to_json(n),
            Value::String(s) => Self::String(s),
            Value::Sequence(items) => Self::Array(items.into_iter().map(Self::from).collect()),
            Value::Mapping(map) => Self::Object(
                map.into_iter()
                    .map(|(key, value)| (key, Self::from(value)))
                    .collect(),
            ),
        }
    }
}

/// Whole numbers that fit an `i64` go back out as JSON integers.
fn number_to_json(n: f64) -> serde_json::Value {
    const I64_BOUND: f64 = 9_223_372_036_854_775_808.0;
    if n.fract() == 0.0 && n >= -I64_BOUND && n < I64_BOUND {
        serde_json::Value::from(n as i64)
    } else {
        serde_json::Number::from_f64(n).map_or(serde_json::Value::Null, serde_json::Value::Number)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn path(s: &str) -> FieldPath {
        s.parse().unwrap()
    }

    #[test]
    fn integers_normalize_to_floats() {
        assert_eq!(Value::from(json!(3)), Value::Number(3.0));
        assert_eq!(Value::from(7u8), Value::Number(7.0));
    }

    #[test]
    fn json_round_trip_keeps_integers() {
        let input = json!({"a": 1, "b": 1.5, "c": [true, null, "x"]});
        let back = serde_json::Value::from(Value::from(input.clone()));
        assert_eq!(back, input);
    }

    #[test]
    fn display_renders_like_go_verbs() {
        assert_eq!(Value::from(3.0).to_string(), "3");
        assert_eq!(Value::from(3.5).to_string(), "3.5");
        assert_eq!(Value::from("US").to_string(), "US");
        assert_eq!(Value::from(json!(["a", 1])).to_string(), r#"["a", 1]"#);
        assert_eq!(Value::from(json!({"k": "v"})).to_string(), r#"{k: "v"}"#);
    }

    #[test]
    fn get_path_walks_mappings_and_sequences() {
        let doc = Value::from(json!({"items": [{"id": "a"}, {"id": "b"}]}));
        assert_eq!(doc.get_path(&path("items.1.id")), Some(&Value::from("b")));
        assert_eq!(doc.get_path(&path("items.2.id")), None);
        assert_eq!(doc.get_path(&path("missing")), None);
        assert_eq!(doc.get_path(&FieldPath::root()), Some(&doc));
    }

    #[test]
    fn set_path_inserts_missing_key() {
        let mut doc = Value::from(json!({"user": {}}));
        assert!(doc.set_path(&path("user.name"), Value::from("ann")));
        assert_eq!(doc, Value::from(json!({"user": {"name": "ann"}})));
    }

    #[test]
    fn set_path_replaces_sequence_slot_only_in_bounds() {
        let mut doc = Value::from(json!([1, 2]));
        assert!(doc.set_path(&FieldPath::root().child(1usize), Value::from(5)));
        assert!(!doc.set_path(&FieldPath::root().child(4usize), Value::from(5)));
        assert_eq!(doc, Value::from(json!([1, 5])));
    }

    #[test]
    fn set_path_fails_without_parent() {
        let mut doc = Value::from(json!({}));
        assert!(!doc.set_path(&path("a.b"), Value::from(1)));
    }

    #[test]
    fn remove_path_keeps_key_order() {
        let mut doc = Value::from(json!({"o": {"a": 1, "b": 2, "c": 3}}));
        assert_eq!(doc.remove_path(&path("o.b")), Some(Value::from(2)));
        let inner = doc.get_path(&path("o")).and_then(Value::as_mapping).unwrap();
        assert_eq!(inner.keys().collect::<Vec<_>>(), vec!["a", "c"]);
        assert_eq!(doc.remove_path(&path("o.z")), None);
    }

    #[test]
    fn remove_path_leaves_sequences_alone() {
        let mut doc = Value::from(json!({"xs": [1, 2]}));
        assert_eq!(doc.remove_path(&path("xs.0")), None);
        assert_eq!(doc, Value::from(json!({"xs": [1, 2]})));
    }

    #[test]
    fn deserializes_untagged() {
        let value: Value = serde_json::from_str(r#"{"n": 2, "s": "x", "z": null}"#).unwrap();
        let map = value.as_mapping().unwrap();
        assert_eq!(map["n"], Value::Number(2.0));
        assert_eq!(map["z"], Value::Null);
    }
}
