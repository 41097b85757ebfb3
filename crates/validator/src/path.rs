//! Field paths
//!
//! A [`FieldPath`] locates a node inside the document being validated. It is
//! both the location the engine reads and writes through, and the prefix of
//! every error message reported for that node.

use std::convert::Infallible;
use std::fmt;
use std::str::FromStr;

use smallvec::SmallVec;

/// Default separator used when rendering paths and splitting reference paths.
pub const DEFAULT_SEPARATOR: &str = ".";

// ============================================================================
// SEGMENT
// ============================================================================

/// One step of a [`FieldPath`]: a mapping key or a sequence index.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum Segment {
    /// Mapping key.
    Key(String),
    /// Sequence index, rendered as a decimal string.
    Index(usize),
}

impl fmt::Display for Segment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Key(key) => f.write_str(key),
            Self::Index(index) => write!(f, "{index}"),
        }
    }
}

impl From<&str> for Segment {
    fn from(key: &str) -> Self {
        Self::Key(key.to_owned())
    }
}

impl From<String> for Segment {
    fn from(key: String) -> Self {
        Self::Key(key)
    }
}

impl From<usize> for Segment {
    fn from(index: usize) -> Self {
        Self::Index(index)
    }
}

// ============================================================================
// FIELD PATH
// ============================================================================

/// Ordered sequence of segments from the document root.
///
/// The empty path addresses the root itself.
#[derive(Debug, Clone, Default, PartialEq, Eq, Hash)]
pub struct FieldPath {
    segments: SmallVec<[Segment; 6]>,
}

impl FieldPath {
    /// The path of the document root.
    #[must_use]
    pub fn root() -> Self {
        Self::default()
    }

    /// Splits `path` on `separator`, ignoring empty pieces.
    ///
    /// Every piece becomes a [`Segment::Key`]; keys that look like integers
    /// still address sequence elements when resolved.
    #[must_use]
    pub fn parse_with(path: &str, separator: &str) -> Self {
        let segments = if separator.is_empty() {
            SmallVec::from_iter((!path.is_empty()).then(|| Segment::from(path)))
        } else {
            path.split(separator)
                .filter(|piece| !piece.is_empty())
                .map(Segment::from)
                .collect()
        };
        Self { segments }
    }

    /// Returns a copy of this path extended by one segment.
    #[must_use]
    pub fn child(&self, segment: impl Into<Segment>) -> Self {
        let mut path = self.clone();
        path.push(segment);
        path
    }

    pub fn push(&mut self, segment: impl Into<Segment>) {
        self.segments.push(segment.into());
    }

    pub fn pop(&mut self) -> Option<Segment> {
        self.segments.pop()
    }

    #[must_use]
    pub fn segments(&self) -> &[Segment] {
        &self.segments
    }

    pub fn iter(&self) -> std::slice::Iter<'_, Segment> {
        self.segments.iter()
    }

    #[must_use]
    pub fn last(&self) -> Option<&Segment> {
        self.segments.last()
    }

    #[must_use]
    pub fn len(&self) -> usize {
        self.segments.len()
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.segments.is_empty()
    }

    /// Joins the segments with `separator`.
    #[must_use]
    pub fn render(&self, separator: &str) -> String {
        let mut out = String::new();
        for (i, segment) in self.segments.iter().enumerate() {
            if i > 0 {
                out.push_str(separator);
            }
            out.push_str(&segment.to_string());
        }
        out
    }
}

impl fmt::Display for FieldPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.render(DEFAULT_SEPARATOR))
    }
}

impl FromStr for FieldPath {
    type Err = Infallible;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Ok(Self::parse_with(s, DEFAULT_SEPARATOR))
    }
}

impl<'a> IntoIterator for &'a FieldPath {
    type Item = &'a Segment;
    type IntoIter = std::slice::Iter<'a, Segment>;

    fn into_iter(self) -> Self::IntoIter {
        self.segments.iter()
    }
}

impl<S: Into<Segment>> FromIterator<S> for FieldPath {
    fn from_iter<I: IntoIterator<Item = S>>(iter: I) -> Self {
        Self {
            segments: iter.into_iter().map(Into::into).collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn renders_keys_and_indices() {
        let path = FieldPath::root().child("orders").child(2usize).child("sku");
        assert_eq!(path.to_string(), "orders.2.sku");
        assert_eq!(path.render("/"), "orders/2/sku");
    }

    #[test]
    fn root_renders_empty() {
        assert_eq!(FieldPath::root().to_string(), "");
        assert!(FieldPath::root().is_empty());
    }

    #[test]
    fn parse_skips_empty_pieces() {
        let path = FieldPath::parse_with("a..b.", ".");
        assert_eq!(path.segments(), &[Segment::from("a"), Segment::from("b")]);
    }

    #[test]
    fn parse_with_custom_separator() {
        let path = FieldPath::parse_with("a/b.c", "/");
        assert_eq!(path.len(), 2);
        assert_eq!(path.last(), Some(&Segment::from("b.c")));
    }

    #[test]
    fn push_pop() {
        let mut path = FieldPath::root();
        path.push("user");
        path.push(0usize);
        assert_eq!(path.pop(), Some(Segment::Index(0)));
        assert_eq!(path.to_string(), "user");
    }
}
