//! Field path representation for navigating nested form values.
//!
//! Paths are sequences of segments that describe a location in a form value.
//! Each segment is either a key (for objects) or an index (for arrays).
//! The runtime form is a plain dotted string such as `user.addresses.0.city`;
//! any segment that parses as a non-negative integer is an index segment.

use std::fmt;

/// A single segment in a field path.
#[derive(Clone, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Seg {
    /// Object key access: `{"key": value}`
    Key(String),
    /// Array index access: `[index]`
    Index(usize),
}

impl Seg {
    /// Parse a single segment: a non-negative integer becomes an index,
    /// anything else a key.
    pub fn parse(segment: &str) -> Self {
        match segment.parse::<usize>() {
            Ok(i) => Seg::Index(i),
            Err(_) => Seg::Key(segment.to_owned()),
        }
    }

    /// Returns true if this is an index segment.
    #[inline]
    pub fn is_index(&self) -> bool {
        matches!(self, Seg::Index(_))
    }

    /// Get the key if this is a key segment.
    #[inline]
    pub fn as_key(&self) -> Option<&str> {
        match self {
            Seg::Key(k) => Some(k),
            Seg::Index(_) => None,
        }
    }

    /// Get the index if this is an index segment.
    #[inline]
    pub fn as_index(&self) -> Option<usize> {
        match self {
            Seg::Key(_) => None,
            Seg::Index(i) => Some(*i),
        }
    }
}

impl fmt::Display for Seg {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Seg::Key(k) => write!(f, "{k}"),
            Seg::Index(i) => write!(f, "{i}"),
        }
    }
}

impl From<&str> for Seg {
    fn from(s: &str) -> Self {
        Seg::Key(s.to_owned())
    }
}

impl From<String> for Seg {
    fn from(s: String) -> Self {
        Seg::Key(s)
    }
}

impl From<usize> for Seg {
    fn from(i: usize) -> Self {
        Seg::Index(i)
    }
}

/// A complete path into a nested form value.
///
/// # Examples
///
/// ```
/// use formwork::Path;
///
/// let path = Path::parse("user.addresses.0.city");
/// assert_eq!(path.len(), 4);
/// assert_eq!(path.to_string(), "user.addresses.0.city");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Path(Vec<Seg>);

impl Path {
    /// Create an empty path (root).
    #[inline]
    pub fn root() -> Self {
        Self(Vec::new())
    }

    /// Parse a dotted path string.
    ///
    /// Segments are separated by `.`; a segment that parses as a
    /// non-negative integer is an array index, anything else an object key.
    /// Empty segments (leading, trailing, or doubled dots) are skipped.
    ///
    /// # Examples
    ///
    /// ```
    /// use formwork::{Path, Seg};
    ///
    /// let path = Path::parse("items.2.name");
    /// assert_eq!(path.segments()[1], Seg::Index(2));
    /// assert!(Path::parse("").is_empty());
    /// ```
    pub fn parse(path: &str) -> Self {
        Self(
            path.split('.')
                .filter(|segment| !segment.is_empty())
                .map(Seg::parse)
                .collect(),
        )
    }

    /// Create a path from a vector of segments.
    #[inline]
    pub fn from_segments(segments: Vec<Seg>) -> Self {
        Self(segments)
    }

    /// Append a key segment and return self (builder pattern).
    #[inline]
    pub fn key(mut self, k: impl Into<String>) -> Self {
        self.0.push(Seg::Key(k.into()));
        self
    }

    /// Append an index segment and return self (builder pattern).
    #[inline]
    pub fn index(mut self, i: usize) -> Self {
        self.0.push(Seg::Index(i));
        self
    }

    /// Push a segment onto the path (mutating).
    #[inline]
    pub fn push(&mut self, seg: Seg) {
        self.0.push(seg);
    }

    /// Get the segments of this path.
    #[inline]
    pub fn segments(&self) -> &[Seg] {
        &self.0
    }

    /// Check if this path is empty (root).
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Get the number of segments in this path.
    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Get the last segment.
    #[inline]
    pub fn last(&self) -> Option<&Seg> {
        self.0.last()
    }

    /// Get the parent path (path without the last segment).
    #[inline]
    pub fn parent(&self) -> Option<Path> {
        if self.0.is_empty() {
            None
        } else {
            Some(Path(self.0[..self.0.len() - 1].to_vec()))
        }
    }

    /// Check if this path is a prefix of another path.
    ///
    /// A path is a prefix of itself.
    ///
    /// # Examples
    ///
    /// ```
    /// use formwork::Path;
    ///
    /// let list = Path::parse("items");
    /// let element = Path::parse("items.0.name");
    /// assert!(list.is_prefix_of(&element));
    /// assert!(!element.is_prefix_of(&list));
    /// ```
    #[inline]
    pub fn is_prefix_of(&self, other: &Path) -> bool {
        other.0.len() >= self.0.len() && self.0.iter().zip(other.0.iter()).all(|(a, b)| a == b)
    }

    /// Iterate over the segments.
    #[inline]
    pub fn iter(&self) -> impl Iterator<Item = &Seg> {
        self.0.iter()
    }
}

impl fmt::Display for Path {
    /// Renders the canonical dotted form, e.g. `user.addresses.0.city`.
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for (i, seg) in self.0.iter().enumerate() {
            if i > 0 {
                write!(f, ".")?;
            }
            write!(f, "{seg}")?;
        }
        Ok(())
    }
}

impl From<&str> for Path {
    fn from(s: &str) -> Self {
        Path::parse(s)
    }
}

impl FromIterator<Seg> for Path {
    fn from_iter<I: IntoIterator<Item = Seg>>(iter: I) -> Self {
        Path(iter.into_iter().collect())
    }
}

impl std::ops::Index<usize> for Path {
    type Output = Seg;

    fn index(&self, index: usize) -> &Self::Output {
        &self.0[index]
    }
}

/// Construct a `Path` from a sequence of segments.
///
/// # Examples
///
/// ```
/// use formwork::path;
///
/// // String literals become key segments, numbers become index segments.
/// let p = path!("items", 0, "name");
/// assert_eq!(p.to_string(), "items.0.name");
/// ```
#[macro_export]
macro_rules! path {
    () => {
        $crate::Path::root()
    };
    ($($seg:expr),+ $(,)?) => {{
        let mut p = $crate::Path::root();
        $(
            p.push($crate::Seg::from($seg));
        )+
        p
    }};
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::path;

    #[test]
    fn parse_mixed_segments() {
        let path = Path::parse("user.addresses.0.city");
        assert_eq!(path.len(), 4);
        assert_eq!(path[0], Seg::Key("user".into()));
        assert_eq!(path[2], Seg::Index(0));
        assert_eq!(path[3], Seg::Key("city".into()));
    }

    #[test]
    fn parse_skips_empty_segments() {
        assert_eq!(Path::parse(".a..b.").to_string(), "a.b");
        assert!(Path::parse("").is_empty());
    }

    #[test]
    fn display_round_trips() {
        let raw = "form.fields.12.options.3";
        assert_eq!(Path::parse(raw).to_string(), raw);
    }

    #[test]
    fn builder_and_macro_agree() {
        let built = Path::root().key("items").index(1).key("id");
        assert_eq!(built, path!("items", 1usize, "id"));
    }

    #[test]
    fn prefix_relation() {
        let list = Path::parse("a.b");
        assert!(list.is_prefix_of(&Path::parse("a.b.0")));
        assert!(list.is_prefix_of(&list));
        assert!(!list.is_prefix_of(&Path::parse("a.c.0")));
        assert!(!Path::parse("a.b.0").is_prefix_of(&list));
    }

    #[test]
    fn parent_of_root_is_none() {
        assert!(Path::root().parent().is_none());
        assert_eq!(Path::parse("a.b").parent(), Some(Path::parse("a")));
    }

    #[test]
    fn negative_and_decorated_numbers_are_keys() {
        assert_eq!(Seg::parse("-1"), Seg::Key("-1".into()));
        assert_eq!(Seg::parse("1.5"), Seg::Key("1.5".into()));
        assert_eq!(Seg::parse("10"), Seg::Index(10));
    }
}
