//! Structured dot-delimited action paths.
//!
//! Paths are parsed once at the API boundary. Resolution against the action
//! tree, state mutation and middleware prefix filters all work on the parsed
//! segment list rather than rescanning the string.

use serde::{Deserialize, Serialize};
use std::fmt;

/// A parsed action path such as `todos.list.add`.
///
/// The last segment names the action; the segments before it locate the
/// state slot the action updates.
///
/// # Example
///
/// ```rust
/// use canopy::core::ActionPath;
///
/// let path = ActionPath::parse("todos.list.add");
/// assert_eq!(path.segments(), ["todos", "list", "add"]);
/// assert_eq!(path.action(), Some("add"));
/// assert_eq!(path.target(), ["todos", "list"]);
/// assert!(path.starts_with(&ActionPath::parse("todos")));
/// assert!(!path.starts_with(&ActionPath::parse("todo")));
/// ```
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub struct ActionPath {
    raw: String,
    segments: Vec<String>,
}

impl ActionPath {
    /// Parse a dot-delimited path.
    ///
    /// Parsing never fails. Empty segments are kept as-is, so `"a..b"` has
    /// three segments and will simply not resolve.
    pub fn parse(raw: impl Into<String>) -> Self {
        let raw = raw.into();
        let segments = raw.split('.').map(str::to_owned).collect();
        Self { raw, segments }
    }

    /// The path exactly as it was dispatched.
    pub fn as_str(&self) -> &str {
        &self.raw
    }

    /// All segments in order.
    pub fn segments(&self) -> &[String] {
        &self.segments
    }

    /// The final segment, naming the action to invoke.
    pub fn action(&self) -> Option<&str> {
        self.segments.last().map(String::as_str)
    }

    /// The segments before the action name: where in the state tree the
    /// update lands.
    pub fn target(&self) -> &[String] {
        match self.segments.split_last() {
            Some((_, rest)) => rest,
            None => &[],
        }
    }

    /// Segment-wise prefix test.
    ///
    /// `todos.add` starts with `todos` but not with `todo`.
    pub fn starts_with(&self, prefix: &ActionPath) -> bool {
        self.segments.starts_with(&prefix.segments)
    }
}

impl fmt::Display for ActionPath {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.raw)
    }
}

impl From<&str> for ActionPath {
    fn from(raw: &str) -> Self {
        Self::parse(raw)
    }
}

impl From<String> for ActionPath {
    fn from(raw: String) -> Self {
        Self::parse(raw)
    }
}

impl From<&ActionPath> for ActionPath {
    fn from(path: &ActionPath) -> Self {
        path.clone()
    }
}

impl From<ActionPath> for String {
    fn from(path: ActionPath) -> Self {
        path.raw
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parse_splits_on_dots() {
        let path = ActionPath::parse("todos.list.add");
        assert_eq!(path.segments(), ["todos", "list", "add"]);
        assert_eq!(path.as_str(), "todos.list.add");
    }

    #[test]
    fn single_segment_has_empty_target() {
        let path = ActionPath::parse("reset");
        assert_eq!(path.action(), Some("reset"));
        assert!(path.target().is_empty());
    }

    #[test]
    fn starts_with_matches_whole_segments_only() {
        let path = ActionPath::parse("todos.add");

        assert!(path.starts_with(&"todos".into()));
        assert!(path.starts_with(&"todos.add".into()));
        assert!(!path.starts_with(&"todo".into()));
        assert!(!path.starts_with(&"todos.add.more".into()));
        assert!(!ActionPath::parse("todosx.add").starts_with(&"todos".into()));
    }

    #[test]
    fn display_shows_raw_text() {
        assert_eq!(ActionPath::parse("a.b").to_string(), "a.b");
    }

    #[test]
    fn path_serializes_as_string() {
        let path = ActionPath::parse("chat.start");
        let json = serde_json::to_string(&path).unwrap();
        assert_eq!(json, "\"chat.start\"");

        let back: ActionPath = serde_json::from_str(&json).unwrap();
        assert_eq!(back, path);
    }
}
