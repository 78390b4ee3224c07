//! Path filters deciding which dispatches a middleware wraps.

use crate::core::ActionPath;
use std::fmt;
use std::sync::Arc;

type PathPredicate = Arc<dyn Fn(&ActionPath) -> bool + Send + Sync>;

/// Selects the dispatch paths a middleware applies to.
///
/// # Example
///
/// ```rust
/// use canopy::core::ActionPath;
/// use canopy::middleware::PathFilter;
///
/// let filter = PathFilter::prefixes(["todos", "chat.room"]);
///
/// assert!(filter.matches(&ActionPath::parse("todos.add")));
/// assert!(filter.matches(&ActionPath::parse("chat.room.join")));
/// assert!(!filter.matches(&ActionPath::parse("todo.add")));
/// assert!(!filter.matches(&ActionPath::parse("chat.leave")));
///
/// let only_resets = PathFilter::predicate(|p: &ActionPath| p.action() == Some("reset"));
/// assert!(only_resets.matches(&ActionPath::parse("form.reset")));
/// ```
#[derive(Clone, Default)]
pub enum PathFilter {
    /// Every path.
    #[default]
    Any,
    /// Paths that start with at least one of these paths, segment-wise.
    Prefixes(Vec<ActionPath>),
    /// Paths accepted by a custom predicate.
    Predicate(PathPredicate),
}

impl PathFilter {
    /// Match paths under any of the given prefixes.
    pub fn prefixes<I>(prefixes: I) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ActionPath>,
    {
        Self::Prefixes(prefixes.into_iter().map(Into::into).collect())
    }

    /// Match paths with a custom predicate.
    ///
    /// The predicate must be pure and thread-safe.
    pub fn predicate<F>(predicate: F) -> Self
    where
        F: Fn(&ActionPath) -> bool + Send + Sync + 'static,
    {
        Self::Predicate(Arc::new(predicate))
    }

    /// Check whether a dispatch of `path` should be wrapped.
    pub fn matches(&self, path: &ActionPath) -> bool {
        match self {
            Self::Any => true,
            Self::Prefixes(prefixes) => prefixes.iter().any(|prefix| path.starts_with(prefix)),
            Self::Predicate(predicate) => predicate(path),
        }
    }
}

impl fmt::Debug for PathFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Any => f.write_str("Any"),
            Self::Prefixes(prefixes) => f.debug_tuple("Prefixes").field(prefixes).finish(),
            Self::Predicate(_) => f.write_str("Predicate(..)"),
        }
    }
}
