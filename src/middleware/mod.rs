//! Middleware wrapping the dispatch of actions.
//!
//! A middleware receives the dispatched path, the next (inner) transition and
//! the store, and returns a transition that may call `next` once, several
//! times or not at all. It reads the live state through the store and writes
//! it with [`Store::update`]. Middlewares are composed right-to-left around
//! the base transition, so the first one registered is the outermost and runs
//! first.
//!
//! # Example
//!
//! ```rust
//! use canopy::core::ActionTree;
//! use canopy::middleware::Middleware;
//! use canopy::Store;
//! use serde_json::{json, Value};
//!
//! let mut store = Store::with_actions(
//!     ActionTree::new().branch("counter", ActionTree::new().init(|| json!(0)).action("add", |prev, by| {
//!         json!(prev.as_i64().unwrap_or(0) + by.as_i64().unwrap_or(0))
//!     })),
//! );
//!
//! // Double every payload sent to the counter.
//! let handle = store.attach(Middleware::scoped(["counter"], |_path, next, _store| {
//!     Box::new(move |payload: &Value| next(&json!(payload.as_i64().unwrap_or(0) * 2)))
//! }));
//!
//! store.dispatch("counter.add", 2).unwrap();
//! assert_eq!(store.state()["counter"], json!(4));
//!
//! // Cap the counter by reading the current state before calling through.
//! store.attach(Middleware::scoped(["counter"], |_path, next, store| {
//!     Box::new(move |payload: &Value| {
//!         let current = store.select("counter").and_then(|value| value.as_i64());
//!         if current.is_some_and(|n| n >= 10) {
//!             return Ok(());
//!         }
//!         next(payload)
//!     })
//! }));
//!
//! assert!(handle.detach(&mut store));
//! store.dispatch("counter.add", 7).unwrap();
//! store.dispatch("counter.add", 7).unwrap();
//! assert_eq!(store.state()["counter"], json!(11));
//! ```

mod filter;
mod history;
mod logger;

pub use filter::PathFilter;
pub use history::HistoryRecorder;
pub use logger::logger;

use crate::core::ActionPath;
use crate::store::{Store, StoreError};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::fmt;
use std::sync::Arc;
use uuid::Uuid;

/// A transition as seen from inside the chain, called with the payload.
///
/// The state it works on is the store's own; whatever is in the store when
/// the outermost transition returns `Ok(())` is the new state.
pub type Next<'a> = Box<dyn Fn(&Value) -> Result<(), StoreError> + 'a>;

/// The user function of a middleware: `(path, next, store) -> transition`.
pub type MiddlewareFn =
    Arc<dyn for<'a> Fn(&'a ActionPath, Next<'a>, &'a Store) -> Next<'a> + Send + Sync>;

/// Identifies one registered middleware.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MiddlewareId(Uuid);

impl MiddlewareId {
    fn new() -> Self {
        Self(Uuid::new_v4())
    }
}

impl fmt::Display for MiddlewareId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Display::fmt(&self.0, f)
    }
}

/// A middleware registration: a path filter plus the wrapping function.
///
/// When the filter does not match the dispatched path the middleware is a
/// pass-through and `next` is used unchanged.
#[derive(Clone)]
pub struct Middleware {
    id: MiddlewareId,
    filter: PathFilter,
    wrap: MiddlewareFn,
}

impl Middleware {
    /// A global middleware, wrapping every dispatch.
    ///
    /// It can still implement its own selection by returning `next`
    /// unchanged for paths it is not interested in.
    pub fn new<F>(wrap: F) -> Self
    where
        F: for<'a> Fn(&'a ActionPath, Next<'a>, &'a Store) -> Next<'a> + Send + Sync + 'static,
    {
        Self {
            id: MiddlewareId::new(),
            filter: PathFilter::Any,
            wrap: Arc::new(wrap),
        }
    }

    /// A middleware wrapping only dispatches under one of `prefixes`.
    pub fn scoped<I, F>(prefixes: I, wrap: F) -> Self
    where
        I: IntoIterator,
        I::Item: Into<ActionPath>,
        F: for<'a> Fn(&'a ActionPath, Next<'a>, &'a Store) -> Next<'a> + Send + Sync + 'static,
    {
        Self::new(wrap).with_filter(PathFilter::prefixes(prefixes))
    }

    /// A middleware wrapping only dispatches accepted by `predicate`.
    pub fn guarded<P, F>(predicate: P, wrap: F) -> Self
    where
        P: Fn(&ActionPath) -> bool + Send + Sync + 'static,
        F: for<'a> Fn(&'a ActionPath, Next<'a>, &'a Store) -> Next<'a> + Send + Sync + 'static,
    {
        Self::new(wrap).with_filter(PathFilter::predicate(predicate))
    }

    /// Replace the path filter.
    pub fn with_filter(mut self, filter: PathFilter) -> Self {
        self.filter = filter;
        self
    }

    pub fn id(&self) -> MiddlewareId {
        self.id
    }

    pub fn filter(&self) -> &PathFilter {
        &self.filter
    }

    /// Wrap `next` for a dispatch of `path`, or pass it through when the
    /// filter rejects the path.
    pub fn apply<'a>(&self, path: &'a ActionPath, next: Next<'a>, store: &'a Store) -> Next<'a> {
        if self.filter.matches(path) {
            (self.wrap)(path, next, store)
        } else {
            next
        }
    }
}

impl fmt::Debug for Middleware {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Middleware")
            .field("id", &self.id)
            .field("filter", &self.filter)
            .finish_non_exhaustive()
    }
}

/// Returned by [`Store::attach`]; detaches the middleware it refers to.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub struct MiddlewareHandle {
    id: MiddlewareId,
}

impl MiddlewareHandle {
    pub(crate) fn new(id: MiddlewareId) -> Self {
        Self { id }
    }

    pub fn id(&self) -> MiddlewareId {
        self.id
    }

    /// Remove the middleware from `store`.
    ///
    /// Returns `false` if it was already removed.
    pub fn detach(&self, store: &mut Store) -> bool {
        store.detach(self.id)
    }
}
