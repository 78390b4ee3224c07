//! The store: retained state, its action tree and the middleware chain.
//!
//! # Key Concepts
//!
//! - **State**: one `serde_json::Value` shaped by the action tree, mutated in
//!   place by dispatches and readable through `&Store` at any time
//! - **Actions**: the tree of transition functions, extendable at runtime
//! - **Middlewares**: ordered wrappers composed around every dispatch

mod dispatch;
mod error;

pub use error::StoreError;

use crate::builder::StoreBuilder;
use crate::core::{extend_state_tree, generate_state_tree, overlay, ActionPath, ActionTree};
use crate::middleware::{Middleware, MiddlewareHandle, MiddlewareId};
use serde_json::{Map, Value};
use std::cell::{Ref, RefCell};
use std::fmt;

/// Centralized state container driven by an action tree.
///
/// The state sits in a cell so that middleware, which only gets `&Store`,
/// can read and write it while a dispatch is running. A store can be moved
/// between threads but not shared by them.
///
/// # Example
///
/// ```rust
/// use canopy::core::ActionTree;
/// use canopy::Store;
/// use serde_json::{json, Value};
///
/// let actions = ActionTree::new().branch(
///     "todos",
///     ActionTree::new().action("add", |prev, item| {
///         let mut items = match prev {
///             Value::Array(items) => items,
///             _ => Vec::new(),
///         };
///         items.push(item.clone());
///         Value::Array(items)
///     }),
/// );
///
/// let mut store = Store::with_actions(actions);
/// assert_eq!(*store.state(), json!({ "todos": null }));
///
/// let state = store.dispatch("todos.add", "buy milk").unwrap();
/// assert_eq!(state, &json!({ "todos": ["buy milk"] }));
/// ```
pub struct Store {
    state: RefCell<Value>,
    actions: ActionTree,
    middlewares: Vec<Middleware>,
}

impl Store {
    /// Create a store.
    ///
    /// The state tree is generated from `actions`, then every top-level key
    /// of `initial_state` replaces the generated value of the same name.
    /// Construction never fails; pass an empty tree for a store whose
    /// actions are merged in later.
    pub fn new(
        actions: ActionTree,
        middlewares: Vec<Middleware>,
        initial_state: Map<String, Value>,
    ) -> Self {
        let mut state = generate_state_tree(&actions);
        overlay(&mut state, initial_state);

        tracing::debug!(
            actions = actions.len(),
            middlewares = middlewares.len(),
            "store created"
        );

        Self {
            state: RefCell::new(state),
            actions,
            middlewares,
        }
    }

    /// Create a store with no middleware and no initial overrides.
    pub fn with_actions(actions: ActionTree) -> Self {
        Self::new(actions, Vec::new(), Map::new())
    }

    pub fn builder() -> StoreBuilder {
        StoreBuilder::new()
    }

    /// The retained state.
    ///
    /// Drop the guard before calling `next` from middleware; a dispatch
    /// that has to write while it is alive fails with
    /// [`StoreError::StateBorrowed`].
    ///
    /// # Panics
    ///
    /// If called from inside an [`update`](Self::update) closure.
    pub fn state(&self) -> Ref<'_, Value> {
        self.state.borrow()
    }

    /// Shallow top-level overlay of `overrides` onto the retained state.
    ///
    /// Nested mappings in `overrides` replace the existing ones wholesale.
    pub fn set_state(&mut self, overrides: Map<String, Value>) -> &Value {
        let state = self.state.get_mut();
        overlay(state, overrides);
        state
    }

    /// Read the state value at a dot-delimited path, e.g. `todos.list`.
    ///
    /// The same borrowing rules as [`state`](Self::state) apply to the
    /// returned guard.
    pub fn select(&self, path: impl Into<ActionPath>) -> Option<Ref<'_, Value>> {
        let path = path.into();
        Ref::filter_map(self.state.borrow(), |state| {
            path.segments()
                .iter()
                .try_fold(state, |value, segment| value.get(segment.as_str()))
        })
        .ok()
    }

    /// Modify the state in place through a shared reference.
    ///
    /// This is how middleware writes state, e.g. to handle a pseudo action.
    ///
    /// # Errors
    ///
    /// [`StoreError::StateBorrowed`] if a guard from [`state`](Self::state)
    /// or [`select`](Self::select) is still alive.
    pub fn update<R>(&self, f: impl FnOnce(&mut Value) -> R) -> Result<R, StoreError> {
        let mut state = self
            .state
            .try_borrow_mut()
            .map_err(|_| StoreError::StateBorrowed)?;
        Ok(f(&mut *state))
    }

    /// The action tree.
    pub fn actions(&self) -> &ActionTree {
        &self.actions
    }

    /// Merge `actions` into the action tree and generate state for them.
    ///
    /// The merge is shallow: top-level entries of `actions` are added or
    /// replace existing ones. State is generated only for the new entries,
    /// so state under unrelated top-level keys is left as it is.
    pub fn merge_actions(&mut self, actions: ActionTree) -> &ActionTree {
        tracing::debug!(actions = actions.len(), "merging actions");
        extend_state_tree(&actions, self.state.get_mut());
        self.actions.merge(actions);
        &self.actions
    }

    /// Registered middlewares, outermost first.
    pub fn middlewares(&self) -> &[Middleware] {
        &self.middlewares
    }

    /// Append a middleware to the chain.
    ///
    /// Later middlewares sit further inside the chain, closer to the
    /// action; see [`Store::dispatch`] for the full order.
    pub fn attach(&mut self, middleware: Middleware) -> MiddlewareHandle {
        let id = middleware.id();
        tracing::debug!(%id, filter = ?middleware.filter(), "middleware attached");
        self.middlewares.push(middleware);
        MiddlewareHandle::new(id)
    }

    /// Remove the middleware registered under `id`.
    ///
    /// Returns `false` if no such middleware is registered. The order of
    /// the remaining middlewares is preserved.
    pub fn detach(&mut self, id: MiddlewareId) -> bool {
        let before = self.middlewares.len();
        self.middlewares.retain(|middleware| middleware.id() != id);
        let removed = self.middlewares.len() != before;
        if removed {
            tracing::debug!(%id, "middleware detached");
        }
        removed
    }
}

impl Default for Store {
    fn default() -> Self {
        Self::with_actions(ActionTree::new())
    }
}

impl fmt::Debug for Store {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Store")
            .field("state", &self.state)
            .field("actions", &self.actions)
            .field("middlewares", &self.middlewares)
            .finish()
    }
}
