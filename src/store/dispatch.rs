//! Path resolution, middleware composition and state mutation.

use super::{Store, StoreError};
use crate::core::{ensure_object, ActionNode, ActionPath, ActionTree, TransitionFn};
use crate::middleware::Next;
use serde_json::{Map, Value};

impl Store {
    /// Dispatch the action at `path` with `payload`.
    ///
    /// The effective transition is the base transition wrapped by every
    /// registered middleware, folded right-to-left:
    /// `m[0](path, m[1](path, … m[n-1](path, base) …))`. The first
    /// middleware attached is outermost and runs first.
    ///
    /// The base transition resolves `path` in the action tree, then replaces
    /// the state slot named by all but the last segment with
    /// `action(previous, payload)`. Subtrees it does not walk through are
    /// neither copied nor moved.
    ///
    /// Middleware sees the live state through the `store` it receives,
    /// both while the chain is built and while it runs.
    ///
    /// # Errors
    ///
    /// - [`StoreError::PathResolution`] if the path does not name a
    ///   transition function and the chain reaches the base transition. A
    ///   chain that handles the path without calling through succeeds. A
    ///   path that descends through a level holding an action also fails
    ///   here: such a level is a single leaf value, not a mapping.
    /// - [`StoreError::StateBorrowed`] if middleware calls through while
    ///   holding a state guard.
    ///
    /// The store keeps whatever state the chain left behind in either case.
    pub fn dispatch(
        &mut self,
        path: impl Into<ActionPath>,
        payload: impl Into<Value>,
    ) -> Result<&Value, StoreError> {
        let path = path.into();
        let payload = payload.into();
        tracing::debug!(%path, "dispatching");

        let result = self.compose(&path)(&payload);

        match result {
            Ok(()) => {
                tracing::debug!(%path, "dispatch complete");
                Ok(&*self.state.get_mut())
            }
            Err(error) => {
                tracing::debug!(%path, %error, "dispatch failed");
                Err(error)
            }
        }
    }

    /// Build the effective transition for `path`.
    fn compose<'a>(&'a self, path: &'a ActionPath) -> Next<'a> {
        let base = base_transition(self, resolve(&self.actions, path), path);
        self.middlewares
            .iter()
            .rev()
            .fold(base, |next, middleware| middleware.apply(path, next, self))
    }
}

/// Walk the action tree along `path`; the last segment must name a
/// transition, every segment before it a branch of a non-leaf level.
fn resolve(actions: &ActionTree, path: &ActionPath) -> Result<TransitionFn, StoreError> {
    let unresolved = || StoreError::PathResolution {
        path: path.to_string(),
    };

    let (action, branches) = path.segments().split_last().ok_or_else(unresolved)?;
    let level = branches.iter().try_fold(actions, |level, segment| {
        if level.is_leaf() {
            return None;
        }
        level.get(segment).and_then(ActionNode::as_branch)
    });

    let transition = level
        .and_then(|level| level.get(action))
        .and_then(ActionNode::as_transition)
        .cloned()
        .ok_or_else(unresolved)?;

    tracing::trace!(%path, "path resolved");
    Ok(transition)
}

/// The innermost transition. A resolution failure is only reported if the
/// chain actually calls through to here.
fn base_transition<'a>(
    store: &'a Store,
    resolved: Result<TransitionFn, StoreError>,
    path: &'a ActionPath,
) -> Next<'a> {
    Box::new(move |payload: &Value| {
        let action = match &resolved {
            Ok(action) => action,
            Err(error) => {
                tracing::debug!(%path, "path did not resolve to an action");
                return Err(error.clone());
            }
        };
        store.update(|state| apply(action, path.target(), state, payload))
    })
}

/// Replace the slot at `target` with the action's result, creating
/// mappings along the way. An empty target replaces the whole state.
fn apply(action: &TransitionFn, target: &[String], state: &mut Value, payload: &Value) {
    let slot = match target.split_last() {
        None => state,
        Some((leaf, parents)) => {
            let mut parent = state;
            for segment in parents {
                parent = ensure_object(parent)
                    .entry(segment.as_str())
                    .or_insert_with(|| Value::Object(Map::new()));
            }
            ensure_object(parent)
                .entry(leaf.as_str())
                .or_insert(Value::Null)
        }
    };

    let previous = std::mem::take(slot);
    *slot = action(previous, payload);
}
