//! Core store types and logic.
//!
//! This module contains the pure pieces the store is built from:
//! - Action trees (transition functions keyed by name)
//! - Parsed action paths
//! - State-tree generation and overlay
//! - Immutable dispatch history
//!
//! Nothing here holds mutable state of its own; the [`Store`](crate::Store)
//! owns the state and drives these functions.

mod action;
mod history;
mod path;
mod tree;

pub use action::{ActionNode, ActionTree, InitFn, TransitionFn};
pub use history::{DispatchHistory, DispatchRecord};
pub use path::ActionPath;
pub use tree::{extend_state_tree, generate_state_tree, overlay};

pub(crate) use tree::ensure_object;
