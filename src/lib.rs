//! Canopy: a minimal action-tree-driven state container
//!
//! Canopy keeps one mutable state value, a tree of named update functions
//! ("actions") addressed by dot-delimited paths, and a middleware chain that
//! can observe or intercept every transition. Everything is synchronous and
//! runs on the caller's thread.
//!
//! # Core Concepts
//!
//! - **Action tree**: nested mapping of names to transition functions
//!   `(previous, payload) -> next`; a level holding a transition is a leaf
//! - **State tree**: a `serde_json::Value` generated to mirror the action
//!   tree, mutated in place by dispatches
//! - **Dispatch**: resolve a path such as `todos.list.add`, run it through
//!   the middleware chain and write the result into the addressed slot
//! - **Middleware**: wrappers selected by path prefix that may call through,
//!   short-circuit, or handle paths that have no action at all
//!
//! # Example
//!
//! ```rust
//! use canopy::core::ActionTree;
//! use canopy::middleware::Middleware;
//! use canopy::Store;
//! use serde_json::{json, Value};
//!
//! fn append(prev: Value, item: &Value) -> Value {
//!     let mut items = match prev {
//!         Value::Array(items) => items,
//!         _ => Vec::new(),
//!     };
//!     items.push(item.clone());
//!     Value::Array(items)
//! }
//!
//! let actions = ActionTree::new().branch(
//!     "todos",
//!     ActionTree::new()
//!         .branch("list", ActionTree::new().action("add", append))
//!         .branch(
//!             "check_all",
//!             ActionTree::new().action("toggle", |prev, _| json!(!prev.as_bool().unwrap_or(false))),
//!         ),
//! );
//!
//! let mut store = Store::with_actions(actions);
//!
//! // Handle a path with no action behind it.
//! store.attach(Middleware::scoped(["ping"], |_path, _next, _store| {
//!     Box::new(|_payload: &Value| Ok(()))
//! }));
//!
//! store.dispatch("todos.list.add", "buy milk").unwrap();
//! store.dispatch("todos.check_all.toggle", Value::Null).unwrap();
//! store.dispatch("ping", Value::Null).unwrap();
//!
//! assert_eq!(
//!     *store.state(),
//!     json!({ "todos": { "list": ["buy milk"], "check_all": true } })
//! );
//! assert!(store.dispatch("todos.list.remove", 0).is_err());
//! ```

pub mod builder;
pub mod core;
pub mod middleware;
pub mod store;

// Re-export commonly used types
pub use crate::builder::StoreBuilder;
pub use crate::core::{generate_state_tree, ActionPath, ActionTree};
pub use crate::middleware::{Middleware, MiddlewareHandle};
pub use crate::store::{Store, StoreError};
