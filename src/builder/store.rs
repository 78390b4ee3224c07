//! Builder for constructing stores.

use crate::builder::error::BuildError;
use crate::core::ActionTree;
use crate::middleware::Middleware;
use crate::store::Store;
use serde::Serialize;
use serde_json::{Map, Value};

/// Builder for constructing a [`Store`] with a fluent API.
///
/// Every part is optional: a builder with nothing set produces an empty
/// store.
///
/// # Example
///
/// ```rust
/// use canopy::core::ActionTree;
/// use canopy::middleware::logger;
/// use canopy::StoreBuilder;
/// use serde_json::json;
///
/// #[derive(serde::Serialize)]
/// struct Seed {
///     theme: &'static str,
/// }
///
/// let store = StoreBuilder::new()
///     .branch("theme", ActionTree::new().action("set", |_, v| v.clone()))
///     .middleware(logger())
///     .initial_state_from(&Seed { theme: "dark" })
///     .unwrap()
///     .build();
///
/// assert_eq!(*store.state(), json!({ "theme": "dark" }));
/// assert_eq!(store.middlewares().len(), 1);
/// ```
#[derive(Debug, Default)]
pub struct StoreBuilder {
    actions: ActionTree,
    middlewares: Vec<Middleware>,
    initial_state: Map<String, Value>,
}

impl StoreBuilder {
    /// Create a new builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Shallow-merge `actions` into the actions collected so far.
    pub fn actions(mut self, actions: ActionTree) -> Self {
        self.actions.merge(actions);
        self
    }

    /// Add a top-level branch of actions.
    pub fn branch(mut self, name: impl Into<String>, tree: ActionTree) -> Self {
        self.actions = self.actions.branch(name, tree);
        self
    }

    /// Append a middleware.
    pub fn middleware(mut self, middleware: Middleware) -> Self {
        self.middlewares.push(middleware);
        self
    }

    /// Append several middlewares, in order.
    pub fn middlewares(mut self, middlewares: impl IntoIterator<Item = Middleware>) -> Self {
        self.middlewares.extend(middlewares);
        self
    }

    /// Top-level overrides applied over the generated state.
    ///
    /// Repeated calls accumulate; later keys win.
    pub fn initial_state(mut self, overrides: Map<String, Value>) -> Self {
        self.initial_state.extend(overrides);
        self
    }

    /// Like [`initial_state`](Self::initial_state), from any value that
    /// serializes to a JSON object.
    pub fn initial_state_from<T: Serialize>(self, overrides: &T) -> Result<Self, BuildError> {
        match serde_json::to_value(overrides)? {
            Value::Object(map) => Ok(self.initial_state(map)),
            other => Err(BuildError::InitialStateNotAnObject {
                found: kind(&other),
            }),
        }
    }

    /// Build the store.
    pub fn build(self) -> Store {
        Store::new(self.actions, self.middlewares, self.initial_state)
    }
}

fn kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
