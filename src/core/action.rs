//! Action tree types.
//!
//! An action tree is a nested mapping of names to either transition
//! functions or further trees. A level that holds at least one transition
//! is a *leaf level*: all of its actions share one slot in the state tree,
//! seeded by the level's optional initializer.

use serde_json::Value;
use std::collections::btree_map::{self, BTreeMap};
use std::fmt;
use std::sync::Arc;

/// Pure update function for one state leaf: `(previous, payload) -> next`.
pub type TransitionFn = Arc<dyn Fn(Value, &Value) -> Value + Send + Sync>;

/// Produces the initial value of a leaf during state-tree generation.
pub type InitFn = Arc<dyn Fn() -> Value + Send + Sync>;

/// A single entry of an [`ActionTree`].
#[derive(Clone)]
pub enum ActionNode {
    /// A transition function, callable by dispatching its path.
    Transition(TransitionFn),
    /// A nested tree of actions.
    Branch(ActionTree),
}

impl ActionNode {
    /// The transition function, if this node is one.
    pub fn as_transition(&self) -> Option<&TransitionFn> {
        match self {
            Self::Transition(f) => Some(f),
            Self::Branch(_) => None,
        }
    }

    /// The nested tree, if this node is a branch.
    pub fn as_branch(&self) -> Option<&ActionTree> {
        match self {
            Self::Branch(tree) => Some(tree),
            Self::Transition(_) => None,
        }
    }
}

impl fmt::Debug for ActionNode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::Transition(_) => f.write_str("Transition(..)"),
            Self::Branch(tree) => f.debug_tuple("Branch").field(tree).finish(),
        }
    }
}

/// Tree of named actions.
///
/// Built fluently; definitions are shared behind `Arc` and never mutated
/// once inserted, so cloning a tree is cheap.
///
/// # Example
///
/// ```rust
/// use canopy::core::ActionTree;
/// use serde_json::{json, Value};
///
/// let actions = ActionTree::new().branch(
///     "counter",
///     ActionTree::new()
///         .init(|| json!(0))
///         .action("add", |prev, by| json!(prev.as_i64().unwrap_or(0) + by.as_i64().unwrap_or(1))),
/// );
///
/// assert!(actions.get("counter").unwrap().as_branch().unwrap().is_leaf());
/// assert!(!actions.is_leaf());
/// ```
#[derive(Clone, Default)]
pub struct ActionTree {
    init: Option<InitFn>,
    children: BTreeMap<String, ActionNode>,
}

impl ActionTree {
    /// Create an empty tree.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the initializer used when this level is a leaf.
    pub fn init<F>(mut self, init: F) -> Self
    where
        F: Fn() -> Value + Send + Sync + 'static,
    {
        self.init = Some(Arc::new(init));
        self
    }

    /// Add a transition function under `name`.
    pub fn action<F>(mut self, name: impl Into<String>, transition: F) -> Self
    where
        F: Fn(Value, &Value) -> Value + Send + Sync + 'static,
    {
        self.children
            .insert(name.into(), ActionNode::Transition(Arc::new(transition)));
        self
    }

    /// Add a nested tree under `name`.
    pub fn branch(mut self, name: impl Into<String>, tree: ActionTree) -> Self {
        self.children.insert(name.into(), ActionNode::Branch(tree));
        self
    }

    /// Insert an already-built node, returning the node it replaced.
    pub fn insert(&mut self, name: impl Into<String>, node: ActionNode) -> Option<ActionNode> {
        self.children.insert(name.into(), node)
    }

    /// Look up a direct child.
    pub fn get(&self, name: &str) -> Option<&ActionNode> {
        self.children.get(name)
    }

    /// True when any direct child is a transition function.
    pub fn is_leaf(&self) -> bool {
        self.children
            .values()
            .any(|node| matches!(node, ActionNode::Transition(_)))
    }

    /// The value a leaf level starts with: `init()` or `Null`.
    pub fn initial_value(&self) -> Value {
        self.init.as_ref().map_or(Value::Null, |init| init())
    }

    /// Direct children that are nested trees.
    pub fn branches(&self) -> impl Iterator<Item = (&str, &ActionTree)> {
        self.children
            .iter()
            .filter_map(|(name, node)| node.as_branch().map(|tree| (name.as_str(), tree)))
    }

    pub fn iter(&self) -> btree_map::Iter<'_, String, ActionNode> {
        self.children.iter()
    }

    pub fn len(&self) -> usize {
        self.children.len()
    }

    pub fn is_empty(&self) -> bool {
        self.children.is_empty()
    }

    /// Shallow merge: top-level children of `other` are added or replace
    /// existing ones; untouched children are kept. An initializer on `other`
    /// replaces this tree's initializer.
    pub fn merge(&mut self, other: ActionTree) {
        if other.init.is_some() {
            self.init = other.init;
        }
        self.children.extend(other.children);
    }
}

impl fmt::Debug for ActionTree {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ActionTree")
            .field("init", &self.init.as_ref().map(|_| ".."))
            .field("children", &self.children)
            .finish()
    }
}

impl<'a> IntoIterator for &'a ActionTree {
    type Item = (&'a String, &'a ActionNode);
    type IntoIter = btree_map::Iter<'a, String, ActionNode>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}
