//! State-tree generation from an action tree.
//!
//! Generation mirrors the shape of an action tree: branch levels become
//! mappings, leaf levels become a single value seeded by the level's
//! initializer. Existing state is extended in place; slots are written back
//! where they were found, so sibling subtrees never move.

use super::action::ActionTree;
use serde_json::{Map, Value};

/// Generate a fresh state tree for `tree`.
///
/// # Example
///
/// ```rust
/// use canopy::core::{generate_state_tree, ActionTree};
/// use serde_json::{json, Value};
///
/// let actions = ActionTree::new()
///     .branch("todos", ActionTree::new().action("add", |prev, _| prev))
///     .branch(
///         "settings",
///         ActionTree::new().branch(
///             "theme",
///             ActionTree::new().init(|| json!("dark")).action("set", |_, v| v.clone()),
///         ),
///     );
///
/// let state = generate_state_tree(&actions);
/// assert_eq!(state, json!({ "todos": null, "settings": { "theme": "dark" } }));
/// ```
pub fn generate_state_tree(tree: &ActionTree) -> Value {
    let mut state = Value::Object(Map::new());
    extend_state_tree(tree, &mut state);
    state
}

/// Extend `state` in place so that it covers every path of `tree`.
///
/// A leaf level replaces whatever value is at this level with the
/// initializer's result (or `Null`), even if it has branch siblings: one
/// direct action makes the whole level a single leaf. A branch level turns
/// the value into a mapping if it is not one already and recurses into each
/// child branch, creating missing slots as empty mappings.
pub fn extend_state_tree(tree: &ActionTree, state: &mut Value) {
    if tree.is_leaf() {
        *state = tree.initial_value();
        return;
    }

    let map = ensure_object(state);
    for (key, branch) in tree.branches() {
        tracing::trace!(key, "generating state subtree");
        let slot = map
            .entry(key)
            .or_insert_with(|| Value::Object(Map::new()));
        extend_state_tree(branch, slot);
    }
}

/// Shallow top-level overlay: every key of `overrides` replaces the key of
/// the same name in `state`. Nested mappings are replaced wholesale, never
/// deep-merged.
///
/// A non-mapping `state` becomes an empty mapping first, unless there is
/// nothing to overlay.
pub fn overlay(state: &mut Value, overrides: Map<String, Value>) {
    if overrides.is_empty() {
        return;
    }
    let map = ensure_object(state);
    for (key, value) in overrides {
        map.insert(key, value);
    }
}

/// Borrow `value` as a mapping, replacing it with an empty one if it holds
/// anything else.
pub(crate) fn ensure_object(value: &mut Value) -> &mut Map<String, Value> {
    if !value.is_object() {
        *value = Value::Object(Map::new());
    }
    match value {
        Value::Object(map) => map,
        _ => unreachable!("value was just replaced with a mapping"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn append() -> ActionTree {
        ActionTree::new().action("add", |prev, item| {
            let mut items = match prev {
                Value::Array(items) => items,
                _ => Vec::new(),
            };
            items.push(item.clone());
            Value::Array(items)
        })
    }

    #[test]
    fn leaf_without_init_is_null() {
        let state = generate_state_tree(&ActionTree::new().branch("todos", append()));
        assert_eq!(state, json!({ "todos": null }));
        assert!(state.as_object().unwrap().contains_key("todos"));
    }

    #[test]
    fn leaf_with_init_uses_init_value() {
        let tree = ActionTree::new().branch("todos", append().init(|| json!([])));
        assert_eq!(generate_state_tree(&tree), json!({ "todos": [] }));
    }

    #[test]
    fn nested_branches_become_mappings() {
        let tree = ActionTree::new().branch(
            "todos",
            ActionTree::new()
                .branch("list", append().init(|| json!([])))
                .branch(
                    "check_all",
                    ActionTree::new().action("toggle", |prev, _| json!(!prev.as_bool().unwrap_or(false))),
                ),
        );

        assert_eq!(
            generate_state_tree(&tree),
            json!({ "todos": { "list": [], "check_all": null } })
        );
    }

    #[test]
    fn sibling_actions_collapse_to_one_leaf() {
        let tree = ActionTree::new().branch(
            "chat",
            ActionTree::new()
                .init(|| json!("hi"))
                .action("start", |prev, _| prev)
                .action("stop", |prev, _| prev)
                .branch("nested", append()),
        );

        assert_eq!(generate_state_tree(&tree), json!({ "chat": "hi" }));
    }

    #[test]
    fn empty_tree_gives_empty_mapping() {
        assert_eq!(generate_state_tree(&ActionTree::new()), json!({}));
    }

    #[test]
    fn root_level_action_collapses_root() {
        let tree = ActionTree::new().init(|| json!(7)).action("inc", |prev, _| prev);
        assert_eq!(generate_state_tree(&tree), json!(7));
    }

    #[test]
    fn extend_keeps_unrelated_keys() {
        let mut state = json!({ "user": { "name": "ada" } });
        let name = &state["user"]["name"] as *const Value;

        extend_state_tree(
            &ActionTree::new().branch("chat", append().init(|| json!("hi"))),
            &mut state,
        );

        assert_eq!(state, json!({ "user": { "name": "ada" }, "chat": "hi" }));
        assert!(std::ptr::eq(name, &state["user"]["name"]));
    }

    #[test]
    fn extend_reuses_existing_branch_mapping() {
        let mut state = json!({ "todos": { "keep": 1 } });
        let tree = ActionTree::new().branch("todos", ActionTree::new().branch("list", append()));

        extend_state_tree(&tree, &mut state);

        assert_eq!(state, json!({ "todos": { "keep": 1, "list": null } }));
    }

    #[test]
    fn extend_replaces_scalar_where_branch_is_expected() {
        let mut state = json!({ "todos": 3 });
        let tree = ActionTree::new().branch("todos", ActionTree::new().branch("list", append()));

        extend_state_tree(&tree, &mut state);

        assert_eq!(state, json!({ "todos": { "list": null } }));
    }

    #[test]
    fn generation_yields_distinct_values() {
        let tree = ActionTree::new().branch("todos", append().init(|| json!([])));
        let mut first = generate_state_tree(&tree);
        let second = generate_state_tree(&tree);
        assert_eq!(first, second);

        first["todos"].as_array_mut().unwrap().push(json!(1));

        assert_eq!(second, json!({ "todos": [] }));
    }

    #[test]
    fn overlay_is_shallow() {
        let mut state = json!({ "a": { "x": 1, "y": 2 }, "b": 1 });
        let overrides = json!({ "a": { "x": 9 } });

        overlay(&mut state, overrides.as_object().unwrap().clone());

        assert_eq!(state, json!({ "a": { "x": 9 }, "b": 1 }));
    }

    #[test]
    fn overlay_turns_scalar_root_into_mapping() {
        let mut state = Value::Null;
        overlay(&mut state, Map::new());
        assert_eq!(state, Value::Null);

        overlay(&mut state, json!({ "k": true }).as_object().unwrap().clone());
        assert_eq!(state, json!({ "k": true }));
    }
}
