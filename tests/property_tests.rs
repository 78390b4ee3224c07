//! Property-based tests for state-tree generation, dispatch and middleware.
//!
//! These tests use proptest to verify properties hold across
//! many randomly generated action trees and paths.

use canopy::core::{generate_state_tree, ActionPath, ActionTree};
use canopy::middleware::{Middleware, PathFilter};
use canopy::{Store, StoreError};
use proptest::prelude::*;
use serde_json::{json, Map, Value};
use std::collections::BTreeMap;

/// Shape of an action tree, without the functions.
#[derive(Clone, Debug)]
enum Shape {
    Leaf { init: Option<i64> },
    Branch(BTreeMap<String, Shape>),
}

impl Shape {
    fn actions(&self) -> ActionTree {
        match self {
            Shape::Leaf { init } => {
                let tree = ActionTree::new().action("set", |_, v| v.clone());
                match *init {
                    Some(n) => tree.init(move || json!(n)),
                    None => tree,
                }
            }
            Shape::Branch(children) => children
                .iter()
                .fold(ActionTree::new(), |tree, (key, child)| tree.branch(key.clone(), child.actions())),
        }
    }

    fn expected_state(&self) -> Value {
        match self {
            Shape::Leaf { init } => init.map_or(Value::Null, |n| json!(n)),
            Shape::Branch(children) => Value::Object(
                children
                    .iter()
                    .map(|(key, child)| (key.clone(), child.expected_state()))
                    .collect::<Map<String, Value>>(),
            ),
        }
    }

    /// Every path from the root to a leaf level.
    fn leaf_paths(&self, prefix: &mut Vec<String>, out: &mut Vec<Vec<String>>) {
        match self {
            Shape::Leaf { .. } => out.push(prefix.clone()),
            Shape::Branch(children) => {
                for (key, child) in children {
                    prefix.push(key.clone());
                    child.leaf_paths(prefix, out);
                    prefix.pop();
                }
            }
        }
    }
}

fn arbitrary_shape() -> impl Strategy<Value = Shape> {
    let leaf = prop::option::of(-100i64..100).prop_map(|init| Shape::Leaf { init });
    leaf.prop_recursive(4, 32, 4, |inner| {
        prop::collection::btree_map("[a-d]{1,2}", inner, 0..4).prop_map(Shape::Branch)
    })
}

prop_compose! {
    fn arbitrary_root()(children in prop::collection::btree_map("[a-d]{1,2}", arbitrary_shape(), 0..4)) -> Shape {
        Shape::Branch(children)
    }
}

prop_compose! {
    fn arbitrary_segments()(segments in prop::collection::vec("[a-c]{1,3}", 1..4)) -> Vec<String> {
        segments
    }
}

fn pointer_at(state: &Value, path: &[String]) -> *const Value {
    path.iter()
        .fold(state, |value, key| &value[key.as_str()]) as *const Value
}

proptest! {
    #[test]
    fn generated_state_mirrors_action_shape(shape in arbitrary_root()) {
        let state = generate_state_tree(&shape.actions());
        prop_assert_eq!(state, shape.expected_state());
    }

    #[test]
    fn generation_is_repeatable_and_distinct(shape in arbitrary_root()) {
        let actions = shape.actions();
        let mut first = generate_state_tree(&actions);
        let second = generate_state_tree(&actions);
        prop_assert_eq!(&first, &second);

        // the two trees share nothing: changing one leaves the other alone
        if let Value::Object(map) = &mut first {
            map.insert("_changed".to_string(), json!(true));
        }
        prop_assert_eq!(second, shape.expected_state());
    }

    #[test]
    fn dispatch_touches_only_addressed_leaf(
        shape in arbitrary_root(),
        pick in any::<prop::sample::Index>(),
        payload in any::<i64>(),
    ) {
        let mut leaves = Vec::new();
        shape.leaf_paths(&mut Vec::new(), &mut leaves);
        prop_assume!(!leaves.is_empty());
        let target = pick.get(&leaves).clone();

        let mut store = Store::with_actions(shape.actions());
        let others: Vec<(Vec<String>, *const Value)> = leaves
            .iter()
            .filter(|leaf| **leaf != target)
            .map(|leaf| (leaf.clone(), pointer_at(&store.state(), leaf)))
            .collect();

        let path = format!("{}.set", target.join("."));
        store.dispatch(path.as_str(), payload).unwrap();

        let mut expected = shape.expected_state();
        *target.iter().fold(&mut expected, |value, key| &mut value[key.as_str()]) = json!(payload);
        let state = store.state();
        prop_assert_eq!(&*state, &expected);
        drop(state);

        for (leaf, before) in others {
            prop_assert!(std::ptr::eq(before, pointer_at(&store.state(), &leaf)));
        }
    }

    #[test]
    fn unresolved_paths_fail_without_middleware(segments in arbitrary_segments()) {
        let path = segments.join(".");
        let mut store = Store::default();

        let result = store.dispatch(path.as_str(), Value::Null);

        prop_assert_eq!(result.unwrap_err(), StoreError::PathResolution { path });
    }

    #[test]
    fn unresolved_paths_succeed_when_intercepted(segments in arbitrary_segments()) {
        let path = segments.join(".");
        let mut store = Store::default();
        store.attach(Middleware::new(|_path, _next, _store| {
            Box::new(|_payload: &Value| Ok(()))
        }));

        prop_assert!(store.dispatch(path.as_str(), Value::Null).is_ok());
    }

    #[test]
    fn prefix_filter_matches_extensions_only(
        prefix in arbitrary_segments(),
        rest in arbitrary_segments(),
        extra in "[a-c]{1,2}",
    ) {
        let filter = PathFilter::prefixes([prefix.join(".")]);

        let mut extended = prefix.clone();
        extended.extend(rest);
        prop_assert!(filter.matches(&ActionPath::parse(extended.join("."))));

        // lengthening the last prefix segment breaks the match
        let mut sibling = prefix.clone();
        if let Some(last) = sibling.last_mut() {
            last.push_str(&extra);
        }
        prop_assert!(!filter.matches(&ActionPath::parse(sibling.join("."))));
    }

    #[test]
    fn detach_preserves_order_of_remaining(
        keep in prop::collection::vec(any::<bool>(), 0..8),
    ) {
        let mut store = Store::default();
        let handles: Vec<_> = keep
            .iter()
            .map(|_| store.attach(Middleware::new(|_path, next, _store| next)))
            .collect();

        for (handle, keep) in handles.iter().zip(&keep) {
            if !keep {
                prop_assert!(handle.detach(&mut store));
            }
        }

        let expected: Vec<_> = handles
            .iter()
            .zip(&keep)
            .filter(|(_, keep)| **keep)
            .map(|(handle, _)| handle.id())
            .collect();
        let remaining: Vec<_> = store.middlewares().iter().map(Middleware::id).collect();
        prop_assert_eq!(remaining, expected);
    }
}
