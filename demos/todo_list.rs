//! Todo List Store
//!
//! This example builds a small todo store and drives it through dispatches.
//!
//! Key concepts:
//! - State generated from the shape of the action tree
//! - Nested paths addressing individual leaves
//! - Scoped middleware and a pseudo action handled entirely by middleware
//! - Actions merged in after construction
//!
//! Run with: RUST_LOG=debug cargo run --example todo_list

use canopy::core::ActionTree;
use canopy::middleware::{logger, HistoryRecorder, Middleware};
use canopy::StoreBuilder;
use serde_json::{json, Value};
use tracing_subscriber::EnvFilter;

fn append(prev: Value, item: &Value) -> Value {
    let mut items = match prev {
        Value::Array(items) => items,
        _ => Vec::new(),
    };
    items.push(item.clone());
    Value::Array(items)
}

fn toggle(prev: Value, _: &Value) -> Value {
    json!(!prev.as_bool().unwrap_or(false))
}

fn main() {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .init();

    println!("=== Todo List Store Example ===\n");

    let recorder = HistoryRecorder::new();
    let mut store = StoreBuilder::new()
        .branch(
            "todos",
            ActionTree::new()
                .branch(
                    "list",
                    ActionTree::new().init(|| json!([])).action("add", append),
                )
                .branch("check_all", ActionTree::new().action("toggle", toggle)),
        )
        .middleware(logger())
        .middleware(recorder.middleware())
        .build();

    println!("Initial state: {}", *store.state());

    // Reject empty todo items before they reach the action.
    store.attach(Middleware::scoped(["todos.list"], |_path, next, _store| {
        Box::new(move |payload: &Value| {
            if payload.as_str().is_some_and(str::is_empty) {
                println!("Ignoring empty todo");
                return Ok(());
            }
            next(payload)
        })
    }));

    // Keep the list short, reading the current state through the store.
    store.attach(Middleware::scoped(["todos.list.add"], |_path, next, store| {
        Box::new(move |payload: &Value| {
            let count = store
                .select("todos.list")
                .and_then(|list| list.as_array().map(Vec::len))
                .unwrap_or(0);
            if count >= 5 {
                println!("List is full, dropping {payload}");
                return Ok(());
            }
            next(payload)
        })
    }));

    // A pseudo action with no entry in the action tree.
    store.attach(Middleware::scoped(["todos.clear"], |_path, _next, store| {
        Box::new(move |_payload: &Value| store.update(|state| state["todos"]["list"] = json!([])))
    }));

    for item in ["buy milk", "", "walk dog"] {
        if let Err(error) = store.dispatch("todos.list.add", item) {
            println!("Dispatch failed: {error}");
        }
    }
    if let Err(error) = store.dispatch("todos.check_all.toggle", Value::Null) {
        println!("Dispatch failed: {error}");
    }
    println!("After adding: {}", *store.state());

    if let Err(error) = store.dispatch("todos.clear", Value::Null) {
        println!("Dispatch failed: {error}");
    }
    println!("After clearing: {}", *store.state());

    store.merge_actions(
        ActionTree::new().branch(
            "chat",
            ActionTree::new()
                .init(|| json!("hi"))
                .action("start", |prev, _| prev),
        ),
    );
    println!("After merging chat actions: {}", *store.state());

    match store.dispatch("todos.archive", Value::Null) {
        Ok(_) => println!("Unexpectedly archived"),
        Err(error) => println!("Expected failure: {error}"),
    }

    println!("\nRecorded dispatches:");
    for record in recorder.history().records() {
        println!("  {} {}", record.path, record.payload);
    }

    println!("\n=== Example Complete ===");
}
