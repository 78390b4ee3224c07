//! Middleware that records completed dispatches.

use super::Middleware;
use crate::core::{DispatchHistory, DispatchRecord};
use chrono::Utc;
use parking_lot::Mutex;
use serde_json::Value;
use std::sync::Arc;

/// Collects a [`DispatchHistory`] from inside the middleware chain.
///
/// Only dispatches whose inner chain returns `Ok` are recorded, including
/// pseudo actions handled by middleware further in.
///
/// # Example
///
/// ```rust
/// use canopy::core::ActionTree;
/// use canopy::middleware::HistoryRecorder;
/// use canopy::Store;
/// use serde_json::json;
///
/// let recorder = HistoryRecorder::new();
/// let mut store = Store::with_actions(
///     ActionTree::new().branch("name", ActionTree::new().action("set", |_, v| v.clone())),
/// );
/// store.attach(recorder.middleware());
///
/// store.dispatch("name.set", "ada").unwrap();
/// assert!(store.dispatch("name.unknown", "x").is_err());
///
/// let history = recorder.history();
/// assert_eq!(history.len(), 1);
/// assert_eq!(history.records()[0].payload, json!("ada"));
/// ```
#[derive(Clone, Debug, Default)]
pub struct HistoryRecorder {
    history: Arc<Mutex<DispatchHistory>>,
    capacity: Option<usize>,
}

impl HistoryRecorder {
    pub fn new() -> Self {
        Self::default()
    }

    /// A recorder keeping only the latest `capacity` dispatches.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            capacity: Some(capacity),
            ..Self::default()
        }
    }

    /// A global middleware feeding this recorder.
    ///
    /// Every middleware built here shares the same history.
    pub fn middleware(&self) -> Middleware {
        let history = Arc::clone(&self.history);
        let capacity = self.capacity;
        Middleware::new(move |path, next, _store| {
            let history = Arc::clone(&history);
            Box::new(move |payload: &Value| {
                next(payload)?;
                let mut history = history.lock();
                history.push(DispatchRecord {
                    path: path.clone(),
                    payload: payload.clone(),
                    timestamp: Utc::now(),
                });
                if let Some(capacity) = capacity {
                    history.retain_latest(capacity);
                }
                Ok(())
            })
        })
    }

    /// Snapshot of everything recorded so far.
    pub fn history(&self) -> DispatchHistory {
        self.history.lock().clone()
    }

    pub fn clear(&self) {
        *self.history.lock() = DispatchHistory::new();
    }
}
