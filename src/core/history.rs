//! Dispatch history tracking.
//!
//! Provides immutable tracking of dispatched actions over time. The store
//! itself keeps no history; [`HistoryRecorder`](crate::middleware::HistoryRecorder)
//! builds one from inside the middleware chain.

use super::path::ActionPath;
use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use serde_json::Value;
use std::collections::VecDeque;
use std::time::Duration;

/// Record of a single completed dispatch.
///
/// # Example
///
/// ```rust
/// use canopy::core::{ActionPath, DispatchRecord};
/// use chrono::Utc;
/// use serde_json::json;
///
/// let record = DispatchRecord {
///     path: ActionPath::parse("todos.add"),
///     payload: json!("buy milk"),
///     timestamp: Utc::now(),
/// };
/// assert_eq!(record.path.as_str(), "todos.add");
/// ```
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
pub struct DispatchRecord {
    /// The dispatched path
    pub path: ActionPath,
    /// The payload passed to the action
    pub payload: Value,
    /// When the dispatch completed
    pub timestamp: DateTime<Utc>,
}

/// Ordered history of dispatches.
///
/// History is immutable - the `record` method returns a new history
/// with the dispatch added.
///
/// # Example
///
/// ```rust
/// use canopy::core::{ActionPath, DispatchHistory, DispatchRecord};
/// use chrono::Utc;
/// use serde_json::Value;
///
/// let history = DispatchHistory::new();
///
/// let history = history.record(DispatchRecord {
///     path: ActionPath::parse("todos.add"),
///     payload: Value::Null,
///     timestamp: Utc::now(),
/// });
///
/// let history = history.record(DispatchRecord {
///     path: ActionPath::parse("todos.clear"),
///     payload: Value::Null,
///     timestamp: Utc::now(),
/// });
///
/// let paths = history.paths();
/// assert_eq!(paths.len(), 2);
/// assert_eq!(paths[1].as_str(), "todos.clear");
/// ```
#[derive(Clone, Debug, Default, PartialEq, Serialize, Deserialize)]
pub struct DispatchHistory {
    records: VecDeque<DispatchRecord>,
}

impl DispatchHistory {
    /// Create a new empty history.
    pub fn new() -> Self {
        Self {
            records: VecDeque::new(),
        }
    }

    /// Record a dispatch, returning a new history.
    ///
    /// The existing history is left unchanged.
    ///
    /// # Example
    ///
    /// ```rust
    /// use canopy::core::{ActionPath, DispatchHistory, DispatchRecord};
    /// use chrono::Utc;
    /// use serde_json::json;
    ///
    /// let history = DispatchHistory::new();
    /// let new_history = history.record(DispatchRecord {
    ///     path: ActionPath::parse("counter.add"),
    ///     payload: json!(1),
    ///     timestamp: Utc::now(),
    /// });
    ///
    /// assert_eq!(new_history.records().len(), 1);
    /// assert_eq!(history.records().len(), 0); // Original unchanged
    /// ```
    pub fn record(&self, record: DispatchRecord) -> Self {
        let mut records = self.records.clone();
        records.push_back(record);
        Self { records }
    }

    /// Append in place.
    pub(crate) fn push(&mut self, record: DispatchRecord) {
        self.records.push_back(record);
    }

    /// Drop the oldest records until at most `count` remain.
    pub(crate) fn retain_latest(&mut self, count: usize) {
        let excess = self.records.len().saturating_sub(count);
        self.records.drain(..excess);
    }

    /// Paths dispatched, oldest first.
    pub fn paths(&self) -> Vec<&ActionPath> {
        self.records.iter().map(|record| &record.path).collect()
    }

    /// Time between the first and last recorded dispatch.
    ///
    /// Returns `None` if nothing has been recorded.
    pub fn duration(&self) -> Option<Duration> {
        if let (Some(first), Some(last)) = (self.records.front(), self.records.back()) {
            let duration = last.timestamp.signed_duration_since(first.timestamp);
            duration.to_std().ok()
        } else {
            None
        }
    }

    /// All records in order.
    pub fn records(&self) -> &VecDeque<DispatchRecord> {
        &self.records
    }

    pub fn len(&self) -> usize {
        self.records.len()
    }

    pub fn is_empty(&self) -> bool {
        self.records.is_empty()
    }
}
