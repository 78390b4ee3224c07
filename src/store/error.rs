//! Dispatch errors.

use thiserror::Error;

/// Errors that can occur during a dispatch.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum StoreError {
    /// The dispatched path does not name a transition function in the
    /// action tree, and the middleware chain reached the base transition.
    #[error("No action found at path '{path}'")]
    PathResolution { path: String },

    /// The state was written while a guard from [`Store::state`] or
    /// [`Store::select`] was still alive.
    ///
    /// [`Store::state`]: crate::Store::state
    /// [`Store::select`]: crate::Store::select
    #[error("State is still borrowed; drop state guards before writing or calling next")]
    StateBorrowed,
}
