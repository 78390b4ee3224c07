//! Build errors for the store builder.

use thiserror::Error;

/// Errors that can occur when configuring a store.
#[derive(Debug, Error)]
pub enum BuildError {
    #[error("Initial state could not be serialized: {0}")]
    InitialStateSerialization(#[from] serde_json::Error),

    #[error("Initial state must serialize to a JSON object, got {found}")]
    InitialStateNotAnObject { found: &'static str },
}
