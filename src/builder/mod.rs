//! Builder API for ergonomic store construction.
//!
//! The builder is the configuration surface of the crate: actions,
//! middlewares and initial state overrides are collected fluently and
//! handed to [`Store::new`](crate::Store::new).

pub mod error;
pub mod store;

pub use error::BuildError;
pub use store::StoreBuilder;
