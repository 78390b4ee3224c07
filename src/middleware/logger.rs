//! Dispatch logging through `tracing`.

use super::Middleware;
use serde_json::Value;

/// A global middleware that logs every dispatch and its outcome.
///
/// Dispatches and successes are logged at `debug`, failures at `warn`.
///
/// Narrow it with [`Middleware::with_filter`] to log only part of the tree.
///
/// # Example
///
/// ```rust
/// use canopy::middleware::{logger, PathFilter};
/// use canopy::Store;
///
/// let mut store = Store::default();
/// store.attach(logger().with_filter(PathFilter::prefixes(["todos"])));
/// ```
pub fn logger() -> Middleware {
    Middleware::new(|path, next, _store| {
        Box::new(move |payload: &Value| {
            tracing::debug!(%path, %payload, "action dispatched");
            let result = next(payload);
            match &result {
                Ok(()) => tracing::debug!(%path, "action applied"),
                Err(error) => tracing::warn!(%path, %error, "action failed"),
            }
            result
        })
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::ActionTree;
    use crate::store::{Store, StoreError};
    use parking_lot::Mutex;
    use serde_json::json;
    use std::io;
    use std::sync::Arc;

    #[derive(Clone, Default)]
    struct Capture(Arc<Mutex<Vec<u8>>>);

    impl io::Write for Capture {
        fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
            self.0.lock().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> io::Result<()> {
            Ok(())
        }
    }

    fn flag_store() -> Store {
        Store::with_actions(
            ActionTree::new().branch("flag", ActionTree::new().action("set", |_, v| v.clone())),
        )
    }

    #[test]
    fn logger_passes_results_through() {
        let mut store = flag_store();
        store.attach(logger());

        store.dispatch("flag.set", true).unwrap();
        assert_eq!(store.state()["flag"], json!(true));

        let error = store.dispatch("flag.missing", true).unwrap_err();
        assert_eq!(
            error,
            StoreError::PathResolution {
                path: "flag.missing".to_string()
            }
        );
    }

    #[test]
    fn successes_are_not_logged_at_info() {
        let capture = Capture::default();
        let writer = capture.clone();
        let subscriber = tracing_subscriber::fmt()
            .with_max_level(tracing::Level::INFO)
            .with_ansi(false)
            .with_writer(move || writer.clone())
            .finish();

        let mut store = flag_store();
        store.attach(logger());
        tracing::subscriber::with_default(subscriber, || {
            store.dispatch("flag.set", true).unwrap();
            store.dispatch("flag.missing", true).unwrap_err();
        });

        let output = String::from_utf8(capture.0.lock().clone()).unwrap();
        assert!(!output.contains("action applied"));
        assert!(!output.contains("action dispatched"));
        assert!(output.contains("action failed"));
    }
}
