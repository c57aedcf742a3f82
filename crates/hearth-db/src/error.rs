//! Error types for the persistence layer.

use hearth_types::ids::RunId;

/// Errors from store operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// The requested run does not exist.
    #[error("run not found: {run_id}")]
    RunNotFound {
        /// The missing run's identifier.
        run_id: RunId,
    },

    /// The backing store failed.
    #[error("store backend error: {message}")]
    Backend {
        /// Description of the failure.
        message: String,
    },
}
