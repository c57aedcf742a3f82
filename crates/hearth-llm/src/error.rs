//! Error types for the plan layer.

/// Errors from prompt rendering or adapter calls.
///
/// These never reach the orchestrator: the decision core logs them and
/// moves to the next adapter (or the heuristic fallback).
#[derive(Debug, thiserror::Error)]
pub enum PlanError {
    /// The prompt template failed to load or render.
    #[error("prompt template error: {0}")]
    Template(String),

    /// An adapter's HTTP call failed or returned a non-success status.
    #[error("{provider} transport error: {message}")]
    Transport {
        /// The adapter that failed.
        provider: &'static str,
        /// Description of the failure.
        message: String,
    },

    /// An adapter responded but the expected text could not be found.
    #[error("{provider} response missing plan text")]
    MissingContent {
        /// The adapter whose response was malformed.
        provider: &'static str,
    },
}
