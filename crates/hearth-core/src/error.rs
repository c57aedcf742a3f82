//! Error types for the simulation core.

use hearth_world::environment::EnvironmentError;
use hearth_world::rng::RngError;

/// Errors from simulation construction or stepping.
///
/// Configuration problems surface at construction and are fatal for the
/// run. LLM transport problems never appear here — the decision layer
/// absorbs them and falls back to its heuristic plan.
#[derive(Debug, thiserror::Error)]
pub enum SimError {
    /// The scenario configuration cannot drive a run.
    #[error("invalid simulation configuration: {reason}")]
    Config {
        /// What is wrong with the configuration.
        reason: String,
    },

    /// The environment model rejected the configuration or state.
    #[error("environment error: {source}")]
    Environment {
        /// The underlying environment error.
        #[from]
        source: EnvironmentError,
    },

    /// An RNG operation failed (empty pick); indicates a bug at the
    /// call site, not a recoverable condition.
    #[error("rng error: {source}")]
    Rng {
        /// The underlying RNG error.
        #[from]
        source: RngError,
    },

    /// A restored state is internally inconsistent.
    #[error("invalid restored state: {reason}")]
    State {
        /// What is wrong with the state.
        reason: String,
    },
}
