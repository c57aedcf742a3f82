//! Deterministic randomness and the seasonal environment model.
//!
//! Everything stochastic in the simulator flows through one seeded
//! 32-bit PRNG ([`rng::DeterministicRng`]): the distribution samplers
//! draw their uniforms from it, the environment draws its abundance and
//! climate shocks from it, and the planner draws its shuffles and
//! outcome rolls from it. Given the same seed and call sequence, every
//! run produces bit-identical results.

pub mod environment;
pub mod rng;
pub mod sampling;

pub use environment::{EnvironmentError, SeasonalEnvironment};
pub use rng::{DeterministicRng, RngError};
