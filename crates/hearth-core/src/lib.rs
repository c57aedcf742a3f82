//! The simulation core: registry, spawner, planner, and orchestrator.
//!
//! [`sim::Simulation`] is the entry point. A run is created from a
//! validated scenario and a seed, stepped one day at a time, and
//! snapshotted after every step:
//!
//! 1. Build a plan request and ask the LLM decision core for a day plan.
//! 2. Reorder the task roster by the plan (advisory only).
//! 3. Tick the seasonal environment.
//! 4. Assign and execute tasks through the planner.
//! 5. Apply outcomes to agents, the network, and the cognition engine.
//! 6. Collect metrics, logs, and causal links; derive the resume seed.
//!
//! Persistence is the caller's job: the step returns the new
//! [`hearth_types::SimulationState`] and the caller stores it through
//! whatever `RunStore` it holds.

pub mod error;
pub mod logger;
pub mod planner;
pub mod registry;
pub mod sim;
pub mod spawner;

pub use error::SimError;
pub use registry::{RegistryError, ScenarioRegistry};
pub use sim::Simulation;
