//! Agent interiority: emotion, memory, fairness, and social ties.
//!
//! This crate owns everything that happens *inside* an agent and
//! *between* agents: the cognition engine (emotion updates, episodic and
//! social memory maintenance, reflection), the Fehr–Schmidt
//! inequality-aversion utility used to score reward distributions, and
//! the weighted directed social network with its decay, reinforcement,
//! and graph statistics.
//!
//! Agents are referenced by [`hearth_types::AgentId`] only — no
//! pointers, no cycles — so all of this state serializes trivially.

pub mod cognition;
pub mod fairness;
pub mod memory;
pub mod network;

pub use cognition::{CognitionEngine, EmotionStimulus};
pub use fairness::fehr_schmidt_utility;
pub use network::SocialNetwork;
