//! Serializable simulation state.
//!
//! [`SimulationState`] is the single snapshot a run resumes from: the
//! environment, every agent, the social network, and the RNG resume
//! seeds. It is created by the orchestrator's initializer, mutated only
//! through the per-day step, and rendered to canonical JSON after each
//! step for persistence.
//!
//! All nested structures are owned values — cloning a state fully
//! detaches it, so snapshots can never alias live run state.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::config::HazardRates;
use crate::ids::AgentId;

/// Current availability of each resource pool, all `>= 0`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct ResourceLevel {
    /// Edible plants and forage.
    pub plants: f64,

    /// Small game (birds, hares).
    pub small_game: f64,

    /// Large game (deer, elk).
    pub large_game: f64,
}

/// Mutable environment state, advanced once per day.
///
/// Invariants: `season_index` is always a valid index into the scenario
/// season list, every hazard component is in `[0, 1]`, and every
/// resource level is non-negative.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EnvironmentState {
    /// Days elapsed since the run started (0 before the first tick).
    pub day: u64,

    /// Index of the current season in the scenario season list.
    pub season_index: usize,

    /// Day offset within the current season.
    pub season_day: u64,

    /// Today's resource availability.
    pub resource_level: ResourceLevel,

    /// Today's uniform climate shock draw.
    pub climate_shock: f64,

    /// Today's composed hazard rates, each clamped to `[0, 1]`.
    pub risk_modifier: HazardRates,
}

/// An agent's current emotional state.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct EmotionState {
    /// Pleasantness in `[-1, 1]`.
    pub valence: f64,

    /// Activation in `[0, 1.5]`.
    pub arousal: f64,

    /// Slow-moving aggregate in `[-1, 1]`.
    pub mood: f64,
}

/// Fehr–Schmidt inequality-aversion parameters plus norm sensitivities.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct FehrSchmidt {
    /// Aversion to earning less than others (`>= 0`).
    pub alpha: f64,

    /// Aversion to earning more than others (`>= 0`).
    pub beta: f64,

    /// Weight placed on reputation signals, in `[0, 1]`.
    pub reputation_weight: f64,

    /// Tolerated under-reward fraction before a norm violation is felt,
    /// in `[0, 1]`.
    pub norm_penalty: f64,
}

/// Five personality sliders, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Preferences {
    /// Taste for joint work over solo work.
    pub cooperation: f64,

    /// Appetite for dangerous tasks.
    pub risk: f64,

    /// Sensitivity to unequal outcomes.
    pub fairness: f64,

    /// Pull toward interaction with camp-mates.
    pub sociability: f64,

    /// Pull toward novel tasks.
    pub curiosity: f64,
}

/// Slowly-updated beliefs about the world.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SemanticMemory {
    /// Expected availability per resource pool name.
    pub resource_expectations: BTreeMap<String, f64>,

    /// Expected fairness of reward distribution, in `[-1, 1]`.
    pub norm_expectation: f64,
}

/// One remembered relationship with another agent.
///
/// Invariant: an agent's social memory holds at most one entry per
/// partner, and every entry satisfies
/// `day - last_interaction_day <= social_memory_horizon_days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialMemoryEntry {
    /// The other agent.
    pub partner_id: AgentId,

    /// Day of the most recent interaction.
    pub last_interaction_day: u64,

    /// Blended reciprocity estimate in `[-1, 1]`.
    pub reciprocity: f64,

    /// Cumulative resources given to the partner.
    pub resources_given: f64,

    /// Cumulative resources received from the partner.
    pub resources_received: f64,

    /// Blended sentiment toward the partner in `[-1, 1]`.
    pub sentiment: f64,
}

/// One remembered event.
///
/// Invariant: every entry satisfies
/// `day - entry.day <= episodic_window_days`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EpisodicEntry {
    /// Day the event happened.
    pub day: u64,

    /// Short description of the event.
    pub summary: String,

    /// Emotional charge of the event in `[-1, 1]`.
    pub valence: f64,
}

/// Full mutable state of one agent.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AgentState {
    /// Stable agent identifier.
    pub id: AgentId,

    /// Display name.
    pub name: String,

    /// Camp the agent belongs to (e.g. `"Camp-A"`).
    pub camp_id: String,

    /// Current energy, `>= 0`.
    pub energy: f64,

    /// Accumulated energy shortfall, `>= 0`.
    pub hunger_debt: f64,

    /// Current emotional state.
    pub emotion: EmotionState,

    /// Social preference parameters.
    pub fehr_schmidt: FehrSchmidt,

    /// Standing in the band, in `[0, 1]`.
    pub reputation: f64,

    /// Skill values keyed by skill name, each in `[0, 1.2]`.
    pub skillset: BTreeMap<String, f64>,

    /// Personality sliders.
    pub preferences: Preferences,

    /// Beliefs about resources and norms.
    pub semantic_memory: SemanticMemory,

    /// At most one relationship entry per partner.
    pub social_memory: Vec<SocialMemoryEntry>,

    /// Recent events, newest first, bounded by the episodic window.
    pub episodic_memory: Vec<EpisodicEntry>,

    /// Day of the agent's last reflection, or -1 if never.
    pub last_reflection_day: i64,

    /// Task ids the agent worked most recently.
    pub last_actions: Vec<String>,
}

/// One weighted directed edge in the social network.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkEdge {
    /// Edge origin.
    pub source: AgentId,

    /// Edge destination.
    pub target: AgentId,

    /// Tie strength, always `>= 0.01` (weaker edges are pruned).
    pub weight: f64,
}

/// Serializable form of the social network.
///
/// Invariant: at most one edge per `(source, target)` pair. The edge
/// list is kept sorted by `(source, target)` so renderings are canonical.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkState {
    /// All current edges, sorted by `(source, target)`.
    pub edges: Vec<NetworkEdge>,

    /// Per-day multiplicative decay in `[0, 1]`.
    pub forget_factor: f64,

    /// Camp assignment per agent, used for assortativity.
    pub camp_membership: BTreeMap<AgentId, String>,
}

/// The single serializable snapshot a run resumes from.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationState {
    /// Environment state.
    pub environment: EnvironmentState,

    /// Every agent, ordered by id.
    pub agents: Vec<AgentState>,

    /// Social network state.
    pub network: NetworkState,

    /// Seed the run RNG resumes from.
    pub rng_seed: u32,

    /// The original run seed. Written for the record; restore reads
    /// `rng_seed` only (the run uses a single RNG stream).
    pub environment_rng_seed: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_agent() -> AgentState {
        AgentState {
            id: AgentId::new(1),
            name: String::from("Alder"),
            camp_id: String::from("Camp-A"),
            energy: 2.4,
            hunger_debt: 0.0,
            emotion: EmotionState {
                valence: 0.1,
                arousal: 0.3,
                mood: 0.0,
            },
            fehr_schmidt: FehrSchmidt {
                alpha: 0.8,
                beta: 0.3,
                reputation_weight: 0.5,
                norm_penalty: 0.25,
            },
            reputation: 0.5,
            skillset: BTreeMap::from([(String::from("gathering"), 0.6)]),
            preferences: Preferences::default(),
            semantic_memory: SemanticMemory::default(),
            social_memory: Vec::new(),
            episodic_memory: Vec::new(),
            last_reflection_day: -1,
            last_actions: Vec::new(),
        }
    }

    #[test]
    fn state_roundtrips_through_json() {
        let state = SimulationState {
            environment: EnvironmentState {
                day: 3,
                season_index: 0,
                season_day: 3,
                resource_level: ResourceLevel {
                    plants: 11.2,
                    small_game: 4.1,
                    large_game: 1.7,
                },
                climate_shock: -0.02,
                risk_modifier: HazardRates {
                    injury: 0.05,
                    hypothermia: 0.01,
                    predator: 0.02,
                },
            },
            agents: vec![sample_agent()],
            network: NetworkState {
                edges: vec![NetworkEdge {
                    source: AgentId::new(1),
                    target: AgentId::new(2),
                    weight: 0.4,
                }],
                forget_factor: 0.05,
                camp_membership: BTreeMap::from([(AgentId::new(1), String::from("Camp-A"))]),
            },
            rng_seed: 12345,
            environment_rng_seed: 42,
        };

        let json = serde_json::to_string(&state).unwrap_or_default();
        let restored: Result<SimulationState, _> = serde_json::from_str(&json);
        assert_eq!(restored.ok().as_ref(), Some(&state));
    }

    #[test]
    fn canonical_rendering_is_stable() {
        let agent = sample_agent();
        let a = serde_json::to_string(&agent).unwrap_or_default();
        let b = serde_json::to_string(&agent.clone()).unwrap_or_default();
        assert_eq!(a, b);
    }

    #[test]
    fn clone_detaches_nested_structures() {
        let mut original = sample_agent();
        let snapshot = original.clone();
        original
            .skillset
            .insert(String::from("hunting"), 0.9);
        original.social_memory.push(SocialMemoryEntry {
            partner_id: AgentId::new(2),
            last_interaction_day: 1,
            reciprocity: 0.2,
            resources_given: 1.0,
            resources_received: 0.5,
            sentiment: 0.1,
        });
        assert!(snapshot.skillset.get("hunting").is_none());
        assert!(snapshot.social_memory.is_empty());
    }
}
