//! Agent spawner: seeds the band at simulation start.
//!
//! Agents are numbered 1..N, rotated across three camps, and given
//! names from a fixed pool by index (deterministic — names never touch
//! the RNG). Everything sampled draws from the run RNG in a fixed
//! order per agent: skills (sorted by skill name), alpha, beta,
//! reputation weight, norm penalty, then the five preference sliders.

use std::collections::BTreeMap;

use hearth_types::config::ScenarioConfig;
use hearth_types::ids::AgentId;
use hearth_types::state::{
    AgentState, EmotionState, FehrSchmidt, Preferences, SemanticMemory,
};
use hearth_world::rng::DeterministicRng;
use hearth_world::sampling;
use tracing::info;

/// Camps agents rotate across at spawn.
const CAMPS: &[&str] = &["Camp-A", "Camp-B", "Camp-C"];

/// Name pool; indices wrap with a numeric suffix for large bands.
const NAME_POOL: &[&str] = &[
    "Alder", "Birch", "Cedar", "Dusk", "Ember", "Fern", "Grove", "Haze",
    "Iris", "Juniper", "Kestrel", "Lark", "Moss", "Nettle", "Oak", "Pine",
    "Quill", "Reed", "Sage", "Thorn", "Umber", "Vale", "Wren", "Yarrow",
];

/// Skill values are clamped to this ceiling.
const SKILL_CEILING: f64 = 1.2;

/// Standard deviation used when sampling around the configured
/// reputation weight and norm penalty.
const PREFERENCE_PARAM_STD: f64 = 0.1;

/// Mean and standard deviation of the five preference sliders.
const SLIDER_MEAN: f64 = 0.5;
const SLIDER_STD: f64 = 0.15;

/// Energy multiple of the daily need agents start with.
const STARTING_ENERGY_MULTIPLE: f64 = 1.2;

/// Starting reputation for every agent.
const STARTING_REPUTATION: f64 = 0.5;

/// Spawn the configured population.
///
/// Draw order is fixed so two spawns from the same seed are identical.
pub fn spawn_population(config: &ScenarioConfig, rng: &mut DeterministicRng) -> Vec<AgentState> {
    let population = &config.agent_population;
    let prefs = &population.social_preferences;
    let emotion = &config.cognition.emotion;
    let daily_need = config.defaults.daily_energy_need;

    let mut agents = Vec::with_capacity(population.size as usize);
    for number in 1..=population.size {
        let index = (number - 1) as usize;
        let camp = CAMPS.get(index % CAMPS.len()).copied().unwrap_or("Camp-A");

        // Skill profiles iterate in sorted name order (BTreeMap), so
        // the draw sequence is stable across runs.
        let skillset: BTreeMap<String, f64> = population
            .skill_profiles
            .iter()
            .map(|(name, profile)| {
                let value =
                    sampling::normal(rng, profile.mean, profile.std).clamp(0.0, SKILL_CEILING);
                (name.clone(), value)
            })
            .collect();

        let alpha = sampling::normal(rng, prefs.alpha.mean, prefs.alpha.std).max(0.0);
        let beta = sampling::normal(rng, prefs.beta.mean, prefs.beta.std).max(0.0);
        let reputation_weight =
            sampling::normal(rng, prefs.reputation_weight, PREFERENCE_PARAM_STD)
                .clamp(0.0, 1.0);
        let norm_penalty = sampling::normal(rng, prefs.norm_penalty, PREFERENCE_PARAM_STD)
            .clamp(0.0, 1.0);

        let preferences = Preferences {
            cooperation: sample_slider(rng),
            risk: sample_slider(rng),
            fairness: sample_slider(rng),
            sociability: sample_slider(rng),
            curiosity: sample_slider(rng),
        };

        let mut resource_expectations = BTreeMap::new();
        resource_expectations.insert(String::from("plants"), config.resources.base_plant_rate);
        resource_expectations.insert(
            String::from("small_game"),
            config.resources.base_small_game_rate,
        );
        resource_expectations.insert(
            String::from("large_game"),
            config.resources.base_large_game_rate,
        );

        agents.push(AgentState {
            id: AgentId::new(number),
            name: pool_name(index),
            camp_id: String::from(camp),
            energy: daily_need * STARTING_ENERGY_MULTIPLE,
            hunger_debt: 0.0,
            emotion: EmotionState {
                valence: emotion.baseline_valence,
                arousal: emotion.baseline_arousal,
                mood: 0.0,
            },
            fehr_schmidt: FehrSchmidt {
                alpha,
                beta,
                reputation_weight,
                norm_penalty,
            },
            reputation: STARTING_REPUTATION,
            skillset,
            preferences,
            semantic_memory: SemanticMemory {
                resource_expectations,
                norm_expectation: 0.0,
            },
            social_memory: Vec::new(),
            episodic_memory: Vec::new(),
            last_reflection_day: -1,
            last_actions: Vec::new(),
        });
    }

    info!(size = agents.len(), "population spawned");
    agents
}

/// Draw one preference slider.
fn sample_slider(rng: &mut DeterministicRng) -> f64 {
    sampling::normal(rng, SLIDER_MEAN, SLIDER_STD).clamp(0.0, 1.0)
}

/// Name for the agent at `index`, wrapping the pool with a suffix.
fn pool_name(index: usize) -> String {
    let base = NAME_POOL
        .get(index % NAME_POOL.len())
        .copied()
        .unwrap_or("Wanderer");
    let round = index / NAME_POOL.len();
    if round == 0 {
        String::from(base)
    } else {
        format!("{base} {}", round + 1)
    }
}

#[cfg(test)]
mod tests {
    use crate::registry::default_scenario;

    use super::*;

    #[test]
    fn spawns_configured_size_with_camp_rotation() {
        let config = default_scenario();
        let mut rng = DeterministicRng::new(42);
        let agents = spawn_population(&config, &mut rng);

        assert_eq!(agents.len(), config.agent_population.size as usize);
        assert_eq!(agents.first().map(|a| a.camp_id.as_str()), Some("Camp-A"));
        assert_eq!(agents.get(1).map(|a| a.camp_id.as_str()), Some("Camp-B"));
        assert_eq!(agents.get(2).map(|a| a.camp_id.as_str()), Some("Camp-C"));
        assert_eq!(agents.get(3).map(|a| a.camp_id.as_str()), Some("Camp-A"));
    }

    #[test]
    fn spawn_is_deterministic() {
        let config = default_scenario();
        let mut rng_a = DeterministicRng::new(42);
        let mut rng_b = DeterministicRng::new(42);
        assert_eq!(
            spawn_population(&config, &mut rng_a),
            spawn_population(&config, &mut rng_b)
        );
    }

    #[test]
    fn sampled_values_respect_bounds() {
        let config = default_scenario();
        let mut rng = DeterministicRng::new(7);
        for agent in spawn_population(&config, &mut rng) {
            assert!(agent.fehr_schmidt.alpha >= 0.0);
            assert!(agent.fehr_schmidt.beta >= 0.0);
            assert!((0.0..=1.0).contains(&agent.fehr_schmidt.reputation_weight));
            assert!((0.0..=1.0).contains(&agent.fehr_schmidt.norm_penalty));
            for value in agent.skillset.values() {
                assert!((0.0..=SKILL_CEILING).contains(value));
            }
            for slider in [
                agent.preferences.cooperation,
                agent.preferences.risk,
                agent.preferences.fairness,
                agent.preferences.sociability,
                agent.preferences.curiosity,
            ] {
                assert!((0.0..=1.0).contains(&slider));
            }
        }
    }

    #[test]
    fn agents_start_rested_and_neutral() {
        let config = default_scenario();
        let mut rng = DeterministicRng::new(7);
        let agents = spawn_population(&config, &mut rng);
        let need = config.defaults.daily_energy_need;
        for agent in &agents {
            assert!((agent.energy - need * 1.2).abs() < 1e-12);
            assert_eq!(agent.reputation, 0.5);
            assert_eq!(agent.last_reflection_day, -1);
            assert!(agent.social_memory.is_empty());
            assert!(agent.episodic_memory.is_empty());
        }
    }

    #[test]
    fn names_are_unique_even_when_pool_wraps() {
        let mut config = default_scenario();
        config.agent_population.size = 30;
        let mut rng = DeterministicRng::new(7);
        let agents = spawn_population(&config, &mut rng);
        let mut names: Vec<&str> = agents.iter().map(|a| a.name.as_str()).collect();
        names.sort_unstable();
        names.dedup();
        assert_eq!(names.len(), 30);
    }
}
