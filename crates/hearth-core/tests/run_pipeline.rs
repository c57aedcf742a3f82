//! End-to-end run pipeline: initialize, step, persist, restore, resume.
//!
//! These tests drive the whole stack the way an embedding application
//! would — simulation steps feed a `RunStore`, and a run restored from
//! the persisted state JSON continues bit-identically.

#![allow(clippy::unwrap_used)]

use hearth_core::registry::{default_scenario, ScenarioRegistry};
use hearth_core::sim::Simulation;
use hearth_db::{MemoryRunStore, RunStore};
use hearth_llm::plan::LlmDecisionCore;
use hearth_types::enums::{SeasonName, ShareNorm, TaskCategory};
use hearth_types::state::SimulationState;

fn heuristic_sim(seed: u32) -> Simulation {
    Simulation::new(default_scenario(), seed, LlmDecisionCore::heuristic_only()).unwrap()
}

#[tokio::test]
async fn persisted_run_resumes_bit_exactly() {
    let store = MemoryRunStore::new();
    let mut sim = heuristic_sim(42);

    let initial_json = serde_json::to_string(&sim.snapshot()).unwrap();
    let run_id = store
        .insert_run("river_band", 42, &initial_json)
        .await
        .unwrap();

    // Drive three days, persisting after each.
    for _ in 0..3 {
        let result = sim.step_day().await.unwrap();
        let state_json = serde_json::to_string(&result.state).unwrap();
        store
            .patch_run_state(run_id, &state_json, result.metrics.day)
            .await
            .unwrap();
        store
            .append_daily_metrics(run_id, result.metrics.day, &result.metrics)
            .await
            .unwrap();
        store.append_events(run_id, &result.logs).await.unwrap();
        let edges_json = serde_json::to_string(&result.state.network.edges).unwrap();
        store
            .append_network_snapshot(run_id, result.metrics.day, &result.network_stats, &edges_json)
            .await
            .unwrap();
    }

    // Restore from the store and step both runs two more days.
    let record = store.load_run(run_id).await.unwrap();
    assert_eq!(record.current_day, 3);
    let restored_state: SimulationState = serde_json::from_str(&record.state_json).unwrap();
    let mut restored = Simulation::from_state(
        default_scenario(),
        restored_state,
        LlmDecisionCore::heuristic_only(),
    )
    .unwrap();

    for _ in 0..2 {
        let live = sim.step_day().await.unwrap();
        let resumed = restored.step_day().await.unwrap();
        assert_eq!(
            serde_json::to_string(&live.state).unwrap(),
            serde_json::to_string(&resumed.state).unwrap(),
            "restored run diverged from live run"
        );
    }

    assert_eq!(store.metrics_for(run_id).await.len(), 3);
    assert_eq!(store.snapshots_for(run_id).await.len(), 3);
}

#[tokio::test]
async fn two_runs_same_seed_produce_identical_metric_series() {
    let mut sim_a = heuristic_sim(777);
    let mut sim_b = heuristic_sim(777);

    for _ in 0..5 {
        let a = sim_a.step_day().await.unwrap();
        let b = sim_b.step_day().await.unwrap();
        assert_eq!(a.metrics, b.metrics);
        assert_eq!(a.network_stats, b.network_stats);
    }
}

#[tokio::test]
async fn registry_scenario_rolls_the_season_over() {
    let registry = ScenarioRegistry::with_defaults();
    let config = registry.get("river_band").unwrap().clone();
    let season_length = config.timeline.season_length_days;

    let mut sim = Simulation::new(config, 9, LlmDecisionCore::heuristic_only()).unwrap();

    // Days 1 .. season_length-1 stay in the first season.
    for _ in 0..season_length - 1 {
        let result = sim.step_day().await.unwrap();
        assert_eq!(result.state.environment.season_index, 0);
    }
    // Day season_length enters the second season.
    let result = sim.step_day().await.unwrap();
    assert_eq!(
        result.state.environment.season_index, 1,
        "season should roll over on day {season_length}"
    );
    assert_eq!(
        result.state.environment.risk_modifier.injury, 0.04,
        "summer has no seasonal hazard override"
    );
}

#[tokio::test]
async fn custom_two_agent_equal_share_scenario() {
    // The literal equal-share acceptance case: two agents, one foraging
    // task with yield_per_participant 4.0 and certain success.
    let document = r"
name: pair_band
display_name: Pair Band
seasons:
  - name: spring
    resource_multiplier: 1.0
    climate_noise: 0.0
tasks:
  - id: gather
    name: Gathering
    category: foraging
    success_probability: 1.0
    yield_per_participant: 4.0
    energy_cost: 0.5
    injury_risk_multiplier: 0.0
    min_participants: 1
    recommended_participants: 2
    norm: equal_share
agent_population:
  size: 2
";
    let mut registry = ScenarioRegistry::new();
    registry.load_yaml(document).unwrap();
    let config = registry.get("pair_band").unwrap().clone();
    assert_eq!(
        config.seasons.first().map(|s| s.name),
        Some(SeasonName::Spring)
    );

    let mut sim = Simulation::new(config, 42, LlmDecisionCore::heuristic_only()).unwrap();
    let result = sim.step_day().await.unwrap();

    let execution = result.assignments.first().unwrap();
    assert_eq!(execution.task_id, "gather");
    assert_eq!(execution.participants.len(), 2);
    for share in execution.rewards.values() {
        assert!((share - 4.0).abs() < 1e-9, "equal share should be 4.0");
    }
    assert_eq!(result.metrics.cooperation_rate, 1.0);
}

#[tokio::test]
async fn hunting_scenario_respects_skill_gate_over_time() {
    let document = r"
name: hunt_band
display_name: Hunt Band
seasons:
  - name: autumn
    resource_multiplier: 1.0
    climate_noise: 0.1
tasks:
  - id: hunt
    name: Hunt
    category: hunting
    success_probability: 0.5
    yield_per_participant_on_success: 10.0
    energy_cost: 1.0
    injury_risk_multiplier: 1.0
    min_participants: 2
    recommended_participants: 3
    norm: key_contributor_reward
  - id: camp_maintenance
    name: Camp maintenance
    category: public_good
    success_probability: 0.9
    yield_per_participant: 0.2
    energy_cost: 0.2
    injury_risk_multiplier: 0.0
    min_participants: 1
    recommended_participants: 9
    norm: equal_share
agent_population:
  size: 6
";
    let mut registry = ScenarioRegistry::new();
    registry.load_yaml(document).unwrap();
    let config = registry.get("hunt_band").unwrap().clone();
    assert_eq!(
        config.tasks.first().map(|t| t.category),
        Some(TaskCategory::Hunting)
    );
    assert_eq!(
        config.tasks.first().map(|t| t.norm),
        Some(ShareNorm::KeyContributorReward)
    );

    let mut sim = Simulation::new(config, 5, LlmDecisionCore::heuristic_only()).unwrap();

    for _ in 0..10 {
        let result = sim.step_day().await.unwrap();
        for execution in &result.assignments {
            if execution.task_id != "hunt" {
                continue;
            }
            assert!(execution.participants.len() >= 2);
            for participant in &execution.participants {
                let agent = result
                    .state
                    .agents
                    .iter()
                    .find(|a| a.id == *participant)
                    .unwrap();
                let skill = agent.skillset.get("hunting").copied().unwrap_or(0.0);
                assert!(skill >= 0.3, "agent {} hunted with skill {skill}", agent.id);
            }
        }
    }
}
