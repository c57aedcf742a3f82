//! Command-line entry point for Hearth simulation runs.
//!
//! Loads a scenario (built-in by default, or a YAML document), seeds a
//! run, steps it day by day, and persists every step into the in-memory
//! store the way an embedding service would drive a real one. All
//! configuration comes from environment variables:
//!
//! - `HEARTH_SCENARIO` — scenario name to run (default `river_band`).
//! - `HEARTH_SCENARIO_FILE` — optional YAML document to register first.
//! - `HEARTH_SEED` — 32-bit run seed (default 42).
//! - `HEARTH_DAYS` — number of days to step (default 30).
//! - `HEARTH_LOG_JSON` — set to `1` for JSON log records on stdout.
//!
//! LLM plan adapters are discovered from their own environment
//! variables (`OPENAI_API_KEY`, `BEDROCK_CONVERSE_URL`/`_MODEL`,
//! `OLLAMA_HOST`); with none set, every day uses the heuristic plan and
//! the run is fully deterministic.

use std::path::PathBuf;

use anyhow::Context;
use hearth_core::registry::ScenarioRegistry;
use hearth_core::sim::Simulation;
use hearth_db::{MemoryRunStore, RunStore};
use hearth_llm::plan::LlmDecisionCore;
use tracing::info;
use tracing_subscriber::EnvFilter;

/// Runner configuration read from the environment.
struct RunnerConfig {
    /// Scenario name to look up in the registry.
    scenario: String,
    /// Optional scenario document to register before lookup.
    scenario_file: Option<PathBuf>,
    /// Run seed.
    seed: u32,
    /// Days to simulate.
    days: u64,
    /// Emit JSON log records instead of human-readable ones.
    log_json: bool,
}

impl RunnerConfig {
    /// Read configuration from environment variables, with defaults.
    fn from_env() -> Self {
        Self {
            scenario: std::env::var("HEARTH_SCENARIO")
                .unwrap_or_else(|_| String::from("river_band")),
            scenario_file: std::env::var("HEARTH_SCENARIO_FILE").ok().map(PathBuf::from),
            seed: std::env::var("HEARTH_SEED")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(42),
            days: std::env::var("HEARTH_DAYS")
                .ok()
                .and_then(|value| value.parse().ok())
                .unwrap_or(30),
            log_json: std::env::var("HEARTH_LOG_JSON").is_ok_and(|value| value == "1"),
        }
    }
}

/// Application entry point.
///
/// Initializes logging, resolves the scenario, runs the configured
/// number of days, and persists state, metrics, events, and network
/// snapshots after every step.
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let config = RunnerConfig::from_env();

    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info"));
    if config.log_json {
        tracing_subscriber::fmt().json().with_env_filter(filter).init();
    } else {
        tracing_subscriber::fmt().with_env_filter(filter).init();
    }

    info!(
        scenario = %config.scenario,
        seed = config.seed,
        days = config.days,
        "hearth-runner starting"
    );

    let mut registry = ScenarioRegistry::with_defaults();
    if let Some(path) = &config.scenario_file {
        registry
            .load_file(path)
            .with_context(|| format!("loading scenario document {}", path.display()))?;
    }
    let scenario = registry
        .get(&config.scenario)
        .context("resolving scenario")?
        .clone();

    let mut sim = Simulation::new(scenario.clone(), config.seed, LlmDecisionCore::from_env())
        .context("initializing simulation")?;

    let store = MemoryRunStore::new();
    let initial_json =
        serde_json::to_string(&sim.snapshot()).context("serializing initial state")?;
    let run_id = store
        .insert_run(&scenario.name, config.seed, &initial_json)
        .await
        .context("inserting run")?;
    info!(%run_id, "run created");

    for _ in 0..config.days {
        let result = sim.step_day().await.context("stepping day")?;
        let day = result.metrics.day;

        let state_json = serde_json::to_string(&result.state).context("serializing state")?;
        store.patch_run_state(run_id, &state_json, day).await?;
        store
            .append_daily_metrics(run_id, day, &result.metrics)
            .await?;
        store.append_events(run_id, &result.logs).await?;
        let edges_json = serde_json::to_string(&result.state.network.edges)
            .context("serializing edges")?;
        store
            .append_network_snapshot(run_id, day, &result.network_stats, &edges_json)
            .await?;

        info!(
            day,
            executions = result.assignments.len(),
            cooperation_rate = result.metrics.cooperation_rate,
            energy_balance = result.metrics.energy_balance,
            risk_incidents = result.metrics.risk_incidents,
            edges = result.network_stats.edge_count,
            "day complete"
        );
    }

    let record = store.load_run(run_id).await?;
    info!(
        %run_id,
        final_day = record.current_day,
        state_bytes = record.state_json.len(),
        "run finished"
    );

    Ok(())
}
