//! Typed scenario configuration.
//!
//! A [`ScenarioConfig`] is the immutable per-run input: seasons, resource
//! rates, hazards, the task roster, the agent population, cognition
//! parameters, timeline, defaults, logging toggles, and the LLM plan
//! template. Scenario documents are YAML; the structs here mirror that
//! shape with serde defaults so sparse documents stay valid.
//!
//! Validation (non-empty name, at least one task, known season names,
//! non-empty micro-interaction list) lives in the scenario registry, not
//! here — this module is pure shape.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::{SeasonName, ShareNorm, TaskCategory};

/// Immutable description of one simulation scenario.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ScenarioConfig {
    /// Registry key for this scenario.
    pub name: String,

    /// Human-readable scenario title.
    #[serde(default)]
    pub display_name: String,

    /// Ordered annual cycle of seasons.
    #[serde(default = "default_seasons")]
    pub seasons: Vec<SeasonConfig>,

    /// Resource draw parameters.
    #[serde(default)]
    pub resources: ResourceConfig,

    /// Hazard composition.
    #[serde(default)]
    pub hazards: HazardConfig,

    /// Ordered task roster the planner walks each day.
    #[serde(default)]
    pub tasks: Vec<TaskConfig>,

    /// Agent population parameters.
    #[serde(default)]
    pub agent_population: PopulationConfig,

    /// Cognition engine parameters.
    #[serde(default)]
    pub cognition: CognitionConfig,

    /// Social network parameters.
    #[serde(default)]
    pub network: NetworkConfig,

    /// Timeline parameters.
    #[serde(default)]
    pub timeline: TimelineConfig,

    /// Shared scalar defaults.
    #[serde(default)]
    pub defaults: DefaultsConfig,

    /// Event logging toggles.
    #[serde(default)]
    pub logging: LoggingConfig,

    /// LLM decision layer parameters.
    #[serde(default)]
    pub llm: LlmConfig,
}

/// One named season with its environmental modifiers.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeasonConfig {
    /// Which season this is.
    pub name: SeasonName,

    /// Multiplier applied to all base resource rates during this season.
    #[serde(default = "default_one")]
    pub resource_multiplier: f64,

    /// Half-width of the uniform climate shock drawn each tick.
    #[serde(default)]
    pub climate_noise: f64,
}

/// Resource draw parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ResourceConfig {
    /// Base daily plant availability.
    #[serde(default = "default_base_plant_rate")]
    pub base_plant_rate: f64,

    /// Base daily small-game availability.
    #[serde(default = "default_base_small_game_rate")]
    pub base_small_game_rate: f64,

    /// Base daily large-game availability.
    #[serde(default = "default_base_large_game_rate")]
    pub base_large_game_rate: f64,

    /// Gamma distribution feeding the day-to-day abundance multiplier.
    #[serde(default)]
    pub poisson_gamma: PoissonGammaConfig,

    /// Optional log-Gaussian multiplier applied to the plant draw.
    #[serde(default)]
    pub log_gaussian: Option<LogGaussianConfig>,

    /// Optional per-season additive bonus to the large-game level.
    #[serde(default)]
    pub large_game_bonus: Option<BTreeMap<SeasonName, f64>>,
}

impl Default for ResourceConfig {
    fn default() -> Self {
        Self {
            base_plant_rate: default_base_plant_rate(),
            base_small_game_rate: default_base_small_game_rate(),
            base_large_game_rate: default_base_large_game_rate(),
            poisson_gamma: PoissonGammaConfig::default(),
            log_gaussian: None,
            large_game_bonus: None,
        }
    }
}

/// Shape/scale pair for the gamma abundance draw.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PoissonGammaConfig {
    /// Gamma shape parameter (k).
    #[serde(default = "default_gamma_shape")]
    pub shape: f64,

    /// Gamma scale parameter (theta).
    #[serde(default = "default_one")]
    pub scale: f64,
}

impl Default for PoissonGammaConfig {
    fn default() -> Self {
        Self {
            shape: default_gamma_shape(),
            scale: default_one(),
        }
    }
}

/// Mean/variance pair for the optional log-Gaussian multiplier.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct LogGaussianConfig {
    /// Mean of the underlying normal.
    pub mean: f64,

    /// Variance of the underlying normal.
    pub variance: f64,
}

/// Hazard composition: base rates plus optional per-season overrides.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct HazardConfig {
    /// Baseline hazard rates applied every day.
    #[serde(default)]
    pub base: HazardRates,

    /// Additive per-season hazard adjustments.
    #[serde(default)]
    pub seasonal: BTreeMap<SeasonName, HazardRates>,
}

/// An `{injury, hypothermia, predator}` triple, each in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct HazardRates {
    /// Daily injury hazard.
    #[serde(default)]
    pub injury: f64,

    /// Daily hypothermia hazard.
    #[serde(default)]
    pub hypothermia: f64,

    /// Daily predator hazard.
    #[serde(default)]
    pub predator: f64,
}

impl HazardRates {
    /// Component-wise sum of two hazard triples, clamped to `[0, 1]`.
    pub fn compose(self, other: Self) -> Self {
        Self {
            injury: (self.injury + other.injury).clamp(0.0, 1.0),
            hypothermia: (self.hypothermia + other.hypothermia).clamp(0.0, 1.0),
            predator: (self.predator + other.predator).clamp(0.0, 1.0),
        }
    }
}

/// One task in the scenario roster.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskConfig {
    /// Stable task identifier (e.g. `"gather_berries"`).
    pub id: String,

    /// Human-readable task name used in prompts.
    #[serde(default)]
    pub name: String,

    /// Work category; selects resource pool and skill key.
    pub category: TaskCategory,

    /// Base success probability before situational adjustments.
    #[serde(default = "default_success_probability")]
    pub success_probability: f64,

    /// Reward paid per participant on success (scales with group size).
    #[serde(default)]
    pub yield_per_participant: Option<f64>,

    /// Flat reward paid once per successful task, then shared by norm.
    #[serde(default)]
    pub yield_per_participant_on_success: Option<f64>,

    /// Base energy cost per participant.
    #[serde(default = "default_energy_cost")]
    pub energy_cost: f64,

    /// Multiplier on the base injury hazard for this task.
    #[serde(default = "default_one")]
    pub injury_risk_multiplier: f64,

    /// Minimum participants required for the task to run.
    #[serde(default = "default_min_participants")]
    pub min_participants: usize,

    /// Target head-count the planner tries to fill.
    #[serde(default = "default_recommended_participants")]
    pub recommended_participants: usize,

    /// Fairness rule distributing the task's total reward.
    #[serde(default = "default_norm")]
    pub norm: ShareNorm,
}

/// Agent population parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PopulationConfig {
    /// Number of agents to spawn.
    #[serde(default = "default_population_size")]
    pub size: u32,

    /// Per-skill sampling parameters, keyed by skill name.
    #[serde(default = "default_skill_profiles")]
    pub skill_profiles: BTreeMap<String, SkillProfile>,

    /// Social preference sampling parameters.
    #[serde(default)]
    pub social_preferences: SocialPreferenceConfig,
}

impl Default for PopulationConfig {
    fn default() -> Self {
        Self {
            size: default_population_size(),
            skill_profiles: default_skill_profiles(),
            social_preferences: SocialPreferenceConfig::default(),
        }
    }
}

/// Mean/std pair for one sampled skill.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SkillProfile {
    /// Mean of the normal draw.
    pub mean: f64,

    /// Standard deviation of the normal draw.
    pub std: f64,
}

/// Mean/std pair for one sampled scalar.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GaussianParam {
    /// Mean of the normal draw.
    pub mean: f64,

    /// Standard deviation of the normal draw.
    pub std: f64,
}

/// Fehr–Schmidt social preference sampling parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SocialPreferenceConfig {
    /// Disadvantageous-inequality aversion (alpha) draw parameters.
    #[serde(default = "default_alpha")]
    pub alpha: GaussianParam,

    /// Advantageous-inequality aversion (beta) draw parameters.
    #[serde(default = "default_beta")]
    pub beta: GaussianParam,

    /// Central reputation weight in `[0, 1]`.
    #[serde(default = "default_half")]
    pub reputation_weight: f64,

    /// Central norm-violation tolerance in `[0, 1]`.
    #[serde(default = "default_norm_penalty")]
    pub norm_penalty: f64,
}

impl Default for SocialPreferenceConfig {
    fn default() -> Self {
        Self {
            alpha: default_alpha(),
            beta: default_beta(),
            reputation_weight: default_half(),
            norm_penalty: default_norm_penalty(),
        }
    }
}

/// Cognition engine parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CognitionConfig {
    /// Emotion dynamics.
    #[serde(default)]
    pub emotion: EmotionConfig,

    /// Days an episodic entry stays in memory.
    #[serde(default = "default_episodic_window")]
    pub episodic_window_days: u64,

    /// Days a social memory entry survives without a fresh interaction.
    #[serde(default = "default_social_horizon")]
    pub social_memory_horizon_days: u64,

    /// Minimum days between two reflections of the same agent.
    #[serde(default = "default_reflection_interval")]
    pub reflection_interval_days: u64,
}

impl Default for CognitionConfig {
    fn default() -> Self {
        Self {
            emotion: EmotionConfig::default(),
            episodic_window_days: default_episodic_window(),
            social_memory_horizon_days: default_social_horizon(),
            reflection_interval_days: default_reflection_interval(),
        }
    }
}

/// Emotion dynamics parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct EmotionConfig {
    /// Per-stimulus decay factor in `[0, 1]`.
    #[serde(default = "default_emotion_decay")]
    pub decay: f64,

    /// Valence agents start at.
    #[serde(default)]
    pub baseline_valence: f64,

    /// Arousal agents start at.
    #[serde(default = "default_baseline_arousal")]
    pub baseline_arousal: f64,
}

impl Default for EmotionConfig {
    fn default() -> Self {
        Self {
            decay: default_emotion_decay(),
            baseline_valence: 0.0,
            baseline_arousal: default_baseline_arousal(),
        }
    }
}

/// Social network parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NetworkConfig {
    /// Per-day multiplicative edge decay in `[0, 1]`.
    #[serde(default = "default_network_decay")]
    pub decay: f64,
}

impl Default for NetworkConfig {
    fn default() -> Self {
        Self {
            decay: default_network_decay(),
        }
    }
}

/// Timeline parameters.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TimelineConfig {
    /// Days in one season.
    #[serde(default = "default_season_length")]
    pub season_length_days: u64,

    /// Flavor interactions available to agents each day. Must be
    /// non-empty for a scenario to pass registry validation.
    #[serde(default = "default_micro_interactions")]
    pub daily_micro_interactions: Vec<String>,
}

impl Default for TimelineConfig {
    fn default() -> Self {
        Self {
            season_length_days: default_season_length(),
            daily_micro_interactions: default_micro_interactions(),
        }
    }
}

/// Shared scalar defaults.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DefaultsConfig {
    /// Energy an agent burns per day just existing.
    #[serde(default = "default_daily_energy_need")]
    pub daily_energy_need: f64,
}

impl Default for DefaultsConfig {
    fn default() -> Self {
        Self {
            daily_energy_need: default_daily_energy_need(),
        }
    }
}

/// Event logging toggles.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LoggingConfig {
    /// Log one entry per task execution.
    #[serde(default = "default_true")]
    pub assignments: bool,

    /// Log non-empty agent reflections.
    #[serde(default = "default_true")]
    pub reflections: bool,

    /// Log injuries as they are sampled.
    #[serde(default = "default_true")]
    pub injuries: bool,
}

impl Default for LoggingConfig {
    fn default() -> Self {
        Self {
            assignments: true,
            reflections: true,
            injuries: true,
        }
    }
}

/// LLM decision layer parameters.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct LlmConfig {
    /// Instruction suffix appended to the assembled plan prompt.
    #[serde(default)]
    pub plan_template: String,
}

const fn default_one() -> f64 {
    1.0
}

const fn default_half() -> f64 {
    0.5
}

const fn default_true() -> bool {
    true
}

const fn default_base_plant_rate() -> f64 {
    10.0
}

const fn default_base_small_game_rate() -> f64 {
    6.0
}

const fn default_base_large_game_rate() -> f64 {
    2.0
}

const fn default_gamma_shape() -> f64 {
    2.0
}

const fn default_success_probability() -> f64 {
    0.6
}

const fn default_energy_cost() -> f64 {
    1.0
}

const fn default_min_participants() -> usize {
    1
}

const fn default_recommended_participants() -> usize {
    2
}

const fn default_norm() -> ShareNorm {
    ShareNorm::EqualShare
}

const fn default_population_size() -> u32 {
    6
}

fn default_skill_profiles() -> BTreeMap<String, SkillProfile> {
    let mut profiles = BTreeMap::new();
    profiles.insert(
        String::from("crafting"),
        SkillProfile { mean: 0.4, std: 0.15 },
    );
    profiles.insert(
        String::from("gathering"),
        SkillProfile { mean: 0.5, std: 0.15 },
    );
    profiles.insert(
        String::from("hunting"),
        SkillProfile { mean: 0.5, std: 0.2 },
    );
    profiles
}

const fn default_alpha() -> GaussianParam {
    GaussianParam { mean: 0.8, std: 0.3 }
}

const fn default_beta() -> GaussianParam {
    GaussianParam { mean: 0.3, std: 0.15 }
}

const fn default_norm_penalty() -> f64 {
    0.25
}

const fn default_episodic_window() -> u64 {
    14
}

const fn default_social_horizon() -> u64 {
    30
}

const fn default_reflection_interval() -> u64 {
    7
}

const fn default_emotion_decay() -> f64 {
    0.12
}

const fn default_baseline_arousal() -> f64 {
    0.3
}

const fn default_network_decay() -> f64 {
    0.05
}

const fn default_season_length() -> u64 {
    30
}

fn default_micro_interactions() -> Vec<String> {
    vec![
        String::from("share_meal"),
        String::from("tell_story"),
        String::from("mend_gear"),
    ]
}

const fn default_daily_energy_need() -> f64 {
    2.0
}

fn default_seasons() -> Vec<SeasonConfig> {
    vec![
        SeasonConfig {
            name: SeasonName::Spring,
            resource_multiplier: 1.0,
            climate_noise: 0.1,
        },
        SeasonConfig {
            name: SeasonName::Summer,
            resource_multiplier: 1.2,
            climate_noise: 0.1,
        },
        SeasonConfig {
            name: SeasonName::Autumn,
            resource_multiplier: 1.0,
            climate_noise: 0.15,
        },
        SeasonConfig {
            name: SeasonName::Winter,
            resource_multiplier: 0.6,
            climate_noise: 0.2,
        },
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn sparse_yaml_document_fills_defaults() {
        let yaml = r"
name: test
display_name: Test Band
tasks:
  - id: gather_berries
    category: foraging
";
        let config: Result<ScenarioConfig, _> = serde_yml::from_str(yaml);
        assert!(config.is_ok());
        let config = config.unwrap_or_else(|_| ScenarioConfig {
            name: String::new(),
            display_name: String::new(),
            seasons: Vec::new(),
            resources: ResourceConfig::default(),
            hazards: HazardConfig::default(),
            tasks: Vec::new(),
            agent_population: PopulationConfig::default(),
            cognition: CognitionConfig::default(),
            network: NetworkConfig::default(),
            timeline: TimelineConfig::default(),
            defaults: DefaultsConfig::default(),
            logging: LoggingConfig::default(),
            llm: LlmConfig::default(),
        });
        assert_eq!(config.seasons.len(), 4);
        assert_eq!(config.tasks.len(), 1);
        assert_eq!(
            config.tasks.first().map(|t| t.category),
            Some(TaskCategory::Foraging)
        );
        assert!(config.timeline.season_length_days > 0);
        assert!(!config.timeline.daily_micro_interactions.is_empty());
    }

    #[test]
    fn hazard_composition_clamps() {
        let base = HazardRates {
            injury: 0.8,
            hypothermia: 0.1,
            predator: 0.0,
        };
        let seasonal = HazardRates {
            injury: 0.5,
            hypothermia: -0.2,
            predator: 0.3,
        };
        let composed = base.compose(seasonal);
        assert_eq!(composed.injury, 1.0);
        assert_eq!(composed.hypothermia, 0.0);
        assert_eq!(composed.predator, 0.3);
    }

    #[test]
    fn seasonal_bonus_map_keys_by_season() {
        let yaml = r"
base_plant_rate: 12.0
large_game_bonus:
  autumn: 1.5
  winter: 0.5
";
        let resources: Result<ResourceConfig, _> = serde_yml::from_str(yaml);
        assert!(resources.is_ok());
        let bonus = resources
            .ok()
            .and_then(|r| r.large_game_bonus)
            .unwrap_or_default();
        assert_eq!(bonus.get(&SeasonName::Autumn).copied(), Some(1.5));
    }
}
