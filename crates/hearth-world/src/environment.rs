//! Seasonal environment: per-day resource draws and hazard composition.
//!
//! The environment owns the [`EnvironmentState`] and advances it one day
//! per tick. Each tick derives the season from the day counter, draws a
//! gamma abundance multiplier and a uniform climate shock from the run
//! RNG, optionally applies a log-Gaussian multiplier to the plant level,
//! and recomposes the hazard triple from the base rates plus the
//! season's override.
//!
//! The day counter is the source of truth for the season — season index
//! and season day are always recomputed, never stored independently of
//! the day.

use hearth_types::config::{HazardConfig, HazardRates, ResourceConfig, ScenarioConfig, SeasonConfig};
use hearth_types::state::{EnvironmentState, ResourceLevel};
use tracing::debug;

use crate::rng::DeterministicRng;
use crate::sampling;

/// Floor applied to the gamma-plus-shock multiplier so a harsh draw can
/// never zero out a season entirely.
const ABUNDANCE_FLOOR: f64 = 0.1;

/// Dampening applied to the small-game draw relative to plants.
const SMALL_GAME_FACTOR: f64 = 0.8;

/// Errors from environment construction or ticking.
#[derive(Debug, thiserror::Error)]
pub enum EnvironmentError {
    /// The scenario's environmental configuration is unusable.
    #[error("invalid environment configuration: {reason}")]
    InvalidConfig {
        /// Explanation of what is wrong.
        reason: String,
    },

    /// A restored state referenced a season index that does not exist.
    #[error("season index {index} out of bounds (len {len})")]
    SeasonOutOfBounds {
        /// The offending index.
        index: usize,
        /// The configured season count.
        len: usize,
    },
}

/// The seasonal environment model.
///
/// Holds the scenario's environmental configuration by value plus the
/// current [`EnvironmentState`].
#[derive(Debug, Clone)]
pub struct SeasonalEnvironment {
    seasons: Vec<SeasonConfig>,
    resources: ResourceConfig,
    hazards: HazardConfig,
    season_length_days: u64,
    state: EnvironmentState,
}

impl SeasonalEnvironment {
    /// Build a fresh environment at day 0 from a scenario.
    ///
    /// Resources start at their base rates and the hazard triple is
    /// composed for the first season.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::InvalidConfig`] if the scenario has
    /// no seasons, a zero season length, or a non-positive gamma shape.
    pub fn new(config: &ScenarioConfig) -> Result<Self, EnvironmentError> {
        validate(config)?;

        let first_season = config
            .seasons
            .first()
            .ok_or_else(|| EnvironmentError::InvalidConfig {
                reason: String::from("at least one season must be configured"),
            })?;

        let state = EnvironmentState {
            day: 0,
            season_index: 0,
            season_day: 0,
            resource_level: ResourceLevel {
                plants: config.resources.base_plant_rate,
                small_game: config.resources.base_small_game_rate,
                large_game: config.resources.base_large_game_rate,
            },
            climate_shock: 0.0,
            risk_modifier: compose_hazards(&config.hazards, first_season.name),
        };

        Ok(Self {
            seasons: config.seasons.clone(),
            resources: config.resources.clone(),
            hazards: config.hazards.clone(),
            season_length_days: config.timeline.season_length_days,
            state,
        })
    }

    /// Rebuild an environment from a restored state.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError`] if the configuration is invalid or
    /// the state's season index does not fit the configured seasons.
    pub fn from_state(
        config: &ScenarioConfig,
        state: EnvironmentState,
    ) -> Result<Self, EnvironmentError> {
        validate(config)?;
        if state.season_index >= config.seasons.len() {
            return Err(EnvironmentError::SeasonOutOfBounds {
                index: state.season_index,
                len: config.seasons.len(),
            });
        }
        Ok(Self {
            seasons: config.seasons.clone(),
            resources: config.resources.clone(),
            hazards: config.hazards.clone(),
            season_length_days: config.timeline.season_length_days,
            state,
        })
    }

    /// Current environment state.
    pub const fn state(&self) -> &EnvironmentState {
        &self.state
    }

    /// The configuration of the current season.
    pub fn current_season(&self) -> Option<&SeasonConfig> {
        self.seasons.get(self.state.season_index)
    }

    /// Advance the environment by one day.
    ///
    /// Draw order is fixed (gamma, climate shock, optional log-Gaussian)
    /// so the RNG stream is reproducible.
    ///
    /// # Errors
    ///
    /// Returns [`EnvironmentError::SeasonOutOfBounds`] if the derived
    /// season index somehow exceeds the season list; this indicates a
    /// bug, not a recoverable condition.
    pub fn tick(&mut self, rng: &mut DeterministicRng) -> Result<&EnvironmentState, EnvironmentError> {
        let day = self.state.day.saturating_add(1);
        let season_count = self.seasons.len() as u64;
        let season_index =
            ((day / self.season_length_days) % season_count) as usize;
        let season_day = day % self.season_length_days;

        let season = self.seasons.get(season_index).ok_or(
            EnvironmentError::SeasonOutOfBounds {
                index: season_index,
                len: self.seasons.len(),
            },
        )?;

        let abundance = sampling::gamma(
            rng,
            self.resources.poisson_gamma.shape,
            self.resources.poisson_gamma.scale,
        );
        let climate_shock = rng.range(-season.climate_noise, season.climate_noise);
        let log_gaussian = self
            .resources
            .log_gaussian
            .as_ref()
            .map_or(1.0, |lg| sampling::log_gaussian(rng, lg.mean, lg.variance));

        let base_multiplier =
            season.resource_multiplier * (abundance + climate_shock).max(ABUNDANCE_FLOOR);

        let seasonal_bonus = self
            .resources
            .large_game_bonus
            .as_ref()
            .and_then(|bonus| bonus.get(&season.name))
            .copied()
            .unwrap_or(0.0);

        self.state = EnvironmentState {
            day,
            season_index,
            season_day,
            resource_level: ResourceLevel {
                plants: self.resources.base_plant_rate * base_multiplier * log_gaussian,
                small_game: self.resources.base_small_game_rate
                    * base_multiplier
                    * SMALL_GAME_FACTOR,
                large_game: (self.resources.base_large_game_rate * base_multiplier
                    + seasonal_bonus)
                    .max(0.0),
            },
            climate_shock,
            risk_modifier: compose_hazards(&self.hazards, season.name),
        };

        debug!(
            day,
            season = %season.name,
            plants = self.state.resource_level.plants,
            small_game = self.state.resource_level.small_game,
            large_game = self.state.resource_level.large_game,
            "environment ticked"
        );

        Ok(&self.state)
    }
}

/// Compose base hazards with the named season's override, clamped to
/// `[0, 1]` per component.
fn compose_hazards(
    hazards: &HazardConfig,
    season: hearth_types::enums::SeasonName,
) -> HazardRates {
    let seasonal = hazards.seasonal.get(&season).copied().unwrap_or_default();
    hazards.base.compose(seasonal)
}

/// Check the environmental parts of a scenario.
fn validate(config: &ScenarioConfig) -> Result<(), EnvironmentError> {
    if config.seasons.is_empty() {
        return Err(EnvironmentError::InvalidConfig {
            reason: String::from("at least one season must be configured"),
        });
    }
    if config.timeline.season_length_days == 0 {
        return Err(EnvironmentError::InvalidConfig {
            reason: String::from("season_length_days must be at least 1"),
        });
    }
    if config.resources.poisson_gamma.shape <= 0.0 {
        return Err(EnvironmentError::InvalidConfig {
            reason: String::from("poisson_gamma.shape must be positive"),
        });
    }
    Ok(())
}
