//! The cognition engine: emotion updates, stimuli, and reflection.
//!
//! Every consequential event in an agent's day — a task outcome, an
//! injury, an unfair share — reaches the agent as an
//! [`EmotionStimulus`]. The engine folds the stimulus into the agent's
//! emotional state with configured decay, records it as an episodic
//! memory, and periodically distills recent episodes into a one-line
//! reflection.

use hearth_types::config::CognitionConfig;
use hearth_types::state::AgentState;
use tracing::trace;

use crate::memory;

/// Number of leading episodic entries a reflection considers.
const REFLECTION_SAMPLE: usize = 3;

/// One emotional event applied to an agent.
#[derive(Debug, Clone, PartialEq)]
pub struct EmotionStimulus {
    /// How well the event served the agent's goals, in `[-1, 1]`.
    pub goal_alignment: f64,

    /// How fair the event felt, in `[-1, 1]`.
    pub norm_alignment: f64,

    /// How well the event matched the agent's tastes, in `[-1, 1]`.
    pub preference_alignment: f64,

    /// Activation the event carries, in `[0, 1]`.
    pub arousal: f64,

    /// Short description recorded into episodic memory.
    pub summary: String,
}

/// Stateless engine applying cognition rules under one scenario config.
#[derive(Debug, Clone)]
pub struct CognitionEngine {
    config: CognitionConfig,
}

impl CognitionEngine {
    /// Build an engine for the given cognition parameters.
    pub const fn new(config: CognitionConfig) -> Self {
        Self { config }
    }

    /// The cognition configuration in use.
    pub const fn config(&self) -> &CognitionConfig {
        &self.config
    }

    /// Apply a stimulus to an agent on day `day`.
    ///
    /// The valence delta blends goal (0.6), norm (0.3) and preference
    /// (0.1) alignment; mood follows valence and arousal at half and a
    /// fifth strength. All three channels decay toward zero before the
    /// delta lands, and the event is prepended to episodic memory.
    pub fn apply_stimulus(&self, agent: &mut AgentState, day: u64, stimulus: &EmotionStimulus) {
        let valence_delta = 0.6 * stimulus.goal_alignment
            + 0.3 * stimulus.norm_alignment
            + 0.1 * stimulus.preference_alignment;
        let arousal_delta = stimulus.arousal;
        let mood_delta = 0.5 * valence_delta + 0.2 * arousal_delta;

        let decay = self.config.emotion.decay;
        let emotion = &mut agent.emotion;
        emotion.valence = (emotion.valence * (1.0 - decay) + valence_delta).clamp(-1.0, 1.0);
        emotion.arousal = (emotion.arousal * (1.0 - decay) + arousal_delta).clamp(0.0, 1.5);
        emotion.mood = (emotion.mood * (1.0 - decay / 2.0) + mood_delta).clamp(-1.0, 1.0);

        trace!(
            agent_id = %agent.id,
            day,
            valence = emotion.valence,
            arousal = emotion.arousal,
            mood = emotion.mood,
            "stimulus applied"
        );

        memory::record_episode(
            agent,
            day,
            stimulus.summary.clone(),
            valence_delta,
            self.config.episodic_window_days,
        );
    }

    /// Register a pairwise interaction in the agent's social memory.
    ///
    /// Thin wrapper over [`memory::register_interaction`] carrying the
    /// configured horizon.
    #[allow(clippy::too_many_arguments)]
    pub fn register_interaction(
        &self,
        agent: &mut AgentState,
        partner: hearth_types::AgentId,
        day: u64,
        reciprocity_delta: f64,
        given: f64,
        received: f64,
        sentiment: f64,
    ) {
        memory::register_interaction(
            agent,
            partner,
            day,
            reciprocity_delta,
            given,
            received,
            sentiment,
            self.config.social_memory_horizon_days,
        );
    }

    /// Produce a reflection for the agent, at most once per configured
    /// interval.
    ///
    /// Returns `None` when the interval has not elapsed or the agent has
    /// nothing in episodic memory. Otherwise the first three episodic
    /// entries set the tone: `"optimistic"` when positive entries are at
    /// least as common as negative ones, `"concerned"` otherwise.
    pub fn reflect(&self, agent: &mut AgentState, day: u64) -> Option<String> {
        let interval = self.config.reflection_interval_days as i64;
        let day_signed = day as i64;
        if agent.last_reflection_day >= 0
            && day_signed - agent.last_reflection_day < interval
        {
            return None;
        }
        if agent.episodic_memory.is_empty() {
            return None;
        }

        let recent = agent.episodic_memory.iter().take(REFLECTION_SAMPLE);
        let mut positive = 0_usize;
        let mut negative = 0_usize;
        for entry in recent {
            if entry.valence > 0.0 {
                positive += 1;
            } else if entry.valence < 0.0 {
                negative += 1;
            }
        }

        let tone = if positive >= negative {
            "optimistic"
        } else {
            "concerned"
        };

        agent.last_reflection_day = day_signed;
        Some(format!(
            "{} feels {tone} about the last few days around camp",
            agent.name
        ))
    }
}
