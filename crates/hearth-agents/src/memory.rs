//! Episodic and social memory maintenance.
//!
//! Both memory stores are bounded lists on [`AgentState`], newest first:
//!
//! - **Episodic** entries record individual events and are evicted once
//!   they fall outside the scenario's episodic window.
//! - **Social** entries record one relationship per partner. Registering
//!   an interaction replaces the partner's previous entry, blending the
//!   old reciprocity and sentiment into the new one so relationships
//!   have momentum without unbounded growth.
//!
//! Invariants maintained here: at most one social entry per partner, and
//! every entry within its horizon. The simulation step relies on these
//! holding after every mutation.
//!
//! [`AgentState`]: hearth_types::state::AgentState

use hearth_types::ids::AgentId;
use hearth_types::state::{AgentState, EpisodicEntry, SocialMemoryEntry};

/// Fraction of the previous reciprocity carried into a fresh interaction.
const RECIPROCITY_CARRYOVER: f64 = 0.6;

/// Fraction of the previous sentiment carried into a fresh interaction.
const SENTIMENT_CARRYOVER: f64 = 0.5;

/// Prepend an episodic entry and evict entries outside the window.
pub fn record_episode(
    agent: &mut AgentState,
    day: u64,
    summary: String,
    valence: f64,
    episodic_window_days: u64,
) {
    agent.episodic_memory.insert(
        0,
        EpisodicEntry {
            day,
            summary,
            valence,
        },
    );
    agent
        .episodic_memory
        .retain(|entry| day.saturating_sub(entry.day) <= episodic_window_days);
}

/// Register an interaction with a partner, replacing any previous entry.
///
/// Entries outside the horizon are evicted first, then the partner's old
/// entry (if any) is removed and its reciprocity/sentiment blended into
/// the fresh entry:
///
/// - `reciprocity = clamp(prev * 0.6 + reciprocity_delta, -1, 1)`
/// - `resources_given/received` accumulate
/// - `sentiment = clamp(prev * 0.5 + sentiment, -1, 1)`
pub fn register_interaction(
    agent: &mut AgentState,
    partner: AgentId,
    day: u64,
    reciprocity_delta: f64,
    given: f64,
    received: f64,
    sentiment: f64,
    horizon_days: u64,
) {
    agent
        .social_memory
        .retain(|entry| day.saturating_sub(entry.last_interaction_day) <= horizon_days);

    let previous = agent
        .social_memory
        .iter()
        .position(|entry| entry.partner_id == partner)
        .map(|index| agent.social_memory.remove(index));

    let (prev_reciprocity, prev_given, prev_received, prev_sentiment) = previous
        .map_or((0.0, 0.0, 0.0, 0.0), |entry| {
            (
                entry.reciprocity,
                entry.resources_given,
                entry.resources_received,
                entry.sentiment,
            )
        });

    agent.social_memory.insert(
        0,
        SocialMemoryEntry {
            partner_id: partner,
            last_interaction_day: day,
            reciprocity: (prev_reciprocity * RECIPROCITY_CARRYOVER + reciprocity_delta)
                .clamp(-1.0, 1.0),
            resources_given: prev_given + given,
            resources_received: prev_received + received,
            sentiment: (prev_sentiment * SENTIMENT_CARRYOVER + sentiment).clamp(-1.0, 1.0),
        },
    );
}
