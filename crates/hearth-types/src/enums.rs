//! Closed vocabularies used across the simulator.
//!
//! All of these are tagged variants with exhaustive matches at the use
//! sites — the planner, the cognition engine, and the plan layer never
//! branch on raw strings.

use serde::{Deserialize, Serialize};

/// Named season in the annual cycle.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum SeasonName {
    /// Growth season: baseline resource availability.
    Spring,
    /// Peak abundance for plants and small game.
    Summer,
    /// Harvest season, often carrying a large-game bonus.
    Autumn,
    /// Scarcity season with elevated hazards.
    Winter,
}

impl SeasonName {
    /// Lowercase label used in prompts and logs.
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Spring => "spring",
            Self::Summer => "summer",
            Self::Autumn => "autumn",
            Self::Winter => "winter",
        }
    }

    /// Parse a season label. Returns `None` for unknown names.
    pub fn parse(name: &str) -> Option<Self> {
        match name.to_lowercase().as_str() {
            "spring" => Some(Self::Spring),
            "summer" => Some(Self::Summer),
            "autumn" | "fall" => Some(Self::Autumn),
            "winter" => Some(Self::Winter),
            _ => None,
        }
    }
}

impl core::fmt::Display for SeasonName {
    fn fmt(&self, f: &mut core::fmt::Formatter<'_>) -> core::fmt::Result {
        f.write_str(self.as_str())
    }
}

/// The kind of work a task represents.
///
/// The category selects which resource pool feeds the task and which
/// skill the planner reads when scoring participants.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum TaskCategory {
    /// Plant gathering; draws on the plant resource level.
    Foraging,
    /// Game hunting; draws on small and large game combined.
    Hunting,
    /// Camp work benefiting everyone; draws on the plant level.
    PublicGood,
}

impl TaskCategory {
    /// The skillset key the planner reads for this category.
    pub const fn skill_key(self) -> &'static str {
        match self {
            Self::Foraging => "gathering",
            Self::Hunting => "hunting",
            Self::PublicGood => "crafting",
        }
    }
}

/// Fairness rule used to distribute a task's total reward.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum ShareNorm {
    /// Every participant receives `total / n`.
    EqualShare,
    /// Shares weighted by the category skill of each participant.
    ProportionalSkill,
    /// The top third by skill splits a 25% bonus pool on top of the base.
    KeyContributorReward,
    /// Nobody receives anything; the failure-penalty variant.
    CollectivePenalty,
}

/// Outcome of one executed task.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum TaskOutcome {
    /// The success roll passed; rewards were distributed.
    Success,
    /// The success roll failed.
    Failure,
}

impl TaskOutcome {
    /// Whether this outcome is a success.
    pub const fn is_success(self) -> bool {
        matches!(self, Self::Success)
    }
}

/// Lifecycle status of a persisted run.
///
/// The status is owned by the store and its callers; the simulation core
/// never mutates it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RunStatus {
    /// The run is actively being stepped.
    Running,
    /// The run is suspended between steps.
    Paused,
    /// The run reached its configured end.
    Completed,
}

/// Scope of one plan item returned by the decision layer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum PlanScope {
    /// A free-form plan covering the whole day (LLM output).
    Group,
    /// A directive about one specific task (heuristic output).
    Task,
    /// Nothing to schedule today.
    Idle,
}
