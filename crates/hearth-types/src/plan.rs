//! Plan layer request/response types.
//!
//! Each day the orchestrator assembles a [`PlanRequest`] — a fully
//! detached snapshot of the band and the pending task roster — and the
//! LLM decision core answers with a [`PlanResponse`]. The response only
//! ever *reorders* work: the planner still enforces participant minimums
//! and skill gates, so a malformed plan can never corrupt a run.

use serde::{Deserialize, Serialize};

use crate::config::TaskConfig;
use crate::enums::{PlanScope, SeasonName};
use crate::state::{AgentState, ResourceLevel};

/// Per-day planning query from the orchestrator to the decision core.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanRequest {
    /// Scenario registry key.
    pub scenario_name: String,

    /// Human-readable scenario title.
    pub display_name: String,

    /// The day being planned (the day the environment will tick into).
    pub day: u64,

    /// Current season.
    pub season: SeasonName,

    /// Resource levels as of the previous tick.
    pub resource_level: ResourceLevel,

    /// Deep-cloned agent snapshots; mutating these never touches run state.
    pub agents: Vec<AgentState>,

    /// The pending task roster in scenario order.
    pub tasks: Vec<TaskConfig>,

    /// Scenario-supplied instruction suffix for the prompt.
    pub plan_template: String,
}

/// One directive in a day plan.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PlanItem {
    /// What the directive covers.
    pub scope: PlanScope,

    /// The directive text; task ordering matches task ids/names against
    /// this, lowercased.
    pub intent: String,

    /// Why the directive was produced (e.g. `"heuristic_allocation"`).
    pub rationale: String,

    /// Which provider produced the item (`"openai-responses"`,
    /// `"bedrock-converse"`, `"ollama"`, or `"heuristic"`).
    pub provider: String,
}

/// The decision core's answer for one day.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct PlanResponse {
    /// Ordered plan items; earlier items rank their matched tasks earlier.
    pub items: Vec<PlanItem>,
}
