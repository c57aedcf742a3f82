//! Derived per-step outputs.
//!
//! None of these are persisted inside [`SimulationState`] — they are
//! returned from each day step for the caller to store, stream, or
//! discard.
//!
//! [`SimulationState`]: crate::state::SimulationState

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

use crate::enums::TaskOutcome;
use crate::ids::AgentId;
use crate::state::SimulationState;

/// One executed (or idle-fallback) task with its full outcome.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaskAssignment {
    /// The task that ran.
    pub task_id: String,

    /// Agents who worked the task, in assignment order.
    pub participants: Vec<AgentId>,

    /// Success or failure of the single outcome roll.
    pub outcome: TaskOutcome,

    /// The adjusted probability the outcome was rolled against.
    pub success_probability: f64,

    /// The task's total reward before distribution.
    pub reward: f64,

    /// Reward share per participant after applying the task norm.
    pub rewards: BTreeMap<AgentId, f64>,

    /// Energy charged per participant.
    pub energy_costs: BTreeMap<AgentId, f64>,

    /// Participants injured during execution.
    pub injuries: Vec<AgentId>,
}

/// Six aggregate scalars describing one simulated day.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DailyMetrics {
    /// The day these metrics describe.
    pub day: u64,

    /// Fraction of executions with more than one participant.
    pub cooperation_rate: f64,

    /// Total rewards minus total energy costs across all executions.
    pub energy_balance: f64,

    /// Total injuries across all executions.
    pub risk_incidents: u32,

    /// Mean Fehr–Schmidt utility over all (agent, execution) pairs.
    pub inequality_index: f64,

    /// Same-camp edge fraction from the network.
    pub assortativity: f64,

    /// Mutual-edge fraction from the network.
    pub reciprocity: f64,
}

/// One structured event log entry returned to the caller.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationLogEntry {
    /// Day the event happened.
    pub day: u64,

    /// The agent the event concerns, if any.
    pub agent_id: Option<AgentId>,

    /// Event kind (e.g. `"task"`, `"injury"`, `"reflection"`).
    pub kind: String,

    /// One-line summary.
    pub summary: String,

    /// Free-form detail.
    pub detail: String,
}

/// One cause → effect link in the day's causal graph.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct CausalLink {
    /// Day the link was derived.
    pub day: u64,

    /// Cause label (e.g. `"plan:hunt_deer"`).
    pub cause: String,

    /// Effect label (e.g. `"execution:hunt_deer"`).
    pub effect: String,
}

/// Graph statistics computed after each step.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct NetworkStats {
    /// Fraction of edges whose reverse edge also exists.
    pub reciprocity: f64,

    /// Fraction of camp-known edges connecting the same camp.
    pub assortativity: f64,

    /// Closed out-neighbor triads over open out-neighbor triads.
    pub clustering: f64,

    /// Number of live edges.
    pub edge_count: usize,
}

/// Everything one day step produces.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SimulationStepResult {
    /// The post-step snapshot the caller persists and resumes from.
    pub state: SimulationState,

    /// Every task execution of the day, in execution order.
    pub assignments: Vec<TaskAssignment>,

    /// Aggregate metrics for the day.
    pub metrics: DailyMetrics,

    /// Event log entries collected during the step.
    pub logs: Vec<SimulationLogEntry>,

    /// Derived causal links for the day.
    pub causal_graph: Vec<CausalLink>,

    /// Network statistics after decay and reinforcement.
    pub network_stats: NetworkStats,
}
