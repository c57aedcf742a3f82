//! The task planner: role assignment, execution, reward distribution,
//! and cooperation metrics.
//!
//! Assignment walks the task roster in the order handed down by the
//! plan layer. The candidate pool is shuffled once per day (Fisher–Yates
//! from the run RNG), then each task takes candidates from the front of
//! the shuffled order until its recommended head-count is met. Hunting
//! tasks reject candidates below the skill gate. A task that cannot
//! reach its minimum releases its tentative picks and is skipped,
//! leaving the pool untouched.
//!
//! RNG discipline: one shuffle up front, then per executed task exactly
//! one success roll followed by one injury roll per participant. The
//! idle fallback consumes no draws.

use std::collections::BTreeMap;

use hearth_agents::fairness::fehr_schmidt_utility;
use hearth_types::config::TaskConfig;
use hearth_types::enums::{ShareNorm, TaskCategory, TaskOutcome};
use hearth_types::ids::AgentId;
use hearth_types::outputs::TaskAssignment;
use hearth_types::state::{AgentState, ResourceLevel};
use hearth_world::rng::DeterministicRng;
use tracing::debug;

/// Hunting candidates below this skill are rejected.
const HUNTING_SKILL_GATE: f64 = 0.3;

/// Skill value assumed when an agent has no entry for the task's key.
const DEFAULT_SKILL: f64 = 0.5;

/// Success bonus per participant beyond the task minimum.
const EXTRA_HAND_BONUS: f64 = 0.05;

/// Success weight on the group's average skill edge over 0.5.
const SKILL_EDGE_WEIGHT: f64 = 0.1;

/// Success penalty when the feeding resource pool is empty.
const EMPTY_POOL_PENALTY: f64 = 0.1;

/// Injury probability is damped to this factor on success.
const INJURY_SUCCESS_FACTOR: f64 = 0.7;

/// Injury probability is amplified to this factor on failure.
const INJURY_FAILURE_FACTOR: f64 = 1.1;

/// Share of the total reward set aside for key contributors.
const KEY_CONTRIBUTOR_BONUS_POOL: f64 = 0.25;

/// Extra energy drag on hunting for unskilled hunters.
const HUNTING_EFFORT_PENALTY: f64 = 0.2;

/// Task id the idle fallback looks for.
const IDLE_TASK_ID: &str = "camp_maintenance";

/// The day's aggregate cooperation measures, before network stats are
/// merged in.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct CooperationSummary {
    /// Fraction of executions with more than one participant.
    pub cooperation_rate: f64,

    /// Sum of all shares minus sum of all energy costs.
    pub energy_balance: f64,

    /// Total injuries across executions.
    pub risk_incidents: u32,

    /// Mean Fehr–Schmidt utility over (agent, execution) pairs.
    pub inequality_index: f64,
}

/// Assign and execute the day's tasks.
///
/// `agents` supplies skills and ids; `base_injury_hazard` is the
/// scenario's *base* injury rate (task risk multiplies it directly,
/// independent of the day's composed modifier).
pub fn assign_tasks(
    rng: &mut DeterministicRng,
    agents: &[AgentState],
    resource_level: &ResourceLevel,
    tasks: &[TaskConfig],
    base_injury_hazard: f64,
) -> Vec<TaskAssignment> {
    let by_id: BTreeMap<AgentId, &AgentState> =
        agents.iter().map(|agent| (agent.id, agent)).collect();

    let mut pool: Vec<AgentId> = agents.iter().map(|agent| agent.id).collect();
    rng.shuffle(&mut pool);

    let mut assignments = Vec::new();

    for task in tasks {
        let need = task.recommended_participants.min(pool.len());
        if need < task.min_participants {
            debug!(task = %task.id, pool = pool.len(), "task skipped: pool below minimum");
            continue;
        }

        let picked = pick_participants(&pool, task, &by_id, need);
        if picked.len() < task.min_participants {
            debug!(
                task = %task.id,
                eligible = picked.len(),
                "task skipped: not enough eligible candidates"
            );
            continue;
        }

        let assignment = execute_task(rng, task, &picked, &by_id, resource_level, base_injury_hazard);
        pool.retain(|id| !picked.contains(id));
        assignments.push(assignment);
    }

    if !pool.is_empty()
        && let Some(idle_task) = tasks.iter().find(|task| task.id == IDLE_TASK_ID)
    {
        assignments.push(idle_assignment(idle_task, &pool));
    }

    assignments
}

/// Walk the shuffled pool and take eligible candidates until `need` is
/// met. Hunting rejects candidates below the skill gate.
fn pick_participants(
    pool: &[AgentId],
    task: &TaskConfig,
    by_id: &BTreeMap<AgentId, &AgentState>,
    need: usize,
) -> Vec<AgentId> {
    let mut picked = Vec::with_capacity(need);
    for &candidate in pool {
        if picked.len() >= need {
            break;
        }
        if task.category == TaskCategory::Hunting {
            let hunting_skill = by_id
                .get(&candidate)
                .and_then(|agent| agent.skillset.get("hunting"))
                .copied()
                .unwrap_or(0.0);
            if hunting_skill < HUNTING_SKILL_GATE {
                continue;
            }
        }
        picked.push(candidate);
    }
    picked
}

/// Roll the outcome, distribute rewards, charge energy, and sample
/// injuries for one task.
fn execute_task(
    rng: &mut DeterministicRng,
    task: &TaskConfig,
    participants: &[AgentId],
    by_id: &BTreeMap<AgentId, &AgentState>,
    resource_level: &ResourceLevel,
    base_injury_hazard: f64,
) -> TaskAssignment {
    let n = participants.len();
    let pool_level = category_resource(task.category, resource_level);
    let skill_key = task.category.skill_key();

    let avg_skill = if n == 0 {
        DEFAULT_SKILL
    } else {
        participants
            .iter()
            .map(|id| skill_of(by_id, *id, skill_key))
            .sum::<f64>()
            / n as f64
    };

    let resource_term = if pool_level > 0.0 {
        EXTRA_HAND_BONUS * (1.0 + pool_level).ln()
    } else {
        -EMPTY_POOL_PENALTY
    };

    let success_probability = (task.success_probability
        + EXTRA_HAND_BONUS * (n.saturating_sub(task.min_participants)) as f64
        + SKILL_EDGE_WEIGHT * (avg_skill - DEFAULT_SKILL)
        + resource_term)
        .clamp(0.0, 1.0);

    let success = rng.next() < success_probability;
    let outcome = if success {
        TaskOutcome::Success
    } else {
        TaskOutcome::Failure
    };

    let total_reward = if success {
        task.yield_per_participant.map_or_else(
            || task.yield_per_participant_on_success.unwrap_or(0.0),
            |per_head| per_head * n as f64,
        )
    } else {
        0.0
    };

    let rewards = distribute_reward(task.norm, total_reward, participants, by_id, skill_key);

    let energy_costs: BTreeMap<AgentId, f64> = participants
        .iter()
        .map(|&id| {
            let effort = if task.category == TaskCategory::Hunting {
                let hunting_skill = skill_of(by_id, id, "hunting");
                1.0 + (1.0 - hunting_skill) * HUNTING_EFFORT_PENALTY
            } else {
                1.0
            };
            (id, task.energy_cost * effort)
        })
        .collect();

    let injury_factor = if success {
        INJURY_SUCCESS_FACTOR
    } else {
        INJURY_FAILURE_FACTOR
    };
    let risk = (task.injury_risk_multiplier * base_injury_hazard).clamp(0.0, 1.0);
    let injuries: Vec<AgentId> = participants
        .iter()
        .filter(|_| rng.next() < risk * injury_factor)
        .copied()
        .collect();

    TaskAssignment {
        task_id: task.id.clone(),
        participants: participants.to_vec(),
        outcome,
        success_probability,
        reward: total_reward,
        rewards,
        energy_costs,
        injuries,
    }
}

/// Split `total` among participants according to the task norm.
fn distribute_reward(
    norm: ShareNorm,
    total: f64,
    participants: &[AgentId],
    by_id: &BTreeMap<AgentId, &AgentState>,
    skill_key: &str,
) -> BTreeMap<AgentId, f64> {
    let n = participants.len();
    if n == 0 {
        return BTreeMap::new();
    }

    match norm {
        ShareNorm::EqualShare => participants
            .iter()
            .map(|&id| (id, total / n as f64))
            .collect(),

        ShareNorm::ProportionalSkill => {
            let weights: Vec<(AgentId, f64)> = participants
                .iter()
                .map(|&id| (id, skill_of(by_id, id, skill_key)))
                .collect();
            let denom: f64 = weights.iter().map(|(_, w)| w).sum();
            if denom <= 0.0 {
                return participants
                    .iter()
                    .map(|&id| (id, total / n as f64))
                    .collect();
            }
            weights
                .into_iter()
                .map(|(id, weight)| (id, total * weight / denom))
                .collect()
        }

        ShareNorm::KeyContributorReward => {
            let bonus_pool = KEY_CONTRIBUTOR_BONUS_POOL * total;
            let base_pool = (1.0 - KEY_CONTRIBUTOR_BONUS_POOL) * total;
            let base_share = base_pool / n as f64;

            let key_count = (n / 3).max(1);
            let mut ranked: Vec<(AgentId, f64)> = participants
                .iter()
                .map(|&id| (id, skill_of(by_id, id, skill_key)))
                .collect();
            ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(core::cmp::Ordering::Equal));
            let key_ids: Vec<AgentId> =
                ranked.iter().take(key_count).map(|(id, _)| *id).collect();
            let bonus_share = bonus_pool / key_count as f64;

            participants
                .iter()
                .map(|&id| {
                    let bonus = if key_ids.contains(&id) { bonus_share } else { 0.0 };
                    (id, base_share + bonus)
                })
                .collect()
        }

        ShareNorm::CollectivePenalty => {
            participants.iter().map(|&id| (id, 0.0)).collect()
        }
    }
}

/// Bulk-assign the remaining pool to camp maintenance. No rolls, no
/// rewards, no energy charge — just a recorded low-stakes day.
fn idle_assignment(task: &TaskConfig, pool: &[AgentId]) -> TaskAssignment {
    TaskAssignment {
        task_id: task.id.clone(),
        participants: pool.to_vec(),
        outcome: TaskOutcome::Success,
        success_probability: 1.0,
        reward: 0.0,
        rewards: pool.iter().map(|&id| (id, 0.0)).collect(),
        energy_costs: pool.iter().map(|&id| (id, 0.0)).collect(),
        injuries: Vec::new(),
    }
}

/// Which resource pool feeds a task category.
fn category_resource(category: TaskCategory, level: &ResourceLevel) -> f64 {
    match category {
        TaskCategory::Foraging | TaskCategory::PublicGood => level.plants,
        TaskCategory::Hunting => level.small_game + level.large_game,
    }
}

/// An agent's skill for the given key, defaulting to 0.5.
fn skill_of(by_id: &BTreeMap<AgentId, &AgentState>, id: AgentId, key: &str) -> f64 {
    by_id
        .get(&id)
        .and_then(|agent| agent.skillset.get(key))
        .copied()
        .unwrap_or(DEFAULT_SKILL)
}

/// Aggregate the day's executions into cooperation measures.
///
/// The inequality index is the mean Fehr–Schmidt utility over every
/// (participant, execution) pair, using each agent's own alpha/beta.
pub fn evaluate_cooperation(
    executions: &[TaskAssignment],
    agents: &[AgentState],
) -> CooperationSummary {
    let by_id: BTreeMap<AgentId, &AgentState> =
        agents.iter().map(|agent| (agent.id, agent)).collect();

    if executions.is_empty() {
        return CooperationSummary {
            cooperation_rate: 0.0,
            energy_balance: 0.0,
            risk_incidents: 0,
            inequality_index: 0.0,
        };
    }

    let cooperative = executions
        .iter()
        .filter(|execution| execution.participants.len() > 1)
        .count();
    let cooperation_rate = cooperative as f64 / executions.len() as f64;

    let total_rewards: f64 = executions
        .iter()
        .flat_map(|execution| execution.rewards.values())
        .sum();
    let total_costs: f64 = executions
        .iter()
        .flat_map(|execution| execution.energy_costs.values())
        .sum();

    let risk_incidents = executions
        .iter()
        .map(|execution| execution.injuries.len() as u32)
        .sum();

    let mut utility_sum = 0.0;
    let mut utility_count = 0_usize;
    for execution in executions {
        for (&id, &share) in &execution.rewards {
            let others: Vec<f64> = execution
                .rewards
                .iter()
                .filter(|&(&other_id, _)| other_id != id)
                .map(|(_, &other_share)| other_share)
                .collect();
            let (alpha, beta) = by_id
                .get(&id)
                .map_or((0.0, 0.0), |agent| {
                    (agent.fehr_schmidt.alpha, agent.fehr_schmidt.beta)
                });
            utility_sum += fehr_schmidt_utility(share, &others, alpha, beta);
            utility_count += 1;
        }
    }
    let inequality_index = if utility_count == 0 {
        0.0
    } else {
        utility_sum / utility_count as f64
    };

    CooperationSummary {
        cooperation_rate,
        energy_balance: total_rewards - total_costs,
        risk_incidents,
        inequality_index,
    }
}
