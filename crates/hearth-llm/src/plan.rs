//! The decision core: adapter walk, heuristic fallback, and plan-driven
//! task ordering.

use hearth_types::config::TaskConfig;
use hearth_types::enums::PlanScope;
use hearth_types::plan::{PlanItem, PlanRequest, PlanResponse};
use tracing::{info, warn};

use crate::adapter::PlanAdapter;
use crate::error::PlanError;
use crate::prompt::PromptBuilder;

/// Provider key attached to heuristic plan items.
const HEURISTIC_PROVIDER: &str = "heuristic";

/// Rationale attached to heuristic plan items.
const HEURISTIC_RATIONALE: &str = "heuristic_allocation";

/// The LLM decision core: an ordered adapter chain plus the prompt
/// builder and a guaranteed heuristic fallback.
pub struct LlmDecisionCore {
    adapters: Vec<PlanAdapter>,
    prompt: Option<PromptBuilder>,
}

impl LlmDecisionCore {
    /// Build a core with the full adapter chain discovered from the
    /// environment.
    pub fn from_env() -> Self {
        Self::with_adapters(PlanAdapter::discover())
    }

    /// Build a core over an explicit adapter chain.
    pub fn with_adapters(adapters: Vec<PlanAdapter>) -> Self {
        Self {
            adapters,
            prompt: PromptBuilder::new().ok(),
        }
    }

    /// Build a core that always answers with the heuristic plan.
    ///
    /// Used by tests and by deterministic replays, where provider output
    /// must not influence the run.
    pub fn heuristic_only() -> Self {
        Self::with_adapters(Vec::new())
    }

    /// Produce a plan for one day.
    ///
    /// Walks the enabled adapters in chain order; the first success
    /// wins. Every failure is logged and swallowed. If no adapter is
    /// enabled, or all enabled adapters fail, the heuristic plan is
    /// returned — this method cannot fail.
    pub async fn plan(&self, request: &PlanRequest) -> PlanResponse {
        info!(
            event = "llm.plan.start",
            scenario = %request.scenario_name,
            day = request.day,
            pending_tasks = request.tasks.len(),
            "plan requested"
        );

        let prompt = match self.render_prompt(request) {
            Ok(prompt) => prompt,
            Err(error) => {
                warn!(
                    event = "llm.plan.error",
                    day = request.day,
                    error = %error,
                    "prompt assembly failed, using heuristic plan"
                );
                return heuristic_plan(request);
            }
        };

        for adapter in &self.adapters {
            if !adapter.is_enabled() {
                continue;
            }
            match adapter.generate_plan(&prompt).await {
                Ok(items) => {
                    info!(
                        event = "llm.plan.success",
                        provider = adapter.provider(),
                        day = request.day,
                        items = items.len(),
                        "plan produced"
                    );
                    return PlanResponse { items };
                }
                Err(error) => {
                    warn!(
                        event = "llm.plan.error",
                        provider = adapter.provider(),
                        day = request.day,
                        error = %error,
                        "adapter failed, trying next"
                    );
                }
            }
        }

        heuristic_plan(request)
    }

    /// Render the prompt, reporting a template error if the builder
    /// failed to construct.
    fn render_prompt(&self, request: &PlanRequest) -> Result<String, PlanError> {
        self.prompt
            .as_ref()
            .ok_or_else(|| PlanError::Template(String::from("prompt builder unavailable")))?
            .render(request)
    }
}

/// Deterministic fallback plan: one item per pending task, or a single
/// idle item when the roster is empty.
fn heuristic_plan(request: &PlanRequest) -> PlanResponse {
    if request.tasks.is_empty() {
        return PlanResponse {
            items: vec![PlanItem {
                scope: PlanScope::Idle,
                intent: String::from("idle_day"),
                rationale: String::from(HEURISTIC_RATIONALE),
                provider: String::from(HEURISTIC_PROVIDER),
            }],
        };
    }

    let items = request
        .tasks
        .iter()
        .map(|task| {
            let label = if task.name.is_empty() {
                task.id.as_str()
            } else {
                task.name.as_str()
            };
            PlanItem {
                scope: PlanScope::Task,
                intent: format!(
                    "allocate {} participants to {label}",
                    task.recommended_participants
                ),
                rationale: String::from(HEURISTIC_RATIONALE),
                provider: String::from(HEURISTIC_PROVIDER),
            }
        })
        .collect();

    PlanResponse { items }
}

/// Reorder tasks by the plan: each task takes the minimum item index
/// whose lowercased intent mentions the task's id or name; unmatched
/// tasks sort after all matched ones. The sort is stable, so tasks with
/// equal ranks keep their scenario order. Ordering is advisory — the
/// planner still enforces participant minimums and skill gates.
pub fn order_tasks_by_plan(tasks: &[TaskConfig], plan: &PlanResponse) -> Vec<TaskConfig> {
    let intents: Vec<String> = plan
        .items
        .iter()
        .map(|item| item.intent.to_lowercase())
        .collect();

    let mut ordered: Vec<TaskConfig> = tasks.to_vec();
    ordered.sort_by_key(|task| plan_rank(task, &intents));
    ordered
}

/// The minimum plan index mentioning the task, or `usize::MAX`.
fn plan_rank(task: &TaskConfig, intents: &[String]) -> usize {
    let id = task.id.to_lowercase();
    let name = task.name.to_lowercase();
    intents
        .iter()
        .position(|intent| {
            intent.contains(&id) || (!name.is_empty() && intent.contains(&name))
        })
        .unwrap_or(usize::MAX)
}

#[cfg(test)]
mod tests {
    use hearth_types::enums::{SeasonName, ShareNorm, TaskCategory};
    use hearth_types::state::ResourceLevel;

    use super::*;

    fn task(id: &str, name: &str) -> TaskConfig {
        TaskConfig {
            id: String::from(id),
            name: String::from(name),
            category: TaskCategory::Foraging,
            success_probability: 0.7,
            yield_per_participant: Some(2.0),
            yield_per_participant_on_success: None,
            energy_cost: 1.0,
            injury_risk_multiplier: 0.5,
            min_participants: 1,
            recommended_participants: 3,
            norm: ShareNorm::EqualShare,
        }
    }

    fn request(tasks: Vec<TaskConfig>) -> PlanRequest {
        PlanRequest {
            scenario_name: String::from("river_band"),
            display_name: String::from("River Band"),
            day: 1,
            season: SeasonName::Spring,
            resource_level: ResourceLevel::default(),
            agents: Vec::new(),
            tasks,
            plan_template: String::new(),
        }
    }

    #[tokio::test]
    async fn empty_chain_yields_heuristic_items() {
        let core = LlmDecisionCore::heuristic_only();
        let req = request(vec![
            task("gather_berries", "Berry gathering"),
            task("hunt_deer", "Deer hunt"),
        ]);

        let response = core.plan(&req).await;
        assert_eq!(response.items.len(), 2);
        for item in &response.items {
            assert_eq!(item.provider, "heuristic");
            assert_eq!(item.rationale, "heuristic_allocation");
            assert_eq!(item.scope, PlanScope::Task);
        }
        assert_eq!(
            response.items.first().map(|i| i.intent.as_str()),
            Some("allocate 3 participants to Berry gathering")
        );
    }

    #[tokio::test]
    async fn empty_roster_yields_idle_day() {
        let core = LlmDecisionCore::heuristic_only();
        let response = core.plan(&request(Vec::new())).await;
        assert_eq!(response.items.len(), 1);
        assert_eq!(
            response.items.first().map(|i| i.intent.as_str()),
            Some("idle_day")
        );
        assert_eq!(
            response.items.first().map(|i| i.scope),
            Some(PlanScope::Idle)
        );
    }

    #[tokio::test]
    async fn disabled_adapters_are_skipped() {
        let core = LlmDecisionCore::with_adapters(vec![PlanAdapter::Ollama(
            crate::adapter::OllamaAdapter::new(None, String::from("llama3")),
        )]);
        let response = core.plan(&request(vec![task("hunt_deer", "")])).await;
        assert_eq!(
            response.items.first().map(|i| i.provider.as_str()),
            Some("heuristic")
        );
    }

    #[test]
    fn ordering_follows_plan_mentions() {
        let tasks = vec![
            task("gather_berries", "Berry gathering"),
            task("hunt_deer", "Deer hunt"),
            task("mend_nets", "Net mending"),
        ];
        let plan = PlanResponse {
            items: vec![
                PlanItem {
                    scope: PlanScope::Group,
                    intent: String::from("Start with the deer hunt, then gather_berries."),
                    rationale: String::from("llm_plan"),
                    provider: String::from("openai-responses"),
                },
            ],
        };

        let ordered = order_tasks_by_plan(&tasks, &plan);
        let ids: Vec<&str> = ordered.iter().map(|t| t.id.as_str()).collect();
        // Both mentioned tasks share rank 0 and keep scenario order;
        // the unmentioned task sorts last.
        assert_eq!(ids, vec!["gather_berries", "hunt_deer", "mend_nets"]);
    }

    #[test]
    fn ordering_ranks_by_first_mention() {
        let tasks = vec![
            task("gather_berries", "Berry gathering"),
            task("hunt_deer", "Deer hunt"),
        ];
        let plan = PlanResponse {
            items: vec![
                PlanItem {
                    scope: PlanScope::Task,
                    intent: String::from("allocate 3 participants to hunt_deer"),
                    rationale: String::from("heuristic_allocation"),
                    provider: String::from("heuristic"),
                },
                PlanItem {
                    scope: PlanScope::Task,
                    intent: String::from("allocate 3 participants to gather_berries"),
                    rationale: String::from("heuristic_allocation"),
                    provider: String::from("heuristic"),
                },
            ],
        };

        let ordered = order_tasks_by_plan(&tasks, &plan);
        let ids: Vec<&str> = ordered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["hunt_deer", "gather_berries"]);
    }

    #[test]
    fn unmatched_plan_keeps_scenario_order() {
        let tasks = vec![task("a_task", ""), task("b_task", ""), task("c_task", "")];
        let plan = PlanResponse {
            items: vec![PlanItem {
                scope: PlanScope::Group,
                intent: String::from("rest today"),
                rationale: String::from("llm_plan"),
                provider: String::from("ollama"),
            }],
        };
        let ordered = order_tasks_by_plan(&tasks, &plan);
        let ids: Vec<&str> = ordered.iter().map(|t| t.id.as_str()).collect();
        assert_eq!(ids, vec!["a_task", "b_task", "c_task"]);
    }

    #[test]
    fn name_matching_is_case_insensitive() {
        let tasks = vec![task("x_task", "Salmon Run"), task("y_task", "")];
        let plan = PlanResponse {
            items: vec![PlanItem {
                scope: PlanScope::Group,
                intent: String::from("Focus everyone on the SALMON RUN today"),
                rationale: String::from("llm_plan"),
                provider: String::from("ollama"),
            }],
        };
        let ordered = order_tasks_by_plan(&tasks, &plan);
        assert_eq!(ordered.first().map(|t| t.id.as_str()), Some("x_task"));
    }
}
