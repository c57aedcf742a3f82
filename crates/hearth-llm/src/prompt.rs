//! Plan prompt assembly via `minijinja`.
//!
//! The prompt skeleton is embedded in the binary; scenarios contribute
//! only their `plan_template` instruction suffix, appended verbatim
//! after the rendered body. Resource levels are rendered with two
//! decimals so the prompt stays stable and compact.

use hearth_types::plan::PlanRequest;
use minijinja::Environment;

use crate::error::PlanError;

/// Embedded prompt skeleton rendered for every plan request.
const PLAN_TEMPLATE: &str = "\
You are the day planner for {{ display_name }} ({{ scenario_name }}).
Day {{ day }}, season: {{ season }}.
Resources — plants: {{ plants }}, small game: {{ small_game }}, large game: {{ large_game }}.
Band size: {{ agent_count }}.
Pending tasks:
{% for task in tasks %}- {{ task }}
{% endfor %}";

/// Renders plan prompts from [`PlanRequest`] payloads.
pub struct PromptBuilder {
    env: Environment<'static>,
}

impl PromptBuilder {
    /// Create a builder with the embedded skeleton loaded.
    ///
    /// # Errors
    ///
    /// Returns [`PlanError::Template`] if the embedded template fails to
    /// parse (a build-time defect).
    pub fn new() -> Result<Self, PlanError> {
        let mut env = Environment::new();
        env.add_template("plan", PLAN_TEMPLATE)
            .map_err(|e| PlanError::Template(format!("failed to add plan template: {e}")))?;
        Ok(Self { env })
    }

    /// Render the full prompt for one plan request.
    ///
    /// The scenario's `plan_template` suffix is appended after the
    /// rendered skeleton, separated by a blank line.
    pub fn render(&self, request: &PlanRequest) -> Result<String, PlanError> {
        let tasks: Vec<String> = request
            .tasks
            .iter()
            .map(|task| {
                let label = if task.name.is_empty() {
                    task.id.as_str()
                } else {
                    task.name.as_str()
                };
                format!(
                    "{} [{}] needs {}-{} people",
                    label,
                    task.id,
                    task.min_participants,
                    task.recommended_participants
                )
            })
            .collect();

        let context = serde_json::json!({
            "scenario_name": request.scenario_name,
            "display_name": request.display_name,
            "day": request.day,
            "season": request.season.as_str(),
            "plants": format!("{:.2}", request.resource_level.plants),
            "small_game": format!("{:.2}", request.resource_level.small_game),
            "large_game": format!("{:.2}", request.resource_level.large_game),
            "agent_count": request.agents.len(),
            "tasks": tasks,
        });

        let body = self
            .env
            .get_template("plan")
            .map_err(|e| PlanError::Template(format!("missing plan template: {e}")))?
            .render(&context)
            .map_err(|e| PlanError::Template(format!("plan render failed: {e}")))?;

        if request.plan_template.is_empty() {
            Ok(body)
        } else {
            Ok(format!("{body}\n{}", request.plan_template))
        }
    }
}

#[cfg(test)]
mod tests {
    use hearth_types::config::TaskConfig;
    use hearth_types::enums::{SeasonName, ShareNorm, TaskCategory};
    use hearth_types::state::ResourceLevel;

    use super::*;

    fn request() -> PlanRequest {
        PlanRequest {
            scenario_name: String::from("river_band"),
            display_name: String::from("River Band"),
            day: 4,
            season: SeasonName::Summer,
            resource_level: ResourceLevel {
                plants: 12.3456,
                small_game: 5.1,
                large_game: 1.0,
            },
            agents: Vec::new(),
            tasks: vec![TaskConfig {
                id: String::from("gather_berries"),
                name: String::from("Berry gathering"),
                category: TaskCategory::Foraging,
                success_probability: 0.7,
                yield_per_participant: Some(3.0),
                yield_per_participant_on_success: None,
                energy_cost: 1.0,
                injury_risk_multiplier: 0.5,
                min_participants: 1,
                recommended_participants: 3,
                norm: ShareNorm::EqualShare,
            }],
            plan_template: String::from("Answer with one line per task."),
        }
    }

    #[test]
    fn prompt_contains_rounded_resources() {
        let builder = PromptBuilder::new().unwrap_or_else(|_| PromptBuilder {
            env: Environment::new(),
        });
        let prompt = builder.render(&request()).unwrap_or_default();
        assert!(prompt.contains("plants: 12.35"), "got: {prompt}");
        assert!(prompt.contains("small game: 5.10"));
        assert!(prompt.contains("season: summer"));
    }

    #[test]
    fn prompt_lists_tasks_and_suffix() {
        let builder = PromptBuilder::new().unwrap_or_else(|_| PromptBuilder {
            env: Environment::new(),
        });
        let prompt = builder.render(&request()).unwrap_or_default();
        assert!(prompt.contains("Berry gathering [gather_berries] needs 1-3 people"));
        assert!(prompt.ends_with("Answer with one line per task."));
    }

    #[test]
    fn empty_suffix_is_omitted() {
        let builder = PromptBuilder::new().unwrap_or_else(|_| PromptBuilder {
            env: Environment::new(),
        });
        let mut req = request();
        req.plan_template.clear();
        let prompt = builder.render(&req).unwrap_or_default();
        assert!(!prompt.contains("Answer with one line per task."));
        assert!(prompt.contains("Pending tasks:"));
    }
}
