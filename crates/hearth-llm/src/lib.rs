//! The LLM decision layer: prompt assembly, provider fallback, and
//! plan-driven task ordering.
//!
//! Each day the orchestrator hands this crate a
//! [`hearth_types::PlanRequest`] and receives a
//! [`hearth_types::PlanResponse`]. The answer comes from the first
//! enabled adapter in an ordered chain (`openai-responses`,
//! `bedrock-converse`, `ollama`); any transport failure moves on to the
//! next adapter, and exhaustion falls back to a deterministic heuristic
//! plan. Transport errors never escape this crate.
//!
//! Environment variables are read only when the adapter chain is
//! constructed — the decision core itself holds configuration by value,
//! and never touches the RNG, so the simulation stream is identical
//! whether a plan came from a provider or from the heuristic.

pub mod adapter;
pub mod error;
pub mod plan;
pub mod prompt;

pub use adapter::PlanAdapter;
pub use error::PlanError;
pub use plan::{order_tasks_by_plan, LlmDecisionCore};
pub use prompt::PromptBuilder;
