//! `goalrunner demo` — runs a scripted arithmetic goal end to end.
//!
//! The decision engine here replays a fixed plan instead of calling a
//! reasoning service, so the demo exercises the whole loop (events, tool
//! dispatch, aggregation) without any network access or credentials.

use std::collections::VecDeque;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use serde_json::json;
use tracing::info;

use goalrunner_agent::Orchestrator;
use goalrunner_core::config::AgentConfig;
use goalrunner_core::context::ContextSnapshot;
use goalrunner_core::decision::{Decision, DecisionEngine};
use goalrunner_core::error::DecisionError;
use goalrunner_core::event::{AgentEvent, CallbackEmitter, EventSink};
use goalrunner_core::tool::ToolDescription;

const DEMO_GOAL: &str = "Calculate (25 * 4) + (100 / 5) - 7";

/// Replays a fixed sequence of decisions, then declares completion.
struct PlannedEngine {
    plan: Mutex<VecDeque<Decision>>,
}

impl PlannedEngine {
    fn new(plan: Vec<Decision>) -> Self {
        Self {
            plan: Mutex::new(plan.into()),
        }
    }
}

#[async_trait]
impl DecisionEngine for PlannedEngine {
    async fn decide(
        &self,
        _snapshot: &ContextSnapshot,
        _tools: &[ToolDescription],
        _remaining_iterations: u32,
        _output_schema: Option<&serde_json::Value>,
    ) -> Result<Decision, DecisionError> {
        let next = self
            .plan
            .lock()
            .map_err(|_| DecisionError::Engine("demo plan lock poisoned".into()))?
            .pop_front();
        Ok(next.unwrap_or_else(|| Decision {
            action: goalrunner_core::decision::DecisionAction::Complete { final_answer: None },
            rationale: "plan exhausted".into(),
        }))
    }
}

/// Prints each run event to stdout as it happens.
struct ConsoleSink;

impl EventSink for ConsoleSink {
    fn notify(&self, event: &AgentEvent) {
        match event {
            AgentEvent::Started { goal, available_tools, .. } => {
                println!("▶ Goal: {goal}");
                println!("  Tools: {}", available_tools.join(", "));
            }
            AgentEvent::Thinking { iteration, remaining_iterations, .. } => {
                println!("  [{iteration}] thinking ({remaining_iterations} left)");
            }
            AgentEvent::ActionTaken { iteration, tool_name, success, duration_ms, .. } => {
                let mark = if *success { "ok" } else { "failed" };
                println!("  [{iteration}] {tool_name} {mark} ({duration_ms} ms)");
            }
            AgentEvent::Finished { iterations, success, incomplete, .. } => {
                println!(
                    "■ Finished after {iterations} iterations (success: {success}, incomplete: {incomplete})"
                );
            }
            AgentEvent::Failed { reason, .. } => {
                println!("✗ Failed: {reason}");
            }
        }
    }
}

fn demo_plan() -> Vec<Decision> {
    vec![
        Decision::invoke("multiply", json!({"a": 25, "b": 4}), "Compute 25 * 4"),
        Decision::invoke("divide", json!({"a": 100, "b": 5}), "Compute 100 / 5"),
        Decision::invoke("add", json!({"a": 100, "b": 20}), "Add the two partial results"),
        Decision::invoke("subtract", json!({"a": 120, "b": 7}), "Subtract the final term"),
        Decision::complete(json!(113.0), "All sub-expressions evaluated"),
    ]
}

pub async fn run(budget: Option<u32>) -> Result<(), Box<dyn std::error::Error>> {
    info!(
        goal = DEMO_GOAL,
        budget = budget.unwrap_or(25),
        "Starting scripted demo run"
    );

    let config = AgentConfig::new("demo-math-agent")
        .with_description("Evaluates an arithmetic expression step by step")
        .with_max_iterations(budget.unwrap_or(25));

    let registry = Arc::new(goalrunner_tools::default_registry()?);
    let engine = Arc::new(PlannedEngine::new(demo_plan()));

    let mut emitter = CallbackEmitter::default();
    emitter.add_sink(Arc::new(ConsoleSink));

    let agent = Orchestrator::new(config, engine, registry, emitter)?;
    let result = agent.process(DEMO_GOAL).await;

    println!();
    println!("{}", serde_json::to_string_pretty(&result)?);
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn demo_plan_produces_113() {
        let config = AgentConfig::new("demo-math-agent");
        let registry = Arc::new(goalrunner_tools::default_registry().unwrap());
        let engine = Arc::new(PlannedEngine::new(demo_plan()));
        let agent =
            Orchestrator::new(config, engine, registry, CallbackEmitter::default()).unwrap();

        let result = agent.process(DEMO_GOAL).await;

        assert!(result.success);
        assert_eq!(result.final_answer, Some(json!(113.0)));
        assert_eq!(result.iteration_count, 5);
    }
}
