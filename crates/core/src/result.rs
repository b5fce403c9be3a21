//! Final run results and their aggregation from terminal context state.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::context::{ExecutionContext, IterationRecord};

/// Why a run ended in the FAILED terminal state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum RunFailure {
    /// The decision engine failed after the retry.
    Decision { message: String },
    /// The caller signalled cancellation.
    Cancelled,
}

/// The structured outcome of one agent run.
///
/// `process()` always returns one of these — success, partial completion,
/// or failure — with the full iteration history attached for diagnosis.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AggregatedResult {
    pub success: bool,

    /// The engine's final answer, when the run completed.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub final_answer: Option<serde_json::Value>,

    /// True when the iteration budget ran out before completion.
    pub incomplete: bool,

    /// Number of iterations executed.
    pub iteration_count: u32,

    /// Full ordered execution history.
    pub history: Vec<IterationRecord>,

    /// Accumulated facts at termination — the best-effort summary when the
    /// run ended without a final answer.
    pub facts: BTreeMap<String, serde_json::Value>,

    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub failure: Option<RunFailure>,
}

/// Builds the final structured output from the terminal context state.
///
/// Never panics; every constructor consumes the context wholesale so no
/// history entry can be lost.
pub struct ResultAggregator;

impl ResultAggregator {
    /// The run completed with a declared final answer.
    pub fn success(
        context: ExecutionContext,
        final_answer: Option<serde_json::Value>,
    ) -> AggregatedResult {
        let (history, facts) = context.into_parts();
        AggregatedResult {
            success: true,
            final_answer,
            incomplete: false,
            iteration_count: history.len() as u32,
            history,
            facts,
            failure: None,
        }
    }

    /// The iteration budget ran out before completion was declared.
    pub fn incomplete(context: ExecutionContext) -> AggregatedResult {
        let (history, facts) = context.into_parts();
        AggregatedResult {
            success: false,
            final_answer: None,
            incomplete: true,
            iteration_count: history.len() as u32,
            history,
            facts,
            failure: None,
        }
    }

    /// The run terminated in the FAILED state.
    pub fn failed(context: ExecutionContext, failure: RunFailure) -> AggregatedResult {
        let (history, facts) = context.into_parts();
        AggregatedResult {
            success: false,
            final_answer: None,
            incomplete: true,
            iteration_count: history.len() as u32,
            history,
            facts,
            failure: Some(failure),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::context::ActionTaken;
    use crate::tool::ToolResult;
    use chrono::Utc;

    fn context_with_history() -> ExecutionContext {
        let mut ctx = ExecutionContext::new("goal", 10);
        for index in 1..=3 {
            ctx.append_record(IterationRecord {
                index,
                rationale: format!("step {index}"),
                action: ActionTaken::ToolCall {
                    name: "add".into(),
                    arguments: serde_json::json!({"a": index, "b": 1}),
                },
                result: Some(ToolResult::ok(serde_json::json!(index + 1))),
                timestamp: Utc::now(),
            });
            ctx.consume_iteration();
        }
        ctx.set_fact("add", serde_json::json!(4));
        ctx
    }

    #[test]
    fn success_carries_answer_and_full_history() {
        let result = ResultAggregator::success(context_with_history(), Some(serde_json::json!(4)));
        assert!(result.success);
        assert!(!result.incomplete);
        assert_eq!(result.final_answer, Some(serde_json::json!(4)));
        assert_eq!(result.iteration_count, 3);
        let indices: Vec<_> = result.history.iter().map(|r| r.index).collect();
        assert_eq!(indices, vec![1, 2, 3]);
    }

    #[test]
    fn incomplete_has_no_answer_but_keeps_facts() {
        let result = ResultAggregator::incomplete(context_with_history());
        assert!(!result.success);
        assert!(result.incomplete);
        assert!(result.final_answer.is_none());
        assert_eq!(result.facts["add"], serde_json::json!(4));
    }

    #[test]
    fn failed_records_the_failure_kind() {
        let result = ResultAggregator::failed(context_with_history(), RunFailure::Cancelled);
        assert!(!result.success);
        assert_eq!(result.failure, Some(RunFailure::Cancelled));
    }

    #[test]
    fn result_serializes() {
        let result = ResultAggregator::failed(
            ExecutionContext::new("g", 1),
            RunFailure::Decision {
                message: "engine down".into(),
            },
        );
        let json = serde_json::to_value(&result).unwrap();
        assert_eq!(json["success"], false);
        assert_eq!(json["failure"]["kind"], "decision");
    }
}
