//! Decision engine contract — the external reasoning collaborator.
//!
//! The loop never interprets natural language. The engine returns a strict
//! [`Decision`]: an opaque rationale plus a machine-parseable action that is
//! always one of two variants.

use async_trait::async_trait;
use serde::{Deserialize, Serialize};

use crate::context::ContextSnapshot;
use crate::error::DecisionError;
use crate::tool::ToolDescription;

/// The next step chosen by the decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DecisionAction {
    /// Invoke a registered tool with the given arguments.
    Invoke {
        tool: String,
        arguments: serde_json::Value,
    },
    /// Declare the goal complete, optionally with a final answer payload.
    Complete {
        #[serde(default, skip_serializing_if = "Option::is_none")]
        final_answer: Option<serde_json::Value>,
    },
}

/// A structured decision returned by the engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Decision {
    /// The action to take next.
    pub action: DecisionAction,

    /// Free-form reasoning, kept purely as a diagnostic string.
    pub rationale: String,
}

impl Decision {
    pub fn is_complete(&self) -> bool {
        matches!(self.action, DecisionAction::Complete { .. })
    }

    /// A completion decision with a final answer.
    pub fn complete(final_answer: serde_json::Value, rationale: impl Into<String>) -> Self {
        Self {
            action: DecisionAction::Complete {
                final_answer: Some(final_answer),
            },
            rationale: rationale.into(),
        }
    }

    /// A tool invocation decision.
    pub fn invoke(
        tool: impl Into<String>,
        arguments: serde_json::Value,
        rationale: impl Into<String>,
    ) -> Self {
        Self {
            action: DecisionAction::Invoke {
                tool: tool.into(),
                arguments,
            },
            rationale: rationale.into(),
        }
    }
}

/// Provider-agnostic decision-making interface.
///
/// Implementations wrap whatever reasoning service produces the next step.
/// The loop only relies on this contract: given the current context, the
/// available tools, and the remaining budget, return one [`Decision`].
/// A `remaining_iterations` of 1 is the last chance to decide completion or
/// emit a final tool call — no further iteration follows it.
#[async_trait]
pub trait DecisionEngine: Send + Sync {
    async fn decide(
        &self,
        snapshot: &ContextSnapshot,
        tools: &[ToolDescription],
        remaining_iterations: u32,
        output_schema: Option<&serde_json::Value>,
    ) -> std::result::Result<Decision, DecisionError>;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn completion_decision_reports_complete() {
        let d = Decision::complete(serde_json::json!(113), "done");
        assert!(d.is_complete());
    }

    #[test]
    fn invoke_decision_is_not_complete() {
        let d = Decision::invoke("add", serde_json::json!({"a": 1, "b": 2}), "adding");
        assert!(!d.is_complete());
    }

    #[test]
    fn decision_round_trips_through_json() {
        let d = Decision::invoke("multiply", serde_json::json!({"a": 25, "b": 4}), "step 1");
        let json = serde_json::to_string(&d).unwrap();
        let back: Decision = serde_json::from_str(&json).unwrap();
        match back.action {
            DecisionAction::Invoke { tool, arguments } => {
                assert_eq!(tool, "multiply");
                assert_eq!(arguments["a"], 25);
            }
            other => panic!("Expected Invoke, got {other:?}"),
        }
    }

    #[test]
    fn completion_without_answer_deserializes() {
        let d: Decision =
            serde_json::from_str(r#"{"action":{"kind":"complete"},"rationale":"nothing to do"}"#)
                .unwrap();
        assert!(matches!(
            d.action,
            DecisionAction::Complete { final_answer: None }
        ));
    }
}
