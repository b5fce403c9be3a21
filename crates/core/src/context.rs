//! Execution context — the accumulated state of one agent run.
//!
//! The context is exclusively owned and mutated by the orchestrator.
//! Everything else (decision engine, tools, sinks) sees only immutable
//! snapshots of it.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::tool::ToolResult;

/// What a single iteration did: dispatched a tool call or declared completion.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum ActionTaken {
    ToolCall {
        name: String,
        arguments: serde_json::Value,
    },
    Completed,
}

/// One entry of the append-only execution history.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IterationRecord {
    /// 1-based iteration index.
    pub index: u32,

    /// The decision rationale, kept as an opaque diagnostic string.
    pub rationale: String,

    /// The action this iteration took.
    pub action: ActionTaken,

    /// Tool outcome for `ToolCall` actions; `None` for `Completed`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub result: Option<ToolResult>,

    pub timestamp: DateTime<Utc>,
}

/// The mutable accumulator of one agent run.
#[derive(Debug, Clone)]
pub struct ExecutionContext {
    goal: String,
    records: Vec<IterationRecord>,
    facts: BTreeMap<String, serde_json::Value>,
    remaining_iterations: u32,
}

impl ExecutionContext {
    /// Create a fresh context with the full iteration budget.
    pub fn new(goal: impl Into<String>, iteration_budget: u32) -> Self {
        Self {
            goal: goal.into(),
            records: Vec::new(),
            facts: BTreeMap::new(),
            remaining_iterations: iteration_budget,
        }
    }

    pub fn goal(&self) -> &str {
        &self.goal
    }

    /// Append a record to the history. Append-only, O(1).
    pub fn append_record(&mut self, record: IterationRecord) {
        self.records.push(record);
    }

    pub fn records(&self) -> &[IterationRecord] {
        &self.records
    }

    /// Store a named fact. Last write wins.
    pub fn set_fact(&mut self, key: impl Into<String>, value: serde_json::Value) {
        self.facts.insert(key.into(), value);
    }

    pub fn fact(&self, key: &str) -> Option<&serde_json::Value> {
        self.facts.get(key)
    }

    pub fn facts(&self) -> &BTreeMap<String, serde_json::Value> {
        &self.facts
    }

    pub fn remaining_iterations(&self) -> u32 {
        self.remaining_iterations
    }

    /// The index of the iteration currently being executed (1-based).
    pub fn next_index(&self) -> u32 {
        self.records.len() as u32 + 1
    }

    /// Consume one iteration from the budget, saturating at zero.
    pub fn consume_iteration(&mut self) {
        self.remaining_iterations = self.remaining_iterations.saturating_sub(1);
    }

    /// Produce an immutable, deep-copied view for the decision engine.
    ///
    /// The snapshot shares no storage with the live context, so callers can
    /// never observe later mutations through it.
    pub fn snapshot(&self) -> ContextSnapshot {
        ContextSnapshot {
            goal: self.goal.clone(),
            records: self.records.clone(),
            facts: self.facts.clone(),
            remaining_iterations: self.remaining_iterations,
        }
    }

    /// Tear down the context into its history and facts for aggregation.
    pub fn into_parts(self) -> (Vec<IterationRecord>, BTreeMap<String, serde_json::Value>) {
        (self.records, self.facts)
    }
}

/// Read-only view of an [`ExecutionContext`] at one point in time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ContextSnapshot {
    pub goal: String,
    pub records: Vec<IterationRecord>,
    pub facts: BTreeMap<String, serde_json::Value>,
    pub remaining_iterations: u32,
}
