//! Shared test doubles for orchestrator tests.

use std::collections::VecDeque;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;

use goalrunner_core::context::ContextSnapshot;
use goalrunner_core::decision::{Decision, DecisionEngine};
use goalrunner_core::error::DecisionError;
use goalrunner_core::event::{AgentEvent, EventSink};
use goalrunner_core::tool::ToolDescription;

/// A decision engine that replays a fixed script of outcomes.
///
/// Panics if asked for more decisions than it was scripted with, which is
/// exactly what a test wants: a run that thinks more often than expected
/// is a bug.
pub struct ScriptedEngine {
    script: Mutex<VecDeque<Result<Decision, DecisionError>>>,
    calls: AtomicUsize,
}

impl ScriptedEngine {
    pub fn new(script: Vec<Result<Decision, DecisionError>>) -> Self {
        Self {
            script: Mutex::new(script.into()),
            calls: AtomicUsize::new(0),
        }
    }

    /// How many times `decide` was called.
    pub fn call_count(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl DecisionEngine for ScriptedEngine {
    async fn decide(
        &self,
        _snapshot: &ContextSnapshot,
        _tools: &[ToolDescription],
        _remaining_iterations: u32,
        _output_schema: Option<&serde_json::Value>,
    ) -> Result<Decision, DecisionError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.script
            .lock()
            .unwrap()
            .pop_front()
            .expect("ScriptedEngine ran out of scripted decisions")
    }
}

/// A decision engine that returns the same decision forever.
pub struct EndlessEngine {
    decision: Decision,
}

impl EndlessEngine {
    pub fn new(decision: Decision) -> Self {
        Self { decision }
    }
}

#[async_trait]
impl DecisionEngine for EndlessEngine {
    async fn decide(
        &self,
        _snapshot: &ContextSnapshot,
        _tools: &[ToolDescription],
        _remaining_iterations: u32,
        _output_schema: Option<&serde_json::Value>,
    ) -> Result<Decision, DecisionError> {
        Ok(self.decision.clone())
    }
}

/// An event sink that records the kind of every event it sees.
pub struct CollectingSink {
    labels: Mutex<Vec<&'static str>>,
}

impl CollectingSink {
    pub fn new() -> Self {
        Self {
            labels: Mutex::new(vec![]),
        }
    }

    pub fn labels(&self) -> Vec<&'static str> {
        self.labels.lock().unwrap().clone()
    }
}

impl EventSink for CollectingSink {
    fn notify(&self, event: &AgentEvent) {
        let label = match event {
            AgentEvent::Started { .. } => "started",
            AgentEvent::Thinking { .. } => "thinking",
            AgentEvent::ActionTaken { .. } => "action_taken",
            AgentEvent::Finished { .. } => "finished",
            AgentEvent::Failed { .. } => "failed",
        };
        self.labels.lock().unwrap().push(label);
    }
}
