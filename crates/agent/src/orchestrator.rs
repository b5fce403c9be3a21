//! The bounded orchestration loop.
//!
//! Owns the run state machine: INIT -> THINKING -> ACTING -> THINKING ...
//! until the engine declares completion (DONE), the budget runs out
//! (DONE, incomplete), or a fatal failure occurs (FAILED). The loop never
//! interprets natural language and never calls a reasoning service itself;
//! all reasoning goes through the injected [`DecisionEngine`].

use std::sync::Arc;
use std::time::Instant;

use chrono::Utc;
use tracing::{debug, info, warn};
use uuid::Uuid;

use goalrunner_core::config::AgentConfig;
use goalrunner_core::context::{ActionTaken, ExecutionContext, IterationRecord};
use goalrunner_core::decision::{Decision, DecisionAction, DecisionEngine};
use goalrunner_core::error::{DecisionError, Result};
use goalrunner_core::event::{AgentEvent, CallbackEmitter};
use goalrunner_core::result::{AggregatedResult, ResultAggregator, RunFailure};
use goalrunner_core::tool::{ToolCall, ToolRegistry, ToolResult};

use crate::cancellation::CancellationFlag;

/// Drives one goal through the think/act cycle until a terminal state.
///
/// The orchestrator exclusively owns the [`ExecutionContext`] for the
/// duration of a run; the engine and sinks only ever see snapshots.
/// [`Orchestrator::process`] is infallible by contract: every outcome,
/// including engine failure and cancellation, is folded into the returned
/// [`AggregatedResult`].
pub struct Orchestrator {
    config: AgentConfig,
    engine: Arc<dyn DecisionEngine>,
    tools: Arc<ToolRegistry>,
    emitter: CallbackEmitter,
    cancellation: CancellationFlag,
}

impl Orchestrator {
    /// Build an orchestrator. Configuration problems are fatal here,
    /// before any run can start.
    pub fn new(
        config: AgentConfig,
        engine: Arc<dyn DecisionEngine>,
        tools: Arc<ToolRegistry>,
        emitter: CallbackEmitter,
    ) -> Result<Self> {
        config.validate()?;
        Ok(Self {
            config,
            engine,
            tools,
            emitter,
            cancellation: CancellationFlag::new(),
        })
    }

    /// A handle that cancels the run in progress when triggered.
    pub fn cancellation_flag(&self) -> CancellationFlag {
        self.cancellation.clone()
    }

    /// Subscribe to the event stream of this orchestrator's runs.
    pub fn subscribe(&self) -> tokio::sync::broadcast::Receiver<Arc<AgentEvent>> {
        self.emitter.subscribe()
    }

    /// Run the loop for one goal. Always returns a structured result,
    /// never an error.
    pub async fn process(&self, goal: impl Into<String>) -> AggregatedResult {
        let goal = goal.into();
        let trace_token = Uuid::new_v4().to_string();
        let mut context = ExecutionContext::new(goal.clone(), self.config.max_iterations);

        info!(
            agent = %self.config.name,
            %goal,
            trace_token = %trace_token,
            budget = self.config.max_iterations,
            "Run started"
        );

        self.emitter.emit(AgentEvent::Started {
            agent_name: self.config.name.clone(),
            goal,
            available_tools: self.tools.names().iter().map(|n| n.to_string()).collect(),
            timestamp: Utc::now(),
        });

        let descriptions = self.tools.describe_all();

        while context.remaining_iterations() > 0 {
            if self.cancellation.is_cancelled() {
                info!(agent = %self.config.name, "Run cancelled");
                self.emitter.emit(AgentEvent::Failed {
                    reason: "cancelled by caller".into(),
                    timestamp: Utc::now(),
                });
                return ResultAggregator::failed(context, RunFailure::Cancelled);
            }

            let iteration = context.next_index();
            self.emitter.emit(AgentEvent::Thinking {
                iteration,
                remaining_iterations: context.remaining_iterations(),
                timestamp: Utc::now(),
            });
            debug!(
                iteration,
                remaining = context.remaining_iterations(),
                "Thinking"
            );

            let decision = match self.decide_with_retry(&context, &descriptions).await {
                Ok(decision) => decision,
                Err(e) => {
                    warn!(error = %e, "Decision engine failed after retry");
                    self.emitter.emit(AgentEvent::Failed {
                        reason: e.to_string(),
                        timestamp: Utc::now(),
                    });
                    return ResultAggregator::failed(
                        context,
                        RunFailure::Decision {
                            message: e.to_string(),
                        },
                    );
                }
            };

            // Verbose runs surface the engine's reasoning at info level.
            if self.config.verbose {
                info!(iteration, rationale = %decision.rationale, "Decision");
            } else {
                debug!(iteration, rationale = %decision.rationale, "Decision");
            }

            match decision.action {
                DecisionAction::Complete { final_answer } => {
                    context.append_record(IterationRecord {
                        index: iteration,
                        rationale: decision.rationale,
                        action: ActionTaken::Completed,
                        result: None,
                        timestamp: Utc::now(),
                    });
                    context.consume_iteration();

                    info!(agent = %self.config.name, iterations = iteration, "Run completed");
                    self.emitter.emit(AgentEvent::Finished {
                        iterations: iteration,
                        success: true,
                        incomplete: false,
                        timestamp: Utc::now(),
                    });
                    return ResultAggregator::success(context, final_answer);
                }
                DecisionAction::Invoke { tool, arguments } => {
                    let call = ToolCall {
                        name: tool,
                        arguments,
                        iteration,
                    };
                    let started = Instant::now();
                    let result = self.dispatch(&call, &trace_token).await;
                    let duration_ms = started.elapsed().as_millis() as u64;

                    if result.success {
                        context.set_fact(call.name.clone(), result.payload.clone());
                    } else {
                        warn!(
                            tool = %call.name,
                            error = result.error.as_deref().unwrap_or("unknown"),
                            "Tool call failed; feeding failure back into context"
                        );
                    }

                    self.emitter.emit(AgentEvent::ActionTaken {
                        iteration,
                        tool_name: call.name.clone(),
                        success: result.success,
                        duration_ms,
                        timestamp: Utc::now(),
                    });

                    context.append_record(IterationRecord {
                        index: iteration,
                        rationale: decision.rationale,
                        action: ActionTaken::ToolCall {
                            name: call.name,
                            arguments: call.arguments,
                        },
                        result: Some(result),
                        timestamp: Utc::now(),
                    });
                    context.consume_iteration();
                }
            }
        }

        let iterations = context.records().len() as u32;
        info!(
            agent = %self.config.name,
            iterations,
            "Iteration budget exhausted without completion"
        );
        self.emitter.emit(AgentEvent::Finished {
            iterations,
            success: false,
            incomplete: true,
            timestamp: Utc::now(),
        });
        ResultAggregator::incomplete(context)
    }

    /// Ask the engine for the next decision, retrying exactly once on error.
    async fn decide_with_retry(
        &self,
        context: &ExecutionContext,
        descriptions: &[goalrunner_core::tool::ToolDescription],
    ) -> std::result::Result<Decision, DecisionError> {
        let snapshot = context.snapshot();
        let remaining = context.remaining_iterations();
        let schema = self.config.output_schema.as_ref();

        match self
            .engine
            .decide(&snapshot, descriptions, remaining, schema)
            .await
        {
            Ok(decision) => Ok(decision),
            Err(first) => {
                warn!(error = %first, "Decision engine errored; retrying once");
                self.engine
                    .decide(&snapshot, descriptions, remaining, schema)
                    .await
            }
        }
    }

    /// Dispatch one tool call. Lookup and validation failures become failed
    /// results here: the engine may name an unknown tool or pass bad
    /// arguments without ending the run.
    async fn dispatch(&self, call: &ToolCall, trace_token: &str) -> ToolResult {
        match self.tools.validate_and_invoke(call, Some(trace_token)).await {
            Ok(result) => result,
            Err(e) => ToolResult::failure(e.to_string()),
        }
    }
}
