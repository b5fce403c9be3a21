//! # Goalrunner Core
//!
//! Domain types, traits, and error definitions for the Goalrunner agent
//! orchestration runtime. This crate has **zero framework dependencies** —
//! it defines the domain model that all other crates implement against.
//!
//! ## Design Philosophy
//!
//! The decision engine and every tool are defined as traits here.
//! Implementations live in their respective crates. This enables:
//! - Swapping the reasoning service via configuration
//! - Easy testing with scripted/mock implementations
//! - Clean dependency graph (all crates depend inward on core)

pub mod config;
pub mod context;
pub mod decision;
pub mod error;
pub mod event;
pub mod result;
pub mod tool;

// Re-export key types at crate root for ergonomics
pub use config::AgentConfig;
pub use context::{ActionTaken, ContextSnapshot, ExecutionContext, IterationRecord};
pub use decision::{Decision, DecisionAction, DecisionEngine};
pub use error::{DecisionError, Error, Result, ToolError};
pub use event::{AgentEvent, CallbackEmitter, EventSink};
pub use result::{AggregatedResult, ResultAggregator, RunFailure};
pub use tool::{
    ParameterKind, Tool, ToolCall, ToolDescription, ToolParameter, ToolRegistry, ToolResult,
};
