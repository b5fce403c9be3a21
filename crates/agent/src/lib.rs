//! # Goalrunner Agent
//!
//! The orchestration loop that turns a goal, a set of tools, and a
//! decision engine into a bounded run with a structured result.
//!
//! The loop is deliberately small: it owns the execution context, asks
//! the injected [`DecisionEngine`](goalrunner_core::decision::DecisionEngine)
//! what to do next, dispatches tool calls through the registry, and stops
//! when the engine declares completion or the iteration budget runs out.
//! Everything fallible outside the loop (engine errors, tool failures,
//! cancellation) is folded into the final
//! [`AggregatedResult`](goalrunner_core::result::AggregatedResult).

pub mod cancellation;
pub mod orchestrator;

#[cfg(test)]
pub(crate) mod test_helpers;

pub use cancellation::CancellationFlag;
pub use orchestrator::Orchestrator;
