//! Run events — progress notifications emitted by the orchestration loop.
//!
//! Sinks receive a typed event per state transition and can pattern-match
//! exhaustively instead of string-comparing event names. The emitter is
//! fire-and-forget: a misbehaving sink can never disturb the loop.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::panic::AssertUnwindSafe;
use std::sync::Arc;
use tokio::sync::broadcast;

/// All events emitted during one agent run, in transition order.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(tag = "type", rename_all = "snake_case")]
pub enum AgentEvent {
    /// A run started with the given goal
    Started {
        agent_name: String,
        goal: String,
        available_tools: Vec<String>,
        timestamp: DateTime<Utc>,
    },

    /// The loop entered a thinking pass
    Thinking {
        iteration: u32,
        remaining_iterations: u32,
        timestamp: DateTime<Utc>,
    },

    /// A tool call was dispatched and resolved
    ActionTaken {
        iteration: u32,
        tool_name: String,
        success: bool,
        duration_ms: u64,
        timestamp: DateTime<Utc>,
    },

    /// The run reached a DONE terminal state
    Finished {
        iterations: u32,
        success: bool,
        incomplete: bool,
        timestamp: DateTime<Utc>,
    },

    /// The run reached a FAILED terminal state
    Failed {
        reason: String,
        timestamp: DateTime<Utc>,
    },
}

/// A synchronous event sink registered with the emitter.
///
/// `notify` must not block the loop for long. Panics are isolated by the
/// emitter, so implementations need not guard themselves.
pub trait EventSink: Send + Sync {
    fn notify(&self, event: &AgentEvent);
}

/// Fire-and-forget notifier owned by the orchestrator.
///
/// Delivers each event to every registered sink in order, and mirrors it
/// onto a broadcast channel for passive observers. Sink panics are caught
/// and logged, never propagated.
pub struct CallbackEmitter {
    sinks: Vec<Arc<dyn EventSink>>,
    bus: broadcast::Sender<Arc<AgentEvent>>,
}

impl CallbackEmitter {
    /// Create an emitter with no sinks and the given broadcast capacity.
    pub fn new(capacity: usize) -> Self {
        let (bus, _) = broadcast::channel(capacity);
        Self {
            sinks: Vec::new(),
            bus,
        }
    }

    /// Register a sink. Sinks are notified in registration order.
    pub fn add_sink(&mut self, sink: Arc<dyn EventSink>) {
        self.sinks.push(sink);
    }

    /// Subscribe to the broadcast mirror of all events.
    pub fn subscribe(&self) -> broadcast::Receiver<Arc<AgentEvent>> {
        self.bus.subscribe()
    }

    /// Emit one event to all sinks and the broadcast channel. Never fails.
    pub fn emit(&self, event: AgentEvent) {
        let event = Arc::new(event);
        for sink in &self.sinks {
            let result = std::panic::catch_unwind(AssertUnwindSafe(|| sink.notify(&event)));
            if result.is_err() {
                tracing::warn!(event = ?event, "Event sink panicked; continuing");
            }
        }
        // No subscribers is fine
        let _ = self.bus.send(event);
    }
}

impl Default for CallbackEmitter {
    fn default() -> Self {
        Self::new(256)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::Mutex;

    struct RecordingSink {
        seen: Mutex<Vec<String>>,
    }

    impl RecordingSink {
        fn new() -> Self {
            Self {
                seen: Mutex::new(vec![]),
            }
        }
    }

    impl EventSink for RecordingSink {
        fn notify(&self, event: &AgentEvent) {
            let label = match event {
                AgentEvent::Started { .. } => "started",
                AgentEvent::Thinking { .. } => "thinking",
                AgentEvent::ActionTaken { .. } => "action_taken",
                AgentEvent::Finished { .. } => "finished",
                AgentEvent::Failed { .. } => "failed",
            };
            self.seen.lock().unwrap().push(label.to_string());
        }
    }

    struct PanickingSink;

    impl EventSink for PanickingSink {
        fn notify(&self, _event: &AgentEvent) {
            panic!("sink exploded");
        }
    }

    fn started() -> AgentEvent {
        AgentEvent::Started {
            agent_name: "test".into(),
            goal: "g".into(),
            available_tools: vec![],
            timestamp: Utc::now(),
        }
    }

    #[test]
    fn sinks_receive_events_in_order() {
        let sink = Arc::new(RecordingSink::new());
        let mut emitter = CallbackEmitter::default();
        emitter.add_sink(sink.clone());

        emitter.emit(started());
        emitter.emit(AgentEvent::Thinking {
            iteration: 1,
            remaining_iterations: 25,
            timestamp: Utc::now(),
        });

        assert_eq!(
            *sink.seen.lock().unwrap(),
            vec!["started".to_string(), "thinking".to_string()]
        );
    }

    #[test]
    fn panicking_sink_does_not_stop_delivery() {
        let recorder = Arc::new(RecordingSink::new());
        let mut emitter = CallbackEmitter::default();
        emitter.add_sink(Arc::new(PanickingSink));
        emitter.add_sink(recorder.clone());

        emitter.emit(started());

        assert_eq!(recorder.seen.lock().unwrap().len(), 1);
    }

    #[tokio::test]
    async fn broadcast_mirror_delivers() {
        let emitter = CallbackEmitter::default();
        let mut rx = emitter.subscribe();

        emitter.emit(started());

        let event = rx.recv().await.unwrap();
        assert!(matches!(event.as_ref(), AgentEvent::Started { .. }));
    }

    #[test]
    fn emit_without_subscribers_does_not_panic() {
        let emitter = CallbackEmitter::default();
        emitter.emit(AgentEvent::Failed {
            reason: "no subscribers".into(),
            timestamp: Utc::now(),
        });
    }
}
