//! Tool trait — the abstraction over agent capabilities.
//!
//! Tools are what the decision engine can ask the loop to do:
//! arithmetic, lookups, side effects in the outside world. Each tool
//! declares a parameter schema; the registry validates every invocation
//! against it before dispatch.

use async_trait::async_trait;
use futures::FutureExt;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::panic::AssertUnwindSafe;

use crate::error::ToolError;

/// The declared type of a single tool parameter.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ParameterKind {
    Number,
    String,
    Boolean,
    Object,
}

/// Schema entry for one named tool parameter.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolParameter {
    pub kind: ParameterKind,
    pub description: String,
    #[serde(default = "default_required")]
    pub required: bool,
}

fn default_required() -> bool {
    true
}

impl ToolParameter {
    /// A required parameter of the given kind.
    pub fn required(kind: ParameterKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            required: true,
        }
    }

    /// An optional parameter of the given kind.
    pub fn optional(kind: ParameterKind, description: impl Into<String>) -> Self {
        Self {
            kind,
            description: description.into(),
            required: false,
        }
    }
}

/// The projection of a tool that is sent to the decision engine.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolDescription {
    pub name: String,
    pub description: String,
    pub parameters: BTreeMap<String, ToolParameter>,
}

/// A request to execute a tool, produced by one decision and consumed once.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolCall {
    /// Name of the tool to execute
    pub name: String,

    /// Arguments as a JSON object
    pub arguments: serde_json::Value,

    /// The loop iteration this call belongs to (1-based)
    pub iteration: u32,
}

/// The result of a tool execution. Immutable once produced.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ToolResult {
    /// Whether the tool executed successfully
    pub success: bool,

    /// The output payload
    pub payload: serde_json::Value,

    /// Error message when `success` is false
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
}

impl ToolResult {
    /// A successful result carrying the given payload.
    pub fn ok(payload: serde_json::Value) -> Self {
        Self {
            success: true,
            payload,
            error: None,
        }
    }

    /// A failed result carrying an error message.
    pub fn failure(message: impl Into<String>) -> Self {
        Self {
            success: false,
            payload: serde_json::Value::Null,
            error: Some(message.into()),
        }
    }
}

/// The core Tool trait.
///
/// Each capability implements this trait and is registered in the
/// [`ToolRegistry`], which makes it available to the orchestration loop.
/// The `trace_token` correlates the invocation with the run that issued it.
#[async_trait]
pub trait Tool: Send + Sync {
    /// The unique name of this tool (e.g., "add", "divide").
    fn name(&self) -> &str;

    /// A description of what this tool does (sent to the decision engine).
    fn description(&self) -> &str;

    /// The named parameters this tool accepts.
    fn parameters(&self) -> BTreeMap<String, ToolParameter>;

    /// Execute the tool with validated arguments.
    async fn execute(
        &self,
        arguments: serde_json::Value,
        trace_token: Option<&str>,
    ) -> std::result::Result<ToolResult, ToolError>;

    /// Convert this tool into a description for the decision engine.
    fn describe(&self) -> ToolDescription {
        ToolDescription {
            name: self.name().to_string(),
            description: self.description().to_string(),
            parameters: self.parameters(),
        }
    }
}

/// A registry of available tools.
///
/// The orchestration loop uses this to:
/// 1. Get tool descriptions to send to the decision engine
/// 2. Validate and dispatch tool calls chosen by a decision
///
/// Registration order is preserved so that `describe_all` is deterministic.
pub struct ToolRegistry {
    tools: Vec<Box<dyn Tool>>,
    index: HashMap<String, usize>,
}

impl ToolRegistry {
    pub fn new() -> Self {
        Self {
            tools: Vec::new(),
            index: HashMap::new(),
        }
    }

    /// Register a tool. Names must be unique.
    pub fn register(&mut self, tool: Box<dyn Tool>) -> std::result::Result<(), ToolError> {
        let name = tool.name().to_string();
        if self.index.contains_key(&name) {
            return Err(ToolError::Duplicate(name));
        }
        self.index.insert(name, self.tools.len());
        self.tools.push(tool);
        Ok(())
    }

    /// Look up a tool by name.
    pub fn lookup(&self, name: &str) -> std::result::Result<&dyn Tool, ToolError> {
        self.index
            .get(name)
            .map(|&i| self.tools[i].as_ref())
            .ok_or_else(|| ToolError::NotFound(name.to_string()))
    }

    /// Get all tool descriptions, ordered by registration.
    pub fn describe_all(&self) -> Vec<ToolDescription> {
        self.tools.iter().map(|t| t.describe()).collect()
    }

    /// List all registered tool names, ordered by registration.
    pub fn names(&self) -> Vec<&str> {
        self.tools.iter().map(|t| t.name()).collect()
    }

    /// Validate a tool call against the tool's schema and execute it.
    ///
    /// The `Err` side carries only lookup and validation failures. Anything
    /// that goes wrong inside the tool body — an error return or a panic — is
    /// caught and converted into a failed [`ToolResult`] so that it can never
    /// take down the loop.
    pub async fn validate_and_invoke(
        &self,
        call: &ToolCall,
        trace_token: Option<&str>,
    ) -> std::result::Result<ToolResult, ToolError> {
        let tool = self.lookup(&call.name)?;
        validate_arguments(tool.name(), &tool.parameters(), &call.arguments)?;

        let fut = AssertUnwindSafe(tool.execute(call.arguments.clone(), trace_token));
        match fut.catch_unwind().await {
            Ok(Ok(result)) => Ok(result),
            Ok(Err(e)) => {
                tracing::warn!(tool = %call.name, error = %e, "Tool returned an error");
                Ok(ToolResult::failure(e.to_string()))
            }
            Err(panic) => {
                let reason = panic
                    .downcast_ref::<&str>()
                    .map(|s| s.to_string())
                    .or_else(|| panic.downcast_ref::<String>().cloned())
                    .unwrap_or_else(|| "tool panicked".to_string());
                tracing::warn!(tool = %call.name, reason = %reason, "Tool panicked");
                Ok(ToolResult::failure(format!(
                    "Tool '{}' panicked: {}",
                    call.name, reason
                )))
            }
        }
    }
}

impl Default for ToolRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// Check that required parameters are present and no unknown keys are passed.
fn validate_arguments(
    tool_name: &str,
    schema: &BTreeMap<String, ToolParameter>,
    arguments: &serde_json::Value,
) -> std::result::Result<(), ToolError> {
    let empty = serde_json::Map::new();
    let object = match arguments {
        serde_json::Value::Object(map) => map,
        serde_json::Value::Null => &empty,
        _ => {
            return Err(ToolError::InvalidParameters {
                tool_name: tool_name.to_string(),
                missing: schema
                    .iter()
                    .filter(|(_, p)| p.required)
                    .map(|(k, _)| k.clone())
                    .collect(),
                extra: vec![],
            });
        }
    };

    let missing: Vec<String> = schema
        .iter()
        .filter(|(name, param)| param.required && !object.contains_key(*name))
        .map(|(name, _)| name.clone())
        .collect();

    let extra: Vec<String> = object
        .keys()
        .filter(|key| !schema.contains_key(*key))
        .cloned()
        .collect();

    if missing.is_empty() && extra.is_empty() {
        Ok(())
    } else {
        Err(ToolError::InvalidParameters {
            tool_name: tool_name.to_string(),
            missing,
            extra,
        })
    }
}
