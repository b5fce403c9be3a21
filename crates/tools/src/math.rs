//! Arithmetic tools — one tool per binary operation.
//!
//! Every tool takes the same `{a, b}` schema of two required numbers and
//! returns the numeric result as its payload. Division reports an error
//! for a zero divisor instead of producing infinity.

use async_trait::async_trait;
use std::collections::BTreeMap;

use goalrunner_core::error::ToolError;
use goalrunner_core::tool::{ParameterKind, Tool, ToolParameter, ToolResult};

fn binary_schema() -> BTreeMap<String, ToolParameter> {
    BTreeMap::from([
        (
            "a".to_string(),
            ToolParameter::required(ParameterKind::Number, "The first operand"),
        ),
        (
            "b".to_string(),
            ToolParameter::required(ParameterKind::Number, "The second operand"),
        ),
    ])
}

/// Extract a numeric argument. The registry guarantees the key is present,
/// but not that its value is a number.
fn number_arg(
    tool_name: &str,
    arguments: &serde_json::Value,
    key: &str,
) -> Result<f64, ToolError> {
    arguments[key]
        .as_f64()
        .ok_or_else(|| ToolError::ExecutionFailed {
            tool_name: tool_name.to_string(),
            reason: format!("argument '{key}' must be a number"),
        })
}

pub struct AddTool;

#[async_trait]
impl Tool for AddTool {
    fn name(&self) -> &str {
        "add"
    }

    fn description(&self) -> &str {
        "Add two numbers and return their sum."
    }

    fn parameters(&self) -> BTreeMap<String, ToolParameter> {
        binary_schema()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _trace_token: Option<&str>,
    ) -> Result<ToolResult, ToolError> {
        let a = number_arg(self.name(), &arguments, "a")?;
        let b = number_arg(self.name(), &arguments, "b")?;
        Ok(ToolResult::ok(serde_json::json!(a + b)))
    }
}

pub struct SubtractTool;

#[async_trait]
impl Tool for SubtractTool {
    fn name(&self) -> &str {
        "subtract"
    }

    fn description(&self) -> &str {
        "Subtract the second number from the first."
    }

    fn parameters(&self) -> BTreeMap<String, ToolParameter> {
        binary_schema()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _trace_token: Option<&str>,
    ) -> Result<ToolResult, ToolError> {
        let a = number_arg(self.name(), &arguments, "a")?;
        let b = number_arg(self.name(), &arguments, "b")?;
        Ok(ToolResult::ok(serde_json::json!(a - b)))
    }
}

pub struct MultiplyTool;

#[async_trait]
impl Tool for MultiplyTool {
    fn name(&self) -> &str {
        "multiply"
    }

    fn description(&self) -> &str {
        "Multiply two numbers and return their product."
    }

    fn parameters(&self) -> BTreeMap<String, ToolParameter> {
        binary_schema()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _trace_token: Option<&str>,
    ) -> Result<ToolResult, ToolError> {
        let a = number_arg(self.name(), &arguments, "a")?;
        let b = number_arg(self.name(), &arguments, "b")?;
        Ok(ToolResult::ok(serde_json::json!(a * b)))
    }
}

pub struct DivideTool;

#[async_trait]
impl Tool for DivideTool {
    fn name(&self) -> &str {
        "divide"
    }

    fn description(&self) -> &str {
        "Divide the first number by the second. Fails on a zero divisor."
    }

    fn parameters(&self) -> BTreeMap<String, ToolParameter> {
        binary_schema()
    }

    async fn execute(
        &self,
        arguments: serde_json::Value,
        _trace_token: Option<&str>,
    ) -> Result<ToolResult, ToolError> {
        let a = number_arg(self.name(), &arguments, "a")?;
        let b = number_arg(self.name(), &arguments, "b")?;
        if b == 0.0 {
            return Err(ToolError::ExecutionFailed {
                tool_name: self.name().to_string(),
                reason: "division by zero".to_string(),
            });
        }
        Ok(ToolResult::ok(serde_json::json!(a / b)))
    }
}
