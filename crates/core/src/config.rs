//! Agent configuration.
//!
//! Everything an agent instance needs is passed explicitly at construction.
//! There is no process-wide state, so multiple independently configured
//! agents can coexist in one process.

use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Configuration for one agent instance. Immutable after construction.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AgentConfig {
    /// Human-readable agent name
    pub name: String,

    /// What this agent is for (informs the decision engine)
    #[serde(default)]
    pub description: String,

    /// Maximum think/act cycles per run (safety limit)
    #[serde(default = "default_max_iterations")]
    pub max_iterations: u32,

    /// Optional descriptor of the desired final-answer shape,
    /// forwarded verbatim to the decision engine
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub output_schema: Option<serde_json::Value>,

    /// Optional credential for decision engine implementations, which read
    /// it at construction. The loop itself never touches it.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub credentials: Option<String>,

    /// Raise decision logging from debug to info level
    #[serde(default)]
    pub verbose: bool,
}

fn default_max_iterations() -> u32 {
    25
}

impl AgentConfig {
    /// A config with defaults for everything but the name.
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            description: String::new(),
            max_iterations: default_max_iterations(),
            output_schema: None,
            credentials: None,
            verbose: false,
        }
    }

    /// Set the agent description.
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }

    /// Set the iteration budget.
    pub fn with_max_iterations(mut self, max: u32) -> Self {
        self.max_iterations = max;
        self
    }

    /// Set the output schema descriptor.
    pub fn with_output_schema(mut self, schema: serde_json::Value) -> Self {
        self.output_schema = Some(schema);
        self
    }

    /// Toggle verbose decision logging.
    pub fn with_verbose(mut self, verbose: bool) -> Self {
        self.verbose = verbose;
        self
    }

    /// Validate the configuration. Fatal before any run starts.
    pub fn validate(&self) -> Result<()> {
        if self.name.trim().is_empty() {
            return Err(Error::Config {
                message: "agent name must not be empty".into(),
            });
        }
        if self.max_iterations == 0 {
            return Err(Error::Config {
                message: "max_iterations must be greater than zero".into(),
            });
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_are_valid() {
        let config = AgentConfig::new("math-agent");
        assert_eq!(config.max_iterations, 25);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn zero_budget_is_rejected() {
        let config = AgentConfig::new("math-agent").with_max_iterations(0);
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn empty_name_is_rejected() {
        let config = AgentConfig::new("  ");
        assert!(matches!(config.validate(), Err(Error::Config { .. })));
    }

    #[test]
    fn deserializes_with_defaults() {
        let config: AgentConfig = serde_json::from_str(r#"{"name": "a"}"#).unwrap();
        assert_eq!(config.max_iterations, 25);
        assert!(!config.verbose);
    }
}
