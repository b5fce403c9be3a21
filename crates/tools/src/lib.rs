//! # Goalrunner Tools
//!
//! Built-in tools implementing the core `Tool` trait, plus a helper to
//! assemble them into a ready-to-use registry.

pub mod math;

pub use math::{AddTool, DivideTool, MultiplyTool, SubtractTool};

use goalrunner_core::error::ToolError;
use goalrunner_core::tool::ToolRegistry;

/// A registry pre-populated with all built-in tools, in a stable order.
pub fn default_registry() -> Result<ToolRegistry, ToolError> {
    let mut registry = ToolRegistry::new();
    registry.register(Box::new(AddTool))?;
    registry.register(Box::new(SubtractTool))?;
    registry.register(Box::new(MultiplyTool))?;
    registry.register(Box::new(DivideTool))?;
    Ok(registry)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_registry_lists_tools_in_registration_order() {
        let registry = default_registry().unwrap();
        assert_eq!(registry.names(), vec!["add", "subtract", "multiply", "divide"]);
    }
}
