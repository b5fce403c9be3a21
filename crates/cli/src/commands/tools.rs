//! `goalrunner tools` — lists the built-in tools.

use tracing::debug;

pub fn run() -> Result<(), Box<dyn std::error::Error>> {
    let registry = goalrunner_tools::default_registry()?;
    debug!(count = registry.names().len(), "Listing built-in tools");

    println!("Built-in tools");
    println!("==============");
    for description in registry.describe_all() {
        println!("\n  {} — {}", description.name, description.description);
        for (name, parameter) in &description.parameters {
            let requirement = if parameter.required { "required" } else { "optional" };
            println!(
                "    {name} ({:?}, {requirement}): {}",
                parameter.kind, parameter.description
            );
        }
    }

    Ok(())
}
