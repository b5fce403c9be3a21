//! Goalrunner CLI — the main entry point.
//!
//! Commands:
//! - `demo`  — Run a scripted arithmetic goal through the full loop
//! - `tools` — List the built-in tools and their parameter schemas

use clap::{Parser, Subcommand};

mod commands;

#[derive(Parser)]
#[command(
    name = "goalrunner",
    about = "Goalrunner — bounded goal-driven agent runs",
    version,
    author
)]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,
}

#[derive(Subcommand)]
enum Commands {
    /// Run a scripted arithmetic demo through the orchestration loop
    Demo {
        /// Iteration budget for the run
        #[arg(short, long)]
        budget: Option<u32>,
    },

    /// List the built-in tools
    Tools,
}

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    // Initialize tracing
    let filter = if cli.verbose { "debug" } else { "info" };
    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(filter)),
        )
        .with_target(false)
        .init();

    match cli.command {
        Commands::Demo { budget } => commands::demo::run(budget).await?,
        Commands::Tools => commands::tools::run()?,
    }

    Ok(())
}
