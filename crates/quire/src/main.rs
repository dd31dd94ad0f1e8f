//! Quire CLI - static site generator and git publisher.
//!
//! Provides commands for:
//! - `build`: Render the content manifest into a static site
//! - `plan`: Show what publishing would change
//! - `publish`: Commit and push the site to a git branch

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{BuildArgs, PlanArgs, PublishArgs};
use output::Output;

/// Quire - static site generator and git publisher.
#[derive(Parser)]
#[command(name = "quire", version, about)]
struct Cli {
    /// Enable info-level logging.
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Build the site from the content manifest.
    Build(BuildArgs),
    /// Show what publishing would change, without pushing.
    Plan(PlanArgs),
    /// Commit and push the built site.
    Publish(PublishArgs),
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.verbose {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Build(args) => args.execute(),
        Commands::Plan(args) => args.execute(),
        Commands::Publish(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        std::process::exit(1);
    }
}
