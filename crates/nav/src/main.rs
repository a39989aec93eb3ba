//! Managed navigation CLI.
//!
//! Provides commands for:
//! - `render`: Render the navigation document of a navigation item
//! - `tree`: Print the classified tree of a navigation item
//! - `check`: Link every navigation tree of a snapshot and report problems

mod commands;
mod error;
mod output;

use clap::{Parser, Subcommand};
use tracing_subscriber::EnvFilter;

use commands::{CheckArgs, RenderArgs, TreeArgs};
use output::Output;

/// Managed navigation engine.
#[derive(Parser)]
#[command(name = "nav", version, about)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Render the navigation document of a navigation item.
    Render(RenderArgs),
    /// Print the classified navigation tree of a navigation item.
    Tree(TreeArgs),
    /// Link every navigation tree and report structural problems.
    Check(CheckArgs),
}

impl Commands {
    fn verbose(&self) -> bool {
        match self {
            Self::Render(args) => args.common.verbose,
            Self::Tree(args) => args.common.verbose,
            Self::Check(args) => args.common.verbose,
        }
    }
}

fn main() {
    let cli = Cli::parse();
    let output = Output::new();

    // --verbose enables INFO level, otherwise use RUST_LOG or default to WARN
    let filter = if cli.command.verbose() {
        EnvFilter::new("info")
    } else {
        EnvFilter::from_default_env()
    };
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();

    let result = match cli.command {
        Commands::Render(args) => args.execute(),
        Commands::Tree(args) => args.execute(),
        Commands::Check(args) => args.execute(),
    };

    if let Err(err) = result {
        output.error(&format!("Error: {err}"));
        let mut source = std::error::Error::source(&err);
        while let Some(cause) = source {
            output.error(&format!("  caused by: {cause}"));
            source = cause.source();
        }
        std::process::exit(1);
    }
}
