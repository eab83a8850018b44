//! CLI application for mapping extracted NF-e data into typed records.

mod commands;
mod output;

use clap::{Parser, Subcommand};
use console::style;
use tracing::Level;
use tracing_subscriber::FmtSubscriber;

use commands::{batch, config, process};
use nfe_core::MappingError;

/// NF-e mapper - Turn vision-model extraction replies into typed NF-e records
#[derive(Parser)]
#[command(name = "nfe")]
#[command(author, version, about, long_about = None)]
struct Cli {
    /// Enable verbose output
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Path to config file
    #[arg(short, long, global = true)]
    config: Option<String>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Map a single extraction response
    Process(process::ProcessArgs),

    /// Map multiple extraction responses
    Batch(batch::BatchArgs),

    /// Manage configuration
    Config(config::ConfigArgs),
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    // Set up logging based on verbosity
    let level = match cli.verbose {
        0 => Level::WARN,
        1 => Level::INFO,
        2 => Level::DEBUG,
        _ => Level::TRACE,
    };

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_writer(std::io::stderr)
        .finish();

    tracing::subscriber::set_global_default(subscriber)?;

    // Execute command
    let result = match cli.command {
        Commands::Process(args) => process::run(args, cli.config.as_deref()).await,
        Commands::Batch(args) => batch::run(args, cli.config.as_deref()).await,
        Commands::Config(args) => config::run(args).await,
    };

    if let Err(err) = result {
        if let Some(mapping) = err.downcast_ref::<MappingError>() {
            eprintln!("{} {}", style("Mapping error:").red().bold(), mapping);
            eprintln!("The extracted JSON could not be converted into an NF-e record.");
        } else {
            eprintln!("{} {:#}", style("Error:").red().bold(), err);
        }
        std::process::exit(1);
    }

    Ok(())
}
