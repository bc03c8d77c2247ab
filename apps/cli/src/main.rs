mod commands;
mod error;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use fc_core::config::Config;
use fc_core::manager::ConverterManager;

#[derive(Parser)]
#[command(name = "fc")]
#[command(version)]
#[command(about = "Your favorite file converter", long_about = None)]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Add a new converter from a source repository URL
    Add(commands::add::AddCommand),
    /// Remove an installed converter
    Remove(commands::remove::RemoveCommand),
    /// List available converters
    List(commands::list::ListCommand),
    /// Convert a file from one format to another
    Convert(commands::convert::ConvertCommand),
}

#[tokio::main]
async fn main() {
    init_tracing();
    let cli = Cli::parse();

    if let Err(err) = run(cli).await {
        error::render(&err);
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<()> {
    let config = Config::from_env()?;
    let manager = ConverterManager::new(config);
    manager
        .initialize()
        .await
        .context("failed to initialize converter manager")?;

    match cli.command {
        Commands::Add(cmd) => cmd.execute(&manager).await,
        Commands::Remove(cmd) => cmd.execute(&manager).await,
        Commands::List(cmd) => cmd.execute(&manager).await,
        Commands::Convert(cmd) => cmd.execute(&manager).await,
    }
}

fn init_tracing() {
    use tracing_subscriber::EnvFilter;

    let default_filter = if std::env::var_os(fc_core::config::DEBUG_ENV).is_some() {
        "fc_core=debug,fc=debug"
    } else {
        "fc_core=warn"
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(default_filter)),
        )
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();
}
