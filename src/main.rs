use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};

use photostate::config::{ClientConfig, ConfigStore};
use photostate::logging::init_tracing;
use photostate::simulation::{self, SimulationOptions};

#[derive(Parser)]
#[command(name = "photostate")]
#[command(about = "Reactive view-state core of a photo-sharing client")]
struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Config file (defaults to the platform config directory)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Log filter used when RUST_LOG is unset
    #[arg(long, global = true)]
    log_filter: Option<String>,
}

#[derive(Subcommand)]
enum Commands {
    /// Drive the profile and feed screens through a scripted session
    Simulate {
        /// Own posts to seed
        #[arg(long, default_value = "3")]
        posts: usize,

        /// Lose connectivity after the initial fetch
        #[arg(long)]
        offline: bool,
    },

    /// Print the effective configuration
    Config,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    let path = cli.config.unwrap_or_else(ClientConfig::config_path);
    let config = ClientConfig::load_from(&path)
        .with_context(|| format!("loading configuration from {}", path.display()))?;
    init_tracing(cli.log_filter.as_deref().unwrap_or(&config.logging.filter));
    let store = ConfigStore::new(config, path);

    match cli.command {
        Commands::Simulate { posts, offline } => {
            let report = simulation::run(store, SimulationOptions { posts, offline }).await?;
            println!("{}", serde_json::to_string_pretty(&report)?);
        }
        Commands::Config => {
            println!("# {}", store.path().display());
            println!("{}", toml::to_string_pretty(&store.get())?);
        }
    }

    Ok(())
}
