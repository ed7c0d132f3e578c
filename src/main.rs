mod commands;
mod config;

use anyhow::Result;
use clap::{Parser, Subcommand};
use tracing_subscriber::{EnvFilter, layer::SubscriberExt, util::SubscriberInitExt};

const DEFAULT_FILTER: &str = "calmerge=info,calmerge_core=info,calmerge_provider_google=info";
const VERBOSE_FILTER: &str = "calmerge=debug,calmerge_core=debug,calmerge_provider_google=debug";

#[derive(Parser)]
#[command(name = "calmerge")]
#[command(version, about = "Merge events from several Google calendars into one")]
struct Cli {
    /// Config file (defaults to ~/.config/calmerge/config.json)
    #[arg(short, long, global = true)]
    config: Option<String>,

    /// Log debug output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Authenticate with Google and store the session
    Auth,
    /// Keep the output calendar in sync with the input calendars
    Sync {
        /// Run a single cycle and exit
        #[arg(long)]
        once: bool,
    },
    /// Show what the next sync would add and remove
    Status,
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_tracing(cli.verbose);

    let config_path = cli.config.as_deref();

    match cli.command {
        Commands::Auth => commands::auth::run().await,
        Commands::Sync { once } => commands::sync::run(config_path, once).await,
        Commands::Status => commands::status::run(config_path).await,
    }
}

fn init_tracing(verbose: bool) {
    let filter = if verbose {
        EnvFilter::new(VERBOSE_FILTER)
    } else {
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(DEFAULT_FILTER))
    };

    tracing_subscriber::registry()
        .with(filter)
        .with(tracing_subscriber::fmt::layer().with_target(false))
        .init();
}
