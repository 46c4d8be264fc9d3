mod cmd;
mod output;
mod settings;

use clap::{Parser, Subcommand};
use cmd::config::ConfigSubcommand;
use settings::ConfigOverrides;
use std::path::PathBuf;

#[derive(Parser)]
#[command(
    name = "shipby",
    about = "Keep DEAR sale ship-by dates in line with the customer's requested delivery date",
    version,
    propagate_version = true
)]
struct Cli {
    /// Config file (default: ./shipby.yaml if present, otherwise built-in defaults)
    #[arg(long, global = true, env = "SHIPBY_CONFIG")]
    config: Option<PathBuf>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    #[command(flatten)]
    overrides: ConfigOverrides,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Poll DEAR on a fixed interval and serve the liveness endpoint
    Run,

    /// Run a single reconciliation pass and print the summary
    Once {
        /// Compute updates without writing anything back
        #[arg(long)]
        dry_run: bool,
    },

    /// Reconcile one order offline and print the decision
    Reconcile {
        /// Current ship-by date (e.g. 2024-10-11 or 2024-10-11T00:00:00Z)
        #[arg(long)]
        ship_by: Option<String>,
        /// Current internal note
        #[arg(long)]
        note: Option<String>,
    },

    /// Inspect and manage the config file
    Config {
        #[command(subcommand)]
        subcommand: ConfigSubcommand,
    },
}

fn main() {
    let cli = Cli::parse();

    let default_level = match &cli.command {
        Commands::Run => tracing::Level::INFO,
        _ => tracing::Level::WARN,
    };

    tracing_subscriber::fmt()
        .with_env_filter(
            tracing_subscriber::EnvFilter::from_default_env().add_directive(default_level.into()),
        )
        .with_target(false)
        .init();

    let config_path = settings::resolve_config_path(cli.config.as_deref());

    let result = match cli.command {
        Commands::Run => settings::load(config_path.as_deref(), &cli.overrides)
            .and_then(|config| cmd::run::run(&config)),
        Commands::Once { dry_run } => settings::load(config_path.as_deref(), &cli.overrides)
            .and_then(|config| cmd::once::run(&config, dry_run, cli.json)),
        Commands::Reconcile { ship_by, note } => {
            cmd::reconcile::run(ship_by.as_deref(), note, cli.json)
        }
        Commands::Config { subcommand } => {
            cmd::config::run(config_path.as_deref(), &cli.overrides, subcommand, cli.json)
        }
    };

    if let Err(e) = result {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}
