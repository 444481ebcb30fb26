use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use navboard::cli::setup::setup;
use navboard::core::log::init_logging;

#[derive(Parser)]
#[command(version, about)]
struct Cli {
    /// Enable verbose logging
    #[arg(short, long, global = true)]
    verbose: bool,

    /// Path to optional configuration file
    #[arg(short, long, global = true)]
    config_path: Option<String>,

    #[command(subcommand)]
    command: Option<Commands>,
}

impl From<Commands> for navboard::AppCommand {
    fn from(cmd: Commands) -> navboard::AppCommand {
        match cmd {
            Commands::Dashboard { json } => navboard::AppCommand::Dashboard { json },
            Commands::Watch { interval, cycles } => navboard::AppCommand::Watch {
                interval_secs: interval,
                cycles,
            },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// Fetch everything once and print the dashboard
    Dashboard {
        /// Print the dashboard as JSON instead of tables
        #[arg(long)]
        json: bool,
    },
    /// Keep refreshing the dashboard on a fixed interval
    Watch {
        /// Seconds between refreshes (defaults to the config value)
        #[arg(short, long)]
        interval: Option<u64>,
        /// Stop after this many refreshes
        #[arg(long)]
        cycles: Option<usize>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => setup(),
        Some(cmd) => navboard::run_command(cmd.into(), cli.config_path.as_deref()).await,
        None => {
            Cli::command().print_help()?;
            Ok(())
        }
    };

    if let Err(e) = &result {
        tracing::error!(error = %e, "Application failed");
    }
    result
}
