use anyhow::Result;
use clap::{CommandFactory, Parser, Subcommand};
use tokenswap::core::log::init_logging;

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

impl From<Commands> for tokenswap::AppCommand {
    fn from(cmd: Commands) -> tokenswap::AppCommand {
        match cmd {
            Commands::Prices { filter } => tokenswap::AppCommand::Prices { filter },
            Commands::Quote { from, to, amount } => {
                tokenswap::AppCommand::Quote { from, to, amount }
            }
            Commands::Swap { from, to, amount } => tokenswap::AppCommand::Swap { from, to, amount },
            Commands::Setup => unreachable!("Setup command should be handled separately"),
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Create default configuration
    Setup,
    /// List the latest token prices
    Prices {
        /// Only show tokens containing this text
        #[arg(short, long)]
        filter: Option<String>,
    },
    /// Estimate how much of one token another is worth
    Quote {
        /// Token to swap from
        from: String,
        /// Token to swap to
        to: String,
        /// Amount of the source token
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
    /// Submit a (simulated) swap
    Swap {
        /// Token to swap from
        from: String,
        /// Token to swap to
        to: String,
        /// Amount of the source token
        #[arg(allow_hyphen_values = true)]
        amount: String,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();

    init_logging(cli.verbose);

    let result = match cli.command {
        Some(Commands::Setup) => tokenswap::cli::setup::setup(),
        Some(cmd) => tokenswap::run_command(cmd.into(), cli.config_path.as_deref()).await,
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
