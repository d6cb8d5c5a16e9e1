pub mod cli;
pub mod core;
pub mod providers;

use crate::core::config::AppConfig;
use crate::core::{ConversionEstimator, PriceBook};
use crate::providers::{HttpSnapshotProvider, load_price_book};
use anyhow::Result;
use tracing::{debug, info};

#[derive(Debug, Clone, PartialEq)]
pub enum AppCommand {
    /// List resolved token prices, optionally filtered by symbol.
    Prices { filter: Option<String> },
    /// Estimate a conversion without submitting it.
    Quote {
        from: String,
        to: String,
        amount: String,
    },
    /// Validate, submit and confirm a swap.
    Swap {
        from: String,
        to: String,
        amount: String,
    },
}

pub fn load_config(config_path: Option<&str>) -> Result<AppConfig> {
    let config = match config_path {
        Some(path) => AppConfig::load_from_path(path)?,
        None => AppConfig::load()?,
    };
    debug!("Loaded config: {config:#?}");
    Ok(config)
}

async fn fetch_book(config: &AppConfig) -> Result<PriceBook> {
    let provider = HttpSnapshotProvider::from_config(&config.providers.prices);

    let spinner = cli::ui::new_spinner("Loading token prices...");
    let book = load_price_book(&provider).await;
    spinner.finish_and_clear();

    match book {
        Ok(book) => Ok(book),
        Err(e) => {
            eprintln!("{}", cli::ui::style_text(&e.to_string(), cli::ui::StyleType::Error));
            Err(e.into())
        }
    }
}

pub async fn run_command(command: AppCommand, config_path: Option<&str>) -> Result<()> {
    info!("Token swap starting...");

    let config = load_config(config_path)?;
    let book = fetch_book(&config).await?;
    let estimator = ConversionEstimator::new(config.precision);

    match command {
        AppCommand::Prices { filter } => {
            cli::prices::run(&book, filter.as_deref(), &config.providers.icons.base_url);
            Ok(())
        }
        AppCommand::Quote { from, to, amount } => {
            cli::quote::run(&book, &estimator, &from, &to, &amount)
        }
        AppCommand::Swap { from, to, amount } => {
            cli::swap::run(
                &book,
                estimator,
                &from,
                &to,
                &amount,
                config.submit_delay(),
            )
            .await
        }
    }
}
