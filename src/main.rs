use anyhow::Result;
use clap::{Parser, Subcommand};
use dotenvy::dotenv;
use std::sync::Arc;

use fx_core::api::ExchangeRateClient;
use fx_core::config::Config;
use fx_core::models::Currency;
use fx_core::service::CurrencyService;
use fx_core::store::create_db_pool;
use fx_core::{format_amount, parse_amount};

#[derive(Parser)]
#[command(name = "fx-core", about = "VND/USD conversion and formatting core")]
struct Cli {
    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Show the current USD→VND rate and where it came from
    Rate,
    /// Convert an amount between VND and USD
    Convert {
        /// Free-form amount ("1.000.000", "$1,000.50", ...)
        amount: String,
        #[arg(long, default_value = "vnd")]
        from: Currency,
        #[arg(long, default_value = "usd")]
        to: Currency,
    },
    /// Format an amount in the active display currency
    Format { amount: String },
    /// Show how the amount parser reads an input string
    Parse { input: String },
    /// Switch the display currency between VND and USD
    Toggle,
}

#[tokio::main]
async fn main() -> Result<()> {
    dotenv().ok();

    let cli = Cli::parse();
    let config = Config::default();

    // Parsing needs no database or provider
    if let Commands::Parse { input } = &cli.command {
        match parse_amount(input) {
            Some(value) => println!("{}", value),
            None => println!("No interpretable amount in {:?}", input),
        }
        return Ok(());
    }

    let pool = create_db_pool(&config.db_url).await?;
    let provider = Arc::new(ExchangeRateClient::new(&config)?);
    let service = CurrencyService::new(pool, provider).await?;

    match cli.command {
        Commands::Rate => {
            println!("Fetching current exchange rate...");
            let rate = service.current_rate().await;
            println!("✅ 1 USD = {}", format_amount(rate.usd_to_vnd, Currency::Vnd));
            match chrono::DateTime::from_timestamp(rate.last_updated, 0) {
                Some(at) if rate.last_updated > 0 => println!("   as of {}", at),
                _ => println!("   (hardcoded fallback rate)"),
            }
        }
        Commands::Convert { amount, from, to } => {
            let Some(value) = parse_amount(&amount) else {
                anyhow::bail!("No interpretable amount in {:?}", amount);
            };
            let converted = service.convert(value, from, to).await;
            println!(
                "✅ {} = {}",
                format_amount(value, from),
                format_amount(converted, to)
            );
        }
        Commands::Format { amount } => {
            let Some(value) = parse_amount(&amount) else {
                anyhow::bail!("No interpretable amount in {:?}", amount);
            };
            println!("{}", service.format_display(value));
        }
        Commands::Toggle => {
            let mode = service.toggle_display_currency().await;
            println!("✅ Display currency is now {}", mode);
        }
        Commands::Parse { .. } => unreachable!(),
    }

    Ok(())
}
