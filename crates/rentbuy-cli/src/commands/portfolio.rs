use clap::Args;
use serde_json::{json, Value};
use tracing::info;

use rentbuy_core::portfolio::batch::{self, PortfolioInput};
use rentbuy_core::portfolio::city::{self, CitySummaryInput};
use rentbuy_core::portfolio::rates::average_rate;

use super::MarketRateArgs;
use crate::{input, output};

/// Arguments for a catalog-wide analysis
#[derive(Args)]
pub struct AnalyzeArgs {
    /// Path to the property CSV
    #[arg(long)]
    pub properties: String,

    #[command(flatten)]
    pub market: MarketRateArgs,

    /// Financial policy file (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,

    /// Write one report row per listing to this CSV file
    #[arg(long)]
    pub out: Option<String>,
}

/// Arguments for a city-level summary
#[derive(Args)]
pub struct CitySummaryArgs {
    /// Path to the property CSV
    #[arg(long)]
    pub properties: String,

    /// City to summarise (case-insensitive)
    #[arg(long)]
    pub city: String,

    #[command(flatten)]
    pub market: MarketRateArgs,

    /// Financial policy file (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,
}

/// Arguments for averaging a bank rates table
#[derive(Args)]
pub struct AverageRateArgs {
    /// Path to the bank rates CSV (columns: bank, rate)
    #[arg(long)]
    pub rates: String,
}

pub fn run_analyze(args: AnalyzeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let portfolio = PortfolioInput {
        properties: input::csv_in::read_properties(&args.properties)?,
        market_rate: args.market.resolve()?,
        policy: input::file::load_policy(args.config.as_deref())?,
    };

    let result = batch::analyze_portfolio(&portfolio)?;

    if let Some(ref path) = args.out {
        output::csv_out::write_reports_csv(path, &result.result.reports)?;
        info!(path = %path, rows = result.result.reports.len(), "report written");
    }

    Ok(serde_json::to_value(result)?)
}

pub fn run_city_summary(args: CitySummaryArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let summary_input = CitySummaryInput {
        properties: input::csv_in::read_properties(&args.properties)?,
        city: args.city,
        market_rate: args.market.resolve()?,
        policy: input::file::load_policy(args.config.as_deref())?,
    };

    let result = city::city_summary(&summary_input)?;
    Ok(serde_json::to_value(result)?)
}

pub fn run_average_rate(args: AverageRateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let table = input::csv_in::read_rates(&args.rates)?;
    let avg = average_rate(&table)?;

    Ok(json!({
        "average_rate": avg.round_dp(2),
        "banks": table.len(),
        "rates": table,
    }))
}
