pub mod buy_rent;
pub mod mortgage;
pub mod portfolio;

use clap::Args;
use rust_decimal::Decimal;
use tracing::debug;

use crate::input;
use rentbuy_core::portfolio::rates::average_rate;

/// Where the market loan rate comes from
#[derive(Args)]
pub struct MarketRateArgs {
    /// Market average loan rate in percent (e.g. 8.5)
    #[arg(long, conflicts_with = "rates")]
    pub rate: Option<Decimal>,

    /// Path to a bank rates CSV (columns: bank, rate); the average rate is used
    #[arg(long)]
    pub rates: Option<String>,
}

impl MarketRateArgs {
    pub fn is_given(&self) -> bool {
        self.rate.is_some() || self.rates.is_some()
    }

    pub fn resolve(&self) -> Result<Decimal, Box<dyn std::error::Error>> {
        if let Some(rate) = self.rate {
            return Ok(rate);
        }
        let path = self
            .rates
            .as_deref()
            .ok_or("--rate or --rates is required")?;
        let table = input::csv_in::read_rates(path)?;
        let avg = average_rate(&table)?;
        debug!(banks = table.len(), average = %avg, "market rate from rates table");
        Ok(avg)
    }
}
