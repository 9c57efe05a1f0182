use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rentbuy_core::mortgage::amortization::{self, AmortizationInput};

use crate::input;

/// Arguments for a loan amortization schedule
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct AmortizeArgs {
    /// Loan principal
    #[arg(long)]
    pub principal: Option<Decimal>,

    /// Annual interest rate in percent (e.g. 8.5)
    #[arg(long)]
    pub rate: Option<Decimal>,

    /// Loan tenure in years
    #[arg(long)]
    pub years: Option<u32>,

    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_amortize(args: AmortizeArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let loan: AmortizationInput = if let Some(ref path) = args.input {
        input::file::read_json(path)?
    } else if let Some(loan) = input::stdin::read_stdin()? {
        loan
    } else {
        AmortizationInput {
            principal: args
                .principal
                .ok_or("--principal is required (or provide --input)")?,
            annual_rate_percent: args
                .rate
                .ok_or("--rate is required (or provide --input)")?,
            tenure_years: args
                .years
                .ok_or("--years is required (or provide --input)")?,
        }
    };

    let result = amortization::build_amortization(&loan)?;
    Ok(serde_json::to_value(result)?)
}
