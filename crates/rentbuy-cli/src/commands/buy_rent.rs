use clap::Args;
use rust_decimal::Decimal;
use serde_json::Value;

use rentbuy_core::buy_rent::property::PropertyRecord;
use rentbuy_core::portfolio::report::{self, SingleEvaluationInput};

use super::MarketRateArgs;
use crate::input;

/// Arguments for a single-listing evaluation
#[derive(Args)]
#[command(allow_hyphen_values = true)]
pub struct EvaluateArgs {
    /// Listing price
    #[arg(long)]
    pub price: Option<Decimal>,

    /// Comparable monthly rent
    #[arg(long)]
    pub rent: Option<Decimal>,

    /// Carpet area in square feet
    #[arg(long)]
    pub area: Option<Decimal>,

    /// Listing title
    #[arg(long)]
    pub title: Option<String>,

    /// City of the listing
    #[arg(long)]
    pub city: Option<String>,

    #[command(flatten)]
    pub market: MarketRateArgs,

    /// Financial policy file (JSON or YAML)
    #[arg(long)]
    pub config: Option<String>,

    /// Path to JSON input file
    #[arg(long)]
    pub input: Option<String>,
}

pub fn run_evaluate(args: EvaluateArgs) -> Result<Value, Box<dyn std::error::Error>> {
    let document: Option<SingleEvaluationInput> = if let Some(ref path) = args.input {
        Some(input::file::read_json(path)?)
    } else {
        input::stdin::read_stdin()?
    };

    let evaluation = match document {
        // Flags win over the JSON document
        Some(mut doc) => {
            if args.market.is_given() {
                doc.market_rate = args.market.resolve()?;
            }
            if args.config.is_some() {
                doc.policy = input::file::load_policy(args.config.as_deref())?;
            }
            doc
        }
        None => SingleEvaluationInput {
            property: PropertyRecord {
                title: args.title,
                city: args.city,
                price: Some(args.price.ok_or("--price is required (or provide --input)")?),
                rent_estimate: Some(args.rent.ok_or("--rent is required (or provide --input)")?),
                area_sqft: args.area,
                ..Default::default()
            },
            market_rate: args.market.resolve()?,
            policy: input::file::load_policy(args.config.as_deref())?,
        },
    };

    let result = report::evaluate_single(&evaluation)?;
    Ok(serde_json::to_value(result)?)
}
